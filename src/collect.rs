use std::collections::{HashMap, HashSet};

use log::debug;

use crate::color::Color;
use crate::config::{SampleConfig, TraceMode};
use crate::quantize::quantize;
use crate::sampler::Sample;
use crate::shape::{Point, PolylineShape, RectShape, Shape};

/// Group samples into shapes for the configured mode.
///
/// `width` and `height` are the image dimensions, used to clip grid cells.
/// Polyline mode never reaches this stage and yields no shapes.
pub fn collect<I>(samples: I, config: &SampleConfig, width: u32, height: u32) -> Vec<Shape>
where
    I: IntoIterator<Item = Sample>,
{
    match config.mode {
        TraceMode::Grid => collect_cells(samples, config, width, height)
            .into_iter()
            .map(Shape::from)
            .collect(),
        TraceMode::Threshold => collect_groups(samples, config)
            .into_iter()
            .map(Shape::from)
            .collect(),
        TraceMode::Polyline => Vec::new(),
    }
}

/// One posterized cell per sample. The first sample mapping to a given
/// `(color, column, row)` wins; later ones are dropped.
pub fn collect_cells<I>(
    samples: I,
    config: &SampleConfig,
    width: u32,
    height: u32,
) -> Vec<RectShape>
where
    I: IntoIterator<Item = Sample>,
{
    let stride = config.stride.max(1);
    let mut seen: HashSet<(Color, u32, u32)> = HashSet::new();
    let mut cells = Vec::new();

    for sample in samples {
        let Some(color) = quantize(sample.color, config) else {
            continue;
        };
        if sample.x >= width || sample.y >= height {
            continue;
        }
        if !seen.insert((color, sample.x / stride, sample.y / stride)) {
            continue;
        }
        cells.push(RectShape {
            x: sample.x,
            y: sample.y,
            width: stride.min(width - sample.x),
            height: stride.min(height - sample.y),
            color,
        });
    }

    debug!("collected {} grid cells", cells.len());
    cells
}

/// One closed path per retained color, holding every sample of that color in order.
///
/// Colors with fewer than `min_points` samples are dropped, and at most
/// `max_colors` groups are kept, in the order their colors were first seen.
/// A group of exactly `min_points` samples is kept, so `min_points` is the
/// smallest group that can ever be emitted.
pub fn collect_groups<I>(samples: I, config: &SampleConfig) -> Vec<PolylineShape>
where
    I: IntoIterator<Item = Sample>,
{
    let mut index: HashMap<Color, usize> = HashMap::new();
    let mut groups: Vec<(Color, Vec<Point>)> = Vec::new();

    for sample in samples {
        let Some(color) = quantize(sample.color, config) else {
            continue;
        };
        let slot = *index.entry(color).or_insert_with(|| {
            groups.push((color, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(Point::new(sample.x, sample.y));
    }

    let total = groups.len();
    let lines: Vec<PolylineShape> = groups
        .into_iter()
        .filter(|(_, points)| points.len() >= config.min_points.max(1))
        .take(config.max_colors)
        .map(|(color, points)| PolylineShape {
            color,
            points,
            closed: true,
        })
        .collect();

    debug!(
        "kept {} of {} color groups (min {} points, max {} colors)",
        lines.len(),
        total,
        config.min_points,
        config.max_colors
    );
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::PixelBuffer;
    use crate::sampler::sample;
    use image::{Rgba, RgbaImage};

    fn solid(w: u32, h: u32, rgba: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(rgba))
    }

    fn cells_for(img: &RgbaImage, config: &SampleConfig) -> Vec<RectShape> {
        let buffer = PixelBuffer::from_image(img);
        collect_cells(
            sample(buffer, config.stride),
            config,
            buffer.width(),
            buffer.height(),
        )
    }

    fn groups_for(img: &RgbaImage, config: &SampleConfig) -> Vec<PolylineShape> {
        collect_groups(sample(PixelBuffer::from_image(img), config.stride), config)
    }

    mod collect_cells {
        use super::*;

        mod unit {
            use super::*;

            #[test]
            fn solid_red_four_cells() {
                let img = solid(16, 16, [255, 0, 0, 255]);
                let cells = cells_for(&img, &SampleConfig::grid(8));
                assert_eq!(cells.len(), 4);
                for cell in &cells {
                    assert_eq!((cell.width, cell.height), (8, 8));
                    assert_eq!(cell.color, Color::new(224, 0, 0));
                }
                let origins: Vec<_> = cells.iter().map(|c| (c.x, c.y)).collect();
                assert_eq!(origins, vec![(0, 0), (8, 0), (0, 8), (8, 8)]);
            }

            #[test]
            fn edge_cells_are_clipped() {
                let img = solid(10, 5, [0, 0, 0, 255]);
                let cells = cells_for(&img, &SampleConfig::grid(8));
                assert_eq!(cells.len(), 2);
                assert_eq!((cells[0].width, cells[0].height), (8, 5));
                assert_eq!((cells[1].x, cells[1].width, cells[1].height), (8, 2, 5));
            }

            #[test]
            fn duplicate_key_keeps_first() {
                let config = SampleConfig::grid(4);
                let first = Sample {
                    x: 0,
                    y: 0,
                    color: Color::new(1, 1, 1),
                    alpha: 255,
                };
                let dup = Sample {
                    x: 2,
                    y: 1,
                    color: Color::new(5, 5, 5),
                    alpha: 255,
                };
                let cells = collect_cells([first, dup], &config, 8, 8);
                assert_eq!(cells.len(), 1);
                assert_eq!((cells[0].x, cells[0].y), (0, 0));
            }

            #[test]
            fn alpha_is_ignored() {
                let img = solid(4, 4, [64, 64, 64, 0]);
                let cells = cells_for(&img, &SampleConfig::grid(4));
                assert_eq!(cells.len(), 1);
                assert_eq!(cells[0].color, Color::new(64, 64, 64));
            }
        }

        mod prop {
            use super::*;
            use proptest::prelude::*;

            proptest! {
                /// collect_cells: every cell lies inside the image
                #[test]
                fn cells_contained(
                    w in 1u32..48,
                    h in 1u32..48,
                    stride in 1u32..16,
                    seed in any::<u8>()
                ) {
                    let img = RgbaImage::from_fn(w, h, |x, y| {
                        let v = (x * 31 + y * 17) as u8 ^ seed;
                        Rgba([v, v.wrapping_mul(3), v.wrapping_add(90), 255])
                    });
                    for cell in cells_for(&img, &SampleConfig::grid(stride)) {
                        prop_assert!(cell.x + cell.width <= w);
                        prop_assert!(cell.y + cell.height <= h);
                        prop_assert!(cell.width >= 1 && cell.height >= 1);
                    }
                }
            }
        }
    }

    mod collect_groups {
        use super::*;

        mod unit {
            use super::*;

            #[test]
            fn white_image_has_no_groups() {
                let img = solid(10, 10, [255, 255, 255, 255]);
                let config = SampleConfig::threshold(128).with_stride(1);
                assert!(groups_for(&img, &config).is_empty());
            }

            #[test]
            fn dark_pixels_grouped_in_row_major_order() {
                let img = RgbaImage::from_fn(4, 4, |x, _| {
                    if x < 2 {
                        Rgba([0, 0, 0, 255])
                    } else {
                        Rgba([255, 255, 255, 255])
                    }
                });
                let config = SampleConfig::threshold(128)
                    .with_stride(1)
                    .with_min_points(1);
                let groups = groups_for(&img, &config);
                assert_eq!(groups.len(), 1);
                assert!(groups[0].closed);
                assert_eq!(
                    groups[0].points,
                    vec![
                        Point::new(0, 0),
                        Point::new(1, 0),
                        Point::new(0, 1),
                        Point::new(1, 1),
                        Point::new(0, 2),
                        Point::new(1, 2),
                        Point::new(0, 3),
                        Point::new(1, 3),
                    ]
                );
            }

            #[test]
            fn sparse_colors_dropped() {
                // 9 dark pixels of one color, 12 of another
                let img = RgbaImage::from_fn(21, 1, |x, _| {
                    if x < 9 {
                        Rgba([10, 0, 0, 255])
                    } else {
                        Rgba([0, 0, 10, 255])
                    }
                });
                let config = SampleConfig::threshold(128).with_stride(1);
                let groups = groups_for(&img, &config);
                assert_eq!(groups.len(), 1);
                assert_eq!(groups[0].color, Color::new(0, 0, 10));
                assert_eq!(groups[0].points.len(), 12);
            }

            #[test]
            fn exactly_min_points_kept() {
                let img = solid(10, 1, [0, 0, 0, 255]);
                let config = SampleConfig::threshold(128).with_stride(1);
                assert_eq!(groups_for(&img, &config).len(), 1);
            }

            #[test]
            fn max_colors_keeps_first_seen() {
                let img = RgbaImage::from_fn(3, 1, |x, _| Rgba([x as u8, 0, 0, 255]));
                let config = SampleConfig::threshold(128)
                    .with_stride(1)
                    .with_min_points(1)
                    .with_max_colors(2);
                let colors: Vec<_> = groups_for(&img, &config)
                    .iter()
                    .map(|g| g.color)
                    .collect();
                assert_eq!(colors, vec![Color::new(0, 0, 0), Color::new(1, 0, 0)]);
            }
        }

        mod prop {
            use super::*;
            use proptest::prelude::*;

            proptest! {
                /// collect_groups: no emitted group is below the minimum size
                #[test]
                fn respects_min_points(
                    pixels in proptest::collection::vec(0u8..4, 1..200),
                    min_points in 1usize..20
                ) {
                    let w = pixels.len() as u32;
                    let img = RgbaImage::from_fn(w, 1, |x, _| Rgba([pixels[x as usize], 0, 0, 255]));
                    let config = SampleConfig::threshold(128)
                        .with_stride(1)
                        .with_min_points(min_points);
                    for group in groups_for(&img, &config) {
                        prop_assert!(group.points.len() >= min_points);
                    }
                }
            }
        }
    }

    #[test]
    fn polyline_mode_collects_nothing() {
        let img = solid(4, 4, [0, 0, 0, 255]);
        let config = SampleConfig::new(TraceMode::Polyline).with_stride(1);
        let shapes = collect(sample(PixelBuffer::from_image(&img), 1), &config, 4, 4);
        assert!(shapes.is_empty());
    }
}
