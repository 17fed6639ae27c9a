mod trace;
mod utils;

use crate::cli::{Cli, Commands, GlobalOptions};
use pixtrace::PixtraceResult;

/// The main function to run the command based on CLI input.
pub fn run(cli: Cli) -> PixtraceResult<()> {
    let Cli { global, command } = cli;
    dispatch(&global, command)
}

/// Dispatch the command to the appropriate handler.
fn dispatch(global: &GlobalOptions, command: Commands) -> PixtraceResult<()> {
    match command {
        Commands::Trace(cmd) => trace::run(global, cmd),
    }
}
