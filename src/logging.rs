use log::*;
use std::io;

pub use log::LevelFilter::*;

/// Routes the `log` facade to stderr. Stdout is reserved for action output.
pub fn setup_logging(verbosity: LevelFilter) {
    let result = fern::Dispatch::new()
        .level(verbosity)
        .format(|out, message, record| out.finish(format_args!("({}) {}: {}", record.level(), record.target(), message)))
        .chain(io::stderr())
        .apply();

    if let Err(err) = result {
        eprintln!("Logger already initialized: {}", err);
    }
}
