use std::path::Path;

use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::file::FileAppender;
use log4rs::append::Append;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

use crate::error::AppResult;

const CONSOLE_PATTERN: &str = "{m}{n}";
const FILE_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} {l:<5} {t} - {m}{n}";

pub fn level_for_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Console output goes to stderr so it stays out of the terminal window's
/// stdout stream; `log_file` redirects everything to a file instead.
pub fn build_config(level: LevelFilter, log_file: Option<&Path>) -> AppResult<Config> {
    let appender: Box<dyn Append> = match log_file {
        Some(path) => Box::new(
            FileAppender::builder()
                .encoder(Box::new(PatternEncoder::new(FILE_PATTERN)))
                .build(path)?,
        ),
        None => Box::new(
            ConsoleAppender::builder()
                .target(Target::Stderr)
                .encoder(Box::new(PatternEncoder::new(CONSOLE_PATTERN)))
                .build(),
        ),
    };

    let config = Config::builder()
        .appender(Appender::builder().build("main", appender))
        .build(Root::builder().appender("main").build(level))?;
    Ok(config)
}

pub fn init(level: LevelFilter, log_file: Option<&Path>) -> AppResult<()> {
    log4rs::init_config(build_config(level, log_file)?)?;
    Ok(())
}
