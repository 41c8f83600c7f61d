use clap::Parser;
use std::path::{Path, PathBuf};

mod app;
mod decode;
mod dots;
mod error;
mod input;
mod logging;
mod pixels;
mod present;
mod sampler;
mod screenshot;
mod terminal_setup;
mod turtle;

use app::{RunConfig, RunOutcome};
use decode::ImageFileDecoder;
use error::AppResult;
use present::headless::HeadlessPresenter;
use present::terminal::TerminalPresenter;
use screenshot::ScreenShot;
use terminal_setup::install_panic_hook;
use turtle::screen::TurtleScreen;
use turtle::Shape;

#[derive(Debug, Parser)]
#[command(name = "pixelize", version, about = "Render an image as dot art on a terminal canvas")]
struct Cli {
    /// Image to pixelize
    #[arg(default_value = "sample.png")]
    input: PathBuf,
    #[arg(
        long,
        value_name = "N",
        default_value_t = 5,
        value_parser = clap::value_parser!(u16).range(1..),
        help = "Distance in pixels between sampled rows and columns"
    )]
    stride: u16,
    #[arg(long, value_enum, default_value_t = Shape::Circle, help = "Shape stamped for each dot")]
    dot_shape: Shape,
    #[arg(long, help = "Render off-screen without opening a terminal window")]
    headless: bool,
    #[arg(long, value_name = "PNG", help = "Save the finished canvas as a PNG image")]
    screenshot: Option<PathBuf>,
    #[arg(long, value_name = "FILE", help = "Write log output to FILE instead of stderr")]
    log_file: Option<PathBuf>,
    #[arg(short, long, action = clap::ArgAction::Count, help = "Log every dot (-v) or everything (-vv)")]
    verbose: u8,
}

/// Per-dot lines stay at debug while the log shares the terminal with the window.
fn dot_log_level(headless: bool, log_file: Option<&Path>) -> log::Level {
    if headless || log_file.is_some() {
        log::Level::Info
    } else {
        log::Level::Debug
    }
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();
    logging::init(
        logging::level_for_verbosity(cli.verbose),
        cli.log_file.as_deref(),
    )?;

    let config = RunConfig {
        dot_log_level: dot_log_level(cli.headless, cli.log_file.as_deref()),
        image_path: cli.input,
        stride: cli.stride as usize,
        dot_shape: cli.dot_shape,
    };
    let screenshot = cli.screenshot.map(ScreenShot::new);

    let outcome = if cli.headless {
        app::run(&ImageFileDecoder, &config, || {
            TurtleScreen::open(HeadlessPresenter::default(), screenshot)
        })?
    } else {
        install_panic_hook();
        app::run(&ImageFileDecoder, &config, || {
            TurtleScreen::open(TerminalPresenter::new(), screenshot)
        })?
    };

    match outcome {
        RunOutcome::Rendered { dots } => log::info!("rendered {dots} dots"),
        RunOutcome::ImageUnavailable => {}
    }
    Ok(())
}
