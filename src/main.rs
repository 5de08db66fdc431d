use std::env;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use circle_progress::{
    CircleProgress, CircleProgressConfig, ImageSource, ProgressCommand, ResourceId,
    ResourceRegistry,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const FINISHED_SKIN: ResourceId = ResourceId(1);
const UNFINISHED_SKIN: ResourceId = ResourceId(2);

#[derive(Debug, Default)]
struct Options {
    font: Option<PathBuf>,
    finished: Option<PathBuf>,
    unfinished: Option<PathBuf>,
    max: Option<i32>,
    prefix: Option<String>,
    suffix: Option<String>,
    size: Option<u32>,
}

fn parse_options(args: impl IntoIterator<Item = String>) -> Options {
    let mut options = Options::default();
    let mut args = args.into_iter().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--font" => options.font = args.next().map(PathBuf::from),
            "--finished" => options.finished = args.next().map(PathBuf::from),
            "--unfinished" => options.unfinished = args.next().map(PathBuf::from),
            "--max" => options.max = args.next().and_then(|v| v.parse().ok()),
            "--prefix" => options.prefix = args.next(),
            "--suffix" => options.suffix = args.next(),
            "--size" => options.size = args.next().and_then(|v| v.parse().ok()),
            other => warn!(argument = other, "ignoring unknown argument"),
        }
    }
    options
}

fn main() -> circle_progress::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let options = parse_options(env::args());
    debug!(?options, "parsed arguments");

    let font_data = match &options.font {
        Some(path) => Some(std::fs::read(path)?),
        None => None,
    };

    let mut resources = ResourceRegistry::new();
    if let Some(path) = options.finished {
        resources.register(FINISHED_SKIN, ImageSource::Path(path));
    }
    if let Some(path) = options.unfinished {
        resources.register(UNFINISHED_SKIN, ImageSource::Path(path));
    }

    let config = CircleProgressConfig::builder()
        .max(options.max.unwrap_or(circle_progress::config::DEFAULT_MAX))
        .prefix_text(options.prefix.unwrap_or_default())
        .suffix_text(options.suffix.unwrap_or_else(|| "%".to_string()))
        .window_size(options.size.unwrap_or(300))
        .maybe_font_data(font_data)
        .maybe_finished_drawable(resources.contains(FINISHED_SKIN).then_some(FINISHED_SKIN))
        .maybe_unfinished_drawable(
            resources
                .contains(UNFINISHED_SKIN)
                .then_some(UNFINISHED_SKIN),
        )
        .build();
    let mut progress = CircleProgress::new(config).with_resources(resources);

    // Progress values arrive one integer per line on stdin.
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match line.trim().parse::<i32>() {
                Ok(value) => {
                    if sender.send(ProgressCommand::SetProgress(value)).is_err() {
                        break;
                    }
                }
                Err(_) => warn!(line = line.trim(), "ignoring non-integer input"),
            }
        }
        debug!("stdin closed");
    });

    info!(max = progress.max(), "showing progress; pipe integers to stdin to update");
    progress.show_with_commands(receiver)
}
