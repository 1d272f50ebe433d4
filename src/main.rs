use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use rotalog::{Level, Logger, LoggerConfig};

const USAGE: &str = "usage: rotalog [LABEL] [--level LEVEL] [--max-lines N] [--width N] [--dir PATH] [--no-file]

Reads lines from stdin and logs each one. A line starting with `<level>:`
(e.g. `warning: disk almost full`) is logged at that level, others at info.";

fn parse_args() -> Result<LoggerConfig> {
    let mut config = LoggerConfig::default().with_write_to_file(true);
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            "--level" => {
                let value = args.next().context("--level needs a value")?;
                config.level = value.parse()?;
            }
            "--max-lines" => {
                let value = args.next().context("--max-lines needs a value")?;
                config.max_lines = value.parse().context("invalid --max-lines")?;
            }
            "--width" => {
                let value = args.next().context("--width needs a value")?;
                config.max_line_width = value.parse().context("invalid --width")?;
            }
            "--dir" => {
                let value = args.next().context("--dir needs a value")?;
                config.base_dir = Some(value.into());
            }
            "--no-file" => config.write_to_file = false,
            flag if flag.starts_with('-') => anyhow::bail!("unknown option '{}'\n{}", flag, USAGE),
            label => config.label = label.to_string(),
        }
    }

    Ok(config)
}

/// Split an optional `<level>:` prefix off a line
fn split_level(line: &str) -> (Level, &str) {
    if let Some((head, rest)) = line.split_once(':') {
        if let Ok(level) = head.parse::<Level>() {
            return (level, rest.trim_start());
        }
    }
    (Level::Info, line)
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rotalog=trace".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let config = parse_args()?;
    let logger = Arc::new(Logger::new(config));

    if logger.writes_to_file() {
        tracing::info!("Logging to: {}", logger.log_directory().display());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }
        let (level, text) = split_level(&line);
        logger.log(level, text.to_string());
    }

    if let Some(path) = logger.current_log_file() {
        tracing::info!("Current log file: {}", path.display());
    }

    Ok(())
}
