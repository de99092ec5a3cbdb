//! lructl - drive an LRU cache from a command script

mod script;

use anyhow::{Context, Result};
use clap::Parser;
use lrucache::{CacheConfig, SharedCache};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::script::Session;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Script file (reads stdin when omitted)
    script: Option<PathBuf>,

    /// Cache capacity (number of items); overrides the config file
    #[arg(short, long)]
    capacity: Option<usize>,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Disable hit/miss/eviction counters
    #[arg(long)]
    no_stats: bool,

    /// Print final statistics as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries command results
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    info!(
        "Starting lructl v{} with capacity {}",
        env!("CARGO_PKG_VERSION"),
        config.capacity
    );

    let session = Session::new(SharedCache::from_config(&config)?);

    let input: Box<dyn BufRead> = match &args.script {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening script {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(&session, input, &mut out)?;

    if args.json {
        let snapshot = session.cache().stats().snapshot();
        serde_json::to_writer(&mut out, &snapshot)?;
        writeln!(out)?;
    }

    Ok(())
}

/// Defaults, then the config file, then command-line flags
fn load_config(args: &Args) -> Result<CacheConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            CacheConfig::from_json(&text)
                .with_context(|| format!("loading config {}", path.display()))?
        }
        None => CacheConfig::default(),
    };

    if let Some(capacity) = args.capacity {
        config.capacity = capacity;
    }
    if args.no_stats {
        config.track_stats = false;
    }

    config.validate()?;
    debug!(?config, "resolved configuration");
    Ok(config)
}

fn run<R: BufRead, W: Write>(session: &Session, input: R, out: &mut W) -> Result<()> {
    for (lineno, line) in input.lines().enumerate() {
        let line = line.context("reading script")?;
        if let Some(result) = session.run_line(&line) {
            if result.starts_with("ERR ") {
                warn!("line {}: {}", lineno + 1, &result[4..]);
            }
            writeln!(out, "{}", result)?;
        }
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::NamedTempFile;

    fn args(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("lructl").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let config = load_config(&args(&[])).unwrap();
        assert_eq!(config, CacheConfig::default());
    }

    #[test]
    fn test_config_file_then_flags() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"capacity": 5, "track_stats": true}}"#).unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = load_config(&args(&["--config", &path])).unwrap();
        assert_eq!(config.capacity, 5);
        assert!(config.track_stats);

        let config = load_config(&args(&["--config", &path, "-c", "9", "--no-stats"])).unwrap();
        assert_eq!(config.capacity, 9);
        assert!(!config.track_stats);
    }

    #[test]
    fn test_config_rejects_zero_capacity() {
        assert!(load_config(&args(&["--capacity", "0"])).is_err());
    }

    #[test]
    fn test_config_missing_file() {
        assert!(load_config(&args(&["--config", "/nonexistent/lructl.json"])).is_err());
    }

    #[test]
    fn test_run_script() {
        let session = Session::new(SharedCache::new(1).unwrap());
        let input = Cursor::new("put x 1\n\nput y 2\nget x\nget y\nnope\n");
        let mut out = Vec::new();

        run(&session, input, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "OK\nOK\n(nil)\n2\nERR unknown command 'nope'\n"
        );
    }
}
