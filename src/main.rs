//! Capture frames from a v4l2 device and forward them.
//!
//! ## Usage
//!
//! ```bash
//! # Settings from config.toml next to the executable
//! omt-capture
//!
//! # Explicit settings, raw frames to a file
//! omt-capture --config studio.toml --output frames.raw
//!
//! # More detail
//! RUST_LOG=omt_capture=debug omt-capture
//! ```

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use omt_capture::config::Settings;
use omt_capture::forward;
use omt_capture::shutdown::Shutdown;
use omt_capture::sink::{Discard, Sink, WriteSink};

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Parser)]
#[command(version, about = "Forward v4l2 capture frames to a media sink")]
struct Args {
    /// Settings file [default: config.toml next to the executable]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write raw frames here instead of the configured output, `-` for stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn default_config_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(CONFIG_FILE)))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
}

fn open_sink(output: Option<&PathBuf>) -> Result<Box<dyn Sink>> {
    let sink: Box<dyn Sink> = match output {
        None => Box::new(Discard),
        Some(path) if path.as_os_str() == "-" => Box::new(WriteSink::new(io::stdout().lock())),
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("unable to create {}", path.display()))?;
            Box::new(WriteSink::new(BufWriter::new(file)))
        }
    };
    Ok(sink)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config_path = args.config.unwrap_or_else(default_config_path);
    let settings = Settings::load(&config_path)?;
    info!(
        config = %config_path.display(),
        source = %settings.name,
        device = %settings.device_path.display(),
        "settings loaded"
    );

    let shutdown = Shutdown::new();
    shutdown
        .install_signal_handler()
        .context("unable to install signal handler")?;

    let output = args.output.as_ref().or(settings.output.as_ref());
    let mut sink = open_sink(output)?;

    let stats = forward::run(&settings, sink.as_mut(), &shutdown)?;
    info!("sent {} frames, {} bytes", stats.frames, stats.bytes);
    Ok(())
}
