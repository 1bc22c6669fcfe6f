//! marquee-ocr - Screen region text extraction overlay
//!
//! Draw a rectangle over anything on screen, send that region to a
//! vision-language model and read the text back in a floating panel.

mod app;
mod capture;
mod config;
mod error;
mod hotkey;
mod overlay;
mod shared;
mod storage;
mod vision;

#[cfg(test)]
mod test_support;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use uuid::Uuid;

use crate::app::ExtractionPipeline;
use crate::capture::{list_monitors, CaptureProvider, FileCapture, ScreenCapture};
use crate::config::AppConfig;
use crate::hotkey::HotkeyManager;
use crate::overlay::panel::PanelController;
use crate::overlay::OverlayManager;
use crate::shared::{AppState, Region};
use crate::storage::SettingsStore;
use crate::vision::GeminiClient;

/// marquee-ocr - Screen region text extraction overlay
#[derive(Parser, Debug)]
#[command(name = "marquee-ocr")]
#[command(about = "Extract text from a selected screen region with a vision-language model")]
struct Args {
    /// Monitor index to cover (overrides config)
    #[arg(short, long)]
    monitor: Option<usize>,

    /// List available monitors and exit
    #[arg(long)]
    list_monitors: bool,

    /// Turn the panel on and persist the setting
    #[arg(long, conflicts_with = "disable")]
    enable: bool,

    /// Turn the panel off and persist the setting
    #[arg(long)]
    disable: bool,

    /// Store the Gemini API key
    #[arg(long, value_name = "KEY")]
    credential: Option<String>,

    /// Run one extraction on a saved screenshot instead of opening the overlay
    #[arg(long, value_name = "PNG", requires = "region")]
    image: Option<PathBuf>,

    /// Region for --image as x,y,width,height in logical pixels
    #[arg(long, value_parser = parse_region)]
    region: Option<Region>,

    /// Device pixels per logical pixel of the --image file
    #[arg(long, default_value = "1.0")]
    scale: f32,

    /// Write the default config.toml and exit
    #[arg(long)]
    write_default_config: bool,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

/// Parse "x,y,width,height"
fn parse_region(s: &str) -> Result<Region> {
    let values = s
        .split(',')
        .map(|v| v.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| anyhow!("Invalid region '{}': {}", s, e))?;

    if values.iter().any(|v| !v.is_finite()) {
        bail!("Region values must be finite numbers");
    }

    match values.as_slice() {
        [x, y, w, h] if *w >= 0.0 && *h >= 0.0 => Ok(Region::new(*x, *y, *w, *h)),
        [_, _, _, _] => bail!("Region width and height must not be negative"),
        _ => bail!("Region must be x,y,width,height"),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.verbose { "debug" } else { "info" };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // List monitors mode
    if args.list_monitors {
        print_monitors();
        return Ok(());
    }

    let config_dir = storage::get_config_dir()?;

    if args.write_default_config {
        let path = config_dir.join("config.toml");
        config::save_config(&AppConfig::default(), &path)?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let config = load_or_default_config(&config_dir.join("config.toml"));
    let settings = Arc::new(SettingsStore::open(config_dir.join("settings.toml"))?);
    apply_setting_flags(&args, &settings)?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let recognizer = Arc::new(GeminiClient::new(&config.inference)?);

    if let (Some(image), Some(region)) = (&args.image, args.region) {
        let capture = Arc::new(FileCapture::new(image, args.scale));
        let pipeline = ExtractionPipeline::new(capture, recognizer);
        return run_headless(&runtime, &pipeline, region, settings.credential());
    }

    let monitor_index = args.monitor.unwrap_or(config.overlay.monitor_index);
    let monitor = list_monitors().into_iter().find(|m| m.index == monitor_index);
    if monitor.is_none() {
        warn!("Monitor {} not found, overlay keeps its default size", monitor_index);
    }

    let capture: Arc<dyn CaptureProvider> = Arc::new(ScreenCapture::new(monitor_index));
    let pipeline = ExtractionPipeline::new(capture, recognizer);
    let controller = PanelController::new(pipeline, runtime.handle().clone(), settings.clone());
    let state = AppState::new(settings.settings());

    let hotkeys = match HotkeyManager::new() {
        Ok(mut manager) => {
            manager.register_from_config(&config.hotkeys);
            Some(manager)
        }
        Err(e) => {
            warn!("Global hotkeys unavailable: {}", e);
            None
        }
    };

    info!(
        "marquee-ocr starting on monitor {} (panel {})",
        monitor_index,
        if settings.enabled() { "enabled" } else { "disabled" }
    );
    OverlayManager::new(state, controller, hotkeys, monitor, &config.overlay).run()?;

    info!("marquee-ocr shutdown complete");
    Ok(())
}

fn print_monitors() {
    println!("Available monitors:");
    let monitors = list_monitors();
    if monitors.is_empty() {
        println!("  No monitors detected");
    }
    for monitor in &monitors {
        println!(
            "  [{}] {} - {}x{} at ({}, {}), scale {}{}",
            monitor.index,
            monitor.name,
            monitor.size.0,
            monitor.size.1,
            monitor.position.0,
            monitor.position.1,
            monitor.scale_factor,
            if monitor.is_primary { " (primary)" } else { "" }
        );
    }
}

/// Load configuration from file or fall back to defaults
fn load_or_default_config(path: &Path) -> AppConfig {
    if path.exists() {
        match config::load_config(path) {
            Ok(config) => {
                info!("Loaded configuration from {:?}", path);
                return config;
            }
            Err(e) => warn!("Ignoring unreadable config {:?}: {}", path, e),
        }
    }
    info!("Using default configuration");
    AppConfig::default()
}

fn apply_setting_flags(args: &Args, settings: &SettingsStore) -> Result<()> {
    if args.enable {
        settings.set_enabled(true)?;
    }
    if args.disable {
        settings.set_enabled(false)?;
    }
    if let Some(credential) = &args.credential {
        settings.set_credential(credential.trim())?;
        info!("Credential updated");
    }
    Ok(())
}

/// One extraction on a file, result to stdout
fn run_headless(
    runtime: &tokio::runtime::Runtime,
    pipeline: &ExtractionPipeline,
    region: Region,
    credential: String,
) -> Result<()> {
    if credential.is_empty() {
        bail!(error::ExtractionError::Configuration.display_message());
    }
    if !region.is_usable() {
        bail!(error::ExtractionError::Selection.display_message());
    }

    match runtime.block_on(pipeline.run(Uuid::new_v4(), region, credential)) {
        Ok(text) => {
            println!("{}", text);
            Ok(())
        }
        Err(e) => bail!(e.display_message()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_region() {
        assert_eq!(
            parse_region("10,20,300,40").unwrap(),
            Region::new(10.0, 20.0, 300.0, 40.0)
        );
        assert_eq!(
            parse_region(" 1.5, 2 ,3,4 ").unwrap(),
            Region::new(1.5, 2.0, 3.0, 4.0)
        );
    }

    #[test]
    fn test_parse_region_rejects_bad_input() {
        assert!(parse_region("10,20,300").is_err());
        assert!(parse_region("a,b,c,d").is_err());
        assert!(parse_region("0,0,-5,10").is_err());
        assert!(parse_region("").is_err());
    }

    #[test]
    fn test_parse_region_rejects_non_finite() {
        assert!(parse_region("inf,0,10,10").is_err());
        assert!(parse_region("0,0,NaN,10").is_err());
        assert!(parse_region("0,-inf,10,10").is_err());
    }

    #[test]
    fn test_headless_requires_credential() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let pipeline = ExtractionPipeline::new(
            Arc::new(test_support::FixedCapture::new((100, 100), 1.0)),
            Arc::new(test_support::RecordingRecognizer::default()),
        );

        let err = run_headless(&runtime, &pipeline, Region::new(0.0, 0.0, 50.0, 50.0), String::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "Error: Please set your Gemini API key.");
    }

    #[test]
    fn test_headless_prints_recognized_text() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let recognizer = Arc::new(test_support::RecordingRecognizer::default());
        let pipeline = ExtractionPipeline::new(
            Arc::new(test_support::FixedCapture::new((100, 100), 1.0)),
            recognizer.clone(),
        );

        run_headless(&runtime, &pipeline, Region::new(0.0, 0.0, 50.0, 20.0), "key".into()).unwrap();
        assert_eq!(*recognizer.seen.lock(), vec![(50, 20, "key".to_string())]);
    }

    #[test]
    fn test_setting_flags_persist() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        let settings = SettingsStore::open(&path).unwrap();
        let args = Args::parse_from(["marquee-ocr", "--enable", "--credential", " k "]);

        apply_setting_flags(&args, &settings).unwrap();

        let reopened = SettingsStore::open(&path).unwrap();
        assert!(reopened.enabled());
        assert_eq!(reopened.credential(), "k");
    }
}
