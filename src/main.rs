//! MotiBeam - ambient projection shell
//!
//! Boots the projection UI, discovers scene plugins and hands the terminal to
//! the frame loop until the user quits.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::any::Any;
use std::fs::{self, OpenOptions};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use motibeam::config::{Config, DisplayMode};
use motibeam::constants::{APP_BINARY_NAME, APP_NAME};
use motibeam::modules::loader::panic_message;
use motibeam::scenes::SceneManager;
use motibeam::settings::SettingsStore;
use motibeam::tui::{self, AppState};
use motibeam::verticals::{metadata, VerticalOrderingConfig};

/// MotiBeam - ambient projection shell
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Skip the boot screen
    #[arg(long)]
    skip_boot: bool,

    /// Directory scanned for scene plugins
    #[arg(long, value_name = "DIR")]
    scenes_dir: Option<PathBuf>,

    /// Settings file
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Draw into an inline viewport instead of the whole terminal
    #[arg(long)]
    windowed: bool,

    /// Take over the whole terminal (wins over --windowed)
    #[arg(long)]
    fullscreen: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Print discovered scenes and exit
    #[arg(long)]
    list_scenes: bool,

    /// Print the active verticals and exit
    #[arg(long)]
    list_verticals: bool,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    write_config: bool,
}

fn init_logging(log_file: &Path, verbose: bool) -> Result<()> {
    if let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file: {}", log_file.display()))?;

    // The terminal belongs to the renderer, so logs only go to the file
    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();

    // Module panics are caught and recovered; stderr would draw over the frame
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        tracing::error!("panic: {info}");
        if !tui::terminal_active() {
            default_hook(info);
        }
    }));

    Ok(())
}

fn crash_error(payload: &(dyn Any + Send), log_file: &Path) -> anyhow::Error {
    anyhow!(
        "{APP_NAME} stopped after an internal error ({}); details in {}",
        panic_message(payload),
        log_file.display()
    )
}

fn write_config(config: &Config, path: Option<&Path>) -> Result<()> {
    let target = match path {
        Some(path) => path.to_path_buf(),
        None => Config::config_file_path()?,
    };
    config.save_to(&target)?;
    println!("Wrote configuration to {}", target.display());
    Ok(())
}

fn print_scenes(scenes: &SceneManager) {
    let registry = scenes.registry();
    let directory = registry
        .directory()
        .map_or_else(|| "-".to_string(), |d| d.display().to_string());
    println!("Scenes in {directory}:");
    if registry.is_empty() {
        println!("  (none)");
    }
    for (name, category) in registry.get_scene_list() {
        println!("  {name:<20} {category}");
    }
    for skipped in registry.skipped() {
        println!("  skipped: {skipped}");
    }
}

fn print_verticals(verticals: &VerticalOrderingConfig) {
    println!("Verticals:");
    for entry in verticals.active_entries() {
        let meta = metadata(&entry.display_name);
        println!(
            "  [{}] {} {:<12} {}",
            entry.key, meta.symbol, entry.display_name, meta.description
        );
    }
    for warning in verticals.warnings() {
        println!("  warning: {warning}");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let (mut config, config_error) = match loaded {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    };
    if let Some(dir) = cli.scenes_dir {
        config.paths.scenes_dir = Some(dir);
    }
    if let Some(file) = cli.settings {
        config.paths.settings_file = Some(file);
    }

    if cli.write_config {
        if let Some(err) = config_error {
            return Err(err.context("Refusing to overwrite an unreadable configuration"));
        }
        return write_config(&config, cli.config.as_deref());
    }

    let log_file = config.log_file()?;
    init_logging(&log_file, cli.verbose)?;
    tracing::info!("{APP_NAME} v{} starting", env!("CARGO_PKG_VERSION"));
    if let Some(err) = config_error {
        tracing::warn!("using default configuration: {err:#}");
    }

    let scenes = SceneManager::discover(&config.scenes_dir()?);
    let verticals = VerticalOrderingConfig::builtin();

    if cli.list_scenes || cli.list_verticals {
        if cli.list_scenes {
            print_scenes(&scenes);
        }
        if cli.list_verticals {
            print_verticals(&verticals);
        }
        return Ok(());
    }

    let settings = SettingsStore::load(config.settings_file()?);
    let display_mode = DisplayMode::resolve(cli.fullscreen, cli.windowed);
    tracing::info!("display mode: {display_mode:?}");

    let mut state = AppState::new(
        config,
        settings,
        scenes,
        verticals,
        Instant::now(),
        cli.skip_boot,
    );

    let mut terminal = tui::setup_terminal(display_mode)
        .with_context(|| format!("{APP_BINARY_NAME} needs an interactive terminal"))?;
    let result =
        panic::catch_unwind(AssertUnwindSafe(|| tui::run_tui(&mut state, &mut terminal)));
    tui::restore_terminal(terminal, display_mode)?;

    match result {
        Ok(result) => result,
        Err(payload) => Err(crash_error(payload.as_ref(), &log_file)),
    }
}
