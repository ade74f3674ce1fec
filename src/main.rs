//! Entry point for the **snapgrd** command-line tool.
//!
//! ```text
//! snapgrd (--topology FILE | --displayplacer FILE)
//!         (--layout FILE | --preset NAME)
//!         [--config FILE] [--apply]
//! ```
//!
//! Reads the displays, composes the layout and prints the result as JSON.
//! With `--apply` the composed windows are handed to a dry-run executor
//! that only logs each placement.

use log::{error, info};
use snapgrd::arranger::{ApplyPolicy, Arranger};
use snapgrd::config::Config;
use snapgrd::enumerate::{DisplayplacerEnumerator, JsonEnumerator};
use snapgrd::geometry::Rect;
use snapgrd::layout::LayoutSpec;
use snapgrd::presets;
use snapgrd::traits::{DisplayEnumerator, PlacementExecutor};
use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const USAGE: &str = "usage: snapgrd (--topology FILE | --displayplacer FILE) \
                     (--layout FILE | --preset NAME) [--config FILE] [--apply]";

/// Resolve the config directory (`$XDG_CONFIG_HOME/snapgrd`).
fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("snapgrd")
}

/// Load `--config`, or `$XDG_CONFIG_HOME/snapgrd/config.json`, falling back
/// to compiled-in defaults.  An explicitly named file must load.
fn load_config(explicit: Option<&Path>) -> Result<Config, String> {
    if let Some(path) = explicit {
        return Config::load(path).map_err(|e| e.to_string());
    }
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            Ok(cfg)
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Ok(Config::default())
        }
    }
}

//  Arguments

enum DisplaySource {
    Json(PathBuf),
    Displayplacer(PathBuf),
}

enum LayoutSource {
    File(PathBuf),
    Preset(String),
}

struct Args {
    displays: DisplaySource,
    layout: LayoutSource,
    config: Option<PathBuf>,
    apply: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut displays = None;
    let mut layout = None;
    let mut config = None;
    let mut apply = false;

    while let Some(arg) = args.next() {
        let mut value = || args.next().ok_or_else(|| format!("{} needs a value", arg));
        match arg.as_str() {
            "--topology" => displays = Some(DisplaySource::Json(value()?.into())),
            "--displayplacer" => displays = Some(DisplaySource::Displayplacer(value()?.into())),
            "--layout" => layout = Some(LayoutSource::File(value()?.into())),
            "--preset" => layout = Some(LayoutSource::Preset(value()?)),
            "--config" => config = Some(PathBuf::from(value()?)),
            "--apply" => apply = true,
            other => return Err(format!("unknown argument {:?}", other)),
        }
    }

    Ok(Args {
        displays: displays.ok_or("missing --topology or --displayplacer")?,
        layout: layout.ok_or("missing --layout or --preset")?,
        config,
        apply,
    })
}

//  Dry-run executor

/// Logs each placement instead of moving windows; never fails.
struct LogExecutor;

impl PlacementExecutor for LogExecutor {
    type Error = Infallible;

    fn place(&self, app_id: &str, rect: &Rect) -> Result<(), Infallible> {
        info!("would place {} at {}", app_id, rect);
        Ok(())
    }
}

//  Main

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("snapgrd: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let args = parse_args(std::env::args().skip(1)).map_err(|e| format!("{}\n{}", e, USAGE))?;
    let config = load_config(args.config.as_deref())?;
    let spec = load_layout(&args.layout, &config)?;
    let policy = if args.apply {
        ApplyPolicy::Always
    } else {
        ApplyPolicy::Never
    };

    match &args.displays {
        DisplaySource::Json(path) => arrange(JsonEnumerator::new(path), &config, &spec, policy),
        DisplaySource::Displayplacer(path) => arrange(
            DisplayplacerEnumerator::new(path, config.displayplacer.menu_bar_height),
            &config,
            &spec,
            policy,
        ),
    }
}

fn load_layout(source: &LayoutSource, config: &Config) -> Result<LayoutSpec, String> {
    match source {
        LayoutSource::Preset(name) => presets::by_name(name, &config.apps).ok_or_else(|| {
            format!("unknown preset {:?} (known: {})", name, presets::NAMES.join(", "))
        }),
        LayoutSource::File(path) => {
            let contents = std::fs::read_to_string(path)
                .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
            serde_json::from_str(&contents)
                .map_err(|e| format!("failed to parse {}: {}", path.display(), e))
        }
    }
}

fn arrange<E: DisplayEnumerator>(
    enumerator: E,
    config: &Config,
    spec: &LayoutSpec,
    policy: ApplyPolicy,
) -> Result<(), String> {
    let arranger = Arranger::new(enumerator, LogExecutor, config.layout.clone());
    let outcome = arranger.run(spec, policy).map_err(|e| e.to_string())?;
    let json = serde_json::to_string_pretty(&outcome).map_err(|e| e.to_string())?;
    println!("{}", json);
    Ok(())
}
