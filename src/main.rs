//! vlayout - Entry Point
//!
//! Runs one layout pass over a synthetic collection and prints the result as
//! JSON. Useful for inspecting strategies and tuning configuration.

use clap::Parser;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;
use vlayout::layout::{LayoutConfig, LayoutEvent, LayoutInfo, ScrollAlign, Strategy};
use vlayout::model::{AppError, Direction, Size};

/// vlayout - virtual-scroll layout calculator
#[derive(Parser, Debug)]
#[command(name = "vlayout")]
#[command(version)]
#[command(about = "Compute the active item range and positions for a virtual-scroll viewport")]
pub struct Args {
    /// Layout strategy: grid, natural-size-grid or flex
    #[arg(long)]
    pub strategy: Option<Strategy>,

    /// Number of items in the collection
    #[arg(short = 'n', long, default_value_t = 100)]
    pub items: usize,

    /// Viewport size as WIDTHxHEIGHT in pixels
    #[arg(long, default_value = "800x600", value_parser = parse_viewport)]
    pub viewport: Size,

    /// Scroll position along the scroll axis, in pixels
    #[arg(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub scroll: f64,

    /// Scroll direction: vertical or horizontal
    #[arg(long)]
    pub direction: Option<Direction>,

    /// Gap between items, in pixels
    #[arg(long)]
    pub spacing: Option<f64>,

    /// Target item size along the scroll axis (flex only)
    #[arg(long)]
    pub ideal_size: Option<f64>,

    /// Pre-render margin beyond each viewport edge, in pixels
    #[arg(long)]
    pub overhang: Option<f64>,

    /// Nominal item size as WIDTHxHEIGHT (grid strategies)
    #[arg(long, value_parser = parse_viewport)]
    pub item_size: Option<Size>,

    /// Fixed column count (grid only)
    #[arg(long)]
    pub columns: Option<usize>,

    /// JSON file mapping item index to {"width", "height"}
    #[arg(short, long)]
    pub measurements: Option<PathBuf>,

    /// Scroll so this item index is in view before reporting
    #[arg(long)]
    pub scroll_to: Option<usize>,

    /// Alignment for --scroll-to: start, center, end or nearest
    #[arg(long, default_value = "start", requires = "scroll_to")]
    pub align: ScrollAlign,

    /// Seed for flex aspect-ratio estimation
    #[arg(long)]
    pub seed: Option<u64>,

    /// Include the queued change notifications in the output
    #[arg(long)]
    pub events: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Layout overrides given on the command line.
    fn layout_overrides(&self) -> LayoutConfig {
        LayoutConfig {
            direction: self.direction,
            spacing: self.spacing,
            ideal_size: self.ideal_size,
            overhang: self.overhang,
            item_size: self.item_size,
            columns: self.columns,
        }
    }
}

/// Parse `WIDTHxHEIGHT` (e.g. `800x600`).
fn parse_viewport(raw: &str) -> Result<Size, String> {
    let (width, height) = raw
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{raw}'"))?;
    let parse = |side: &str| {
        side.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid dimension '{side}': {e}"))
    };
    Ok(Size::new(parse(width)?, parse(height)?))
}

/// What the binary prints.
#[derive(Debug, Serialize)]
struct Report {
    strategy: Strategy,
    #[serde(flatten)]
    info: LayoutInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    events: Option<Vec<LayoutEvent>>,
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = vlayout::config::load_config_with_precedence(args.config.clone())?;
        let merged = vlayout::config::merge_config(config_file);
        let with_env = vlayout::config::apply_env_overrides(merged);
        vlayout::config::apply_cli_overrides(
            with_env,
            args.strategy,
            args.seed,
            &args.layout_overrides(),
        )
    };

    vlayout::logging::init(&config.log_file_path)?;

    info!(config = ?config, "Configuration loaded and resolved");

    let mut layout = vlayout::layout::build(config.strategy, &config.layout, config.seed)?;

    if let Some(path) = &args.measurements {
        let sizes = vlayout::model::load_measurements(path)?;
        info!(count = sizes.len(), path = %path.display(), "Loaded measurements");
        layout.update_item_sizes(&sizes);
    }
    layout.set_total_items(args.items);
    layout.set_viewport_size(args.viewport);
    layout.set_scroll_position(args.scroll);
    if let Some(index) = args.scroll_to {
        layout.scroll_to_index(index, args.align);
    }

    let info = layout.layout_info();
    let events = args.events.then(|| layout.drain_events());
    let report = Report {
        strategy: config.strategy,
        info,
        events,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &report)
        .map_err(std::io::Error::from)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_does_not_error() {
        let result = Args::try_parse_from(["vlayout", "--help"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_does_not_error() {
        let result = Args::try_parse_from(["vlayout", "--version"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_no_args_defaults() {
        let args = Args::parse_from(["vlayout"]);
        assert_eq!(args.strategy, None);
        assert_eq!(args.items, 100);
        assert_eq!(args.viewport, Size::new(800.0, 600.0));
        assert_eq!(args.scroll, 0.0);
        assert_eq!(args.align, ScrollAlign::Start);
        assert_eq!(args.scroll_to, None);
        assert!(!args.events);
        assert_eq!(args.config, None);
        assert_eq!(args.layout_overrides(), LayoutConfig::default());
    }

    #[test]
    fn test_strategy_flag() {
        let args = Args::parse_from(["vlayout", "--strategy", "natural-size-grid"]);
        assert_eq!(args.strategy, Some(Strategy::NaturalSizeGrid));
    }

    #[test]
    fn test_strategy_invalid_rejects() {
        let result = Args::try_parse_from(["vlayout", "--strategy", "masonry"]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::ValueValidation
        );
    }

    #[test]
    fn test_viewport_parses_width_by_height() {
        let args = Args::parse_from(["vlayout", "--viewport", "1024x768.5"]);
        assert_eq!(args.viewport, Size::new(1024.0, 768.5));
    }

    #[test]
    fn test_viewport_rejects_missing_separator() {
        assert!(Args::try_parse_from(["vlayout", "--viewport", "1024"]).is_err());
        assert!(parse_viewport("axb").is_err());
    }

    #[test]
    fn test_negative_scroll_is_accepted() {
        let args = Args::parse_from(["vlayout", "-s", "-40"]);
        assert_eq!(args.scroll, -40.0);
    }

    #[test]
    fn test_layout_overrides_collects_flags() {
        let args = Args::parse_from([
            "vlayout",
            "--direction",
            "horizontal",
            "--spacing",
            "4",
            "--ideal-size",
            "150",
            "--columns",
            "5",
            "--item-size",
            "120x80",
        ]);
        let overrides = args.layout_overrides();
        assert_eq!(overrides.direction, Some(Direction::Horizontal));
        assert_eq!(overrides.spacing, Some(4.0));
        assert_eq!(overrides.ideal_size, Some(150.0));
        assert_eq!(overrides.columns, Some(5));
        assert_eq!(overrides.item_size, Some(Size::new(120.0, 80.0)));
        assert_eq!(overrides.overhang, None);
    }

    #[test]
    fn test_scroll_to_with_alignment() {
        let args = Args::parse_from(["vlayout", "--scroll-to", "42", "--align", "center"]);
        assert_eq!(args.scroll_to, Some(42));
        assert_eq!(args.align, ScrollAlign::Center);
    }

    #[test]
    fn test_align_requires_scroll_to() {
        let result = Args::try_parse_from(["vlayout", "--align", "end"]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_combined_flags() {
        let args = Args::parse_from([
            "vlayout",
            "--strategy",
            "flex",
            "-n",
            "5000",
            "--seed",
            "7",
            "-m",
            "sizes.json",
            "--events",
            "--config",
            "/custom/config.toml",
        ]);
        assert_eq!(args.strategy, Some(Strategy::Flex));
        assert_eq!(args.items, 5000);
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.measurements, Some(PathBuf::from("sizes.json")));
        assert!(args.events);
        assert_eq!(args.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn report_flattens_layout_info() {
        let mut layout =
            vlayout::layout::build(Strategy::Grid, &LayoutConfig::columns(2), None).unwrap();
        layout.set_total_items(2);
        layout.set_viewport_size(Size::new(200.0, 100.0));
        let report = Report {
            strategy: Strategy::Grid,
            info: layout.layout_info(),
            events: None,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["strategy"], "grid");
        assert_eq!(json["scroll_size"], 100.0);
        assert!(json.get("events").is_none());
    }
}
