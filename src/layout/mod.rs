//! Virtual-scroll layout strategies.
//!
//! Every strategy implements [`Layout`]: the collaborator feeds it viewport
//! size, scroll position, item count and measurements, then asks for
//! [`LayoutInfo`], the inclusive range of items to render and where each one
//! goes. Recomputes are lazy and batched; see [`base`] for the protocol.
//!
//! | Strategy                  | Item sizing                | Columns            |
//! |---------------------------|----------------------------|--------------------|
//! | [`GridLayout`]            | fixed nominal size         | configured         |
//! | [`NaturalSizeGridLayout`] | first measurement          | fitted to viewport |
//! | [`FlexLayout`]            | per-item, justified rows   | n/a                |

pub mod base;
pub mod config;
pub mod flex;
pub mod grid;
pub mod info;
pub mod natural_grid;

pub use base::{BaseLayout, Layout, ScrollTarget};
pub use config::{LayoutConfig, ResolvedLayoutConfig};
pub use flex::FlexLayout;
pub use grid::GridLayout;
pub use info::{ActiveRange, LayoutEvent, LayoutInfo, PlacedItem, ScrollAlign};
pub use natural_grid::NaturalSizeGridLayout;

use crate::model::LayoutError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// Which layout strategy to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Fixed-size cells in a configured number of columns.
    Grid,
    /// Uniform cells with columns fitted to the viewport.
    NaturalSizeGrid,
    /// Justified rows of variable-aspect items.
    #[default]
    Flex,
}

impl Strategy {
    /// Name used in configuration files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Grid => "grid",
            Strategy::NaturalSizeGrid => "natural-size-grid",
            Strategy::Flex => "flex",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "grid" => Ok(Strategy::Grid),
            "natural-size-grid" | "natural" => Ok(Strategy::NaturalSizeGrid),
            "flex" => Ok(Strategy::Flex),
            other => Err(format!(
                "unknown layout strategy '{other}' (expected grid, natural-size-grid or flex)"
            )),
        }
    }
}

/// Construct a boxed layout for `strategy`.
///
/// `seed` makes flex estimation reproducible; grid strategies ignore it.
///
/// # Errors
///
/// Returns the first invalid value in `config`.
pub fn build(
    strategy: Strategy,
    config: &LayoutConfig,
    seed: Option<u64>,
) -> Result<Box<dyn Layout>, LayoutError> {
    info!(%strategy, ?seed, "building layout");
    let layout: Box<dyn Layout> = match strategy {
        Strategy::Grid => Box::new(GridLayout::new(config)?),
        Strategy::NaturalSizeGrid => Box::new(NaturalSizeGridLayout::new(config)?),
        Strategy::Flex => match seed {
            Some(seed) => Box::new(FlexLayout::seeded(config, seed)?),
            None => Box::new(FlexLayout::new(config)?),
        },
    };
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Size;

    #[test]
    fn strategy_names_round_trip() {
        for strategy in [Strategy::Grid, Strategy::NaturalSizeGrid, Strategy::Flex] {
            assert_eq!(strategy.as_str().parse::<Strategy>(), Ok(strategy));
        }
    }

    #[test]
    fn strategy_parse_is_case_insensitive() {
        assert_eq!("FLEX".parse::<Strategy>(), Ok(Strategy::Flex));
        assert_eq!("natural".parse::<Strategy>(), Ok(Strategy::NaturalSizeGrid));
    }

    #[test]
    fn unknown_strategy_is_an_error() {
        let err = "masonry".parse::<Strategy>().unwrap_err();
        assert!(err.contains("masonry"));
    }

    #[test]
    fn strategy_deserializes_kebab_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            strategy: Strategy,
        }
        let parsed: Wrapper = toml::from_str(r#"strategy = "natural-size-grid""#).unwrap();
        assert_eq!(parsed.strategy, Strategy::NaturalSizeGrid);
    }

    #[test]
    fn build_rejects_invalid_config() {
        let config = LayoutConfig::ideal_size(-5.0);
        assert_eq!(
            build(Strategy::Flex, &config, Some(1)).err(),
            Some(LayoutError::InvalidIdealSize(-5.0))
        );
    }

    #[test]
    fn every_strategy_produces_a_range() {
        for strategy in [Strategy::Grid, Strategy::NaturalSizeGrid, Strategy::Flex] {
            let mut layout = build(strategy, &LayoutConfig::default(), Some(3)).unwrap();
            layout.set_total_items(100);
            layout.set_viewport_size(Size::new(800.0, 600.0));
            let info = layout.layout_info();
            assert_eq!(info.first(), Some(0), "{strategy}");
            assert!(!info.items.is_empty(), "{strategy}");
        }
    }
}
