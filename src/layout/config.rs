//! Layout configuration: defaults, overrides and eager validation.

use crate::model::{Direction, LayoutError, Size};
use serde::{Deserialize, Serialize};

/// Default gap between items, in pixels.
pub const DEFAULT_SPACING: f64 = 0.0;
/// Default target primary-axis size for flex items, in pixels.
pub const DEFAULT_IDEAL_SIZE: f64 = 200.0;
/// Default pre-render margin beyond the viewport, in pixels.
pub const DEFAULT_OVERHANG: f64 = 150.0;
/// Default nominal item side, in pixels.
pub const DEFAULT_ITEM_SIDE: f64 = 100.0;
/// Default grid column count.
pub const DEFAULT_COLUMNS: usize = 1;

/// Partial configuration supplied by the collaborator.
///
/// Every field is optional; `None` keeps the current value.
/// Also the shape of the `[layout]` table in the config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutConfig {
    /// Scroll direction.
    #[serde(default)]
    pub direction: Option<Direction>,

    /// Inter-item gap in pixels.
    #[serde(default)]
    pub spacing: Option<f64>,

    /// Target primary-axis size of each flex item (flex only).
    #[serde(default)]
    pub ideal_size: Option<f64>,

    /// Pre-render margin beyond each edge of the viewport.
    #[serde(default)]
    pub overhang: Option<f64>,

    /// Nominal item size (grid family).
    #[serde(default)]
    pub item_size: Option<Size>,

    /// Fixed column count (fixed-cell grid only).
    #[serde(default)]
    pub columns: Option<usize>,
}

impl LayoutConfig {
    /// Override only the direction.
    pub fn direction(direction: Direction) -> Self {
        Self {
            direction: Some(direction),
            ..Self::default()
        }
    }

    /// Override only the ideal size.
    pub fn ideal_size(px: f64) -> Self {
        Self {
            ideal_size: Some(px),
            ..Self::default()
        }
    }

    /// Override only the spacing.
    pub fn spacing(px: f64) -> Self {
        Self {
            spacing: Some(px),
            ..Self::default()
        }
    }

    /// Override only the column count.
    pub fn columns(n: usize) -> Self {
        Self {
            columns: Some(n),
            ..Self::default()
        }
    }

    /// Layer `other` on top of `self`; fields set in `other` win.
    pub fn overlay(mut self, other: &LayoutConfig) -> Self {
        if other.direction.is_some() {
            self.direction = other.direction;
        }
        if other.spacing.is_some() {
            self.spacing = other.spacing;
        }
        if other.ideal_size.is_some() {
            self.ideal_size = other.ideal_size;
        }
        if other.overhang.is_some() {
            self.overhang = other.overhang;
        }
        if other.item_size.is_some() {
            self.item_size = other.item_size;
        }
        if other.columns.is_some() {
            self.columns = other.columns;
        }
        self
    }
}

/// Fully resolved configuration. Always valid once constructed through
/// [`ResolvedLayoutConfig::merged`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedLayoutConfig {
    /// Scroll direction.
    pub direction: Direction,
    /// Inter-item gap in pixels.
    pub spacing: f64,
    /// Target primary-axis size of each flex item.
    pub ideal_size: f64,
    /// Pre-render margin beyond each edge of the viewport.
    pub overhang: f64,
    /// Nominal item size.
    pub item_size: Size,
    /// Fixed column count.
    pub columns: usize,
}

impl Default for ResolvedLayoutConfig {
    fn default() -> Self {
        Self {
            direction: Direction::Vertical,
            spacing: DEFAULT_SPACING,
            ideal_size: DEFAULT_IDEAL_SIZE,
            overhang: DEFAULT_OVERHANG,
            item_size: Size::square(DEFAULT_ITEM_SIDE),
            columns: DEFAULT_COLUMNS,
        }
    }
}

impl ResolvedLayoutConfig {
    /// Apply `overrides` on top of `self` and validate the result.
    ///
    /// # Errors
    ///
    /// Returns the first invalid value found. `self` is untouched either way,
    /// so the caller keeps its previous configuration on error.
    pub fn merged(&self, overrides: &LayoutConfig) -> Result<Self, LayoutError> {
        let next = Self {
            direction: overrides.direction.unwrap_or(self.direction),
            spacing: overrides.spacing.unwrap_or(self.spacing),
            ideal_size: overrides.ideal_size.unwrap_or(self.ideal_size),
            overhang: overrides.overhang.unwrap_or(self.overhang),
            item_size: overrides.item_size.unwrap_or(self.item_size),
            columns: overrides.columns.unwrap_or(self.columns),
        };
        next.validate()?;
        Ok(next)
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if !(self.ideal_size.is_finite() && self.ideal_size > 0.0) {
            return Err(LayoutError::InvalidIdealSize(self.ideal_size));
        }
        if self.columns == 0 {
            return Err(LayoutError::InvalidColumnCount(self.columns));
        }
        if !(self.spacing.is_finite() && self.spacing >= 0.0) {
            return Err(LayoutError::InvalidSpacing(self.spacing));
        }
        if !(self.overhang.is_finite() && self.overhang >= 0.0) {
            return Err(LayoutError::InvalidOverhang(self.overhang));
        }
        if !self.item_size.is_measurable() {
            let Size { width, height } = self.item_size;
            return Err(LayoutError::InvalidItemSize { width, height });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(ResolvedLayoutConfig::default().validate(), Ok(()));
    }

    #[test]
    fn empty_overrides_keep_current_values() {
        let base = ResolvedLayoutConfig::default();
        assert_eq!(base.merged(&LayoutConfig::default()), Ok(base));
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let base = ResolvedLayoutConfig::default();
        let merged = base
            .merged(&LayoutConfig {
                spacing: Some(8.0),
                direction: Some(Direction::Horizontal),
                ..LayoutConfig::default()
            })
            .unwrap();
        assert_eq!(merged.spacing, 8.0);
        assert_eq!(merged.direction, Direction::Horizontal);
        assert_eq!(merged.ideal_size, DEFAULT_IDEAL_SIZE);
        assert_eq!(merged.overhang, DEFAULT_OVERHANG);
    }

    mod rejection {
        use super::*;

        #[test]
        fn zero_ideal_size_is_rejected() {
            let base = ResolvedLayoutConfig::default();
            assert_eq!(
                base.merged(&LayoutConfig::ideal_size(0.0)),
                Err(LayoutError::InvalidIdealSize(0.0))
            );
        }

        #[test]
        fn negative_ideal_size_is_rejected() {
            let base = ResolvedLayoutConfig::default();
            assert_eq!(
                base.merged(&LayoutConfig::ideal_size(-20.0)),
                Err(LayoutError::InvalidIdealSize(-20.0))
            );
        }

        #[test]
        fn nan_ideal_size_is_rejected() {
            let base = ResolvedLayoutConfig::default();
            assert!(base.merged(&LayoutConfig::ideal_size(f64::NAN)).is_err());
        }

        #[test]
        fn zero_columns_is_rejected() {
            let base = ResolvedLayoutConfig::default();
            assert_eq!(
                base.merged(&LayoutConfig::columns(0)),
                Err(LayoutError::InvalidColumnCount(0))
            );
        }

        #[test]
        fn negative_spacing_is_rejected() {
            let base = ResolvedLayoutConfig::default();
            assert_eq!(
                base.merged(&LayoutConfig::spacing(-2.0)),
                Err(LayoutError::InvalidSpacing(-2.0))
            );
        }

        #[test]
        fn negative_item_side_is_rejected() {
            let base = ResolvedLayoutConfig::default();
            let overrides = LayoutConfig {
                item_size: Some(Size::new(-1.0, 10.0)),
                ..LayoutConfig::default()
            };
            assert!(matches!(
                base.merged(&overrides),
                Err(LayoutError::InvalidItemSize { .. })
            ));
        }

        #[test]
        fn zero_item_side_is_rejected() {
            let base = ResolvedLayoutConfig::default();
            let degenerate = [
                Size::square(0.0),
                Size::new(100.0, 0.0),
                Size::new(0.0, 100.0),
            ];
            for size in degenerate {
                let overrides = LayoutConfig {
                    item_size: Some(size),
                    ..LayoutConfig::default()
                };
                assert_eq!(
                    base.merged(&overrides),
                    Err(LayoutError::InvalidItemSize {
                        width: size.width,
                        height: size.height,
                    })
                );
            }
        }
    }

    #[test]
    fn overlay_prefers_the_later_layer() {
        let file = LayoutConfig {
            spacing: Some(4.0),
            ideal_size: Some(150.0),
            ..LayoutConfig::default()
        };
        let cli = LayoutConfig::spacing(10.0);
        let layered = file.overlay(&cli);
        assert_eq!(layered.spacing, Some(10.0));
        assert_eq!(layered.ideal_size, Some(150.0));
    }

    #[test]
    fn deserializes_from_toml_table() {
        let config: LayoutConfig = toml::from_str(
            r#"
direction = "horizontal"
spacing = 4.0
ideal_size = 180.0
item_size = { width = 120.0, height = 90.0 }
"#,
        )
        .unwrap();
        assert_eq!(config.direction, Some(Direction::Horizontal));
        assert_eq!(config.item_size, Some(Size::new(120.0, 90.0)));
        assert_eq!(config.columns, None);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result: Result<LayoutConfig, _> = toml::from_str("gutter = 3.0");
        assert!(result.is_err());
    }
}
