//! Virtual-scroll layout engine (vlayout)
//!
//! Computes which items of a large collection must be rendered for the
//! current viewport and scroll position, and where each of them goes, without
//! materializing the whole collection. Three strategies share one lazy,
//! batched recompute protocol:
//!
//! - [`layout::GridLayout`]: fixed cells, configured column count
//! - [`layout::NaturalSizeGridLayout`]: uniform cells, columns fitted to the viewport
//! - [`layout::FlexLayout`]: justified rows of variable-aspect items
//!
//! ```
//! use vlayout::layout::{FlexLayout, Layout, LayoutConfig};
//! use vlayout::model::Size;
//!
//! let mut layout = FlexLayout::seeded(&LayoutConfig::ideal_size(120.0), 7)?;
//! layout.set_total_items(1_000);
//! layout.set_viewport_size(Size::new(800.0, 600.0));
//! let info = layout.layout_info();
//! assert_eq!(info.first(), Some(0));
//! # Ok::<(), vlayout::model::LayoutError>(())
//! ```

pub mod config;
pub mod layout;
pub mod logging;
pub mod model;

#[cfg(test)]
mod test_harness;

#[cfg(test)]
mod tests;
