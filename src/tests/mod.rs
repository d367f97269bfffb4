//! Internal test modules - whitebox tests with crate access
//!
//! Tests here drive layouts through the scroller harness or reach into
//! packing internals that are not part of the public surface.
