//! spiralgeom computes where the microphones of a measurement array go,
//! writes those positions to the `MicArray` XML files that beamforming tools
//! load, and can simulate what such an array would record from a handful of
//! noise sources.
//!
//! Three layouts are available through [layout::ArrayLayout]: a plain
//! rectangular grid, a spiral whose radius grows linearly with angle, and
//! the area-uniform sunflower spiral. Generation is a pure function of the
//! layout parameters; [mic_xml::export] persists the result and
//! [mic_xml::load] reads it back.
//!
//! Nothing happens when the library is loaded. The `spiralgeom` binary, or
//! a call into [tasks], is the only way work gets done.

#![warn(missing_docs)]
pub mod args;
pub mod config;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod mic_xml;
pub mod recording;
pub mod simulate;
pub mod tasks;

pub use error::GeomError;
pub use geometry::{MicGeometry, MicPosition};
pub use layout::{generate_grid, generate_linear_spiral, generate_sunflower_spiral, ArrayLayout};
pub use mic_xml::{export, load};
