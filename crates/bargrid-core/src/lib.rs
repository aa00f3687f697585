//! Core types and utilities for bar-line grid retrieval.
//!
//! This crate is intentionally small and purely geometric/statistical. It
//! does *not* know anything about staves, systems or bar-line semantics;
//! those live in the `bargrid` crate on top of it.

mod area;
mod clustering;
mod geom;
mod glyph;
mod histogram;
mod image;
mod logger;
mod scale;
mod skew;

pub use area::{vertical_core, CoreData};
pub use clustering::{fit_two_gaussians, Gaussian, MixtureFit};
pub use geom::Rect;
pub use glyph::{Glyph, GlyphSource};
pub use histogram::WidthHistogram;
pub use image::{BinaryImage, BinaryView};
pub use logger::init_with_level;
pub use scale::Scale;
pub use skew::Skew;
