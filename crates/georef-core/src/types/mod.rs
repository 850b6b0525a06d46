//! Data entities exchanged between the estimation and transform stages.

mod correspondence;
mod geometry;
mod matrix;

pub use correspondence::*;
pub use geometry::*;
pub use matrix::*;
