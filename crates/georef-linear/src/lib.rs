//! Closed-form solvers for `georef-rs`.
//!
//! - [`HomographySolver`]: four-point DLT estimation of the reference→pixel
//!   homography and its normalized inverse.
//! - [`PointTransformer`] / [`apply_homography`]: homogeneous application of a
//!   projective matrix with an explicit perspective-division failure.

mod homography;
pub mod math;
mod transform;

pub use homography::*;
pub use transform::*;
