//! Core math and data primitives for `georef-rs`.
//!
//! This crate contains:
//! - linear algebra type aliases (`Real`, `Pt2`, `Mat3`, ...),
//! - the control-point and correspondence types consumed by the homography
//!   solver,
//! - the projective matrix and polyline types produced and consumed by the
//!   transform stages,
//! - [`ValidationError`], the shared input-validation taxonomy.
//!
//! Data flow:
//! `CorrespondenceSet -> (forward, inverse) ProjectiveMatrix -> Polyline / LineFeature`

/// Input validation errors shared by all crates.
pub mod error;
/// Linear algebra type aliases and helpers.
pub mod math;
/// Shared fixtures for workspace test suites.
pub mod test_utils;
/// Control points, correspondences, matrices and line geometry.
pub mod types;

pub use error::*;
pub use math::*;
pub use types::*;
