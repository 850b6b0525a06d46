//! Document-level workflows for `georef-rs`.
//!
//! This crate wires the solvers in `georef-linear` to the persisted records
//! exchanged with the point-picking, GIS export and rendering tools:
//!
//! - [`estimate_from_documents`]: control-point record + reference points →
//!   [`MatrixRecord`] holding both homographies,
//! - [`transform_lines`]: matrix record + line features → [`TransformedLines`],
//! - [`GeometryAdapter`]: the per-feature fan-out used by `transform_lines`,
//! - [`PickSession`]: ordered, undoable control-point picking state.

pub mod config;
pub mod documents;
mod error;
mod estimate;
pub mod geometry;
pub mod io;
mod pick;
mod transform;

pub use config::{Direction, EstimateConfig, Pairing, TransformConfig};
pub use documents::*;
pub use error::PipelineError;
pub use estimate::*;
pub use geometry::{GeometryAdapter, GeometryError, TransformSummary};
pub use pick::*;
pub use transform::*;
