//! Transform run: matrix record + line features → transformed line document.

use crate::config::TransformConfig;
use crate::documents::{FeatureCollection, MatrixRecord, TransformedLines};
use crate::error::PipelineError;
use crate::geometry::{GeometryAdapter, TransformSummary};
use log::info;

/// Apply the matrix selected by `config.direction` to every line feature.
///
/// `source` is recorded verbatim as the output's `source` field.
pub fn transform_lines(
    matrix: &MatrixRecord,
    source: &str,
    input: &FeatureCollection,
    config: &TransformConfig,
) -> Result<(TransformedLines, TransformSummary), PipelineError> {
    let h = matrix.matrix(config.direction)?;
    let (lines, summary) = GeometryAdapter::new(h).transform(&input.features)?;
    info!(
        "{}: {} polyline(s) from {} feature(s), {} skipped without geometry",
        config.direction.label(),
        summary.lines,
        summary.features,
        summary.skipped
    );

    let out = TransformedLines {
        source: source.to_string(),
        image: matrix.image.clone(),
        transform: config.direction.label().to_string(),
        lines,
    };
    Ok((out, summary))
}
