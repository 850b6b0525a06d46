//! Estimation run: persisted control points → matrix record.

use crate::config::{EstimateConfig, Pairing};
use crate::documents::{ControlPixelRecord, FeatureCollection, MatrixRecord};
use crate::error::PipelineError;
use crate::geometry::parse_position;
use georef_core::{
    default_label, ControlPoint, CorrespondenceSet, Side, ValidationError, CORRESPONDENCE_COUNT,
};
use georef_linear::{HomographyOptions, HomographySolver};
use log::{info, warn};
use serde_json::Value;

/// Extract the four reference control points from a Point feature collection.
///
/// Labels are read from `properties.id` (or `properties.label`); features
/// without one are labelled `P{i+1}`.
pub fn reference_control_points(
    collection: &FeatureCollection,
) -> Result<Vec<ControlPoint>, PipelineError> {
    let actual = collection.features.len();
    if actual != CORRESPONDENCE_COUNT {
        return Err(ValidationError::CorrespondenceCount {
            side: Side::Reference,
            expected: CORRESPONDENCE_COUNT,
            actual,
        }
        .into());
    }

    collection
        .features
        .iter()
        .enumerate()
        .map(|(i, feature)| {
            let kind = feature.geometry_type();
            if kind != Some("Point") {
                return Err(PipelineError::NotAPoint {
                    feature: i,
                    kind: kind.unwrap_or("<missing>").to_string(),
                });
            }
            let coords = feature
                .geometry
                .as_ref()
                .and_then(|g| g.get("coordinates"))
                .unwrap_or(&Value::Null);
            let point = parse_position(0, coords)
                .map_err(|source| PipelineError::ReferenceCoordinates { feature: i, source })?;
            let label = feature
                .properties
                .as_ref()
                .and_then(|p| p.get("id").or_else(|| p.get("label")))
                .and_then(label_string)
                .unwrap_or_else(|| default_label(i));
            Ok(ControlPoint::new(label, point))
        })
        .collect()
}

fn label_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Build the correspondence set for `config.pairing`.
pub fn correspondences_from_documents(
    control_px: &ControlPixelRecord,
    control_crs: &FeatureCollection,
    config: &EstimateConfig,
) -> Result<CorrespondenceSet, PipelineError> {
    let pixel = control_px.control_points();
    if pixel.len() != CORRESPONDENCE_COUNT {
        return Err(ValidationError::CorrespondenceCount {
            side: Side::Pixel,
            expected: CORRESPONDENCE_COUNT,
            actual: pixel.len(),
        }
        .into());
    }
    let reference = reference_control_points(control_crs)?;

    let set = match config.pairing {
        Pairing::ByIndex => CorrespondenceSet::new(pixel, reference)?,
        Pairing::ByLabel => CorrespondenceSet::from_labeled(pixel, reference)?,
    };

    let mismatches = set.label_mismatches();
    if !mismatches.is_empty() {
        warn!(
            "control point labels differ at positions {:?}; pairing by index as configured",
            mismatches
        );
    }
    Ok(set)
}

/// Estimate both homographies and assemble the matrix record.
pub fn estimate_from_documents(
    control_px: &ControlPixelRecord,
    control_crs: &FeatureCollection,
    config: &EstimateConfig,
) -> Result<MatrixRecord, PipelineError> {
    let set = correspondences_from_documents(control_px, control_crs, config)?;
    let opts = HomographyOptions {
        check_degeneracy: config.check_degeneracy,
    };
    let pair = HomographySolver::estimate_with(&set, &opts)?;
    info!(
        "estimated homography from {} correspondences (max residual {:.3e} px)",
        CORRESPONDENCE_COUNT, pair.max_residual
    );

    Ok(MatrixRecord {
        image: control_px.image.clone(),
        control_point_order: config.control_point_order_or_default(),
        crs_from_control_crs: control_crs.crs.clone().unwrap_or(Value::Null),
        h_qgis_to_px: pair.forward,
        h_px_to_qgis: Some(pair.inverse),
    })
}
