//! Fan-out of line features through a projective matrix.
//!
//! A feature holds either one path (`LineString`) or several
//! (`MultiLineString`). Every path is transformed independently and emitted
//! as its own [`LineFeature`], in input order then part order:
//!
//! | input at index `i`                 | emitted ids                      |
//! |------------------------------------|----------------------------------|
//! | `LineString`                       | `feature_i`                      |
//! | `MultiLineString`, k > 1 parts     | `feature_i_0` .. `feature_i_{k-1}` |
//! | `MultiLineString`, 1 part          | `feature_i`                      |
//! | no geometry                        | nothing, counted as skipped      |
//!
//! Skipped features still occupy their index. Any other geometry type aborts
//! the whole run.

use crate::documents::Feature;
use georef_core::{
    line_feature_id, GeometryCollection, LineFeature, Polyline, ProjectiveMatrix, Pt2,
    ValidationError,
};
use georef_linear::{PointTransformer, ProjectionError};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error(
        "feature {feature}: unsupported geometry type {kind:?} (expected LineString or MultiLineString)"
    )]
    Unsupported { feature: usize, kind: String },
    #[error("feature {feature}, part {part}: malformed line geometry")]
    Validation {
        feature: usize,
        part: usize,
        #[source]
        source: ValidationError,
    },
    #[error("feature {feature}, part {part}: perspective division failed")]
    Projection {
        feature: usize,
        part: usize,
        #[source]
        source: ProjectionError,
    },
}

/// Counters reported by a transform run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformSummary {
    /// Features that had a geometry.
    pub features: usize,
    /// Features skipped for a missing geometry.
    pub skipped: usize,
    /// Polylines emitted.
    pub lines: usize,
}

/// Transforms the line features of a collection with one projective matrix.
#[derive(Debug, Clone, Copy)]
pub struct GeometryAdapter {
    transformer: PointTransformer,
}

impl GeometryAdapter {
    pub fn new(matrix: ProjectiveMatrix) -> Self {
        Self {
            transformer: PointTransformer::new(matrix),
        }
    }

    /// Transform every feature. No partial output is returned on error.
    pub fn transform(
        &self,
        features: &[Feature],
    ) -> Result<(GeometryCollection, TransformSummary), GeometryError> {
        let mut lines = GeometryCollection::new();
        let mut summary = TransformSummary::default();

        for (i, feature) in features.iter().enumerate() {
            let Some(paths) = line_paths(i, feature.geometry.as_ref())? else {
                debug!("feature {i}: no geometry, skipped");
                summary.skipped += 1;
                continue;
            };
            summary.features += 1;

            let properties = feature.properties_or_empty();
            let part_count = paths.len();
            for (j, path) in paths.into_iter().enumerate() {
                let projected = self.transformer.apply(path.points()).map_err(|source| {
                    GeometryError::Projection {
                        feature: i,
                        part: j,
                        source,
                    }
                })?;
                let points = Polyline::new(projected).map_err(|source| {
                    GeometryError::Validation {
                        feature: i,
                        part: j,
                        source,
                    }
                })?;
                lines.push(LineFeature {
                    id: line_feature_id(i, j, part_count),
                    points,
                    properties: properties.clone(),
                });
            }
        }

        summary.lines = lines.len();
        Ok((lines, summary))
    }
}

/// Transform `features` with `h`; see [`GeometryAdapter::transform`].
pub fn transform_features(
    features: &[Feature],
    h: &ProjectiveMatrix,
) -> Result<(GeometryCollection, TransformSummary), GeometryError> {
    GeometryAdapter::new(*h).transform(features)
}

/// Paths of a feature's geometry, or `None` when there is no geometry.
fn line_paths(feature: usize, geometry: Option<&Value>) -> Result<Option<Vec<Polyline>>, GeometryError> {
    let geometry = match geometry {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Object(map)) if map.is_empty() => return Ok(None),
        Some(g) => g,
    };
    let kind = geometry.get("type").and_then(Value::as_str);
    let coords = geometry.get("coordinates").unwrap_or(&Value::Null);

    let invalid = |part: usize| {
        move |source: ValidationError| GeometryError::Validation {
            feature,
            part,
            source,
        }
    };

    match kind {
        Some("LineString") => {
            let path = parse_path(coords).map_err(invalid(0))?;
            Ok(Some(vec![path]))
        }
        Some("MultiLineString") => {
            let parts = coords.as_array().ok_or_else(|| {
                invalid(0)(ValidationError::MalformedCoordinates {
                    index: 0,
                    reason: "expected an array of paths".into(),
                })
            })?;
            parts
                .iter()
                .enumerate()
                .map(|(j, part)| parse_path(part).map_err(invalid(j)))
                .collect::<Result<Vec<_>, _>>()
                .map(Some)
        }
        other => Err(GeometryError::Unsupported {
            feature,
            kind: other.unwrap_or("<missing>").to_string(),
        }),
    }
}

/// Parse `[[x, y, ...], ...]` into a polyline, ignoring extra ordinates.
fn parse_path(coords: &Value) -> Result<Polyline, ValidationError> {
    let positions = coords
        .as_array()
        .ok_or_else(|| ValidationError::MalformedCoordinates {
            index: 0,
            reason: "expected an array of positions".into(),
        })?;
    let points = positions
        .iter()
        .enumerate()
        .map(|(index, pos)| parse_position(index, pos))
        .collect::<Result<Vec<_>, _>>()?;
    Polyline::new(points)
}

pub(crate) fn parse_position(index: usize, pos: &Value) -> Result<Pt2, ValidationError> {
    let malformed = |reason: &str| ValidationError::MalformedCoordinates {
        index,
        reason: reason.to_string(),
    };
    let arr = pos
        .as_array()
        .ok_or_else(|| malformed("expected a coordinate array"))?;
    if arr.len() < 2 {
        return Err(malformed("expected at least two ordinates"));
    }
    let x = arr[0].as_f64().ok_or_else(|| malformed("x is not a number"))?;
    let y = arr[1].as_f64().ok_or_else(|| malformed("y is not a number"))?;
    Ok(Pt2::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use georef_core::Mat3;
    use serde_json::json;

    fn scale(s: f64) -> ProjectiveMatrix {
        ProjectiveMatrix::new(Mat3::new(s, 0.0, 0.0, 0.0, s, 0.0, 0.0, 0.0, 1.0))
    }

    fn feature(geometry: Value, properties: Value) -> Feature {
        Feature {
            geometry: Some(geometry),
            properties: Some(properties),
        }
    }

    fn line(coords: Value) -> Value {
        json!({ "type": "LineString", "coordinates": coords })
    }

    #[test]
    fn multi_part_feature_fans_out() {
        let features = vec![
            feature(line(json!([[0, 0], [1, 1]])), json!({})),
            Feature::default(),
            feature(
                json!({
                    "type": "MultiLineString",
                    "coordinates": [
                        [[0, 0], [1, 0]],
                        [[1, 0], [1, 1]],
                        [[1, 1], [0, 1]]
                    ]
                }),
                json!({ "name": "EWL", "colour": "cyan" }),
            ),
            Feature::default(),
            Feature::default(),
            feature(line(json!([[2, 2], [3, 3], [4, 5]])), json!({ "name": "DTL" })),
        ];

        let (lines, summary) = GeometryAdapter::new(scale(10.0)).transform(&features).unwrap();
        let ids: Vec<&str> = lines.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(
            ids,
            ["feature_0", "feature_2_0", "feature_2_1", "feature_2_2", "feature_5"]
        );
        for l in &lines[1..4] {
            assert_eq!(l.properties, json!({ "name": "EWL", "colour": "cyan" }));
        }
        assert_eq!(lines[4].points.points()[2], Pt2::new(40.0, 50.0));
        assert_eq!(
            summary,
            TransformSummary {
                features: 3,
                skipped: 3,
                lines: 5
            }
        );
    }

    #[test]
    fn polygon_is_unsupported() {
        let features = vec![
            feature(line(json!([[0, 0], [1, 1]])), json!({})),
            feature(
                json!({ "type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]] }),
                json!({}),
            ),
        ];
        let err = transform_features(&features, &scale(1.0)).unwrap_err();
        assert_eq!(
            err,
            GeometryError::Unsupported {
                feature: 1,
                kind: "Polygon".into()
            }
        );
    }

    #[test]
    fn single_part_multi_line_keeps_bare_id() {
        let features = vec![feature(
            json!({ "type": "MultiLineString", "coordinates": [[[0, 0], [1, 1]]] }),
            Value::Null,
        )];
        let (lines, _) = transform_features(&features, &scale(2.0)).unwrap();
        assert_eq!(lines[0].id, "feature_0");
        assert_eq!(lines[0].properties, json!({}));
    }

    #[test]
    fn extra_ordinates_are_ignored_and_short_ones_rejected() {
        let ok = vec![feature(line(json!([[1, 2, 99], [3, 4, 99]])), json!({}))];
        let (lines, _) = transform_features(&ok, &scale(1.0)).unwrap();
        assert_eq!(lines[0].points.points()[1], Pt2::new(3.0, 4.0));

        let bad = vec![feature(line(json!([[1, 2], [3]])), json!({}))];
        let err = transform_features(&bad, &scale(1.0)).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::Validation {
                feature: 0,
                part: 0,
                source: ValidationError::MalformedCoordinates { index: 1, .. }
            }
        ));
    }

    #[test]
    fn point_at_infinity_aborts_run() {
        let h = ProjectiveMatrix::new(Mat3::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, -1.0));
        let features = vec![feature(line(json!([[0, 0], [1, 3]])), json!({}))];
        let err = transform_features(&features, &h).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::Projection {
                feature: 0,
                part: 0,
                source: ProjectionError::PointAtInfinity { index: 1, .. }
            }
        ));
    }

    #[test]
    fn empty_geometry_object_is_skipped() {
        let features = vec![feature(json!({}), json!({}))];
        let (lines, summary) = transform_features(&features, &scale(1.0)).unwrap();
        assert!(lines.is_empty());
        assert_eq!(summary.skipped, 1);
    }
}
