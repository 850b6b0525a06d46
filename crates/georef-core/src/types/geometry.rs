//! Line geometry produced by the transform stage.

use crate::{Pt2, Real, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered path of at least two vertices.
///
/// Serialized as `[[x, y], ...]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<[Real; 2]>", into = "Vec<[Real; 2]>")]
pub struct Polyline(Vec<Pt2>);

impl Polyline {
    pub const MIN_VERTICES: usize = 2;

    pub fn new(points: Vec<Pt2>) -> Result<Self, ValidationError> {
        if points.len() < Self::MIN_VERTICES {
            return Err(ValidationError::TooFewVertices {
                actual: points.len(),
            });
        }
        if let Some(index) = points
            .iter()
            .position(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(ValidationError::NonFinite { index });
        }
        Ok(Self(points))
    }

    pub fn points(&self) -> &[Pt2] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_points(self) -> Vec<Pt2> {
        self.0
    }
}

impl TryFrom<Vec<[Real; 2]>> for Polyline {
    type Error = ValidationError;

    fn try_from(raw: Vec<[Real; 2]>) -> Result<Self, Self::Error> {
        Self::new(raw.into_iter().map(|[x, y]| Pt2::new(x, y)).collect())
    }
}

impl From<Polyline> for Vec<[Real; 2]> {
    fn from(line: Polyline) -> Self {
        line.0.into_iter().map(|p| [p.x, p.y]).collect()
    }
}

/// A transformed polyline with its identifier and passthrough properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineFeature {
    /// `feature_{i}` or `feature_{i}_{j}`, see [`line_feature_id`].
    pub id: String,
    pub points: Polyline,
    /// Opaque property bag copied from the source feature.
    pub properties: Value,
}

/// Ordered sequence of line features, in input order.
pub type GeometryCollection = Vec<LineFeature>;

/// Identifier of part `part` of source feature `feature`.
///
/// Single-part features keep the bare `feature_{i}` form; parts of a
/// multi-part feature are suffixed with their index.
pub fn line_feature_id(feature: usize, part: usize, part_count: usize) -> String {
    if part_count > 1 {
        format!("feature_{feature}_{part}")
    } else {
        format!("feature_{feature}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polyline_requires_two_vertices() {
        let err = Polyline::new(vec![Pt2::new(0.0, 0.0)]).unwrap_err();
        assert_eq!(err, ValidationError::TooFewVertices { actual: 1 });
        assert!(Polyline::new(vec![Pt2::new(0.0, 0.0), Pt2::new(1.0, 1.0)]).is_ok());
    }

    #[test]
    fn line_feature_serializes_points_as_pairs() {
        let feature = LineFeature {
            id: line_feature_id(3, 0, 1),
            points: Polyline::new(vec![Pt2::new(1.0, 2.0), Pt2::new(3.5, 4.0)]).unwrap(),
            properties: serde_json::json!({ "name": "DTL" }),
        };
        let json = serde_json::to_value(&feature).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "feature_3",
                "points": [[1.0, 2.0], [3.5, 4.0]],
                "properties": { "name": "DTL" }
            })
        );
    }

    #[test]
    fn ids_follow_part_count() {
        assert_eq!(line_feature_id(5, 0, 1), "feature_5");
        assert_eq!(line_feature_id(2, 1, 3), "feature_2_1");
    }
}
