//! Persisted records exchanged with external tools.
//!
//! Field names are part of the interchange contract and are kept verbatim
//! (`px`, `H_qgis_to_px`, `crs_from_control_crs`, ...).

use crate::config::Direction;
use georef_core::{ControlPoint, GeometryCollection, ProjectiveMatrix, Pt2, Real};
use georef_linear::{invert, HomographyError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One picked pixel location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlPixelPoint {
    pub id: String,
    pub px: [Real; 2],
}

impl From<&ControlPixelPoint> for ControlPoint {
    fn from(p: &ControlPixelPoint) -> Self {
        ControlPoint::new(p.id.clone(), Pt2::new(p.px[0], p.px[1]))
    }
}

/// Output of the point-picking tool: `{ "image": ..., "points": [...] }`.
///
/// Point order in `points` is the correspondence order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlPixelRecord {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub points: Vec<ControlPixelPoint>,
}

impl ControlPixelRecord {
    pub fn control_points(&self) -> Vec<ControlPoint> {
        self.points.iter().map(ControlPoint::from).collect()
    }
}

/// A GeoJSON-shaped feature. Geometry is kept as raw JSON so unsupported
/// types can be reported by name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub geometry: Option<Value>,
    #[serde(default)]
    pub properties: Option<Value>,
}

impl Feature {
    /// `"type"` of the geometry, if there is one.
    pub fn geometry_type(&self) -> Option<&str> {
        self.geometry
            .as_ref()
            .and_then(|g| g.get("type"))
            .and_then(Value::as_str)
    }

    /// Property bag, with a missing or `null` bag replaced by `{}`.
    pub fn properties_or_empty(&self) -> Value {
        match &self.properties {
            Some(Value::Null) | None => Value::Object(Default::default()),
            Some(v) => v.clone(),
        }
    }
}

/// A GeoJSON-shaped feature collection (reference points or line features).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureCollection {
    /// Opaque CRS metadata, carried through unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crs: Option<Value>,
    #[serde(default)]
    pub features: Vec<Feature>,
}

/// Output of an estimation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixRecord {
    pub image: Option<String>,
    #[serde(default)]
    pub control_point_order: String,
    #[serde(default)]
    pub crs_from_control_crs: Value,
    #[serde(rename = "H_qgis_to_px")]
    pub h_qgis_to_px: ProjectiveMatrix,
    #[serde(
        rename = "H_px_to_qgis",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub h_px_to_qgis: Option<ProjectiveMatrix>,
}

impl MatrixRecord {
    /// Matrix for `direction`.
    ///
    /// Records written without `H_px_to_qgis` get the inverse recomputed from
    /// the forward matrix.
    pub fn matrix(&self, direction: Direction) -> Result<ProjectiveMatrix, HomographyError> {
        match (direction, self.h_px_to_qgis) {
            (Direction::CrsToPixel, _) => Ok(self.h_qgis_to_px),
            (Direction::PixelToCrs, Some(inv)) => Ok(inv),
            (Direction::PixelToCrs, None) => invert(&self.h_qgis_to_px),
        }
    }
}

/// Output of a transform run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformedLines {
    /// File name of the line-geometry input.
    pub source: String,
    /// Passed through from [`MatrixRecord::image`].
    pub image: Option<String>,
    /// Key of the matrix used, e.g. `H_qgis_to_px`.
    pub transform: String,
    pub lines: GeometryCollection,
}

#[cfg(test)]
mod tests {
    use super::*;
    use georef_core::test_utils::{
        perspective_homography, points_close, project, utm_reference_points,
    };
    use serde_json::json;

    #[test]
    fn parses_control_pixel_record() {
        let rec: ControlPixelRecord = serde_json::from_value(json!({
            "image": "mrt_clean.png",
            "points": [
                { "id": "P1", "px": [10.0, 20.0] },
                { "id": "P2", "px": [30.0, 20.0] }
            ]
        }))
        .unwrap();
        let cps = rec.control_points();
        assert_eq!(cps[1].id, "P2");
        assert_eq!(cps[1].point, Pt2::new(30.0, 20.0));
    }

    #[test]
    fn matrix_record_uses_interchange_keys() {
        let rec = MatrixRecord {
            image: None,
            control_point_order: "order".into(),
            crs_from_control_crs: json!({ "type": "name" }),
            h_qgis_to_px: ProjectiveMatrix::identity(),
            h_px_to_qgis: Some(ProjectiveMatrix::identity()),
        };
        let v = serde_json::to_value(&rec).unwrap();
        assert!(v["image"].is_null());
        assert_eq!(v["H_qgis_to_px"][1], json!([0.0, 1.0, 0.0]));
        assert_eq!(v["H_px_to_qgis"][2], json!([0.0, 0.0, 1.0]));
        assert_eq!(v["crs_from_control_crs"]["type"], "name");
    }

    #[test]
    fn missing_inverse_is_recomputed() {
        let rec: MatrixRecord = serde_json::from_value(json!({
            "image": "a.png",
            "H_qgis_to_px": [[2.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 1.0]]
        }))
        .unwrap();
        let inv = rec.matrix(Direction::PixelToCrs).unwrap();
        assert_eq!(inv.to_rows(), [[0.5, 0.0, 0.0], [0.0, 0.25, 0.0], [0.0, 0.0, 1.0]]);
    }

    #[test]
    fn missing_inverse_is_recomputed_for_utm_scale_record() {
        let forward = ProjectiveMatrix::new(perspective_homography()).normalized();
        let rec: MatrixRecord = serde_json::from_value(json!({
            "image": "mrt_clean.png",
            "H_qgis_to_px": forward.to_rows()
        }))
        .unwrap();
        assert!(rec.h_px_to_qgis.is_none());

        let inv = rec.matrix(Direction::PixelToCrs).unwrap();
        for r in utm_reference_points() {
            let px = project(forward.as_mat3(), &r);
            let back = project(inv.as_mat3(), &px);
            assert!(points_close(&back, &r, 1e-9), "{r} -> {back}");
        }
    }

    #[test]
    fn malformed_matrix_is_rejected() {
        let res = serde_json::from_value::<MatrixRecord>(json!({
            "image": null,
            "H_qgis_to_px": [[1.0, 0.0], [0.0, 1.0]]
        }));
        assert!(res.is_err());
    }

    #[test]
    fn null_properties_become_empty_object() {
        let f: Feature = serde_json::from_value(json!({ "geometry": null, "properties": null }))
            .unwrap();
        assert_eq!(f.properties_or_empty(), json!({}));
        assert!(f.geometry_type().is_none());
    }
}
