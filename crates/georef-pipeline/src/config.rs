//! Run configuration for estimation and transform runs.
//!
//! Both structs deserialize from partial JSON; missing fields take their
//! defaults.

use serde::{Deserialize, Serialize};

/// How pixel and reference control points are matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pairing {
    /// i-th pixel point ↔ i-th reference feature.
    #[default]
    ByIndex,
    /// Match on the shared control-point label.
    ByLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimateConfig {
    pub pairing: Pairing,
    /// Reject coincident or collinear control points before solving.
    pub check_degeneracy: bool,
    /// Free-text note stored as `control_point_order` in the matrix record.
    pub control_point_order: Option<String>,
}

impl Default for EstimateConfig {
    fn default() -> Self {
        Self {
            pairing: Pairing::ByIndex,
            check_degeneracy: true,
            control_point_order: None,
        }
    }
}

/// Default input file names named in the `control_point_order` note.
pub const DEFAULT_CONTROL_PX: &str = "control_px.json";
pub const DEFAULT_CONTROL_CRS: &str = "control_crs.geojson";

impl EstimateConfig {
    /// The configured note, or the standard one for [`DEFAULT_CONTROL_PX`]
    /// and [`DEFAULT_CONTROL_CRS`].
    pub fn control_point_order_or_default(&self) -> String {
        self.control_point_order_for(DEFAULT_CONTROL_PX, DEFAULT_CONTROL_CRS)
    }

    /// The configured note, or one describing how points in the files
    /// `control_px` and `control_crs` are paired.
    pub fn control_point_order_for(&self, control_px: &str, control_crs: &str) -> String {
        if let Some(note) = &self.control_point_order {
            return note.clone();
        }
        match self.pairing {
            Pairing::ByIndex => {
                format!("Uses order in {control_px}['points'] and {control_crs}['features']")
            }
            Pairing::ByLabel => {
                format!("Paired by id between {control_px}['points'] and {control_crs}['features']")
            }
        }
    }
}

/// Which stored matrix a transform run applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Reference CRS → pixel (`H_qgis_to_px`).
    #[default]
    CrsToPixel,
    /// Pixel → reference CRS (`H_px_to_qgis`).
    PixelToCrs,
}

impl Direction {
    /// Matrix-record key of the matrix used for this direction.
    pub fn label(self) -> &'static str {
        match self {
            Direction::CrsToPixel => "H_qgis_to_px",
            Direction::PixelToCrs => "H_px_to_qgis",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    pub direction: Direction,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_uses_defaults() {
        let cfg: EstimateConfig = serde_json::from_str(r#"{ "pairing": "by_label" }"#).unwrap();
        assert_eq!(cfg.pairing, Pairing::ByLabel);
        assert!(cfg.check_degeneracy);

        let cfg: TransformConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.direction, Direction::CrsToPixel);
    }

    #[test]
    fn direction_labels_match_record_keys() {
        assert_eq!(Direction::CrsToPixel.label(), "H_qgis_to_px");
        assert_eq!(Direction::PixelToCrs.label(), "H_px_to_qgis");
    }

    #[test]
    fn control_point_order_note_names_inputs() {
        let cfg = EstimateConfig::default();
        assert_eq!(
            cfg.control_point_order_or_default(),
            "Uses order in control_px.json['points'] and control_crs.geojson['features']"
        );

        let cfg = EstimateConfig {
            pairing: Pairing::ByLabel,
            ..Default::default()
        };
        assert_eq!(
            cfg.control_point_order_for("px.json", "ref.geojson"),
            "Paired by id between px.json['points'] and ref.geojson['features']"
        );

        let cfg = EstimateConfig {
            control_point_order: Some("picked clockwise".into()),
            ..Default::default()
        };
        assert_eq!(cfg.control_point_order_for("px.json", "ref.geojson"), "picked clockwise");
    }
}
