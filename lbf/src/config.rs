use anyhow::{Result, ensure};
use serde::{Deserialize, Serialize};

/// How the optimizer decides whether two parts collide
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CollisionMode {
    /// Parts collide if their (rotated) bounding boxes overlap
    #[default]
    BoundingBox,
    /// Parts collide if their outlines overlap, bounding boxes are only used as a pre-filter
    Polygon,
}

/// Configuration for the LBF optimizer
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LBFConfig {
    /// Rotations (in degrees) a part is allowed to take, in order of preference
    pub rotations: Vec<f64>,
    /// Minimum gap between two parts, in mm
    pub spacing: f64,
    pub collision_mode: CollisionMode,
    /// Maximum number of sheets to open. Unlimited if not specified
    pub max_sheets: Option<usize>,
}

impl LBFConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.rotations.is_empty(), "at least one rotation is required");
        ensure!(
            self.rotations.iter().all(|r| r.is_finite()),
            "rotations must be finite: {:?}",
            self.rotations
        );
        ensure!(
            self.spacing.is_finite() && self.spacing >= 0.0,
            "spacing must be a non-negative number, got {}",
            self.spacing
        );
        ensure!(
            self.max_sheets != Some(0),
            "max_sheets must be at least 1 when specified"
        );
        Ok(())
    }
}

impl Default for LBFConfig {
    fn default() -> Self {
        Self {
            rotations: vec![0.0, 90.0, 180.0, 270.0],
            spacing: 0.0,
            collision_mode: CollisionMode::default(),
            max_sheets: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config: LBFConfig = serde_json::from_str(r#"{"spacing": 5.0}"#).unwrap();
        assert_eq!(config.rotations, vec![0.0, 90.0, 180.0, 270.0]);
        assert_eq!(config.spacing, 5.0);
        assert_eq!(config.collision_mode, CollisionMode::BoundingBox);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let no_rotations = LBFConfig {
            rotations: vec![],
            ..LBFConfig::default()
        };
        assert!(no_rotations.validate().is_err());

        let negative_spacing = LBFConfig {
            spacing: -1.0,
            ..LBFConfig::default()
        };
        assert!(negative_spacing.validate().is_err());
    }
}
