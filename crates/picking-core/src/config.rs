//! Tunables for hit-testing and highlight presentation.

use serde::{Deserialize, Serialize};

use crate::types::PickError;

/// Picking tolerances and highlight parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickingConfig {
    /// A hole is a candidate when its effective distance (centre distance
    /// minus radius) is below this, in native units.
    pub hole_tolerance: f64,
    /// An edge is a candidate when the hit point lies closer than this to the
    /// segment, in render units.
    pub edge_tolerance: f64,
    /// Radius of the hover/lock marker drawn on a hole, in render units.
    pub hole_marker_radius: f64,
    /// Lift applied along +Y to highlighted edges so they draw above the plate.
    pub edge_highlight_offset: f64,
    /// Tooltip placement relative to the pointer, in pixels.
    pub tooltip_offset: [f64; 2],
    /// Smallest stud extent accepted by the placement calculator.
    pub min_shape_extent: f64,
}

impl Default for PickingConfig {
    fn default() -> Self {
        Self {
            hole_tolerance: 10.0,
            edge_tolerance: 0.1,
            hole_marker_radius: 0.2,
            edge_highlight_offset: 0.05,
            tooltip_offset: [15.0, 15.0],
            min_shape_extent: 1e-9,
        }
    }
}

impl PickingConfig {
    /// Default presentation with custom hit tolerances.
    pub fn with_tolerances(hole_tolerance: f64, edge_tolerance: f64) -> Self {
        Self {
            hole_tolerance,
            edge_tolerance,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), PickError> {
        let positive = [
            ("hole_tolerance", self.hole_tolerance),
            ("edge_tolerance", self.edge_tolerance),
            ("hole_marker_radius", self.hole_marker_radius),
            ("min_shape_extent", self.min_shape_extent),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(PickError::InvalidConfig {
                    reason: format!("{name} must be positive and finite, got {value}"),
                });
            }
        }
        let finite = [
            self.edge_highlight_offset,
            self.tooltip_offset[0],
            self.tooltip_offset[1],
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(PickError::InvalidConfig {
                reason: "offsets must be finite".to_string(),
            });
        }
        Ok(())
    }
}
