//! The feature index: holes and edges of the loaded plate in native space.
//!
//! A [`FeatureSnapshot`] is immutable once built and shared behind an `Arc`.
//! Installing a new model swaps the whole snapshot, so a reader holding the
//! old `Arc` keeps a complete, consistent view. The one in-place mutation,
//! a diameter edit, goes through `Arc::make_mut` and therefore copies when
//! anyone else still holds the snapshot.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use plate_geometry::{DisplayScale, Point3d, Segment, Vec3};
use plate_types::{EdgeId, EdgeRecord, HoleId, HoleRecord, ModelGeneration};

use crate::types::PickError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    pub id: HoleId,
    pub position: Point3d,
    pub diameter: f64,
    pub axis: Vec3,
}

impl Hole {
    pub fn radius(&self) -> f64 {
        self.diameter / 2.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    /// Native-space endpoints.
    pub segment: Segment,
}

/// Holes sharing the same diameter rounded to whole millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiameterGroup {
    pub nominal_mm: i64,
    pub holes: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: HoleId,
    /// Native-space centre.
    pub position: Point3d,
}

/// One complete, validated set of plate features.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSnapshot {
    generation: ModelGeneration,
    scale: DisplayScale,
    holes: Vec<Hole>,
    edges: Vec<Edge>,
}

fn bad(kind: &'static str, index: usize, reason: impl Into<String>) -> PickError {
    PickError::InvalidFeature {
        kind,
        index,
        reason: reason.into(),
    }
}

fn id_for(kind: &'static str, index: usize) -> Result<u32, PickError> {
    u32::try_from(index).map_err(|_| bad(kind, index, "too many records"))
}

impl FeatureSnapshot {
    /// Validate loader records and assign ids in enumeration order.
    /// A single bad record rejects the whole snapshot.
    pub fn build(
        generation: ModelGeneration,
        scale: DisplayScale,
        holes: &[HoleRecord],
        edges: &[EdgeRecord],
    ) -> Result<Self, PickError> {
        let holes = holes
            .iter()
            .enumerate()
            .map(|(i, rec)| {
                if !rec.position.is_finite() {
                    return Err(bad("hole", i, "position is not finite"));
                }
                if !rec.axis.is_finite() {
                    return Err(bad("hole", i, "axis is not finite"));
                }
                if !rec.diameter.is_finite() || rec.diameter <= 0.0 {
                    return Err(bad("hole", i, format!("diameter {} must be positive", rec.diameter)));
                }
                Ok(Hole {
                    id: HoleId(id_for("hole", i)?),
                    position: rec.position,
                    diameter: rec.diameter,
                    axis: rec.axis,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let edges = edges
            .iter()
            .enumerate()
            .map(|(i, rec)| {
                if !rec.start.is_finite() || !rec.end.is_finite() {
                    return Err(bad("edge", i, "endpoint is not finite"));
                }
                Ok(Edge {
                    id: EdgeId(id_for("edge", i)?),
                    segment: Segment::new(rec.start, rec.end),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            generation,
            scale,
            holes,
            edges,
        })
    }

    pub fn generation(&self) -> ModelGeneration {
        self.generation
    }

    pub fn scale(&self) -> &DisplayScale {
        &self.scale
    }

    pub fn holes(&self) -> &[Hole] {
        &self.holes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn hole(&self, id: HoleId) -> Option<&Hole> {
        self.holes.get(id.index())
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index())
    }

    /// Render-space segment for an edge.
    pub fn edge_in_render_space(&self, edge: &Edge) -> Segment {
        self.scale.segment_to_render(&edge.segment)
    }

    /// Holes grouped by diameter rounded to whole millimetres, smallest first.
    pub fn catalog(&self) -> Vec<DiameterGroup> {
        let mut groups: BTreeMap<i64, Vec<CatalogEntry>> = BTreeMap::new();
        for hole in &self.holes {
            groups
                .entry(hole.diameter.round() as i64)
                .or_default()
                .push(CatalogEntry {
                    id: hole.id,
                    position: hole.position,
                });
        }
        groups
            .into_iter()
            .map(|(nominal_mm, holes)| DiameterGroup { nominal_mm, holes })
            .collect()
    }
}

/// Owner of the current feature snapshot.
#[derive(Debug, Clone, Default)]
pub struct FeatureIndex {
    current: Option<Arc<FeatureSnapshot>>,
}

impl FeatureIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&FeatureSnapshot> {
        self.current.as_deref()
    }

    /// Shared handle for readers that outlive the next event, e.g. a query
    /// running on another thread.
    pub fn snapshot(&self) -> Option<Arc<FeatureSnapshot>> {
        self.current.clone()
    }

    pub fn generation(&self) -> Option<ModelGeneration> {
        self.current.as_ref().map(|s| s.generation)
    }

    pub fn install(&mut self, snapshot: FeatureSnapshot) {
        self.current = Some(Arc::new(snapshot));
    }

    /// Replace one hole's diameter.
    ///
    /// # Panics
    ///
    /// Panics if no model is installed or `id` is out of range. Ids come from
    /// the installed snapshot, so either case is a caller bug.
    pub fn set_hole_diameter(&mut self, id: HoleId, diameter: f64) {
        let snapshot = self
            .current
            .as_mut()
            .unwrap_or_else(|| panic!("set_hole_diameter({id}) with no model installed"));
        let snapshot = Arc::make_mut(snapshot);
        let count = snapshot.holes.len();
        let hole = snapshot
            .holes
            .get_mut(id.index())
            .unwrap_or_else(|| panic!("{id} out of range ({count} holes)"));
        hole.diameter = diameter;
    }
}
