//! Hole and edge picking for an imported plate model.
//!
//! The [`ViewerSession`] is the single owner of picking state: the feature
//! index of the current model, hover/lock selection, and the bookkeeping that
//! keeps late network responses from overwriting newer data. The embedding
//! layer creates one session per viewer and feeds it pointer, click and
//! network-completion events in order.

pub mod affordance;
pub mod camera;
pub mod config;
pub mod features;
pub mod placement;
pub mod resolve;
pub mod selection;
pub mod types;
pub mod view;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use plate_geometry::{Point3d, Ray, Segment, Vec3};
use plate_types::{EdgeId, EdgeRecord, HoleId, HoleRecord, JoinMode, ModelGeneration, Modifiers, RequestId};

pub use affordance::{AffordanceController, VisibilityChange, VisibilityTracker};
pub use camera::{pointer_ray, Camera, PointerPosition, Viewport};
pub use config::PickingConfig;
pub use features::{CatalogEntry, DiameterGroup, Edge, FeatureIndex, FeatureSnapshot, Hole};
pub use placement::StudPlacement;
pub use resolve::{EdgeMatch, HoleMatch, Resolution};
pub use selection::{ClickOutcome, HoleLockChange, HolePhase, SelectionPhase, SelectionState};
pub use types::PickError;
pub use view::{EdgeHighlight, EdgeRenderState, HoleMarker, HoleTooltip, SelectionView};

/// Finds the nearest point where a ray meets the plate surface.
///
/// Implemented by whatever owns the mesh; the picking core only ever sees
/// the resulting point.
pub trait SurfaceIntersector {
    fn intersect(&self, ray: &Ray) -> Option<Point3d>;
}

/// A plate model as delivered by the loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadedModel {
    pub mesh_url: String,
    pub display_scale: plate_geometry::DisplayScale,
    pub holes: Vec<HoleRecord>,
    pub edges: Vec<EdgeRecord>,
}

/// Issued when a model load starts; hand it back on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadTicket {
    pub generation: ModelGeneration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LoadOutcome {
    Installed {
        generation: ModelGeneration,
        holes: usize,
        edges: usize,
    },
    /// A newer load was requested after this one; the response was dropped.
    Stale {
        generation: ModelGeneration,
        latest: ModelGeneration,
    },
    Failed {
        generation: ModelGeneration,
        reason: String,
    },
}

/// Issued when a diameter edit is sent to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EditTicket {
    pub request: RequestId,
    pub generation: ModelGeneration,
    pub hole: HoleId,
    pub new_diameter: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingEdit {
    ticket: EditTicket,
    previous_diameter: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EditOutcome {
    Applied {
        hole: HoleId,
        diameter: f64,
        mesh_url: String,
    },
    Failed {
        hole: HoleId,
        restored_diameter: f64,
        reason: String,
    },
    /// The response belongs to a superseded edit or an older model.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HoverOutcome {
    /// A hole is locked; hover tracking is suspended.
    Frozen,
    /// No model, or the pointer is off the plate.
    Cleared,
    Updated(Resolution),
}

/// Two locked edges and what to do with them, in click order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JoinRequest {
    pub mode: JoinMode,
    pub first: EdgeId,
    pub second: EdgeId,
    /// Native-space geometry of `first`.
    pub first_segment: Segment,
    /// Native-space geometry of `second`.
    pub second_segment: Segment,
}

/// Picking state for one viewer.
#[derive(Debug, Clone, Default)]
pub struct ViewerSession {
    config: PickingConfig,
    index: FeatureIndex,
    selection: SelectionState,
    latest_requested: ModelGeneration,
    mesh_url: Option<String>,
    pending_edit: Option<PendingEdit>,
    /// Locked hole whose diameter was changed; its marker shows the hole's
    /// own size until the lock is released.
    resized_marker: Option<HoleId>,
    pointer: Option<PointerPosition>,
}

impl ViewerSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PickingConfig) -> Result<Self, PickError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &PickingConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: PickingConfig) -> Result<(), PickError> {
        config.validate()?;
        info!(?config, "picking config updated");
        self.config = config;
        Ok(())
    }

    pub fn index(&self) -> &FeatureIndex {
        &self.index
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn mesh_url(&self) -> Option<&str> {
        self.mesh_url.as_deref()
    }

    pub fn latest_requested(&self) -> ModelGeneration {
        self.latest_requested
    }

    // -- Model loading --

    /// Start a model load. Any load still in flight becomes stale.
    pub fn begin_model_load(&mut self) -> LoadTicket {
        self.latest_requested = self.latest_requested.next();
        debug!(generation = %self.latest_requested, "model load requested");
        LoadTicket {
            generation: self.latest_requested,
        }
    }

    /// Install a loaded model if `ticket` is still the latest request.
    ///
    /// Invalid feature data is rejected without touching the current model.
    #[instrument(skip_all, fields(generation = %ticket.generation))]
    pub fn complete_model_load(
        &mut self,
        ticket: LoadTicket,
        model: LoadedModel,
        ui: &mut dyn AffordanceController,
    ) -> Result<LoadOutcome, PickError> {
        if ticket.generation != self.latest_requested {
            debug!(latest = %self.latest_requested, "dropping stale model load");
            return Ok(LoadOutcome::Stale {
                generation: ticket.generation,
                latest: self.latest_requested,
            });
        }

        let snapshot = FeatureSnapshot::build(
            ticket.generation,
            model.display_scale,
            &model.holes,
            &model.edges,
        )?;
        let (holes, edges) = (snapshot.holes().len(), snapshot.edges().len());

        self.index.install(snapshot);
        self.selection.reset(ui);
        self.pending_edit = None;
        self.resized_marker = None;
        self.pointer = None;
        self.mesh_url = Some(model.mesh_url);
        info!(holes, edges, "model installed");

        Ok(LoadOutcome::Installed {
            generation: ticket.generation,
            holes,
            edges,
        })
    }

    /// Record a failed load. The current model, if any, stays authoritative.
    pub fn fail_model_load(&mut self, ticket: LoadTicket, reason: String) -> LoadOutcome {
        if ticket.generation != self.latest_requested {
            debug!(generation = %ticket.generation, "dropping stale load failure");
            return LoadOutcome::Stale {
                generation: ticket.generation,
                latest: self.latest_requested,
            };
        }
        warn!(generation = %ticket.generation, %reason, "model load failed");
        LoadOutcome::Failed {
            generation: ticket.generation,
            reason,
        }
    }

    // -- Pointer --

    /// Full hover path: pointer → ray → surface hit → feature match.
    pub fn pointer_move(
        &mut self,
        pointer: PointerPosition,
        viewport: &Viewport,
        camera: &Camera,
        intersector: &dyn SurfaceIntersector,
        ui: &mut dyn AffordanceController,
    ) -> Result<HoverOutcome, PickError> {
        if !self.selection.hover_enabled() {
            return Ok(HoverOutcome::Frozen);
        }
        if self.index.current().is_none() {
            self.selection.clear_hover(ui);
            return Ok(HoverOutcome::Cleared);
        }
        let ray = pointer_ray(&pointer, viewport, camera)?;
        let hit = intersector.intersect(&ray);
        Ok(self.hover_at(pointer, hit, ui))
    }

    /// Hover path for callers that intersect the mesh themselves.
    pub fn hover_at(
        &mut self,
        pointer: PointerPosition,
        hit: Option<Point3d>,
        ui: &mut dyn AffordanceController,
    ) -> HoverOutcome {
        if !self.selection.hover_enabled() {
            return HoverOutcome::Frozen;
        }
        self.pointer = Some(pointer);
        match (self.index.current(), hit) {
            (Some(snapshot), Some(point)) => {
                let resolution = resolve::resolve(snapshot, &point, &self.config);
                self.selection.set_hover(
                    resolution.hole.map(|m| m.id),
                    resolution.edge.map(|m| m.id),
                    ui,
                );
                HoverOutcome::Updated(resolution)
            }
            _ => {
                self.selection.clear_hover(ui);
                HoverOutcome::Cleared
            }
        }
    }

    pub fn click(&mut self, modifiers: Modifiers, ui: &mut dyn AffordanceController) -> ClickOutcome {
        let outcome = self.selection.click(modifiers, ui);
        if outcome.hole != HoleLockChange::Unchanged {
            self.resized_marker = None;
        }
        outcome
    }

    // -- Diameter edits --

    /// Start changing the locked hole's diameter. The marker previews the new
    /// size until the backend answers.
    #[instrument(skip(self))]
    pub fn begin_diameter_edit(&mut self, new_diameter: f64) -> Result<EditTicket, PickError> {
        let snapshot = self.index.current().ok_or(PickError::NoModel)?;
        let hole_id = self.selection.locked_hole().ok_or(PickError::NoLockedHole)?;
        if !new_diameter.is_finite() || new_diameter <= 0.0 {
            return Err(PickError::InvalidDiameter {
                value: new_diameter,
            });
        }
        let hole = snapshot.hole(hole_id).ok_or(PickError::NoLockedHole)?;

        let ticket = EditTicket {
            request: RequestId::new(),
            generation: snapshot.generation(),
            hole: hole_id,
            new_diameter,
        };
        if let Some(previous) = self.pending_edit.replace(PendingEdit {
            ticket,
            previous_diameter: hole.diameter,
        }) {
            debug!(request = %previous.ticket.request, "superseding pending diameter edit");
        }
        info!(hole = %hole_id, request = %ticket.request, "diameter edit requested");
        Ok(ticket)
    }

    /// Apply the backend's answer to a diameter edit. On success the result
    /// carries the URL of the regenerated mesh.
    #[instrument(skip(self, result))]
    pub fn complete_diameter_edit(&mut self, request: RequestId, result: Result<String, String>) -> EditOutcome {
        let current_generation = self.index.generation();
        let pending = match self.pending_edit {
            Some(p) if p.ticket.request == request && Some(p.ticket.generation) == current_generation => p,
            _ => {
                debug!("dropping stale diameter edit response");
                return EditOutcome::Stale;
            }
        };
        self.pending_edit = None;

        match result {
            Ok(mesh_url) => {
                self.index.set_hole_diameter(pending.ticket.hole, pending.ticket.new_diameter);
                self.mesh_url = Some(mesh_url.clone());
                self.resized_marker = Some(pending.ticket.hole);
                info!(hole = %pending.ticket.hole, diameter = pending.ticket.new_diameter, "diameter edit applied");
                EditOutcome::Applied {
                    hole: pending.ticket.hole,
                    diameter: pending.ticket.new_diameter,
                    mesh_url,
                }
            }
            Err(reason) => {
                warn!(hole = %pending.ticket.hole, %reason, "diameter edit failed");
                EditOutcome::Failed {
                    hole: pending.ticket.hole,
                    restored_diameter: pending.previous_diameter,
                    reason,
                }
            }
        }
    }

    // -- Studs and joins --

    /// Placement for a stud of the given width in the locked hole.
    pub fn place_stud(&self, shape_extent: f64) -> Result<StudPlacement, PickError> {
        let snapshot = self.index.current().ok_or(PickError::NoModel)?;
        let hole = self
            .selection
            .locked_hole()
            .and_then(|id| snapshot.hole(id))
            .ok_or(PickError::NoLockedHole)?;
        let placement = placement::place_stud(hole, shape_extent, snapshot.scale(), self.config.min_shape_extent)?;
        info!(hole = %hole.id, scale = placement.scale, "stud placed");
        Ok(placement)
    }

    /// Like [`Self::place_stud`], measuring the stud from its vertex buffer.
    pub fn place_stud_from_vertices(&self, positions: &[f32]) -> Result<StudPlacement, PickError> {
        self.place_stud(placement::stud_extent(positions)?)
    }

    pub fn request_join(&self, mode: JoinMode) -> Result<JoinRequest, PickError> {
        let snapshot = self.index.current().ok_or(PickError::NoModel)?;
        let edges = self.selection.locked_edges();
        let [first, second] = edges else {
            return Err(PickError::JoinUnavailable { locked: edges.len() });
        };
        let segment = |id: EdgeId| {
            snapshot
                .edge(id)
                .map(|e| e.segment)
                .ok_or(PickError::JoinUnavailable { locked: edges.len() })
        };
        let request = JoinRequest {
            mode,
            first: *first,
            second: *second,
            first_segment: segment(*first)?,
            second_segment: segment(*second)?,
        };
        info!(?mode, first = %first, second = %second, "join requested");
        Ok(request)
    }

    // -- Views --

    /// Render-space geometry and highlight state of every edge, in
    /// enumeration order.
    pub fn edge_render_states(&self) -> Vec<EdgeRenderState> {
        let Some(snapshot) = self.index.current() else {
            return Vec::new();
        };
        snapshot
            .edges()
            .iter()
            .map(|e| {
                let highlighted = self.selection.edge_highlighted(e.id);
                EdgeRenderState {
                    edge: e.id,
                    segment: snapshot.edge_in_render_space(e),
                    highlighted,
                    offset: if highlighted {
                        Vec3::Y * self.config.edge_highlight_offset
                    } else {
                        Vec3::ZERO
                    },
                }
            })
            .collect()
    }

    pub fn catalog(&self) -> Vec<DiameterGroup> {
        self.index.current().map(|s| s.catalog()).unwrap_or_default()
    }

    /// Everything the renderer needs to draw the current selection.
    pub fn view(&self) -> SelectionView {
        let sel = &self.selection;
        let Some(snapshot) = self.index.current() else {
            return SelectionView {
                phase: sel.phase(),
                ..SelectionView::default()
            };
        };
        let scale = snapshot.scale();

        let hole_marker = sel
            .locked_hole()
            .or(sel.hovered_hole())
            .and_then(|id| snapshot.hole(id))
            .map(|hole| {
                let radius = match self.pending_edit {
                    Some(p) if p.ticket.hole == hole.id => p.ticket.new_diameter / 2.0 * scale.x().abs(),
                    _ if self.resized_marker == Some(hole.id) && sel.locked_hole() == Some(hole.id) => {
                        hole.diameter / 2.0 * scale.x().abs()
                    }
                    _ => self.config.hole_marker_radius,
                };
                HoleMarker {
                    hole: hole.id,
                    center: scale.to_render(&hole.position),
                    radius,
                }
            });

        let edge_highlights = self
            .edge_render_states()
            .into_iter()
            .filter(|e| e.highlighted)
            .map(|e| EdgeHighlight {
                edge: e.edge,
                segment: e.segment,
                offset: e.offset,
            })
            .collect();

        let tooltip = match (sel.hovered_hole().and_then(|id| snapshot.hole(id)), self.pointer) {
            (Some(hole), Some(pointer)) => Some(HoleTooltip {
                hole: hole.id,
                diameter: hole.diameter,
                position: hole.position,
                anchor: [
                    pointer.x + self.config.tooltip_offset[0],
                    pointer.y + self.config.tooltip_offset[1],
                ],
            }),
            _ => None,
        };

        SelectionView {
            phase: sel.phase(),
            hovered_hole: sel.hovered_hole(),
            hovered_edge: sel.hovered_edge(),
            locked_hole: sel.locked_hole(),
            locked_edges: sel.locked_edges().to_vec(),
            hole_marker,
            edge_highlights,
            tooltip,
        }
    }
}
