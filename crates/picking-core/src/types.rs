use plate_geometry::GeometryError;

/// Errors from the picking core.
///
/// Every variant describes malformed input or a request that the current
/// selection state cannot satisfy. "Nothing under the pointer" is never an
/// error; resolvers return `None` for that.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PickError {
    #[error("viewport must have positive finite size, got {width}x{height}")]
    DegenerateViewport { width: f64, height: f64 },

    #[error("pointer position is not finite")]
    InvalidPointer,

    #[error("invalid camera: {reason}")]
    InvalidCamera { reason: String },

    #[error("invalid {kind} record at index {index}: {reason}")]
    InvalidFeature {
        kind: &'static str,
        index: usize,
        reason: String,
    },

    #[error("geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("shape extent {extent} is too small to scale a stud from")]
    DegenerateShape { extent: f64 },

    #[error("shape has no vertices")]
    EmptyShape,

    #[error("no model loaded")]
    NoModel,

    #[error("no hole is locked")]
    NoLockedHole,

    #[error("diameter must be positive and finite, got {value}")]
    InvalidDiameter { value: f64 },

    #[error("weld/fold needs exactly two locked edges, have {locked}")]
    JoinUnavailable { locked: usize },

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}
