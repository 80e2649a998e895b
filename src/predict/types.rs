use serde::Serialize;

/// Top-1 classification result as returned on the wire.
///
/// Field order matters to downstream clients: `plant` must serialize
/// before `confidence`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub plant: String,
    pub confidence: f32,
}
