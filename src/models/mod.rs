pub mod classifier;

pub use classifier::Classifier;

use crate::Result;
use ndarray::Array4;

/// A loaded classification model.
///
/// The handle is immutable after construction and shared read-only across
/// requests; the web layer is written against this trait so tests can swap
/// in a fixed-output model.
pub trait PlantModel: Send + Sync + 'static {
    /// Runs the forward pass on a `1xHxWx3` input and returns the
    /// per-class probability vector.
    fn infer(&self, input: Array4<f32>) -> Result<Vec<f32>>;
}
