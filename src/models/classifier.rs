use crate::config::INPUT_SIZE;
use crate::labels::NUM_CLASSES;
use crate::models::PlantModel;
use crate::utils::error::PredictError;
use crate::{Config, Result};
use ndarray::Array4;
use ort::{
    inputs,
    session::{builder::GraphOptimizationLevel, Session},
    value::Tensor,
};
use parking_lot::Mutex;
use std::sync::Arc;

/// The plant species classifier, backed by an ONNX Runtime session.
///
/// Loaded once at startup and shared across all requests. The session is
/// behind a mutex because the runtime takes `&mut` to run; the model
/// parameters themselves are never mutated.
pub struct Classifier {
    session: Arc<Mutex<Session>>,
    input_name: String,
    output_name: String, // discovered from graph metadata
}

impl Classifier {
    pub fn load(config: &Config) -> Result<Self> {
        let model_path = &config.model_path;

        if !model_path.exists() {
            return Err(PredictError::ModelLoad(format!(
                "Model artifact not found: {}",
                model_path.display()
            )));
        }

        tracing::info!("Loading classification model from: {}", model_path.display());

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(config.onnx_config.intra_threads)?
            .commit_from_file(model_path)?;

        if session.inputs().is_empty() || session.outputs().is_empty() {
            return Err(PredictError::ModelLoad(
                "Model graph has no inputs or no outputs".to_string(),
            ));
        }

        let input_name = session.inputs()[0].name().to_string();
        let output_name = session.outputs()[0].name().to_string();
        tracing::info!(
            "Model graph bound: input '{}', output '{}'",
            input_name,
            output_name
        );

        let classifier = Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            output_name,
        };

        classifier.warmup()?;

        Ok(classifier)
    }

    /// Runs one inference on an all-zero input to fail fast on graphs whose
    /// input shape or output width does not match this service. A mismatch
    /// here aborts startup instead of failing the first real request.
    fn warmup(&self) -> Result<()> {
        let zeros = Array4::<f32>::zeros((1, INPUT_SIZE, INPUT_SIZE, 3));
        let probs = self
            .run(zeros)
            .map_err(|e| PredictError::ModelLoad(format!("Warmup inference failed: {}", e)))?;

        if probs.len() != NUM_CLASSES {
            return Err(PredictError::ModelLoad(format!(
                "Model produces {} classes, label list has {}",
                probs.len(),
                NUM_CLASSES
            )));
        }

        tracing::info!("Model warmup complete, {} output classes", probs.len());
        Ok(())
    }

    fn run(&self, input: Array4<f32>) -> Result<Vec<f32>> {
        let input_tensor = Tensor::from_array(input)?;

        let predictions = {
            let mut session = self.session.lock();
            let outputs = session.run(inputs![self.input_name.as_str() => input_tensor])?;

            match outputs.get(&self.output_name) {
                Some(output) => output.try_extract_array::<f32>()?.into_owned(),
                None => {
                    let available: Vec<String> =
                        outputs.keys().map(|s| s.to_string()).collect();
                    return Err(PredictError::Inference(format!(
                        "Model output '{}' not found. Available outputs: {:?}",
                        self.output_name, available
                    )));
                }
            }
        };

        let shape = predictions.shape();
        if shape.len() != 2 || shape[0] != 1 {
            return Err(PredictError::Inference(format!(
                "Expected a 1xC probability tensor, got shape {:?}",
                shape
            )));
        }

        Ok(predictions.iter().copied().collect())
    }
}

impl PlantModel for Classifier {
    fn infer(&self, input: Array4<f32>) -> Result<Vec<f32>> {
        self.run(input)
    }
}
