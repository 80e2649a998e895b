use crate::{
    image::{ImageLoader, Preprocessor, ResultFormatter},
    labels::CLASS_LABELS,
    models::PlantModel,
    predict::Prediction,
    Result,
};
use std::path::Path;
use std::time::Instant;

/// Decode -> preprocess -> infer -> format, for one request.
pub struct PredictPipeline;

impl PredictPipeline {
    /// Classifies a spooled upload by path.
    pub async fn process_path(model: &dyn PlantModel, path: &Path) -> Result<Prediction> {
        let image = ImageLoader::from_path(path).await?;
        Self::classify(model, &image)
    }

    /// Classifies an in-memory buffer.
    pub fn process_bytes(model: &dyn PlantModel, bytes: &[u8]) -> Result<Prediction> {
        let image = ImageLoader::from_bytes(bytes)?;
        Self::classify(model, &image)
    }

    fn classify(model: &dyn PlantModel, image: &image::DynamicImage) -> Result<Prediction> {
        let start = Instant::now();

        let input = Preprocessor::to_model_input(image);
        let probabilities = model.infer(input)?;
        let prediction = ResultFormatter::top1(&probabilities, &CLASS_LABELS)?;

        tracing::debug!(
            "Classified as '{}' ({:.4}) in {:.3}s",
            prediction.plant,
            prediction.confidence,
            start.elapsed().as_secs_f32()
        );

        Ok(prediction)
    }
}
