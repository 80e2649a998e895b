use crate::predict::Prediction;
use crate::utils::error::PredictError;
use crate::Result;

pub struct ResultFormatter;

impl ResultFormatter {
    /// Selects the top-1 class from a probability vector.
    ///
    /// Argmax convention: on ties the lowest index wins. Confidence is
    /// rounded to 4 decimal places for the wire format.
    pub fn top1(probabilities: &[f32], labels: &[&str]) -> Result<Prediction> {
        if probabilities.len() != labels.len() {
            return Err(PredictError::Inference(format!(
                "Probability vector has {} entries, label list has {}",
                probabilities.len(),
                labels.len()
            )));
        }

        let mut top_index = 0;
        let mut top_prob = probabilities[0];
        for (i, &prob) in probabilities.iter().enumerate().skip(1) {
            if prob > top_prob {
                top_prob = prob;
                top_index = i;
            }
        }

        Ok(Prediction {
            plant: labels[top_index].to_string(),
            confidence: (top_prob * 10_000.0).round() / 10_000.0,
        })
    }
}
