pub mod config;
pub mod image;
pub mod labels;
pub mod models;
pub mod predict;
pub mod utils;
pub mod web;

pub use config::Config;
pub use predict::Prediction;
pub use utils::error::PredictError;

pub type Result<T> = std::result::Result<T, PredictError>;
