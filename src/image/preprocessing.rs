use crate::config::INPUT_SIZE;
use image::{imageops::FilterType, DynamicImage};
use ndarray::{Array3, Array4, Axis};

pub struct Preprocessor;

impl Preprocessor {
    /// Turns a decoded image into the model's input tensor: resize to
    /// 224x224, RGB, HWC layout, pixel values scaled to [0,1], batch axis
    /// prepended.
    pub fn to_model_input(image: &DynamicImage) -> Array4<f32> {
        let resized = image
            .resize_exact(INPUT_SIZE as u32, INPUT_SIZE as u32, FilterType::Triangle)
            .to_rgb8();

        let mut array = Array3::<f32>::zeros((INPUT_SIZE, INPUT_SIZE, 3));
        for (x, y, pixel) in resized.enumerate_pixels() {
            for c in 0..3 {
                array[[y as usize, x as usize, c]] = pixel[c] as f32 / 255.0;
            }
        }

        array.insert_axis(Axis(0))
    }
}
