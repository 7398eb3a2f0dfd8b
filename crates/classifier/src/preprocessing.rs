use crate::config::DEFAULT_INPUT_SIZE;
use crate::error::ClassifyError;
use common::span;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer, images::Image};
use ndarray::{Array, IxDyn};

pub struct PreProcessor {
    pub input_size: (u32, u32),
}

impl PreProcessor {
    pub fn new(input_size: (u32, u32)) -> Self {
        Self { input_size }
    }

    /// Decode raw image bytes and produce the model input tensor.
    ///
    /// Any alpha channel is discarded during the RGB conversion, and the
    /// resize is a hard stretch to `input_size`: aspect ratio is
    /// deliberately not preserved, because the model was trained on images
    /// produced by this exact transform.
    pub fn prepare(&self, bytes: &[u8]) -> Result<Array<f32, IxDyn>, ClassifyError> {
        let _s = span!("prepare_image");

        let decoded = image::load_from_memory(bytes)?;
        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();

        tracing::trace!(width, height, "decoded source image");

        let mut raw = rgb.into_raw();
        let src = Image::from_slice_u8(width, height, &mut raw, PixelType::U8x3)
            .map_err(|e| ClassifyError::Preprocess(e.into()))?;

        let mut resized = Image::new(self.input_size.0, self.input_size.1, PixelType::U8x3);

        Resizer::new()
            .resize(
                &src,
                &mut resized,
                &ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear)),
            )
            .map_err(|e| ClassifyError::Preprocess(e.into()))?;

        Self::to_tensor(&resized)
    }

    fn to_tensor(image: &Image<'_>) -> Result<Array<f32, IxDyn>, ClassifyError> {
        let width = image.width() as usize;
        let height = image.height() as usize;
        let spatial = width * height;

        let mut output = vec![0.0f32; 3 * spatial];

        for (i, px) in image.buffer().chunks_exact(3).enumerate() {
            output[i] = px[0] as f32 / 255.0;
            output[i + spatial] = px[1] as f32 / 255.0;
            output[i + 2 * spatial] = px[2] as f32 / 255.0;
        }

        Array::from_shape_vec(IxDyn(&[1, 3, height, width]), output)
            .map_err(|e| ClassifyError::Preprocess(e.into()))
    }
}

impl Default for PreProcessor {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32, pixel: [u8; 3]) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb(pixel));
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn output_shape_is_fixed_regardless_of_source_size() {
        let preprocessor = PreProcessor::default();

        for (w, h) in [(8, 8), (800, 600), (31, 97)] {
            let tensor = preprocessor.prepare(&png_bytes(w, h, [10, 20, 30])).unwrap();
            assert_eq!(tensor.shape(), &[1, 3, 640, 640]);
        }
    }

    #[test]
    fn pixel_values_are_scaled_to_unit_range() {
        let preprocessor = PreProcessor::new((32, 32));
        let tensor = preprocessor.prepare(&png_bytes(16, 16, [255, 128, 0])).unwrap();

        assert!((tensor[[0, 0, 16, 16]] - 1.0).abs() < 1e-6);
        assert!((tensor[[0, 1, 16, 16]] - 128.0 / 255.0).abs() < 1e-6);
        assert!(tensor[[0, 2, 16, 16]].abs() < 1e-6);
    }

    #[test]
    fn alpha_channel_is_discarded() {
        let img = RgbaImage::from_pixel(10, 10, Rgba([200, 100, 50, 7]));
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();

        let preprocessor = PreProcessor::new((10, 10));
        let tensor = preprocessor.prepare(&out.into_inner()).unwrap();

        assert_eq!(tensor.shape(), &[1, 3, 10, 10]);
        assert!((tensor[[0, 0, 5, 5]] - 200.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn preparation_is_deterministic_for_identical_bytes() {
        let preprocessor = PreProcessor::default();
        let bytes = png_bytes(120, 80, [33, 66, 99]);

        let first = preprocessor.prepare(&bytes).unwrap();
        let second = preprocessor.prepare(&bytes).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn undecodable_bytes_fail_as_decode_error() {
        let preprocessor = PreProcessor::default();
        let result = preprocessor.prepare(b"definitely not an image");
        assert!(matches!(result, Err(ClassifyError::Decode(_))));
    }
}
