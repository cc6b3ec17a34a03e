use crate::transforms::core::PairedTransform;
use crate::transforms::vision::{RasterPair, TensorPair};
use anyhow::{ensure, Context, Result};
use image::{DynamicImage, GenericImageView};
use ndarray::{Array2, Array3};
use rand::Rng;

// ============================================================================
// ToTensor
// ============================================================================

/// Converts a raster pair into numeric arrays ready for model consumption.
///
/// The image becomes a channel-first `[3, H, W]` f32 array scaled to
/// `[0.0, 1.0]` (non-RGB inputs are converted to RGB first). The label
/// becomes an `[H, W]` i64 array holding the raw 8-bit mask values as integer
/// class indices; label values are never rescaled.
///
/// # Example
/// ```ignore
/// let converter = ToTensor;
/// let (image, label) = converter.apply(&mut rng, (image, label))?;
/// ```
#[derive(Debug)]
pub struct ToTensor;

impl ToTensor {
    fn image_to_chw(image: &DynamicImage) -> Result<Array3<f32>> {
        let (width, height) = image.dimensions();
        ensure!(
            width > 0 && height > 0,
            "Image dimensions must be positive (got {}x{})",
            width,
            height
        );

        let rgb = image.to_rgb8();
        let data: Vec<f32> = rgb
            .into_raw()
            .into_iter()
            .map(|v| f32::from(v) / 255.0)
            .collect();
        let hwc = Array3::from_shape_vec((height as usize, width as usize, 3), data)
            .context("Pixel buffer does not match image dimensions")?;
        Ok(hwc.permuted_axes([2, 0, 1]).as_standard_layout().to_owned())
    }

    fn label_to_indices(label: &DynamicImage) -> Result<Array2<i64>> {
        let (width, height) = label.dimensions();
        ensure!(
            width > 0 && height > 0,
            "Label dimensions must be positive (got {}x{})",
            width,
            height
        );

        let luma = label.to_luma8();
        let data: Vec<i64> = luma.into_raw().into_iter().map(i64::from).collect();
        Array2::from_shape_vec((height as usize, width as usize), data)
            .context("Label buffer does not match image dimensions")
    }
}

impl PairedTransform<RasterPair, TensorPair> for ToTensor {
    type Params = ();

    fn sample<R: Rng + ?Sized>(&self, _rng: &mut R) -> Self::Params {}

    fn apply_with(&self, _params: &(), (image, label): RasterPair) -> Result<TensorPair> {
        Ok((
            Self::image_to_chw(&image)?,
            Self::label_to_indices(&label)?,
        ))
    }
}
