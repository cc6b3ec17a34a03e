use crate::transforms::core::PairedTransform;
use crate::transforms::vision::RasterPair;
use anyhow::{ensure, Result};
use image::imageops::FilterType;
use rand::Rng;

// ============================================================================
// Resize
// ============================================================================

/// Resizes image and label to an exact target size, ignoring aspect ratio.
///
/// The image is resampled bilinearly; the label uses nearest-neighbor so that
/// discrete class indices survive the resampling unchanged. Image and label
/// are resized independently and may differ in size on input.
///
/// # Example
/// ```ignore
/// let resize = Resize::new(256, 256)?;
/// let (image, label) = resize.apply(&mut rng, (image, label))?;
/// ```
#[derive(Debug)]
pub struct Resize {
    height: u32,
    width: u32,
}

impl Resize {
    /// Creates a new Resize transform targeting `height` x `width`.
    pub fn new(height: u32, width: u32) -> Result<Self> {
        ensure!(
            height > 0 && width > 0,
            "Image dimensions must be positive after resizing (got {}x{})",
            width,
            height
        );
        Ok(Self { height, width })
    }
}

impl PairedTransform<RasterPair, RasterPair> for Resize {
    type Params = ();

    fn sample<R: Rng + ?Sized>(&self, _rng: &mut R) -> Self::Params {}

    fn apply_with(&self, _params: &(), (image, label): RasterPair) -> Result<RasterPair> {
        Ok((
            image.resize_exact(self.width, self.height, FilterType::Triangle),
            label.resize_exact(self.width, self.height, FilterType::Nearest),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, GenericImageView, Luma, Rgb, RgbImage};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_gradient_image(width: u32, height: u32) -> DynamicImage {
        let mut img = RgbImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let r = (x * 255 / width) as u8;
                let g = (y * 255 / height) as u8;
                let b = 128;
                img.put_pixel(x, y, Rgb([r, g, b]));
            }
        }
        DynamicImage::ImageRgb8(img)
    }

    fn binary_mask(width: u32, height: u32) -> DynamicImage {
        let mut mask = image::GrayImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let value = if (x + y) % 2 == 0 { 0 } else { 255 };
                mask.put_pixel(x, y, Luma([value]));
            }
        }
        DynamicImage::ImageLuma8(mask)
    }

    #[test]
    fn test_resize_both_to_target() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(42);
        let resize = Resize::new(50, 50)?;

        let (image, label) =
            resize.apply(&mut rng, (test_gradient_image(100, 100), binary_mask(100, 100)))?;
        assert_eq!(image.dimensions(), (50, 50));
        assert_eq!(label.dimensions(), (50, 50));

        // Nearest-neighbor must only ever pick existing mask values.
        assert!(label.to_luma8().pixels().all(|p| p[0] == 0 || p[0] == 255));
        Ok(())
    }

    #[test]
    fn test_resize_round_trip_restores_shape() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(42);
        let down = Resize::new(50, 50)?;
        let up = Resize::new(100, 100)?;

        let pair = down.apply(&mut rng, (test_gradient_image(100, 100), binary_mask(100, 100)))?;
        let (image, label) = up.apply(&mut rng, pair)?;
        assert_eq!(image.dimensions(), (100, 100));
        assert_eq!(label.dimensions(), (100, 100));
        Ok(())
    }

    #[test]
    fn test_resize_ignores_aspect_ratio() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(42);
        let resize = Resize::new(30, 70)?;

        let (image, label) =
            resize.apply(&mut rng, (test_gradient_image(100, 100), binary_mask(100, 100)))?;
        assert_eq!(image.dimensions(), (70, 30));
        assert_eq!(label.dimensions(), (70, 30));
        Ok(())
    }

    #[test]
    fn test_zero_target_is_rejected() {
        assert!(Resize::new(0, 50).is_err());
        assert!(Resize::new(50, 0).is_err());
    }
}
