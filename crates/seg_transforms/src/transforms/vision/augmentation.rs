use crate::transforms::core::PairedTransform;
use crate::transforms::vision::RasterPair;
use anyhow::{ensure, Result};
use image::imageops::FilterType;
use image::GenericImageView;
use rand::Rng;

// ============================================================================
// RandomHorizontalFlip
// ============================================================================

/// Randomly flips an image and its label mask left-right with probability `p`.
///
/// Image and label always receive the identical flip decision, so spatial
/// correspondence is preserved. Construction fails if `p` is outside
/// [0.0, 1.0].
///
/// # Example
/// ```ignore
/// let flip = RandomHorizontalFlip::new(0.5)?; // 50% flip chance
/// let (image, label) = flip.apply(&mut rng, (image, label))?;
/// ```
#[derive(Debug)]
pub struct RandomHorizontalFlip {
    p: f64,
}

impl RandomHorizontalFlip {
    pub fn new(p: f64) -> Result<Self> {
        ensure!(
            (0.0..=1.0).contains(&p),
            "Probability must be in [0.0, 1.0] range (got {})",
            p
        );
        Ok(Self { p })
    }
}

impl PairedTransform<RasterPair, RasterPair> for RandomHorizontalFlip {
    type Params = bool;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.random_bool(self.p)
    }

    fn apply_with(&self, &flip: &bool, (image, label): RasterPair) -> Result<RasterPair> {
        Ok(if flip {
            (image.fliph(), label.fliph())
        } else {
            (image, label)
        })
    }
}

// ============================================================================
// RandomVerticalFlip
// ============================================================================

/// Randomly flips an image and its label mask top-bottom with probability `p`.
///
/// Construction fails if `p` is outside [0.0, 1.0].
#[derive(Debug)]
pub struct RandomVerticalFlip {
    p: f64,
}

impl RandomVerticalFlip {
    pub fn new(p: f64) -> Result<Self> {
        ensure!(
            (0.0..=1.0).contains(&p),
            "Probability must be in [0.0, 1.0] range (got {})",
            p
        );
        Ok(Self { p })
    }
}

impl PairedTransform<RasterPair, RasterPair> for RandomVerticalFlip {
    type Params = bool;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.random_bool(self.p)
    }

    fn apply_with(&self, &flip: &bool, (image, label): RasterPair) -> Result<RasterPair> {
        Ok(if flip {
            (image.flipv(), label.flipv())
        } else {
            (image, label)
        })
    }
}

// ============================================================================
// RandomRotation
// ============================================================================

/// A quarter-turn rotation angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quarter {
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Quarter {
    pub const ALL: [Quarter; 4] = [
        Quarter::Deg0,
        Quarter::Deg90,
        Quarter::Deg180,
        Quarter::Deg270,
    ];
}

/// Rotates image and label by one uniformly drawn quarter turn.
///
/// The angle is the sampled parameter: one draw per invocation, and reusing a
/// sampled [`Quarter`] across several `apply_with` calls rotates every pair by
/// the identical angle. Quarter turns are lossless, so no interpolation policy
/// is needed for the label mask.
///
/// # Example
/// ```ignore
/// let rotate = RandomRotation;
/// let angle = rotate.sample(&mut rng);
/// let (image, label) = rotate.apply_with(&angle, (image, label))?;
/// ```
#[derive(Debug)]
pub struct RandomRotation;

impl PairedTransform<RasterPair, RasterPair> for RandomRotation {
    type Params = Quarter;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Quarter {
        Quarter::ALL[rng.random_range(0..Quarter::ALL.len())]
    }

    fn apply_with(&self, angle: &Quarter, (image, label): RasterPair) -> Result<RasterPair> {
        Ok(match angle {
            Quarter::Deg0 => (image, label),
            Quarter::Deg90 => (image.rotate90(), label.rotate90()),
            Quarter::Deg180 => (image.rotate180(), label.rotate180()),
            Quarter::Deg270 => (image.rotate270(), label.rotate270()),
        })
    }
}

// ============================================================================
// RandomCropResize
// ============================================================================

/// Crops a random margin from image and label, then resizes both back to the
/// original size.
///
/// Offsets `x` and `y` are drawn independently and uniformly from
/// `[0, margin]`, and the region `(x, y)..(width - x, height - y)` is cropped
/// from both image and label before resizing back to `width x height`. The
/// image is resampled bilinearly; the label uses nearest-neighbor so that
/// discrete class indices are never interpolated into new values.
///
/// Image and label must have identical spatial size. Offsets that leave no
/// pixels (possible once `margin` reaches half the image dimension) are
/// rejected with an error rather than silently clamped.
#[derive(Debug)]
pub struct RandomCropResize {
    margin: u32,
}

impl RandomCropResize {
    /// `margin` bounds the per-side crop offset in pixels; it is not an
    /// absolute crop size.
    pub fn new(margin: u32) -> Self {
        Self { margin }
    }
}

impl PairedTransform<RasterPair, RasterPair> for RandomCropResize {
    type Params = (u32, u32);

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> (u32, u32) {
        (
            rng.random_range(0..=self.margin),
            rng.random_range(0..=self.margin),
        )
    }

    fn apply_with(&self, &(x, y): &(u32, u32), (image, label): RasterPair) -> Result<RasterPair> {
        ensure!(
            image.dimensions() == label.dimensions(),
            "Image and label must have the same size (got {:?} and {:?})",
            image.dimensions(),
            label.dimensions()
        );

        let (width, height) = image.dimensions();
        ensure!(
            x.saturating_mul(2) < width && y.saturating_mul(2) < height,
            "Crop offsets ({}, {}) leave no pixels in a {}x{} image; lower the crop margin",
            x,
            y,
            width,
            height
        );

        let (crop_width, crop_height) = (width - 2 * x, height - 2 * y);
        let image = image.crop_imm(x, y, crop_width, crop_height);
        let label = label.crop_imm(x, y, crop_width, crop_height);
        Ok((
            image.resize_exact(width, height, FilterType::Triangle),
            label.resize_exact(width, height, FilterType::Nearest),
        ))
    }
}
