use crate::transforms::core::PairedTransform;
use crate::transforms::vision::TensorPair;
use anyhow::{ensure, Result};
use ndarray::Axis;
use rand::Rng;

// ============================================================================
// Normalize
// ============================================================================

/// Normalizes the image tensor using channel-wise statistics; the label mask
/// passes through untouched.
///
/// For each channel `c` of a `[3, H, W]` image tensor:
/// ```text
/// output[c, h, w] = (input[c, h, w] - mean[c]) / std[c]
/// ```
///
/// Runs after [`ToTensor`](crate::transforms::vision::ToTensor). The input
/// pair is consumed and a new pair returned; nothing visible to the caller is
/// mutated. Construction fails if any `std` component is zero.
///
/// # Example
/// ```ignore
/// let norm = Normalize::imagenet();
/// let (image, label) = norm.apply(&mut rng, (image, label))?;
/// ```
#[derive(Debug)]
pub struct Normalize {
    mean: [f32; 3],
    std: [f32; 3],
}

impl Normalize {
    /// Creates new normalization parameters.
    pub fn new(mean: [f32; 3], std: [f32; 3]) -> Result<Self> {
        ensure!(
            std.iter().all(|&s| s != 0.0),
            "Normalization std must be non-zero in every channel (got {:?})",
            std
        );
        Ok(Self { mean, std })
    }

    /// ImageNet standard normalization (RGB).
    pub fn imagenet() -> Self {
        Self {
            mean: [0.485, 0.456, 0.406],
            std: [0.229, 0.224, 0.225],
        }
    }
}

impl PairedTransform<TensorPair, TensorPair> for Normalize {
    type Params = ();

    fn sample<R: Rng + ?Sized>(&self, _rng: &mut R) -> Self::Params {}

    fn apply_with(&self, _params: &(), (image, label): TensorPair) -> Result<TensorPair> {
        let channels = image.dim().0;
        ensure!(
            channels == 3,
            "Channel count mismatch: input has {} channels but normalization expects 3",
            channels
        );

        let mut image = image;
        for (c, mut channel) in image.axis_iter_mut(Axis(0)).enumerate() {
            let (mean, std) = (self.mean[c], self.std[c]);
            channel.mapv_inplace(|v| (v - mean) / std);
        }
        Ok((image, label))
    }
}
