//! Vision transforms for paired image/label preprocessing and augmentation.
//!
//! # Module Organization
//!
//! ```text
//! transforms/vision/
//! ├── augmentation.rs  → Random paired augmentations (flip, rotate, crop-resize)
//! ├── geometric.rs     → Deterministic spatial transformations (resize)
//! ├── photometric.rs   → Channel statistics (normalize)
//! └── conversion.rs    → Format conversions (raster pair → tensor pair)
//! ```
//!
//! # Quick Start
//!
//! All transforms are re-exported at the module level for convenient access:
//!
//! ```ignore
//! use seg_transforms::transforms::vision::{RandomHorizontalFlip, Resize, ToTensor, Normalize};
//! use seg_transforms::transforms::{Compose, PairedTransform};
//!
//! // A typical segmentation training pipeline
//! let pipeline = Compose::new()
//!     .with(RandomHorizontalFlip::new(0.5)?)
//!     .with(RandomCropResize::new(10))
//!     .then(Resize::new(256, 256)?)
//!     .then(ToTensor)
//!     .then(Normalize::imagenet());
//! ```

pub mod augmentation;
pub mod conversion;
pub mod geometric;
pub mod photometric;

pub use augmentation::{
    Quarter, RandomCropResize, RandomHorizontalFlip, RandomRotation, RandomVerticalFlip,
};
pub use conversion::ToTensor;
pub use geometric::Resize;
pub use photometric::Normalize;

use image::DynamicImage;
use ndarray::{Array2, Array3};

/// A decoded image and its label mask, prior to tensor conversion.
pub type RasterPair = (DynamicImage, DynamicImage);

/// Post-conversion pair: channel-first `[3, H, W]` image in `[0, 1]` and an
/// `[H, W]` mask of integer class indices.
pub type TensorPair = (Array3<f32>, Array2<i64>);
