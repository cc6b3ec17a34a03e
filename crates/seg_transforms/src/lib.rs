//! Paired image/label augmentation transforms for segmentation and
//! video-segmentation training.
//!
//! Every transform consumes an `(image, label)` pair and applies the identical
//! spatial operation to both halves, so the label mask stays aligned with the
//! image. Random decisions are drawn as explicit parameter values
//! ([`PairedTransform::sample`]) and applied deterministically
//! ([`PairedTransform::apply_with`]); for video clips,
//! [`ClipTransform::apply_clip`] draws once and applies the same decision to
//! every frame.
//!
//! ```ignore
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use seg_transforms::{Compose, PairedTransform};
//! use seg_transforms::transforms::vision::*;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let pipeline = Compose::new()
//!     .with(RandomHorizontalFlip::new(0.5)?)
//!     .with(RandomVerticalFlip::new(0.5)?)
//!     .with(RandomCropResize::new(10))
//!     .then(Resize::new(256, 256)?)
//!     .then(ToTensor)
//!     .then(Normalize::imagenet());
//!
//! let (image_tensor, label_tensor) = pipeline.apply(&mut rng, (image, label))?;
//! ```

pub mod transforms;

pub use transforms::vision::{
    Normalize, Quarter, RandomCropResize, RandomHorizontalFlip, RandomRotation,
    RandomVerticalFlip, RasterPair, Resize, TensorPair, ToTensor,
};
pub use transforms::{Chain, ClipTransform, Compose, PairedTransform};
