pub mod core;
pub mod vision;

pub use self::core::{Chain, ClipTransform, Compose, PairedTransform};
