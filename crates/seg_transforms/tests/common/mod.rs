//! Shared constructors for integration tests.
#![allow(dead_code)]

use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};

/// An RGB gradient so that any spatial rearrangement is visible in the bytes.
pub fn gradient_image(width: u32, height: u32) -> DynamicImage {
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

/// A binary {0, 255} mask with the right half set, mimicking a foreground
/// segmentation label.
pub fn binary_mask(width: u32, height: u32) -> DynamicImage {
    let mut mask = GrayImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let value = if x >= width / 2 { 255 } else { 0 };
            mask.put_pixel(x, y, Luma([value]));
        }
    }
    DynamicImage::ImageLuma8(mask)
}

/// A clip of `frames` identical image/label pairs. Identical frames make
/// shared-draw checks straightforward: if every frame of a clip receives the
/// same random decision, every output frame must be identical too.
pub fn constant_clip(
    frames: usize,
    width: u32,
    height: u32,
) -> (Vec<DynamicImage>, Vec<DynamicImage>) {
    let images = (0..frames).map(|_| gradient_image(width, height)).collect();
    let labels = (0..frames).map(|_| binary_mask(width, height)).collect();
    (images, labels)
}
