//! Image preprocessing filters for OCR
//!
//! A fixed three-step cleanup applied before text recognition:
//! grayscale conversion, a 5x5 Gaussian smoothing pass, and Otsu
//! binarization. The steps always run in that order and are not
//! individually configurable.

use image::{DynamicImage, GrayImage, Luma};
use imageproc::contrast::otsu_level;
use tracing::debug;

/// Side length of the smoothing kernel
pub const BLUR_KERNEL_SIZE: usize = 5;

/// Result of preprocessing together with the threshold that was selected
pub struct PreprocessResult {
    /// Binary single-channel image (samples are 0 or 255)
    pub image: GrayImage,
    /// Otsu threshold chosen for the smoothed image
    pub threshold: u8,
}

/// Run the full preprocessing chain and return the binary image
pub fn preprocess(image: &DynamicImage) -> GrayImage {
    preprocess_with_threshold(image).image
}

/// Run the full preprocessing chain, keeping the selected threshold
pub fn preprocess_with_threshold(image: &DynamicImage) -> PreprocessResult {
    let gray = to_grayscale(image);
    if gray.width() == 0 || gray.height() == 0 {
        return PreprocessResult {
            image: gray,
            threshold: 0,
        };
    }

    let smoothed = gaussian_blur_5x5(&gray);
    let threshold = otsu_level(&smoothed);
    let binary = apply_binary_threshold(&smoothed, threshold);

    debug!(
        "Preprocessed {}x{} image, otsu threshold = {}",
        binary.width(),
        binary.height(),
        threshold
    );

    PreprocessResult {
        image: binary,
        threshold,
    }
}

/// Reduce to one channel with the standard luminance weights.
/// Alpha is dropped; single-channel 8-bit input is passed through.
pub fn to_grayscale(image: &DynamicImage) -> GrayImage {
    if let DynamicImage::ImageLuma8(gray) = image {
        return gray.clone();
    }

    let rgb = image.to_rgb8();
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        Luma([luminance(r, g, b)])
    })
}

fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let gray = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
    gray.round().clamp(0.0, 255.0) as u8
}

/// Sigma derived from kernel size, as used when no explicit sigma is given
pub fn sigma_for_kernel(size: usize) -> f32 {
    0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalized 1-D Gaussian kernel of the given odd size
fn gaussian_kernel(size: usize) -> Vec<f32> {
    let sigma = sigma_for_kernel(size);
    let center = (size / 2) as f32;
    let mut kernel: Vec<f32> = (0..size)
        .map(|i| {
            let d = i as f32 - center;
            (-(d * d) / (2.0 * sigma * sigma)).exp()
        })
        .collect();

    let sum: f32 = kernel.iter().sum();
    for k in &mut kernel {
        *k /= sum;
    }
    kernel
}

/// Mirror an out-of-range index back into `0..len` without repeating the edge
fn reflect_101(index: isize, len: usize) -> usize {
    let len = len as isize;
    if len == 1 {
        return 0;
    }

    let mut i = index;
    while i < 0 || i >= len {
        if i < 0 {
            i = -i;
        }
        if i >= len {
            i = 2 * len - 2 - i;
        }
    }
    i as usize
}

/// Smooth with a separable 5x5 Gaussian kernel
pub fn gaussian_blur_5x5(image: &GrayImage) -> GrayImage {
    let kernel = gaussian_kernel(BLUR_KERNEL_SIZE);
    let radius = (BLUR_KERNEL_SIZE / 2) as isize;
    let w = image.width() as usize;
    let h = image.height() as usize;
    let src = image.as_raw();

    // Horizontal pass into f32 to avoid double rounding
    let mut horizontal = vec![0f32; w * h];
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0;
            for (k, weight) in kernel.iter().enumerate() {
                let sx = reflect_101(x as isize + k as isize - radius, w);
                acc += src[y * w + sx] as f32 * weight;
            }
            horizontal[y * w + x] = acc;
        }
    }

    // Vertical pass
    let mut result = GrayImage::new(image.width(), image.height());
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0;
            for (k, weight) in kernel.iter().enumerate() {
                let sy = reflect_101(y as isize + k as isize - radius, h);
                acc += horizontal[sy * w + x] * weight;
            }
            result.put_pixel(x as u32, y as u32, Luma([acc.round().clamp(0.0, 255.0) as u8]));
        }
    }

    result
}

/// Two-level threshold: samples above `threshold` become 255, the rest 0
pub fn apply_binary_threshold(image: &GrayImage, threshold: u8) -> GrayImage {
    let mut result = image.clone();
    for pixel in result.pixels_mut() {
        pixel.0[0] = if pixel.0[0] > threshold { 255 } else { 0 };
    }
    result
}
