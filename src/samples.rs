//! Synthetic test images
//!
//! Renders a known block of text onto a white page and produces a degraded
//! copy (Gaussian noise plus a mild blur) for checking OCR robustness.

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use anyhow::{anyhow, Context, Result};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use imageproc::filter::gaussian_blur_f32;
use imageproc::noise::gaussian_noise;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::SampleConfig;

/// Text rendered into the generated sample image
pub const DEFAULT_SAMPLE_TEXT: &str = "Hello World!
This is an OCR test image.
English characters: abcdefghijklmnopqrstuvwxyz
Numbers: 0123456789
Special characters: !@#$%^&*()_+-=";

/// Fonts tried when no font path is configured
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Top-left corner of the first text line
const TEXT_ORIGIN: (i32, i32) = (50, 50);

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Paths of the images written by [`write_samples`]
#[derive(Debug, Clone)]
pub struct SamplePaths {
    pub clean: PathBuf,
    pub noisy: PathBuf,
}

/// Load a font file
pub fn load_font_file(path: &Path) -> Result<FontVec> {
    let data = std::fs::read(path).with_context(|| format!("Failed to read font {:?}", path))?;
    FontVec::try_from_vec(data).map_err(|_| anyhow!("Failed to parse font file: {}", path.display()))
}

/// Load the configured font, or the first common system font that parses
pub fn load_font(config: &SampleConfig) -> Result<FontVec> {
    if let Some(path) = &config.font_path {
        return load_font_file(path);
    }

    for path in SYSTEM_FONTS {
        if let Ok(font) = load_font_file(Path::new(path)) {
            debug!("Using system font {}", path);
            return Ok(font);
        }
    }

    Err(anyhow!(
        "No usable font found; set samples.font_path in the config file"
    ))
}

/// Render `text` in black on a white canvas, one line per `\n`
pub fn render_text(text: &str, font: &FontVec, size: f32, width: u32, height: u32) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(width, height, WHITE);
    let scale = PxScale::from(size);
    let scaled = font.as_scaled(scale);
    let line_height = (scaled.height() + scaled.line_gap()).ceil() as i32;

    let (x, mut y) = TEXT_ORIGIN;
    for line in text.lines() {
        draw_text_mut(&mut canvas, BLACK, x, y, scale, font, line);
        y += line_height;
    }

    canvas
}

/// Add zero-mean Gaussian noise, then soften with a small blur
pub fn degrade(image: &RgbImage, noise_sigma: f64, blur_sigma: f32, seed: u64) -> RgbImage {
    let noisy = gaussian_noise(image, 0.0, noise_sigma, seed);
    if blur_sigma > 0.0 {
        gaussian_blur_f32(&noisy, blur_sigma)
    } else {
        noisy
    }
}

/// Write a clean and a degraded sample image into `dir`
pub fn write_samples(dir: &Path, config: &SampleConfig) -> Result<SamplePaths> {
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;

    let font = load_font(config)?;
    let clean = render_text(DEFAULT_SAMPLE_TEXT, &font, config.font_size, config.width, config.height);
    let noisy = degrade(&clean, config.noise_sigma, config.blur_sigma, config.seed);

    let paths = SamplePaths {
        clean: dir.join("sample_clean.png"),
        noisy: dir.join("sample_noisy.png"),
    };

    clean
        .save(&paths.clean)
        .with_context(|| format!("Failed to write {:?}", paths.clean))?;
    noisy
        .save(&paths.noisy)
        .with_context(|| format!("Failed to write {:?}", paths.noisy))?;

    info!("Wrote sample images {:?} and {:?}", paths.clean, paths.noisy);
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{normalize_whitespace, similarity};
    use crate::vision::{
        OcrEngine, RecognitionOptions, RecognitionRequest, TesseractEngine, TextExtractor,
    };
    use image::DynamicImage;

    fn dark_pixels(image: &RgbImage) -> usize {
        image.pixels().filter(|p| p.0[0] < 128).count()
    }

    #[test]
    fn test_missing_font_path() {
        let config = SampleConfig {
            font_path: Some(PathBuf::from("/nonexistent/font.ttf")),
            ..Default::default()
        };
        assert!(load_font(&config).is_err());
    }

    #[test]
    fn test_invalid_font_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ttf");
        std::fs::write(&path, b"not a font").unwrap();

        let err = load_font_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse font"));
    }

    #[test]
    fn test_degrade_is_seeded() {
        let clean = RgbImage::from_pixel(40, 20, Rgb([128, 128, 128]));
        let a = degrade(&clean, 20.0, 0.8, 7);
        let b = degrade(&clean, 20.0, 0.8, 7);
        let c = degrade(&clean, 20.0, 0.8, 8);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, clean);
    }

    #[test]
    fn test_degrade_noise_is_zero_mean() {
        let clean = RgbImage::from_pixel(64, 64, Rgb([128, 128, 128]));
        let noisy = degrade(&clean, 20.0, 0.0, 3);

        let total: f64 = noisy.pixels().map(|p| p.0[0] as f64).sum();
        let mean = total / (64.0 * 64.0);
        assert!((mean - 128.0).abs() < 3.0, "mean drifted to {}", mean);
    }

    #[test]
    #[ignore = "requires a system font"]
    fn test_render_text_draws_ink() {
        let font = load_font(&SampleConfig::default()).expect("system font");

        let blank = render_text("", &font, 32.0, 200, 100);
        assert_eq!(dark_pixels(&blank), 0);

        let one = render_text("Hello", &font, 32.0, 400, 200);
        let two = render_text("Hello\nHello", &font, 32.0, 400, 200);
        assert!(dark_pixels(&one) > 0);
        assert!(dark_pixels(&two) > dark_pixels(&one));
    }

    #[test]
    #[ignore = "requires a system font"]
    fn test_write_samples() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_samples(&dir.path().join("out"), &SampleConfig::default()).unwrap();

        let clean = image::open(&paths.clean).unwrap();
        let noisy = image::open(&paths.noisy).unwrap();
        assert_eq!((clean.width(), clean.height()), (800, 400));
        assert_eq!((noisy.width(), noisy.height()), (800, 400));
    }

    fn tesseract_extractor() -> TextExtractor<TesseractEngine> {
        TextExtractor::new(TesseractEngine::new("tesseract"))
    }

    fn hello_world_image() -> DynamicImage {
        let font = load_font(&SampleConfig::default()).expect("system font");
        DynamicImage::ImageRgb8(render_text("Hello World!", &font, 48.0, 800, 200))
    }

    #[test]
    #[ignore = "requires tesseract with eng data and a system font"]
    fn test_tesseract_reads_hello_world() {
        let image = hello_world_image();
        let options = RecognitionOptions::new("eng", true);

        let text = tesseract_extractor()
            .extract(&RecognitionRequest::new(&image, &options))
            .unwrap();
        assert_eq!(normalize_whitespace(&text), "Hello World!");
    }

    #[test]
    #[ignore = "requires tesseract with eng data and a system font"]
    fn test_tesseract_is_deterministic() {
        let image = hello_world_image();
        let options = RecognitionOptions::new("eng", true);
        let extractor = tesseract_extractor();
        let request = RecognitionRequest::new(&image, &options);

        assert_eq!(extractor.extract(&request).unwrap(), extractor.extract(&request).unwrap());
    }

    #[test]
    #[ignore = "requires tesseract with eng data and a system font"]
    fn test_tesseract_survives_noise() {
        let config = SampleConfig::default();
        let font = load_font(&config).expect("system font");
        let clean = render_text(DEFAULT_SAMPLE_TEXT, &font, config.font_size, config.width, config.height);
        let noisy = DynamicImage::ImageRgb8(degrade(&clean, 20.0, 0.8, 42));
        let options = RecognitionOptions::new("eng", true);

        let text = tesseract_extractor()
            .extract(&RecognitionRequest::new(&noisy, &options))
            .unwrap();
        let score = similarity(DEFAULT_SAMPLE_TEXT, &text);
        assert!(score > 0.5, "similarity {} for {:?}", score, text);
    }

    #[test]
    #[ignore = "requires tesseract"]
    fn test_tesseract_rejects_unknown_language() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 32, WHITE));
        let err = TesseractEngine::new("tesseract").recognize(&image, "zzz").unwrap_err();
        assert!(err.is_extraction());
    }
}
