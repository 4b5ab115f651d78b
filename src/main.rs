//! TextGrab - extract text from images with Tesseract OCR
//!
//! Loads an image, optionally cleans it up (grayscale, blur, Otsu
//! binarization) and hands it to the Tesseract engine. Runs as a one-shot
//! CLI or as a small desktop window.

mod config;
mod dashboard;
mod samples;
#[cfg(test)]
mod text;
mod vision;

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::vision::{RecognitionOptions, TesseractEngine, TextExtractor};

/// Separator printed around the extracted text
const RULE: &str = "--------------------------------------------------";

/// TextGrab - OCR for image files
#[derive(Parser, Debug)]
#[command(name = "textgrab", version)]
#[command(about = "Extract text from an image with Tesseract OCR")]
struct Args {
    /// Image file to read
    image: Option<PathBuf>,

    /// Language code passed to Tesseract (e.g. eng, deu, fra)
    #[arg(short, long)]
    lang: Option<String>,

    /// Skip grayscale/blur/threshold pre-processing
    #[arg(long)]
    raw: bool,

    /// Path to the tesseract executable
    #[arg(long, value_name = "PATH")]
    tesseract: Option<PathBuf>,

    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Open the desktop window
    #[arg(long)]
    gui: bool,

    /// Write sample_clean.png and sample_noisy.png into DIR and exit
    #[arg(long, value_name = "DIR")]
    generate_samples: Option<PathBuf>,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    save_config: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr so stdout only carries extracted text
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<()> {
    let mut config = load_configuration(args.config.as_ref(), args.save_config)?;
    if let Some(path) = &args.tesseract {
        config.engine.tesseract_path = path.clone();
    }

    if args.save_config {
        let path = match &args.config {
            Some(path) => path.clone(),
            None => config::default_config_path()?,
        };
        write_configuration(&config, &path)?;
        println!("{}", path.display());
        return Ok(());
    }

    if let Some(dir) = &args.generate_samples {
        let paths = samples::write_samples(dir, &config.samples)?;
        println!("{}", paths.clean.display());
        println!("{}", paths.noisy.display());
        return Ok(());
    }

    let engine = TesseractEngine::from_config(&config.engine);
    debug!("Using tesseract at {:?}", engine.executable());

    if args.gui {
        info!("Starting dashboard");
        return dashboard::run_dashboard(config, engine)
            .map_err(|e| anyhow!("Dashboard failed: {}", e));
    }

    let Some(image) = args.image.as_ref() else {
        eprintln!("{}", Args::command().render_usage());
        return Err(anyhow!("no image path given"));
    };

    let options = recognition_options(&args, &config);
    let extractor = TextExtractor::new(engine);
    let text = extractor.extract_from_path(image, &options)?;

    println!("{}", format_output(&text));
    Ok(())
}

/// Explicit file if given, otherwise the default location or built-in defaults.
/// An explicit file may be missing only when it is about to be written.
fn load_configuration(path: Option<&PathBuf>, creating: bool) -> Result<AppConfig> {
    match path {
        Some(path) if creating => config::load_or_default(path),
        Some(path) => config::load_config(path),
        None => match config::default_config_path() {
            Ok(path) => config::load_or_default(&path),
            Err(e) => {
                debug!("{}; using defaults", e);
                Ok(AppConfig::default())
            }
        },
    }
}

/// Save `config` to `path`, creating the parent directory
fn write_configuration(config: &AppConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {:?}", parent))?;
    }
    config::save_config(config, path)?;
    info!("Saved configuration to {:?}", path);
    Ok(())
}

/// Command line flags take precedence over the config file
fn recognition_options(args: &Args, config: &AppConfig) -> RecognitionOptions {
    let language = args
        .lang
        .clone()
        .unwrap_or_else(|| config.engine.default_language.clone());
    let preprocess = !args.raw && config.preprocessing.enabled;
    RecognitionOptions::new(language, preprocess)
}

/// Extracted text between two rules, preceded by a blank line
fn format_output(text: &str) -> String {
    format!("\nExtracted Text:\n{RULE}\n{text}\n{RULE}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["textgrab", "scan.png"]).unwrap();
        assert_eq!(args.image, Some(PathBuf::from("scan.png")));
        assert!(args.lang.is_none());
        assert!(!args.raw && !args.gui && !args.verbose);
    }

    #[test]
    fn test_args_flags() {
        let args = Args::try_parse_from([
            "textgrab",
            "-l",
            "deu",
            "--raw",
            "--tesseract",
            "/opt/tesseract/bin/tesseract",
            "page.jpg",
        ])
        .unwrap();

        assert_eq!(args.lang.as_deref(), Some("deu"));
        assert!(args.raw);
        assert_eq!(args.tesseract, Some(PathBuf::from("/opt/tesseract/bin/tesseract")));
    }

    #[test]
    fn test_recognition_options_precedence() {
        let mut config = AppConfig::default();
        config.engine.default_language = "fra".to_string();

        let args = Args::try_parse_from(["textgrab", "a.png"]).unwrap();
        assert_eq!(recognition_options(&args, &config), RecognitionOptions::new("fra", true));

        let args = Args::try_parse_from(["textgrab", "--lang", "spa", "--raw", "a.png"]).unwrap();
        assert_eq!(recognition_options(&args, &config), RecognitionOptions::new("spa", false));

        config.preprocessing.enabled = false;
        let args = Args::try_parse_from(["textgrab", "a.png"]).unwrap();
        assert!(!recognition_options(&args, &config).preprocess);
    }

    #[test]
    fn test_format_output() {
        let out = format_output("Hello World!\n\n");
        let lines: Vec<&str> = out.split('\n').collect();

        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "Extracted Text:");
        assert_eq!(lines[2].len(), 50);
        assert!(lines[2].chars().all(|c| c == '-'));
        assert_eq!(lines[3], "Hello World!");
        assert_eq!(*lines.last().unwrap(), RULE);
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let path = PathBuf::from("/nonexistent/textgrab.toml");
        assert!(load_configuration(Some(&path), false).is_err());
        assert!(load_configuration(Some(&path), true).is_ok());
    }

    #[test]
    fn test_run_without_image_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.toml");
        config::save_config(&AppConfig::default(), &config).unwrap();

        let args = Args::try_parse_from(["textgrab", "-c", config.to_str().unwrap()]).unwrap();
        assert!(run(args).is_err());
    }

    #[test]
    fn test_save_config_writes_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let args = Args::try_parse_from([
            "textgrab",
            "--save-config",
            "--tesseract",
            "/opt/tesseract",
            "-c",
            path.to_str().unwrap(),
        ])
        .unwrap();
        run(args).unwrap();

        let saved = config::load_config(&path).unwrap();
        assert_eq!(saved.engine.tesseract_path, PathBuf::from("/opt/tesseract"));
        assert_eq!(saved.engine.default_language, "eng");

        // A second save starts from the file just written
        let args = Args::try_parse_from(["textgrab", "--save-config", "-c", path.to_str().unwrap()]).unwrap();
        run(args).unwrap();
        let saved = config::load_config(&path).unwrap();
        assert_eq!(saved.engine.tesseract_path, PathBuf::from("/opt/tesseract"));
    }

    #[test]
    fn test_run_reports_missing_image() {
        let args = Args::try_parse_from(["textgrab", "/nonexistent/scan.png"]).unwrap();
        let err = run(args).unwrap_err();
        assert!(format!("{:#}", err).contains("not found"));
    }
}
