//! Background extraction
//!
//! Recognition blocks for as long as the engine runs, so the dashboard hands
//! it to a worker thread and picks the result up from a channel.

use crossbeam_channel::{bounded, Receiver};
use image::DynamicImage;
use std::sync::Arc;
use tracing::{debug, error};

use crate::vision::{OcrEngine, OcrError, RecognitionOptions, TextExtractor};

/// Result posted back by the worker
#[derive(Debug)]
pub struct JobOutcome {
    /// Buffer handed to the engine, when pre-processing was applied
    pub prepared: Option<DynamicImage>,
    pub result: Result<String, OcrError>,
}

/// Run one extraction on a worker thread
pub fn spawn_recognition<E>(
    extractor: Arc<TextExtractor<E>>,
    image: DynamicImage,
    options: RecognitionOptions,
) -> Receiver<JobOutcome>
where
    E: OcrEngine + 'static,
{
    let (tx, rx) = bounded(1);

    std::thread::spawn(move || {
        debug!("Worker started (lang={}, preprocess={})", options.language, options.preprocess);

        let prepared = TextExtractor::<E>::prepare(&image, options.preprocess);
        let result = extractor.recognize_prepared(&prepared, &options.language);
        if let Err(e) = &result {
            error!("Recognition failed: {}", e);
        }

        let outcome = JobOutcome {
            prepared: options.preprocess.then_some(prepared),
            result,
        };

        // The receiver is gone if the window closed meanwhile
        let _ = tx.send(outcome);
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::testing::{PickyEngine, StubEngine};
    use image::{Rgb, RgbImage};
    use std::time::Duration;

    fn image() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(12, 9, Rgb([250, 250, 250])))
    }

    #[test]
    fn test_worker_posts_preprocessed_result() {
        let extractor = Arc::new(TextExtractor::new(StubEngine::default()));
        let rx = spawn_recognition(extractor, image(), RecognitionOptions::new("spa", true));

        let outcome = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(outcome.result.unwrap(), "12x9x1 [spa]\n\n");
        assert_eq!(outcome.prepared.unwrap().color().channel_count(), 1);
    }

    #[test]
    fn test_worker_raw_result() {
        let extractor = Arc::new(TextExtractor::new(StubEngine::default()));
        let rx = spawn_recognition(extractor, image(), RecognitionOptions::new("eng", false));

        let outcome = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(outcome.result.unwrap(), "12x9x3 [eng]\n\n");
        assert!(outcome.prepared.is_none());
    }

    #[test]
    fn test_worker_posts_errors() {
        let extractor = Arc::new(TextExtractor::new(PickyEngine));
        let rx = spawn_recognition(extractor, image(), RecognitionOptions::new("zzz", true));

        let outcome = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(outcome.result.unwrap_err().is_extraction());
    }
}
