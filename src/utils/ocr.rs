use anyhow::{Context, Result};
use std::fs::{self, File};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::data::RasterImage;
use crate::error::PipelineError;

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Optical recognition over a rendered page
pub trait Recognizer: Send + Sync {
    /// Recognise the text in `image` for the given script/language identifier.
    fn recognize(&self, image: &RasterImage, language: &str) -> Result<String>;
}

/// Check whether an external tool can be launched
pub fn command_available(program: &str) -> bool {
    Command::new(program).arg("--version").output().is_ok()
}

/// Recognition through the `tesseract` command-line tool.
///
/// Requires Tesseract with the language's traineddata installed.
/// Install:
/// - Linux: sudo apt-get install tesseract-ocr tesseract-ocr-guj
/// - Mac: brew install tesseract tesseract-lang
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    program: String,
    timeout: Duration,
}

impl TesseractRecognizer {
    pub fn new(timeout: Duration) -> Self {
        Self {
            program: "tesseract".to_string(),
            timeout,
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn is_available(&self) -> bool {
        command_available(&self.program)
    }
}

impl Recognizer for TesseractRecognizer {
    fn recognize(&self, image: &RasterImage, language: &str) -> Result<String> {
        let output_base = image.work_dir().join("ocr");
        let (width, height) = image.dimensions();
        debug!("Running {} on {:?} ({}x{})", self.program, image.path(), width, height);

        // Diagnostics go to a file so a chatty engine never blocks on a full pipe.
        let stderr_path = output_base.with_extension("stderr");
        let stderr_file = File::create(&stderr_path)
            .map_err(|e| PipelineError::io(&stderr_path, e))
            .context("Failed to create recognition log")?;

        let mut child = Command::new(&self.program)
            .arg(image.path())
            .arg(&output_base)
            .arg("-l")
            .arg(language)
            .stdout(Stdio::null())
            .stderr(Stdio::from(stderr_file))
            .spawn()
            .with_context(|| format!("Failed to execute {}", self.program))?;

        let started = Instant::now();
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if started.elapsed() >= self.timeout {
                warn!("{} exceeded {:?}, killing it", self.program, self.timeout);
                let _ = child.kill();
                let _ = child.wait();
                return Err(PipelineError::RecognitionTimeout(self.timeout).into());
            }
            thread::sleep(POLL_INTERVAL);
        };

        if !status.success() {
            let stderr = fs::read_to_string(&stderr_path).unwrap_or_default();
            return Err(PipelineError::RecognitionFailed(format!(
                "{} exited with {}: {}",
                self.program,
                status,
                stderr.trim()
            ))
            .into());
        }

        let text_file = output_base.with_extension("txt");
        let text = fs::read_to_string(&text_file)
            .map_err(|e| PipelineError::io(&text_file, e))
            .with_context(|| format!("{} produced no text file", self.program))?;

        Ok(text.replace('\u{0000}', ""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Installs a shell script standing in for the engine.
    #[cfg(unix)]
    fn fake_engine(dir: &TempDir, body: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.path().join("fake-tesseract");
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn scratch_image() -> RasterImage {
        let scratch = TempDir::new().unwrap();
        let path = scratch.path().join("page.png");
        fs::write(&path, b"").unwrap();
        RasterImage::in_scratch(scratch, path, 10, 10)
    }

    #[test]
    fn test_missing_program_is_an_error() {
        let recognizer = TesseractRecognizer::new(Duration::from_secs(1))
            .with_program("definitely-not-an-ocr-binary");
        assert!(!recognizer.is_available());

        let image = RasterImage::new("/nonexistent/page.png", 0, 0);
        assert!(recognizer.recognize(&image, "guj").is_err());
    }

    #[test]
    fn test_availability_matches_command_lookup() {
        let recognizer = TesseractRecognizer::new(Duration::from_secs(1));
        assert_eq!(recognizer.is_available(), command_available("tesseract"));
    }

    #[cfg(unix)]
    #[test]
    fn test_reads_text_written_by_engine() {
        let bin = TempDir::new().unwrap();
        let program = fake_engine(&bin, r#"printf 'કોષ\n' > "$2.txt""#);
        let recognizer = TesseractRecognizer::new(Duration::from_secs(10)).with_program(program);

        let text = recognizer.recognize(&scratch_image(), "guj").unwrap();
        assert_eq!(text, "કોષ\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_verbose_engine_does_not_stall() {
        let bin = TempDir::new().unwrap();
        let program = fake_engine(
            &bin,
            r#"head -c 200000 /dev/zero | tr '\0' 'x' >&2
printf 'કોષ\n' > "$2.txt""#,
        );
        let recognizer = TesseractRecognizer::new(Duration::from_secs(10)).with_program(program);

        let text = recognizer.recognize(&scratch_image(), "guj").unwrap();
        assert_eq!(text, "કોષ\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_reports_engine_stderr() {
        let bin = TempDir::new().unwrap();
        let program = fake_engine(&bin, "echo 'missing guj.traineddata' >&2\nexit 1");
        let recognizer = TesseractRecognizer::new(Duration::from_secs(10)).with_program(program);

        let err = recognizer.recognize(&scratch_image(), "guj").unwrap_err();
        match err.downcast_ref::<PipelineError>() {
            Some(PipelineError::RecognitionFailed(message)) => {
                assert!(message.contains("missing guj.traineddata"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_slow_engine_is_killed_at_timeout() {
        let bin = TempDir::new().unwrap();
        let program = fake_engine(&bin, "sleep 10");
        let timeout = Duration::from_secs(1);
        let recognizer = TesseractRecognizer::new(timeout).with_program(program);

        let started = Instant::now();
        let err = recognizer.recognize(&scratch_image(), "guj").unwrap_err();
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::RecognitionTimeout(t)) if *t == timeout
        ));
    }
}
