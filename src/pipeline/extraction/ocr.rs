use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Child, Command, Output, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use super::OcrError;

/// OCR abstraction (allows mocking for tests).
///
/// Implementations are blocking; async callers run them on
/// `tokio::task::spawn_blocking` under their own timeout.
pub trait OcrEngine {
    fn extract_text(&self, image_bytes: &[u8]) -> Result<String, OcrError>;
}

/// Runs the `tesseract` CLI, feeding the image on stdin and reading text from stdout.
pub struct TesseractCli {
    binary: PathBuf,
    lang: String,
    timeout: Option<Duration>,
}

const POLL_INTERVAL: Duration = Duration::from_millis(20);

impl TesseractCli {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            lang: "eng".to_string(),
            timeout: None,
        }
    }

    /// Kill the child process once `timeout` has elapsed.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set language(s) for OCR (e.g., "eng", "eng+fra")
    pub fn with_languages(mut self, langs: &str) -> Self {
        self.lang = langs.to_string();
        self
    }
}

impl OcrEngine for TesseractCli {
    fn extract_text(&self, image_bytes: &[u8]) -> Result<String, OcrError> {
        if image_bytes.is_empty() {
            return Err(OcrError::EmptyImage);
        }

        let mut child = Command::new(&self.binary)
            .args(["stdin", "stdout", "-l", &self.lang])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| OcrError::Spawn(self.binary.display().to_string(), e.to_string()))?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(image_bytes) {
                reap(&mut child);
                return Err(e.into());
            }
        }

        let output = match self.timeout {
            Some(limit) => wait_with_deadline(child, limit)?,
            None => child.wait_with_output()?,
        };
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Failed(stderr.trim().to_string()));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        if text.trim().is_empty() {
            return Err(OcrError::NoText);
        }

        tracing::debug!(bytes = image_bytes.len(), chars = text.len(), "Tesseract OCR complete");
        Ok(text)
    }
}

fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Wait for `child`, killing it once `limit` elapses. Pipes are drained on
/// side threads while polling.
fn wait_with_deadline(mut child: Child, limit: Duration) -> Result<Output, OcrError> {
    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);
    let deadline = Instant::now() + limit;

    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if Instant::now() >= deadline {
            reap(&mut child);
            tracing::warn!(timeout_ms = limit.as_millis() as u64, "Tesseract killed after timeout");
            return Err(OcrError::Timeout(limit.as_secs()));
        }
        std::thread::sleep(POLL_INTERVAL);
    };

    Ok(Output {
        status,
        stdout: collect(stdout),
        stderr: collect(stderr),
    })
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<Vec<u8>> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        buf
    })
}

fn collect(reader: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    reader.and_then(|h| h.join().ok()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_image_rejected_without_spawning() {
        let engine = TesseractCli::new("/nonexistent/tesseract");
        assert!(matches!(engine.extract_text(&[]), Err(OcrError::EmptyImage)));
    }

    #[test]
    fn missing_binary_is_spawn_error() {
        let engine = TesseractCli::new("/nonexistent/tesseract").with_languages("eng+fra");
        let err = engine.extract_text(&[0x89, 0x50, 0x4E, 0x47]).unwrap_err();
        assert!(matches!(err, OcrError::Spawn(ref bin, _) if bin.contains("nonexistent")));
    }

    /// Executable shell script standing in for the tesseract binary.
    #[cfg(unix)]
    fn fake_binary(dir: &std::path::Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("fake-tesseract");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn hung_child_killed_at_deadline() {
        let dir = tempfile::tempdir().unwrap();
        let engine = TesseractCli::new(fake_binary(dir.path(), "exec sleep 30"))
            .with_timeout(Duration::from_millis(200));

        let started = Instant::now();
        let err = engine.extract_text(b"fake image").unwrap_err();
        assert!(matches!(err, OcrError::Timeout(_)));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[cfg(unix)]
    #[test]
    fn child_exiting_before_reading_input_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let engine = TesseractCli::new(fake_binary(dir.path(), "exit 0"));

        let image = vec![0u8; 4 * 1024 * 1024];
        let err = engine.extract_text(&image).unwrap_err();
        assert!(matches!(err, OcrError::Io(_)));
    }

    #[cfg(unix)]
    #[test]
    fn output_read_within_deadline() {
        let dir = tempfile::tempdir().unwrap();
        let engine = TesseractCli::new(fake_binary(dir.path(), "cat > /dev/null\necho 'Glucose 85 mg/dL'"))
            .with_timeout(Duration::from_secs(10));

        let text = engine.extract_text(b"fake image").unwrap();
        assert_eq!(text.trim(), "Glucose 85 mg/dL");
    }
}
