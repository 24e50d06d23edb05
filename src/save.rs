//! The export save boundary.
//!
//! Writing the finished PNG is the one side effect the compositor pipeline
//! has, so it sits behind the [`SaveTarget`] trait — swappable per platform
//! and trivially mockable in tests.
//!
//! Some embedded in-app browsers (social-network webviews) silently swallow
//! file downloads. [`DownloadContext`] classifies a user-agent string against
//! known embedded-webview signatures; saving under an embedded context fails
//! up front with [`SaveError::UnsupportedDownloadContext`] so the caller can
//! show the "open in an external browser" instruction instead of pretending
//! the download worked.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("direct download is unavailable inside {0}; open this page in an external browser")]
    UnsupportedDownloadContext(String),
}

/// Substrings that identify known in-app browsers. Matched case-insensitively
/// against the full user-agent string.
const EMBEDDED_SIGNATURES: &[&str] = &[
    "fban",            // Facebook app
    "fbav",            // Facebook app (alt token)
    "fb_iab",          // Facebook in-app browser
    "instagram",       //
    "line/",           // LINE messenger
    "kakaotalk",       //
    "micromessenger",  // WeChat
    "tiktok",          //
    "naver",           //
    "; wv)",           // generic Android WebView marker
];

/// Where a download request is coming from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DownloadContext {
    /// A regular environment where writing a file works.
    #[default]
    Direct,
    /// A known embedded webview; carries the matched signature for the
    /// user-facing message.
    Embedded(String),
}

impl DownloadContext {
    /// Classify a user-agent string.
    #[must_use]
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_lowercase();
        for sig in EMBEDDED_SIGNATURES {
            if ua.contains(sig) {
                return Self::Embedded(sig.trim_matches(&['/', ';', ')', ' '][..]).to_string());
            }
        }
        Self::Direct
    }
}

/// Trait for the file-save collaborator.
pub trait SaveTarget {
    /// Persist `bytes` under `filename`, returning the full path written.
    fn save(&self, bytes: &[u8], filename: &str) -> Result<PathBuf, SaveError>;
}

/// Saves into a directory on the local filesystem.
pub struct FileSaver {
    dir: PathBuf,
    context: DownloadContext,
}

impl FileSaver {
    /// Saver for a regular (direct) environment.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            context: DownloadContext::Direct,
        }
    }

    /// Saver that honors a classified download context.
    #[must_use]
    pub fn with_context(dir: impl Into<PathBuf>, context: DownloadContext) -> Self {
        Self {
            dir: dir.into(),
            context,
        }
    }
}

impl SaveTarget for FileSaver {
    fn save(&self, bytes: &[u8], filename: &str) -> Result<PathBuf, SaveError> {
        if let DownloadContext::Embedded(sig) = &self.context {
            return Err(SaveError::UnsupportedDownloadContext(sig.clone()));
        }
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        std::fs::write(&path, bytes)?;
        Ok(path)
    }
}

/// Convenience for one-off saves outside a directory-scoped saver.
pub fn save_to(path: &Path, bytes: &[u8]) -> Result<(), SaveError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mock target that records saves without touching the filesystem.
    #[derive(Default)]
    pub struct RecordingSaver {
        pub saved: Mutex<Vec<(String, usize)>>,
    }

    impl SaveTarget for RecordingSaver {
        fn save(&self, bytes: &[u8], filename: &str) -> Result<PathBuf, SaveError> {
            self.saved
                .lock()
                .unwrap()
                .push((filename.to_string(), bytes.len()));
            Ok(PathBuf::from(filename))
        }
    }

    #[test]
    fn desktop_and_mobile_browsers_are_direct() {
        for ua in [
            "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 Chrome/126.0 Safari/537.36",
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) Version/17.0 Safari/604.1",
            "",
        ] {
            assert_eq!(DownloadContext::from_user_agent(ua), DownloadContext::Direct);
        }
    }

    #[test]
    fn known_in_app_browsers_are_embedded() {
        for ua in [
            "Mozilla/5.0 (iPhone) [FBAN/FBIOS;FBAV/400.0]",
            "Mozilla/5.0 (Linux; Android 13) Instagram 300.0.0.0",
            "Mozilla/5.0 (Linux; Android 12; SM-G991B Build/SP1A; wv) Chrome/120",
            "Mozilla/5.0 (iPhone) Line/13.5.0",
        ] {
            assert!(
                matches!(DownloadContext::from_user_agent(ua), DownloadContext::Embedded(_)),
                "{ua}"
            );
        }
    }

    #[test]
    fn file_saver_writes_into_the_directory() {
        let tmp = tempfile::TempDir::new().unwrap();
        let saver = FileSaver::new(tmp.path());

        let path = saver.save(b"png bytes", "framed.png").unwrap();
        assert_eq!(path, tmp.path().join("framed.png"));
        assert_eq!(std::fs::read(&path).unwrap(), b"png bytes");
    }

    #[test]
    fn embedded_context_refuses_up_front() {
        let tmp = tempfile::TempDir::new().unwrap();
        let saver = FileSaver::with_context(
            tmp.path(),
            DownloadContext::Embedded("instagram".into()),
        );

        let err = saver.save(b"png bytes", "framed.png").unwrap_err();
        assert!(matches!(err, SaveError::UnsupportedDownloadContext(_)));
        // Nothing was written
        assert!(!tmp.path().join("framed.png").exists());
    }
}
