// src/probes/file.rs
use crate::health::{CheckResult, Checker};
use std::path::PathBuf;

/// Healthy while `path` exists.
#[derive(Debug, Clone)]
pub struct FileProbe {
    path: PathBuf,
}

impl FileProbe {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Checker for FileProbe {
    fn check(&self) -> CheckResult {
        match std::fs::metadata(&self.path) {
            Ok(_) => CheckResult::default(),
            Err(e) => CheckResult::from_error(
                &e,
                format!("{} is not accessible: {}", self.path.display(), e),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_file_presence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ready");
        let probe = FileProbe::new(&path);

        assert!(probe.check().failed());
        std::fs::write(&path, b"ok").unwrap();
        assert!(!probe.check().failed());
    }
}
