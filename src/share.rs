//! Share action - hands a cached poster to a platform share capability.
//!
//! The platform side sits behind [`ShareTarget`] so the screen can be driven
//! against the system opener, a save directory, or a test double.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::poster::PosterResult;

/// Errors that can occur while sharing a poster.
#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    #[error("Sharing not supported on this device ({target})")]
    Unavailable { target: String },

    #[error("Share via {target} failed: {message}")]
    Failed { target: String, message: String },
}

/// A platform capability a poster can be shared through.
pub trait ShareTarget {
    /// Short name used in messages.
    fn name(&self) -> &str;

    /// Whether the platform offers this capability right now.
    fn is_available(&self) -> bool;

    /// Share the file at `path`.
    fn share(&self, path: &Path) -> Result<(), ShareError>;
}

/// Share a poster through `target`.
///
/// Fails with `ShareError::Unavailable` without calling the target if it
/// reports no share capability. A poster whose file was already evicted from
/// the cache is passed through as is.
pub fn share_poster(target: &dyn ShareTarget, poster: &PosterResult) -> Result<(), ShareError> {
    if !target.is_available() {
        log::warn!("Share target {} is not available", target.name());
        return Err(ShareError::Unavailable {
            target: target.name().to_string(),
        });
    }

    log::info!("Sharing {} via {}", poster.path().display(), target.name());
    target.share(poster.path())
}

/// Opener program for the current platform.
fn platform_opener() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(target_os = "windows") {
        "explorer"
    } else {
        "xdg-open"
    }
}

/// Hands the poster to the desktop's default handler (`open`, `xdg-open`,
/// `explorer`), which offers the platform's own share and save options.
pub struct SystemShare {
    program: String,
}

impl SystemShare {
    pub fn new() -> Self {
        Self::with_program(platform_opener())
    }

    /// Use a specific opener program instead of the platform default.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for SystemShare {
    fn default() -> Self {
        Self::new()
    }
}

/// Find `program` on `PATH`, or accept it as is when given as a path.
fn find_program(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var).find_map(|dir| {
        let full = dir.join(program);
        if full.is_file() {
            return Some(full);
        }
        if cfg!(target_os = "windows") {
            let exe = dir.join(format!("{}.exe", program));
            if exe.is_file() {
                return Some(exe);
            }
        }
        None
    })
}

impl ShareTarget for SystemShare {
    fn name(&self) -> &str {
        &self.program
    }

    fn is_available(&self) -> bool {
        find_program(&self.program).is_some()
    }

    fn share(&self, path: &Path) -> Result<(), ShareError> {
        let status = Command::new(&self.program)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| ShareError::Failed {
                target: self.program.clone(),
                message: e.to_string(),
            })?;

        // explorer.exe reports 1 even when it opened the file.
        if status.success() || (cfg!(target_os = "windows") && status.code() == Some(1)) {
            Ok(())
        } else {
            Err(ShareError::Failed {
                target: self.program.clone(),
                message: format!("{} exited with {}", self.program, status),
            })
        }
    }
}

/// Number of attempts at finding a free file name in the save directory.
const MAX_SAVE_ATTEMPTS: u32 = 100;

/// The "save" half of Share / Save: copies the poster into a directory.
///
/// A file already in the directory is never overwritten; the copy gets a
/// `-<n>` suffix instead.
pub struct SaveToDirectory {
    dir: PathBuf,
}

impl SaveToDirectory {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn failed(&self, message: String) -> ShareError {
        ShareError::Failed {
            target: self.name().to_string(),
            message,
        }
    }

    /// Candidate destination for `file_name`, with a suffix after the first try.
    fn candidate(&self, file_name: &Path, attempt: u32) -> PathBuf {
        if attempt == 0 {
            return self.dir.join(file_name);
        }
        let stem = file_name
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = match file_name.extension() {
            Some(ext) => format!("{}-{}.{}", stem, attempt, ext.to_string_lossy()),
            None => format!("{}-{}", stem, attempt),
        };
        self.dir.join(name)
    }

    /// Copy `path` into the save directory and return where it landed.
    ///
    /// # Errors
    ///
    /// Returns `ShareError::Failed` if the directory does not exist, the
    /// source cannot be read, or no free name is found.
    pub fn save(&self, path: &Path) -> Result<PathBuf, ShareError> {
        if !self.dir.is_dir() {
            return Err(self.failed(format!(
                "directory '{}' does not exist",
                self.dir.display()
            )));
        }

        let file_name = path
            .file_name()
            .map(Path::new)
            .ok_or_else(|| self.failed(format!("'{}' has no file name", path.display())))?;

        let mut source = std::fs::File::open(path)
            .map_err(|e| self.failed(format!("could not read '{}': {}", path.display(), e)))?;

        for attempt in 0..MAX_SAVE_ATTEMPTS {
            let dest = self.candidate(file_name, attempt);

            let mut file = match std::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&dest)
            {
                Ok(file) => file,
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(self.failed(format!(
                        "could not create '{}': {}",
                        dest.display(),
                        e
                    )))
                }
            };

            if let Err(e) = std::io::copy(&mut source, &mut file) {
                drop(file);
                let _ = std::fs::remove_file(&dest);
                return Err(self.failed(format!(
                    "could not copy to '{}': {}",
                    dest.display(),
                    e
                )));
            }

            log::info!("Poster saved to {}", dest.display());
            return Ok(dest);
        }

        Err(self.failed(format!(
            "no free file name for '{}' in '{}'",
            file_name.display(),
            self.dir.display()
        )))
    }
}

impl ShareTarget for SaveToDirectory {
    fn name(&self) -> &str {
        "save"
    }

    /// Saving needs no platform support; a bad directory is reported by
    /// [`SaveToDirectory::save`] instead.
    fn is_available(&self) -> bool {
        true
    }

    fn share(&self, path: &Path) -> Result<(), ShareError> {
        self.save(path).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::TempDir;

    struct RecordingTarget {
        available: bool,
        shared: RefCell<Vec<PathBuf>>,
    }

    impl ShareTarget for RecordingTarget {
        fn name(&self) -> &str {
            "recording"
        }

        fn is_available(&self) -> bool {
            self.available
        }

        fn share(&self, path: &Path) -> Result<(), ShareError> {
            self.shared.borrow_mut().push(path.to_path_buf());
            Ok(())
        }
    }

    #[test]
    fn test_share_poster_unavailable_does_not_call_target() {
        let target = RecordingTarget {
            available: false,
            shared: RefCell::new(Vec::new()),
        };
        let poster = PosterResult::new(PathBuf::from("/tmp/poster_1.png"));

        let result = share_poster(&target, &poster);

        assert!(matches!(result, Err(ShareError::Unavailable { .. })));
        assert!(target.shared.borrow().is_empty());
    }

    #[test]
    fn test_share_poster_passes_path_through() {
        let target = RecordingTarget {
            available: true,
            shared: RefCell::new(Vec::new()),
        };
        let poster = PosterResult::new(PathBuf::from("/tmp/poster_1.png"));

        share_poster(&target, &poster).unwrap();

        assert_eq!(
            *target.shared.borrow(),
            vec![PathBuf::from("/tmp/poster_1.png")]
        );
    }

    #[test]
    fn test_save_to_directory_copies_file() {
        let source_dir = TempDir::new().unwrap();
        let save_dir = TempDir::new().unwrap();
        let source = source_dir.path().join("poster_1_abcd1234.png");
        std::fs::write(&source, b"poster").unwrap();

        let target = SaveToDirectory::new(save_dir.path().to_path_buf());
        assert!(target.is_available());
        target.share(&source).unwrap();

        let saved = save_dir.path().join("poster_1_abcd1234.png");
        assert_eq!(std::fs::read(saved).unwrap(), b"poster");
    }

    #[test]
    fn test_save_to_missing_directory_fails_with_reason() {
        let source_dir = TempDir::new().unwrap();
        let source = source_dir.path().join("poster_1.png");
        std::fs::write(&source, b"poster").unwrap();

        let target = SaveToDirectory::new(source_dir.path().join("missing"));
        assert!(target.is_available());

        match share_poster(&target, &PosterResult::new(source)) {
            Err(ShareError::Failed { message, .. }) => {
                assert!(message.contains("does not exist"), "got: {}", message)
            }
            other => panic!("Expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn test_save_never_overwrites_existing_file() {
        let source_dir = TempDir::new().unwrap();
        let save_dir = TempDir::new().unwrap();
        let source = source_dir.path().join("poster_1.png");
        std::fs::write(&source, b"new poster").unwrap();
        let existing = save_dir.path().join("poster_1.png");
        std::fs::write(&existing, b"old poster").unwrap();

        let target = SaveToDirectory::new(save_dir.path().to_path_buf());
        let first = target.save(&source).unwrap();
        let second = target.save(&source).unwrap();

        assert_eq!(first, save_dir.path().join("poster_1-1.png"));
        assert_eq!(second, save_dir.path().join("poster_1-2.png"));
        assert_eq!(std::fs::read(&existing).unwrap(), b"old poster");
        assert_eq!(std::fs::read(&first).unwrap(), b"new poster");
        assert_eq!(std::fs::read(&second).unwrap(), b"new poster");
    }

    #[test]
    fn test_save_missing_source_fails() {
        let save_dir = TempDir::new().unwrap();
        let target = SaveToDirectory::new(save_dir.path().to_path_buf());

        let result = target.share(Path::new("/nonexistent/poster_0.png"));

        assert!(matches!(result, Err(ShareError::Failed { .. })));
    }

    #[test]
    fn test_system_share_unknown_program_unavailable() {
        let target = SystemShare::with_program("poster-studio-no-such-opener");
        assert!(!target.is_available());
        assert!(matches!(
            target.share(Path::new("/tmp/poster.png")),
            Err(ShareError::Failed { .. })
        ));
    }

    #[test]
    fn test_default_opener_per_platform() {
        let target = SystemShare::default();
        assert!(["open", "xdg-open", "explorer"].contains(&target.program()));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_share_runs_program_with_path() {
        // `true` ignores its arguments and exits 0.
        let target = SystemShare::with_program("true");
        assert!(target.is_available());
        target.share(Path::new("/tmp/poster.png")).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_system_share_nonzero_exit_is_failure() {
        let target = SystemShare::with_program("false");
        assert!(matches!(
            target.share(Path::new("/tmp/poster.png")),
            Err(ShareError::Failed { .. })
        ));
    }
}
