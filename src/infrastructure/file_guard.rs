use std::path::Path;

use crate::domain::app_config::InputLimits;
use crate::domain::error::{AppError, Result};

/// Reject files by extension and size before any reader opens them.
pub struct FileGuard<'a> {
    limits: &'a InputLimits,
}

impl<'a> FileGuard<'a> {
    pub fn new(limits: &'a InputLimits) -> Self {
        Self { limits }
    }

    /// Returns the lowercase extension of an accepted file
    pub fn check(&self, path: &Path) -> Result<String> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .ok_or_else(|| {
                AppError::UnsupportedFile(format!("{} has no file extension", path.display()))
            })?;

        if !self
            .limits
            .allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&extension))
        {
            return Err(AppError::UnsupportedFile(format!(
                ".{} files are not accepted (allowed: {})",
                extension,
                self.limits.allowed_extensions.join(", ")
            )));
        }

        let size = std::fs::metadata(path)?.len();
        if size > self.limits.max_file_bytes {
            tracing::warn!(
                path = %path.display(),
                size,
                max = self.limits.max_file_bytes,
                "File too large"
            );
            return Err(AppError::UnsupportedFile(format!(
                "{} is {} bytes, limit is {} bytes",
                path.display(),
                size,
                self.limits.max_file_bytes
            )));
        }

        Ok(extension)
    }
}
