use std::path::PathBuf;

use serde::Serialize;

/// App-wide error type. Every fallible function returns `Result<T, AppError>`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The primary database could not be duplicated; nothing was modified.
    #[error("Backup of {} failed: {source}", path.display())]
    BackupFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A migration step aborted; the primary file is untouched.
    #[error("Migration to {version} failed: {source}")]
    StepFailed {
        version: String,
        source: Box<AppError>,
    },

    #[error("Promoting {} to {} failed: {source}", from.display(), to.display())]
    PromotionFailed {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}

impl AppError {
    /// Short machine-readable tag, used in logs and for the frontend.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Database(_) => "database",
            AppError::Pool(_) => "pool",
            AppError::Io(_) => "io",
            AppError::Serde(_) => "serde",
            AppError::InvalidVersion(_) => "invalid_version",
            AppError::Validation(_) => "validation",
            AppError::BackupFailed { .. } => "backup_failed",
            AppError::StepFailed { .. } => "step_failed",
            AppError::PromotionFailed { .. } => "promotion_failed",
        }
    }
}

/// Serialized as `{ error: "...", kind: "..." }` for frontend consumption.
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("AppError", 2)?;
        s.serialize_field("error", &self.to_string())?;
        s.serialize_field("kind", self.kind())?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_failed_serializes_with_kind() {
        let err = AppError::StepFailed {
            version: "0.3.0".into(),
            source: Box::new(AppError::Validation("bad row".into())),
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "step_failed");
        assert_eq!(
            json["error"],
            "Migration to 0.3.0 failed: Validation error: bad row"
        );
    }
}
