//! File mover
//!
//! Copies a parsed object from `uploaded/` to `parsed/`, then deletes the original. The
//! delete never runs unless the copy succeeded.

use std::sync::Arc;

use storefront_core::AppError;
use storefront_storage::{keys, Storage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved { to: String },
    /// The copy exists but the original could not be deleted, so the object is at both keys.
    CopiedNotDeleted { to: String, reason: String },
}

impl MoveOutcome {
    pub fn destination(&self) -> &str {
        match self {
            MoveOutcome::Moved { to } | MoveOutcome::CopiedNotDeleted { to, .. } => to,
        }
    }
}

#[derive(Clone)]
pub struct FileMover {
    storage: Arc<dyn Storage>,
}

impl FileMover {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn move_to_done(&self, key: &str) -> Result<MoveOutcome, AppError> {
        let to = keys::done_key_for(key).ok_or_else(|| {
            AppError::Validation(format!("{} is not under the upload prefix", key))
        })?;

        self.storage.copy(key, &to).await.map_err(|e| {
            tracing::error!(error = %e, from_key = %key, to_key = %to, "Copy to parsed prefix failed");
            AppError::from(e)
        })?;

        match self.storage.delete(key).await {
            Ok(()) => {
                tracing::info!(from_key = %key, to_key = %to, "Moved parsed file");
                Ok(MoveOutcome::Moved { to })
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    from_key = %key,
                    to_key = %to,
                    "Parsed file copied but original could not be deleted"
                );
                Ok(MoveOutcome::CopiedNotDeleted {
                    to,
                    reason: e.to_string(),
                })
            }
        }
    }
}
