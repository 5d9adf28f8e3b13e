//! Conversation persistence.
//!
//! A save file is a pretty-printed JSON array of [`ConversationRecord`]s living in a
//! fixed directory. Saving appends the live transcript; loading decodes uploaded
//! bytes back into records.

use crate::error::{CoachError, Result};
use crate::llm::models::LlmMessage;
use crate::notice::{NoticeRegion, Notices};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

pub const DEFAULT_CONVERSATIONS_DIR: &str = "conversations";
pub const DEFAULT_SAVE_NAME: &str = "aws_cert_prep_conversation.json";

/// One saved transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationRecord {
    /// Local time of the save, ISO-8601 without offset.
    pub timestamp: String,
    pub messages: Vec<LlmMessage>,
}

impl ConversationRecord {
    pub fn now(messages: Vec<LlmMessage>) -> Self {
        Self {
            timestamp: Local::now().naive_local().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            messages,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConversationStore {
    dir: PathBuf,
}

impl ConversationStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a save name resolves to.
    ///
    /// Only the final path component of `filename` is used, so a save can never
    /// land outside the conversations directory.
    pub fn path_for(&self, filename: &str) -> Result<PathBuf> {
        let name = Path::new(filename.trim())
            .file_name()
            .ok_or_else(|| CoachError::InvalidSaveName(filename.to_string()))?;
        Ok(self.dir.join(name))
    }

    /// Append the transcript as a new record to `filename`.
    ///
    /// An existing file that does not decode as a record list, invalid UTF-8
    /// included, is discarded and replaced by a single-record list.
    pub fn save(&self, messages: &[LlmMessage], filename: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(filename)?;

        let mut conversations = match fs::read(&path) {
            Ok(raw) => match serde_json::from_slice::<Vec<ConversationRecord>>(&raw) {
                Ok(existing) => existing,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Existing save file is unreadable, overwriting");
                    Vec::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        conversations.push(ConversationRecord::now(messages.to_vec()));
        fs::write(&path, serde_json::to_string_pretty(&conversations)?)?;

        info!(path = %path.display(), records = conversations.len(), "Conversation saved");
        Ok(path)
    }

    /// Decode uploaded bytes into conversation records.
    pub fn decode(bytes: Option<&[u8]>) -> Result<Vec<ConversationRecord>> {
        let bytes = bytes.ok_or(CoachError::MissingUpload)?;
        let text = std::str::from_utf8(bytes)
            .map_err(|e| CoachError::DecodeError(format!("upload is not UTF-8: {}", e)))?;
        serde_json::from_str(text).map_err(|e| CoachError::DecodeError(e.to_string()))
    }

    /// Decode uploaded bytes, reporting problems instead of returning them.
    pub fn load(bytes: Option<&[u8]>, notices: &mut Notices) -> Vec<ConversationRecord> {
        match Self::decode(bytes) {
            Ok(conversations) => {
                debug!(records = conversations.len(), "Decoded uploaded conversations");
                conversations
            }
            Err(CoachError::MissingUpload) => {
                notices.warning(NoticeRegion::Sidebar, "No file was uploaded.");
                Vec::new()
            }
            Err(e) => {
                error!(error = %e, "Failed to decode uploaded conversations");
                notices.error(
                    NoticeRegion::Sidebar,
                    "Error decoding the uploaded file. The file may be corrupted or not in JSON format.",
                );
                Vec::new()
            }
        }
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new(DEFAULT_CONVERSATIONS_DIR)
    }
}
