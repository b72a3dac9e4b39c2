//! Task Tags

use serde::Serialize;

use kernel::error::app_error::{AppError, AppResult};

/// Maximum number of tags per task
pub const MAX_TAGS: usize = 10;

/// Up to ten trimmed, non-empty labels, in the order given
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TaskTags(Vec<String>);

impl TaskTags {
    pub fn new(tags: Vec<String>) -> AppResult<Self> {
        if tags.len() > MAX_TAGS {
            return Err(AppError::bad_request(format!(
                "Tags must be an array of max {MAX_TAGS} items"
            )));
        }

        tags.into_iter()
            .map(|tag| {
                let trimmed = tag.trim();
                if trimmed.is_empty() {
                    Err(AppError::bad_request("Each tag must be a non-empty string"))
                } else {
                    Ok(trimmed.to_string())
                }
            })
            .collect::<AppResult<Vec<_>>>()
            .map(Self)
    }

    pub fn from_db(tags: Vec<String>) -> Self {
        Self(tags)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// True if any of `wanted` is one of these tags
    pub fn contains_any(&self, wanted: &[String]) -> bool {
        self.0.iter().any(|tag| wanted.contains(tag))
    }
}
