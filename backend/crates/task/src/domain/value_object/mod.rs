//! Value Object Module

pub mod due_date;
pub mod search_text;
pub mod task_priority;
pub mod task_status;
pub mod task_tags;
pub mod task_text;

pub use due_date::parse_instant;
pub use kernel::id::{TaskId, UserId};
pub use search_text::SearchText;
pub use task_priority::TaskPriority;
pub use task_status::TaskStatus;
pub use task_tags::TaskTags;
pub use task_text::{TaskDescription, TaskTitle, TitleError};
