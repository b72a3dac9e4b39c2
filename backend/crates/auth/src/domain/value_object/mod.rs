//! Value Object Module

pub mod email;
pub mod profile;
pub mod user_id;
pub mod user_name;
pub mod user_password;
pub mod user_role;

pub use email::Email;
pub use profile::{AvatarUrl, Bio};
pub use user_id::UserId;
pub use user_name::UserName;
pub use user_password::{RawPassword, UserPassword, new_password_with_confirmation};
pub use user_role::UserRole;
