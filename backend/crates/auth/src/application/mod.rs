//! Application Layer
//!
//! Use cases and application services.

pub mod admin;
pub mod change_password;
pub mod check_session;
pub mod config;
pub mod profile;
pub mod refresh;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;
pub mod token;

// Re-exports
pub use admin::{GetUserUseCase, ListUsersUseCase, UserPage};
pub use change_password::{ChangePasswordInput, ChangePasswordUseCase};
pub use check_session::CheckSessionUseCase;
pub use config::AuthConfig;
pub use profile::{DeactivateAccountUseCase, GetProfileUseCase, UpdateProfileUseCase};
pub use refresh::RefreshUseCase;
pub use sign_in::{AuthOutput, SignInInput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use sign_up::{SignUpInput, SignUpUseCase};
pub use token::{TokenPair, TokenService, VerifiedToken};
