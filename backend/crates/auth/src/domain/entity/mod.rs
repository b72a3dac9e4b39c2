//! Entities

pub mod user;

pub use user::{ProfilePatch, User};
