mod client;
mod error;
mod models;

pub use client::{DirectoryClient, DEFAULT_ENDPOINT};
pub use error::DirectoryError;
pub use models::{NewUser, UserRecord};
