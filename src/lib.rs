pub mod config;
pub mod directory;
pub mod store;
pub mod view;
