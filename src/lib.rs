pub mod client;
pub mod config;
pub mod display;
pub mod error;
pub mod filter;
pub mod form;
pub mod parser;
pub mod schedule;
pub mod session;
pub mod summary;
pub mod web;

pub use error::ViewerError;
