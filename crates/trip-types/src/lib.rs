pub mod chat;
pub mod config;
pub mod error;
pub mod event;
pub mod session;
pub mod travel;

#[cfg(test)]
mod tests;

pub use error::TripError;
pub type Result<T> = std::result::Result<T, TripError>;
