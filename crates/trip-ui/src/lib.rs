//! egui views for the travel client.
//!
//! Panels are plain functions over [`state::UiState`]; they never call
//! the network themselves. Each returns an action enum the app layer
//! turns into async service calls, and results flow back into the
//! state the next frame.

pub mod panels;
pub mod state;
pub mod theme;
