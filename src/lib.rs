pub mod api;

pub use tracker_core::{models, store, ProjectRepository};
