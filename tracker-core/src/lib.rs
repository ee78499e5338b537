//! Core library for the research tracker.
//!
//! This crate provides the domain models, the persisted project store and
//! the repository over it, independent of any transport layer.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use tracker_core::models::*;
//! use tracker_core::store::StoreConfig;
//! use tracker_core::ProjectRepository;
//!
//! let store = StoreConfig::default().open();
//! let repo = ProjectRepository::new(Arc::new(store));
//!
//! let project = repo.create(CreateProjectInput {
//!     title: "Quantum Study".into(),
//!     description: None,
//!     user_id: "u1".into(),
//!     plan_and_aim: None,
//! });
//! repo.add_milestone(&project.id, CreateMilestoneInput {
//!     title: "Lit Review".into(),
//!     status: None,
//!     due_date: None,
//!     description: None,
//! });
//! ```

pub mod clock;
pub mod dashboard;
pub mod models;
pub mod repository;
pub mod seed;
pub mod session;
pub mod store;
pub mod view;

// Re-export commonly used types at crate root
pub use repository::ProjectRepository;
pub use session::{ProjectSession, SessionError};
pub use store::{StoreAdapter, StoreConfig};
pub use view::ViewState;
