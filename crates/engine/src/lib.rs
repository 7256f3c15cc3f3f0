//! Realmhost Engine library.
//!
//! This crate contains all server-side code for the realmhost backend.
//!
//! ## Structure
//!
//! - `use_cases/` - Lifecycle orchestration, state resolution, world management
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `api/` - HTTP entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
