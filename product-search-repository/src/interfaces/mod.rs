//! Interface definitions for the collaborators of the product search core.
//!
//! The search engine is split along its two protocols: [`SearchEngine`] for
//! query round trips and [`IndexAdmin`] for index and alias management.
//! [`ResourceLoader`] supplies the settings, mapping and seed data used when
//! rotating the index.

mod index_admin;
mod resource_loader;
mod search_engine;

pub use index_admin::IndexAdmin;
pub use resource_loader::{ResourceKind, ResourceLoader};
pub use search_engine::SearchEngine;
