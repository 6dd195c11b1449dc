//! Search core for reopening Zed workspaces from a launcher.
//!
//! A query cycle reads Zed's workspace store, normalizes every location,
//! ranks the records against the query and assembles launcher items:
//!
//! ```text
//! store::WorkspaceStore -> location::normalize -> search::rank -> assemble::assemble
//! ```
//!
//! [`WorkspaceSearch`] runs the whole cycle.

pub mod assemble;
pub mod config;
pub mod location;
pub mod search;
pub mod store;

mod engine;
mod error;

#[cfg(test)]
mod tests;

pub use engine::{NO_WORKSPACES, WorkspaceSearch};
pub use error::{Error, Result};

pub use zedws_types::*;
