#![deny(clippy::mod_module_files)]
//! Persisted-state ledger for a multi-account, multi-region deployment
//! orchestrator.
//!
//! The [`PersistedState`] store is the single source of truth for what an
//! organization has already deployed: one [`state::StateDocument`] holding
//! stack deployment targets, organizational resource bindings, tracked
//! tasks, and cross-cutting scalars, persisted as stable JSON through an
//! opaque [`StorageProvider`].
//!
//! Mutations are batched behind a dirty flag: saving a store nothing
//! touched performs no write at all.
//!
//! ```no_run
//! use orgstate::{FileStorageProvider, PersistedState};
//!
//! # fn main() -> anyhow::Result<()> {
//! let provider = FileStorageProvider::new("organization-state.json");
//! let mut state = PersistedState::load(provider, "123123123123")?;
//!
//! state.put_template_hash("2c26b46b68ffc68ff99b453c1d304134");
//! state.save()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod fingerprint;
pub mod state;
pub mod storage;

pub use config::StateStoreConfig;
pub use error::StateError;
pub use state::{resource_types, Binding, PersistedState, StackTarget, TrackedTask};
pub use storage::{FileStorageProvider, MemoryStorageProvider, StorageProvider};
