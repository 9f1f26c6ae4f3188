//! # figmentdb
//!
//! A single-file, append-only, log-structured key-value store with:
//! - One JSON record per line, last value wins on replay
//! - An insertion-ordered in-memory Index as the only read path
//! - Tombstones for deletes, dropped by explicit compaction
//! - Atomic temp-file-and-rename compaction
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Store<T>                             │
//! │             (Single Writer / Multi Reader)                   │
//! └──────┬──────────────────┬───────────────────────┬───────────┘
//!        │ set / delete     │ get / list / find     │ compact
//!        ▼                  ▼                       ▼
//!   ┌─────────────┐   ┌─────────────┐        ┌─────────────┐
//!   │  LogWriter  │   │    Index    │───────▶│  Compactor  │
//!   │  (Append)   │   │  (RwLock)   │        │ (Replace)   │
//!   └──────┬──────┘   └──────▲──────┘        └──────┬──────┘
//!          │                 │ load                 │
//!          ▼                 │                      ▼
//!   ┌─────────────────────────────────────────────────────┐
//!   │                 Log File (db.json)                   │
//!   └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use figmentdb::Store;
//!
//! let store: Store<u32> = Store::open_path("db.json")?;
//! store.set("a", 1)?;
//! store.delete("a")?;
//! assert_eq!(store.get("a"), None);
//! assert_eq!(store.list(), vec!["a".to_string()]);
//! store.compact()?;
//! # Ok::<(), figmentdb::FigmentError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod log;
pub mod index;
pub mod compaction;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{FigmentError, Result};
pub use config::{Config, SyncStrategy};
pub use compaction::CompactionStats;
pub use log::LoadStats;
pub use store::{Store, StoreStats};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of figmentdb
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
