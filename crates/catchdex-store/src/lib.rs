#![forbid(unsafe_code)]
//! Durable caught-state records, one JSON document per (identity, game).

mod backend;
mod paths;

pub use backend::{CaughtStateStore, LocalFsStore, MemoryStore, StoreError, StoreErrorCode};
pub use paths::{record_path, user_dir};

pub const CRATE_NAME: &str = "catchdex-store";
