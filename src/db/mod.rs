//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `create.rs`: insert payloads, filters and batch summaries
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `actor.rs`: the actor that owns the pool and serializes every write

pub mod actor;
pub mod create;
pub mod models;
pub mod schema;

pub use create::{ImportSummary, NativePlantCreate, ObservationFilter, StoreSummary};
pub use models::{DbNativePlant, DbObservation, NativePlantMatch};
pub use schema::SQLITE_INIT;

pub use actor::{DbActorHandle, spawn};
