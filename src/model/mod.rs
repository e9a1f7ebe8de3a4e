//! # Schema Model
//!
//! Plain DTOs describing the tables indexes are attached to.
//! This module is pure data: no I/O, no state, no SQL.

pub mod table;

pub use table::TableMeta;
