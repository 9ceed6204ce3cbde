//! Shared data model layer (structs only).
//!
//! ## Purpose
//! - Keep API DTOs and report structs in one place.
//! - Make JSON output schema changes explicit and reviewable.
//!
//! ## Rule of thumb
//! Domain types are data-only: no network or filesystem side effects.

pub mod models;
