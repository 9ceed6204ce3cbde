//! Service layer containing the traversal and fan-out logic.
//!
//! ## Service map
//! - `discovery.rs` — resolve a group target into a flat project list.
//! - `applier.rs` — per-project add/remove fan-out and result collection.
//! - `output.rs` — JSON/text output helpers.
//!
//! ## Conventions
//! - Services take the immutable `RunConfig` and the `GitlabApi` seam by
//!   reference; no long-lived stateful objects.
//! - Remote failures degrade at the smallest scope and never abort a run.

pub mod applier;
pub mod discovery;
pub mod output;
