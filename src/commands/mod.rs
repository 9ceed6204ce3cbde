//! Command handler layer.
//!
//! ## Principles
//! - Assemble payloads and defaults from CLI inputs here.
//! - Delegate traversal and fan-out to `services/*`.
//! - Keep the output schema and exit-code policy stable.

pub mod keys;

pub use keys::handle_key_command;
