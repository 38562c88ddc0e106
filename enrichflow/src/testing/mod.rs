//! Testing utilities for enrichment pipelines.
//!
//! This module provides:
//! - A scripted generation client with call and prompt capture
//! - Canned well-formed replies for every stage
//!
//! It is compiled into the library so integration tests and downstream
//! crates can drive pipelines without a live generation service.

mod fixtures;
mod scripted;

pub use fixtures::{canned_reply, sample_item};
pub use scripted::ScriptedClient;
