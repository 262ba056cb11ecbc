//! Domain model for dashboard visibility resolution.
//!
//! # Responsibility
//! - Define the candidate row shape shared by every grant channel.
//! - Define entity-type descriptors and the closed set of per-type contributors.
//! - Define workflow task state consumed by task eligibility.
//!
//! # Invariants
//! - Candidate identity is `(id, type)`; `context_id` never participates.
//! - Descriptors are immutable once registered.

pub mod entity_type;
pub mod object_ref;
pub mod task;
