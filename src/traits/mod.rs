//! Core abstractions.
//!
//! - [`InvariantEvaluator`]: stateless pricing for one pool kind.
//! - [`FromConfig`]: configuration-driven construction.

mod from_config;
mod invariant;

pub use from_config::FromConfig;
pub use invariant::{InvariantEvaluator, validate_swap};
pub(crate) use invariant::reserve;
