//! Thread-safe access to pools for off-chain services.
//!
//! [`SharedPool`] serializes writers on one pool while readers quote in
//! parallel.  [`PoolRegistry`] keys shared pools by [`PoolId`](crate::domain::PoolId).

mod registry;
mod shared_pool;

pub use registry::PoolRegistry;
pub use shared_pool::SharedPool;
