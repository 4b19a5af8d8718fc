//! 256-bit unsigned integer for intermediate products.
#![allow(clippy::all, clippy::pedantic, missing_docs)]

use uint::construct_uint;

construct_uint! {
    /// Little-endian 256-bit unsigned integer.
    pub struct U256(4);
}
