//! Network addressing for WSL instances.
//!
//! Handles subnet derivation and address/offset allocation. Creating the
//! virtual adapter itself is left to the caller.

pub mod allocator;
pub mod subnet;

pub use allocator::AddressAllocator;
pub use subnet::{is_within_subnet, Subnet};
