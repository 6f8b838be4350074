//! The system hosts file.
//!
//! Only bindings for hostnames the caller names are ever edited; comments,
//! blank lines and every other binding are written back untouched.

pub mod document;
pub mod store;

pub use document::{Binding, HostsDocument, HostsLine};
pub use store::HostsStore;
