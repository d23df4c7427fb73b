//! # lode-cache
//!
//! Request fingerprinting and the result-cache contract.
//!
//! - [`fingerprint()`] derives a stable digest from a request, model and
//!   search parameters
//! - [`ResultCache`] is the `get`/`set(ttl)` boundary every backend
//!   implements; [`MemoryCache`] is the in-process backend
//! - [`SizeGuardedCache`] enforces the payload ceiling before any write

mod error;
pub mod fingerprint;
mod memory;
mod store;

pub use error::CacheError;
pub use fingerprint::{Fingerprint, canonical_json, fingerprint, fingerprint_value};
pub use memory::MemoryCache;
pub use store::{ResultCache, SizeGuardedCache};
