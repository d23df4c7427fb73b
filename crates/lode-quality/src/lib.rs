//! # lode-quality
//!
//! Quality gates for retrieved facts:
//!
//! - [`validator`]: structural and business-rule validation
//! - [`sanity`]: cross-field numeric plausibility rules
//! - [`repair`]: bounded, labelled heuristics for malformed deal records
//! - [`validated`]: the immutable accepted form of a payload

pub mod placeholders;
pub mod repair;
pub mod sanity;
pub mod validated;
pub mod validator;

pub use repair::{RepairOutcome, repair};
pub use sanity::check as sanity_check;
pub use validated::{Rejected, ValidatedFacts};
pub use validator::validate;
