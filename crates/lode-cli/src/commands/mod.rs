pub mod audit;
pub mod cache;
pub mod dispatch;
pub mod fingerprint;
pub mod research;
