//! Pure compliance evaluation (no IO).
//!
//! Input: resource trees constructed elsewhere.
//! Output: findings + verdict + summary data.

#![forbid(unsafe_code)]

pub mod model;
pub mod policy;
pub mod report;
pub mod resolve;
pub mod rules;

pub mod iam;
pub mod statement;

mod emit;
mod engine;
mod fingerprint;

pub use engine::evaluate;
pub use fingerprint::fingerprint_for_node;

#[cfg(test)]
mod test_support;

#[cfg(test)]
mod properties;
