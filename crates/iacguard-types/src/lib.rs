//! Stable DTOs and IDs used across the iacguard workspace.
//!
//! This crate is intentionally boring:
//! - data types for the emitted report
//! - stable string IDs for rules and finding codes
//! - canonical template path handling
//! - explain registry for remediation guidance

#![forbid(unsafe_code)]

pub mod explain;
pub mod ids;
pub mod path;
pub mod receipt;

pub use explain::{ExamplePair, Explanation, lookup_explanation};
pub use path::TemplatePath;
pub use receipt::{
    Finding, IacguardData, IacguardReport, NodeLocation, ReportEnvelope, RunMeta,
    SCHEMA_REPORT_V1, Severity, ToolMeta, Verdict, VerdictCounts, VerdictSummary,
};
