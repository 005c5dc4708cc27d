//! Use case orchestration for iacguard.
//!
//! This crate provides the application layer: use cases that coordinate the template adapter,
//! settings, domain and render layers. It is intentionally thin.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod check;
mod explain;
mod render;
mod report;
mod rules;
mod schema;

pub use check::{CheckInput, CheckOutput, run_check, verdict_exit_code};
pub use explain::{ExplainOutput, format_explanation, format_not_found, run_explain};
pub use render::{render_annotations, render_markdown};
pub use report::{parse_report_json, runtime_error_report, serialize_report};
pub use rules::{RuleSummary, format_rules, list_rules};
pub use schema::{config_schema_json, report_schema_json};

pub use iacguard_types::IacguardReport;
