//! Render use cases: markdown and GitHub annotations from in-memory reports.

use iacguard_types::IacguardReport;

pub fn render_markdown(report: &IacguardReport) -> String {
    iacguard_render::render_markdown(report)
}

pub fn render_annotations(report: &IacguardReport, max: usize) -> Vec<String> {
    iacguard_render::render_github_annotations(report)
        .into_iter()
        .take(max)
        .collect()
}
