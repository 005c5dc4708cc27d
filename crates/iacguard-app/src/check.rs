//! The `check` use case: load templates, evaluate rules and produce a report.

use anyhow::Context;
use camino::Utf8Path;
use iacguard_domain::report::DomainReport;
use iacguard_settings::{Overrides, ResolvedConfig};
use iacguard_types::{
    IacguardReport, ReportEnvelope, RunMeta, SCHEMA_REPORT_V1, Verdict, VerdictCounts,
    VerdictSummary,
};
use time::OffsetDateTime;

use crate::report::tool_meta;

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    /// A single `*.template.json` file or a directory such as `cdk.out`.
    pub input: &'a Utf8Path,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    /// The generated report.
    pub report: IacguardReport,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
}

/// Run the check use case: parse config, load templates, evaluate rules, produce report.
pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();

    // Empty config is allowed; defaults apply.
    let cfg = if input.config_text.trim().is_empty() {
        iacguard_settings::IacguardConfigV1::default()
    } else {
        iacguard_settings::parse_config_toml(input.config_text).context("parse config")?
    };

    let resolved = iacguard_settings::resolve_config(cfg, input.overrides.clone())
        .context("resolve config")?;

    let assembly = iacguard_template::load_assembly(input.input)
        .with_context(|| format!("load templates from {}", input.input))?;

    let DomainReport {
        verdict,
        findings,
        data,
        counts,
    } = iacguard_domain::evaluate(&assembly, &resolved.effective);

    let ended_at = OffsetDateTime::now_utc();
    let duration_ms = (ended_at - started_at).whole_milliseconds().max(0) as u64;

    tracing::info!(
        profile = %data.profile,
        templates = data.templates_scanned,
        findings = data.findings_emitted,
        ?verdict,
        "check finished"
    );

    let report = ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        run: RunMeta {
            started_at,
            ended_at: Some(ended_at),
            duration_ms: Some(duration_ms),
        },
        verdict: VerdictSummary {
            status: verdict,
            counts: VerdictCounts {
                info: counts.info,
                warning: counts.warning,
                error: counts.error,
                suppressed: counts.suppressed,
            },
            reasons: Vec::new(),
        },
        findings,
        data,
    };

    Ok(CheckOutput {
        report,
        resolved_config: resolved,
    })
}

/// Map verdict to exit code: 0 = pass/warn, 2 = fail.
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Pass => 0,
        Verdict::Warn => 0,
        Verdict::Fail => 2,
    }
}
