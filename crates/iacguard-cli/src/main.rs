//! CLI entry point for iacguard.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, logging setup and exit
//! codes. All business logic lives in the `iacguard-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand, ValueEnum};
use iacguard_app::{
    CheckInput, ExplainOutput, config_schema_json, format_rules, list_rules, parse_report_json,
    render_annotations, render_markdown, report_schema_json, run_check, run_explain,
    runtime_error_report, serialize_report, verdict_exit_code,
};
use iacguard_settings::Overrides;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "iacguard",
    version,
    about = "Compliance rule engine for synthesized CloudFormation/CDK templates"
)]
struct Cli {
    /// Path to iacguard config TOML (a missing file means defaults).
    #[arg(long, default_value = "iacguard.toml", global = true)]
    config: Utf8PathBuf,

    /// Override profile (strict|warn|audit).
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Override maximum findings to emit.
    #[arg(long, global = true)]
    max_findings: Option<u32>,

    /// Log at debug level (IACGUARD_LOG takes precedence when set).
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Log output format on stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SchemaKind {
    Report,
    Config,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate rules against synthesized templates and write artifacts.
    Check {
        /// A `*.template.json` file or a directory (e.g. `cdk.out`) to scan.
        #[arg(long, default_value = "cdk.out")]
        input: Utf8PathBuf,

        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/iacguard/report.json")]
        report_out: Utf8PathBuf,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/iacguard/comment.md")]
        markdown_out: Utf8PathBuf,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/iacguard/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render GitHub Actions annotations from an existing JSON report.
    Annotations {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/iacguard/report.json")]
        report: Utf8PathBuf,

        /// Maximum number of annotations to emit.
        #[arg(long, default_value = "10")]
        max: usize,
    },

    /// Explain a rule_id or code with remediation guidance.
    Explain {
        /// The rule_id (e.g., "s3.ssl_requests_only") or code (e.g., "tls_not_enforced").
        identifier: String,
    },

    /// List registered rules with their default severity and resource kinds.
    Rules,

    /// Print the JSON schema of the report or the config file.
    Schema {
        #[arg(value_enum, default_value_t = SchemaKind::Report)]
        kind: SchemaKind,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_format);

    let code = match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("iacguard error: {err:#}");
            1
        }
    };
    std::process::exit(code);
}

fn init_tracing(verbose: bool, format: LogFormat) {
    let filter = EnvFilter::try_from_env("IACGUARD_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "debug" } else { "warn" })
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn run(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.cmd {
        Commands::Check {
            input,
            report_out,
            write_markdown,
            markdown_out,
        } => cmd_check(cli, input, report_out, write_markdown.then_some(markdown_out.as_path())),
        Commands::Md { report, output } => cmd_md(report, output.as_deref()),
        Commands::Annotations { report, max } => cmd_annotations(report, *max),
        Commands::Explain { identifier } => Ok(cmd_explain(identifier)),
        Commands::Rules => {
            print!("{}", format_rules(&list_rules()));
            Ok(0)
        }
        Commands::Schema { kind } => {
            let text = match kind {
                SchemaKind::Report => report_schema_json()?,
                SchemaKind::Config => config_schema_json()?,
            };
            println!("{text}");
            Ok(0)
        }
    }
}

fn cmd_check(
    cli: &Cli,
    input: &Utf8Path,
    report_out: &Utf8Path,
    markdown_out: Option<&Utf8Path>,
) -> anyhow::Result<i32> {
    let result = (|| -> anyhow::Result<i32> {
        let cfg_text = read_config(&cli.config)?;

        let output = run_check(CheckInput {
            input,
            config_text: &cfg_text,
            overrides: Overrides {
                profile: cli.profile.clone(),
                max_findings: cli.max_findings,
            },
        })?;

        write_report_file(report_out, &output.report).context("write report json")?;
        if let Some(path) = markdown_out {
            write_text_file(path, &render_markdown(&output.report)).context("write markdown")?;
        }

        Ok(verdict_exit_code(output.report.verdict.status))
    })();

    result.inspect_err(|err| {
        let report = runtime_error_report(&format!("{err:#}"));
        if let Err(write_err) = write_report_file(report_out, &report) {
            tracing::warn!(error = %write_err, "could not write runtime error report");
        }
    })
}

/// Missing config file is allowed (defaults apply); any other read failure is an error.
fn read_config(path: &Utf8Path) -> anyhow::Result<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(config = %path, "no config file; using defaults");
            Ok(String::new())
        }
        Err(err) => Err(err).with_context(|| format!("read config: {path}")),
    }
}

fn write_report_file(path: &Utf8Path, report: &iacguard_app::IacguardReport) -> anyhow::Result<()> {
    let data = serialize_report(report)?;
    create_parent(path)?;
    std::fs::write(path, data).with_context(|| format!("write report: {}", path))?;
    Ok(())
}

fn write_text_file(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    create_parent(path)?;
    std::fs::write(path, text).with_context(|| format!("write text: {}", path))?;
    Ok(())
}

fn create_parent(path: &Utf8Path) -> anyhow::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => std::fs::create_dir_all(parent)
            .with_context(|| format!("create directory: {}", parent)),
        _ => Ok(()),
    }
}

fn read_report(path: &Utf8Path) -> anyhow::Result<iacguard_app::IacguardReport> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read report: {}", path))?;
    parse_report_json(&text)
}

fn cmd_md(report_path: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<i32> {
    let md = render_markdown(&read_report(report_path)?);

    match output {
        Some(out_path) => write_text_file(out_path, &md).context("write markdown output")?,
        None => print!("{}", md),
    }
    Ok(0)
}

fn cmd_annotations(report_path: &Utf8Path, max: usize) -> anyhow::Result<i32> {
    for annotation in render_annotations(&read_report(report_path)?, max) {
        println!("{}", annotation);
    }
    Ok(0)
}

fn cmd_explain(identifier: &str) -> i32 {
    match run_explain(identifier) {
        ExplainOutput::Found(exp) => {
            print!("{}", iacguard_app::format_explanation(&exp));
            0
        }
        ExplainOutput::NotFound {
            identifier,
            available_rule_ids,
            available_codes,
        } => {
            eprint!(
                "{}",
                iacguard_app::format_not_found(&identifier, available_rule_ids, available_codes)
            );
            1
        }
    }
}
