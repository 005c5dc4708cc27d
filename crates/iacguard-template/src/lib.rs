//! Template adapters: discover synthesized templates and parse them into resource trees.
//!
//! This crate is allowed to do filesystem IO. Parsing is pure and exposed separately so it
//! can be fuzzed without touching the disk.

#![forbid(unsafe_code)]

mod discover;
mod parse;

use anyhow::Context;
use camino::Utf8Path;
use iacguard_domain::model::CloudAssembly;
use iacguard_types::TemplatePath;
use rayon::prelude::*;

pub use discover::discover_templates;
pub use parse::{TemplateError, parse_template};

/// Fuzz-friendly API for testing parsing robustness without filesystem access.
/// These functions are designed to never panic on any input.
pub mod fuzz {
    use super::*;

    /// Parse arbitrary text as a synthesized template.
    ///
    /// Returns `Ok(resource count)` for a structurally valid template, `Err(...)` otherwise.
    /// **Never panics** on any input.
    pub fn parse_template(text: &str) -> anyhow::Result<usize> {
        let path = TemplatePath::new("Fuzz.template.json");
        let tree = parse::parse_template(&path, text)?;
        Ok(tree.nodes().len())
    }
}

/// Build the cloud assembly used by the engine.
///
/// `input` is either a single template file or a directory (typically `cdk.out`) scanned
/// recursively for `*.template.json`. Template paths in the result are relative to the
/// directory, or the bare file name for a single file.
pub fn load_assembly(input: &Utf8Path) -> anyhow::Result<CloudAssembly> {
    let (root, templates) = if input.is_file() {
        let name = input
            .file_name()
            .with_context(|| format!("input has no file name: {input}"))?;
        let root = input.parent().unwrap_or(Utf8Path::new("."));
        (root, vec![TemplatePath::new(name)])
    } else if input.is_dir() {
        let templates = discover_templates(input).context("discover templates")?;
        (input, templates)
    } else {
        anyhow::bail!("input not found: {input}");
    };

    if templates.is_empty() {
        tracing::warn!(input = %input, "no *.template.json files found");
    }

    let stacks = templates
        .par_iter()
        .map(|rel| {
            let abs = root.join(rel.as_str());
            let text = std::fs::read_to_string(&abs).with_context(|| format!("read {abs}"))?;
            parse_template(rel, &text).with_context(|| format!("parse {}", rel.as_str()))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(CloudAssembly { stacks })
}
