use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use iacguard_types::TemplatePath;
use std::path::PathBuf;
use walkdir::{DirEntry, WalkDir};

const TEMPLATE_GLOB: &str = "**/*.template.json";

/// Directory names never descended into (bundled assets, dependency trees, VCS metadata).
const SKIPPED_DIR_GLOBS: &[&str] = &["asset.*", "node_modules", ".git"];

/// Discover synthesized templates under `root`, as root-relative paths in lexicographic order.
///
/// Nested cloud assemblies (`assembly-*` directories) are included.
pub fn discover_templates(root: &Utf8Path) -> anyhow::Result<Vec<TemplatePath>> {
    let templates = build_globset(&[TEMPLATE_GLOB]).context("compile template glob")?;
    let skipped = build_globset(SKIPPED_DIR_GLOBS).context("compile skipped dir globs")?;

    let mut out: Vec<TemplatePath> = Vec::new();
    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_skipped_dir(e, &skipped))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(abs) = pathbuf_to_utf8(entry.path().to_path_buf()) else {
            tracing::warn!(path = %entry.path().display(), "skipping non UTF-8 path");
            continue;
        };
        let rel = abs
            .strip_prefix(root)
            .unwrap_or(&abs)
            .as_str()
            .replace('\\', "/");
        if templates.is_match(&rel) {
            out.push(TemplatePath::new(&rel));
        }
    }

    // Stable order.
    out.sort();
    out.dedup();

    tracing::debug!(root = %root, templates = out.len(), "discovered templates");
    Ok(out)
}

fn is_skipped_dir(entry: &DirEntry, skipped: &GlobSet) -> bool {
    entry.file_type().is_dir() && entry.file_name().to_str().is_some_and(|n| skipped.is_match(n))
}

fn build_globset(patterns: &[&str]) -> anyhow::Result<GlobSet> {
    let mut b = GlobSetBuilder::new();
    for p in patterns {
        b.add(Glob::new(p)?);
    }
    Ok(b.build()?)
}

fn pathbuf_to_utf8(path: PathBuf) -> Option<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path).ok()
}
