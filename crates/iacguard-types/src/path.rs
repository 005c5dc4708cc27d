use camino::{Utf8Path, Utf8PathBuf};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const TEMPLATE_SUFFIX: &str = ".template.json";

/// Canonical input-relative path of a synthesized template, used in findings and reports.
///
/// Normalization rules:
/// - always forward slashes (`/`)
/// - no leading `./`
/// - empty input becomes `.`
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct TemplatePath(String);

impl Default for TemplatePath {
    fn default() -> Self {
        TemplatePath::new(".")
    }
}

impl TemplatePath {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        let mut v = s.as_ref().replace('\\', "/");
        while v.starts_with("./") {
            v = v.trim_start_matches("./").to_string();
        }
        if v.is_empty() {
            v = ".".to_string();
        }
        Self(v)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_utf8_pathbuf(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(self.0.clone())
    }

    /// Stack name derived from the file name: `cdk.out/Api.template.json` -> `Api`.
    ///
    /// Files without the `.template.json` suffix fall back to their file stem.
    pub fn stack_name(&self) -> &str {
        let file = self.0.rsplit('/').next().unwrap_or(&self.0);
        if let Some(stack) = file.strip_suffix(TEMPLATE_SUFFIX) {
            return stack;
        }
        file.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(file)
    }
}

impl std::fmt::Display for TemplatePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&Utf8Path> for TemplatePath {
    fn from(value: &Utf8Path) -> Self {
        TemplatePath::new(value.as_str())
    }
}

impl From<Utf8PathBuf> for TemplatePath {
    fn from(value: Utf8PathBuf) -> Self {
        TemplatePath::new(value.as_str())
    }
}
