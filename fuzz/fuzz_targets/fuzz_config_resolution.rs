//! Fuzz target for config parsing and profile resolution.
//!
//! Goal: Parsing and resolving `iacguard.toml` should **never panic**, whatever the
//! rule ids, severities, globs or profile names it names.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_config_resolution
//! ```

#![no_main]

use arbitrary::Arbitrary;
use iacguard_settings::{Overrides, parse_config_toml, resolve_config};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct ConfigInput {
    /// Raw config text.
    text: String,
    /// `--profile` override.
    profile: Option<String>,
    /// `--max-findings` override.
    max_findings: Option<u32>,
}

fuzz_target!(|input: ConfigInput| {
    if input.text.len() > 4096 {
        return;
    }

    let Ok(cfg) = parse_config_toml(&input.text) else {
        return;
    };
    let _ = resolve_config(
        cfg,
        Overrides {
            profile: input.profile,
            max_findings: input.max_findings,
        },
    );
});
