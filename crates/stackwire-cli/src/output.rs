//! Formatted output helpers for CLI commands.
//!
//! Renders manifests and resolutions in the configured format, plus
//! human-readable memory and duration formatting for plans.

use serde::Serialize;
use stackwire_common::config::OutputFormat;
use stackwire_descriptor::manifest::EnvironmentMap;
use stackwire_descriptor::{OutputManifest, Resolution};

/// Double line used under section headings.
pub const RULE: &str = "\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}";

/// Formats a size in megabytes (e.g., "512 MB", "1.5 GB").
#[must_use]
pub fn format_megabytes(mb: u32) -> String {
    if mb >= 1024 && mb % 1024 == 0 {
        format!("{} GB", mb / 1024)
    } else if mb >= 1024 {
        format!("{:.1} GB", f64::from(mb) / 1024.0)
    } else {
        format!("{mb} MB")
    }
}

/// Formats a duration in seconds with its largest whole unit (e.g., "15m").
#[must_use]
pub fn format_duration(secs: u32) -> String {
    match secs {
        s if s >= 3600 && s % 3600 == 0 => format!("{}h", s / 3600),
        s if s >= 60 && s % 60 == 0 => format!("{}m", s / 60),
        s => format!("{s}s"),
    }
}

/// Renders `name  value` pairs with the names padded to one column.
#[must_use]
pub fn aligned<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let pairs: Vec<_> = pairs.into_iter().collect();
    let width = pairs.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    pairs
        .iter()
        .map(|(k, v)| format!("{k:<width$}  {v}\n"))
        .collect()
}

fn structured<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<Option<String>> {
    Ok(match format {
        OutputFormat::Json => Some(serde_json::to_string_pretty(value)? + "\n"),
        OutputFormat::Yaml => Some(serde_yaml::to_string(value)?),
        OutputFormat::Text => None,
    })
}

/// Renders an output manifest.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_manifest(manifest: &OutputManifest, format: OutputFormat) -> anyhow::Result<String> {
    Ok(structured(manifest, format)?.unwrap_or_else(|| aligned(manifest.iter())))
}

/// Renders a full resolution: every resource, then the manifest.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_resolution(resolution: &Resolution, format: OutputFormat) -> anyhow::Result<String> {
    if let Some(rendered) = structured(resolution, format)? {
        return Ok(rendered);
    }

    let mut out = format!(
        "{} ({}, {} {})\n{RULE}\n",
        resolution.app, resolution.stage, resolution.platform, resolution.region
    );
    for resource in &resolution.resources {
        out.push_str(&format!("\n{} [{}]\n", resource.name, resource.kind));
        let attributes = aligned(
            resource
                .attributes
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        );
        for line in attributes.lines() {
            out.push_str(&format!("    {line}\n"));
        }
    }
    out.push_str("\nOutputs\n");
    for line in aligned(resolution.outputs.iter()).lines() {
        out.push_str(&format!("    {line}\n"));
    }
    Ok(out)
}

/// Renders an environment as dotenv-style `KEY=VALUE` lines, quoting
/// values that a shell would split.
#[must_use]
pub fn render_env(env: &EnvironmentMap) -> String {
    env.iter()
        .map(|(key, value)| format!("{key}={}\n", quote_env_value(value)))
        .collect()
}

fn quote_env_value(value: &str) -> String {
    let plain = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "-_./:@,+%=".contains(c));
    if plain {
        return value.to_string();
    }
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}
