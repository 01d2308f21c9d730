//! Human-readable sizes and durations, e.g. `"500 MB"` and `"10 minutes"`.

use stackwire_common::error::{Result, StackwireError};

fn split_quantity(text: &str) -> Option<(u64, &str)> {
    let text = text.trim();
    let digits_end = text
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(text.len(), |(idx, _)| idx);
    let amount = text[..digits_end].parse().ok()?;
    Some((amount, text[digits_end..].trim()))
}

/// Parses a memory size into megabytes. Accepts `MB` and `GB` units.
///
/// # Errors
///
/// Returns a malformed-descriptor error for an unknown unit or an amount
/// that does not fit.
pub fn parse_memory_mb(text: &str) -> Result<u32> {
    let invalid = || StackwireError::malformed(format!("invalid memory size: \"{text}\""));
    let (amount, unit) = split_quantity(text).ok_or_else(invalid)?;
    let megabytes = match unit {
        "MB" => amount,
        "GB" => amount.checked_mul(1024).ok_or_else(invalid)?,
        _ => return Err(invalid()),
    };
    u32::try_from(megabytes).map_err(|_| invalid())
}

/// Parses a duration into seconds. Accepts singular and plural `second`,
/// `minute`, `hour`, `day` and `week` units.
///
/// # Errors
///
/// Returns a malformed-descriptor error for an unknown unit or an amount
/// that does not fit.
pub fn parse_duration_secs(text: &str) -> Result<u32> {
    let invalid = || StackwireError::malformed(format!("invalid duration: \"{text}\""));
    let (amount, unit) = split_quantity(text).ok_or_else(invalid)?;
    let scale: u64 = match unit.trim_end_matches('s') {
        "second" => 1,
        "minute" => 60,
        "hour" => 3_600,
        "day" => 86_400,
        "week" => 604_800,
        _ => return Err(invalid()),
    };
    let seconds = amount.checked_mul(scale).ok_or_else(invalid)?;
    u32::try_from(seconds).map_err(|_| invalid())
}
