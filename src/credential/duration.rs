//! Compact duration strings used for expiry hints, e.g. `90s`, `1h30m`, `7d`.

use chrono::{DateTime, Duration, Utc};

use crate::errors::{CredentialError, Result};

/// Parse one or more `<integer><unit>` groups (`s`, `m`, `h`, `d`).
///
/// The total must be strictly positive so an expiry computed from it
/// always lies in the future.
pub fn parse_duration(input: &str) -> Result<Duration> {
    let invalid = || CredentialError::InvalidDuration(input.to_string());

    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(invalid());
    }

    let mut total = Duration::zero();
    let mut digits = String::new();

    for ch in trimmed.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        if digits.is_empty() {
            return Err(invalid());
        }

        let amount: i64 = digits.parse().map_err(|_| invalid())?;
        let part = match ch {
            's' => Duration::try_seconds(amount),
            'm' => Duration::try_minutes(amount),
            'h' => Duration::try_hours(amount),
            'd' => Duration::try_days(amount),
            _ => None,
        }
        .ok_or_else(invalid)?;

        total = total.checked_add(&part).ok_or_else(invalid)?;
        digits.clear();
    }

    // A trailing number without a unit is ambiguous.
    if !digits.is_empty() || total <= Duration::zero() {
        return Err(invalid());
    }

    Ok(total)
}

/// `now + duration`, rejecting results past the representable date range.
pub fn expiry_after(now: DateTime<Utc>, duration: Duration) -> Result<DateTime<Utc>> {
    now.checked_add_signed(duration)
        .ok_or_else(|| CredentialError::InvalidDuration(format_duration(duration)))
}

/// Render a duration in the same compact form `parse_duration` accepts.
pub fn format_duration(duration: Duration) -> String {
    let mut secs = duration.num_seconds();
    if secs <= 0 {
        return "0s".to_string();
    }

    let mut out = String::new();
    for (unit, size) in [('d', 86_400), ('h', 3_600), ('m', 60), ('s', 1)] {
        if secs >= size {
            out.push_str(&format!("{}{unit}", secs / size));
            secs %= size;
        }
    }
    out
}
