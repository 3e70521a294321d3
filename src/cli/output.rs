//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use chrono::{DateTime, Utc};
use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::credential::{format_duration, Credential, EntryState, StatusReport};

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

fn timestamp(ts: Option<DateTime<Utc>>) -> String {
    ts.map_or_else(
        || "-".to_string(),
        |t| t.format("%Y-%m-%d %H:%M:%S").to_string(),
    )
}

/// Print stored credential keys, one per line.
pub fn print_keys(keys: &[String]) {
    if keys.is_empty() {
        info("No credentials stored yet.");
        tip("Run `credkeep set <TYPE> <KEY>` to add your first credential.");
        return;
    }
    for key in keys {
        println!("{key}");
    }
}

/// Print a credential's metadata (never its value).
pub fn print_credential_info(key: &str, credential: &Credential, now: DateTime<Utc>) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Field", "Value"]);

    let expiry = match credential.time_until_expiry(now) {
        None => "never".to_string(),
        Some(left) if left > chrono::Duration::zero() => format!(
            "{} (in {})",
            timestamp(credential.expires_at),
            format_duration(left)
        ),
        Some(_) => format!("{} (expired)", timestamp(credential.expires_at)),
    };

    table.add_row(vec!["Key".to_string(), key.to_string()]);
    table.add_row(vec!["Type".to_string(), credential.credential_type.to_string()]);
    table.add_row(vec!["Description".to_string(), credential.description.clone()]);
    table.add_row(vec!["Created".to_string(), timestamp(Some(credential.created_at))]);
    table.add_row(vec!["Updated".to_string(), timestamp(Some(credential.updated_at))]);
    table.add_row(vec!["Expires".to_string(), expiry]);
    table.add_row(vec!["Encrypted".to_string(), credential.encrypted.to_string()]);
    for (k, v) in &credential.metadata {
        table.add_row(vec![format!("meta.{k}"), v.clone()]);
    }

    println!("{table}");
}

/// Print a status report as a table (Key, Type, State, Updated, Expires).
pub fn print_status_table(report: &StatusReport) {
    info(&format!(
        "{} — {} credential(s): {} active, {} expired, {} unreadable",
        report.service,
        report.total(),
        report.active(),
        report.expired(),
        report.unreadable()
    ));

    if report.entries.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Key", "Type", "State", "Updated", "Expires"]);

    for entry in &report.entries {
        let state = match entry.state {
            EntryState::Active => style("active").green().to_string(),
            EntryState::Expired => style("expired").yellow().to_string(),
            EntryState::Unreadable => style("unreadable").red().to_string(),
        };
        table.add_row(vec![
            entry.key.clone(),
            entry
                .credential_type
                .map_or_else(|| "-".to_string(), |t| t.to_string()),
            state,
            timestamp(entry.updated_at),
            entry
                .expires_at
                .map_or_else(|| "never".to_string(), |t| timestamp(Some(t))),
        ]);
    }

    println!("{table}");
}
