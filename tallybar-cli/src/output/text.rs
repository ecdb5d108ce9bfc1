//! Human-readable text output rendering.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tallybar_core::{ProviderUsage, RateWindow};

const BAR_WIDTH: usize = 20;

/// Prints the usage map as text, one provider block per record.
pub fn print_usage(usage: &HashMap<String, ProviderUsage>, no_color: bool) {
    if usage.is_empty() {
        println!("No usage data");
        return;
    }

    let mut ids: Vec<&String> = usage.keys().collect();
    ids.sort();

    for id in ids {
        let record = &usage[id];
        print!("{}", render_record(record, no_color));
    }
}

fn render_record(record: &ProviderUsage, no_color: bool) -> String {
    let mut out = String::new();

    let mut header = record.display_name.clone();
    if let Some(version) = &record.version {
        header.push_str(&format!(" {version}"));
    }
    if let Some(email) = &record.account_email {
        header.push_str(&format!(" · {email}"));
    }
    if let Some(plan) = &record.account_plan {
        header.push_str(&format!(" ({plan})"));
    }
    out.push_str(&header);
    out.push('\n');

    if let Some(error) = &record.error {
        let mark = if no_color {
            "✗".to_string()
        } else {
            "\x1b[31m✗\x1b[0m".to_string()
        };
        out.push_str(&format!("  {mark} {error}\n"));
        return out;
    }

    match (&record.primary, &record.secondary) {
        (None, None) => out.push_str("  no usage data reported\n"),
        (primary, secondary) => {
            if let Some(window) = primary {
                out.push_str(&render_window(window, no_color));
            }
            if let Some(window) = secondary {
                out.push_str(&render_window(window, no_color));
            }
        }
    }

    if let Some(credits) = &record.credits {
        if credits.unlimited {
            out.push_str("  Credits: unlimited\n");
        } else {
            out.push_str(&format!("  Credits: {}\n", credits.balance));
        }
    }

    out
}

fn render_window(window: &RateWindow, no_color: bool) -> String {
    let label = window.reset_description.as_deref().unwrap_or("Usage");
    let remaining = window.remaining_percent();

    let mut line = format!(
        "  {label:<8} {} {:>3.0}% left",
        render_bar(remaining, no_color),
        remaining
    );

    if let Some(resets_at) = window.resets_at {
        line.push_str(&format!(" · resets {}", format_reset_time(resets_at, Utc::now())));
    }

    line.push('\n');
    line
}

/// Renders a fill bar of the remaining percentage.
fn render_bar(remaining_percent: f64, no_color: bool) -> String {
    let filled = ((remaining_percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);

    let bar = format!(
        "[{}{}]",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled)
    );

    if no_color {
        return bar;
    }

    // Green when plenty left, yellow when thin, red when nearly gone
    let color = if remaining_percent < 10.0 {
        "\x1b[31m"
    } else if remaining_percent < 25.0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };
    format!("{color}{bar}\x1b[0m")
}

/// Formats a reset instant relative to now ("in 2h 10m").
fn format_reset_time(reset: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = reset.signed_duration_since(now);

    if diff.num_seconds() <= 0 {
        return "now".to_string();
    }

    let hours = diff.num_hours();
    let minutes = diff.num_minutes() % 60;

    if hours < 1 {
        format!("in {}m", minutes.max(1))
    } else if hours < 24 {
        format!("in {hours}h {minutes}m")
    } else {
        format!("in {}d {}h", hours / 24, hours % 24)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tallybar_core::ProviderKind;

    #[test]
    fn test_format_reset_time() {
        let now = Utc::now();

        assert_eq!(format_reset_time(now - Duration::minutes(1), now), "now");
        assert_eq!(format_reset_time(now + Duration::minutes(30), now), "in 30m");
        assert_eq!(
            format_reset_time(now + Duration::hours(2) + Duration::minutes(10), now),
            "in 2h 10m"
        );
        assert_eq!(
            format_reset_time(now + Duration::days(3) + Duration::hours(4), now),
            "in 3d 4h"
        );
    }

    #[test]
    fn test_render_bar_plain() {
        assert_eq!(render_bar(100.0, true), format!("[{}]", "#".repeat(20)));
        assert_eq!(render_bar(0.0, true), format!("[{}]", "-".repeat(20)));
        assert_eq!(render_bar(50.0, true), "[##########----------]");
    }

    #[test]
    fn test_render_error_record() {
        let record = ProviderUsage::login_required(ProviderKind::Codex, "Run \"codex login\"");
        let out = render_record(&record, true);

        assert!(out.starts_with("Codex\n"));
        assert!(out.contains("✗ Run \"codex login\""));
    }

    #[test]
    fn test_render_window_clamps_display_remaining() {
        // Degenerate over-100 usage renders as 0% left, raw value untouched
        let window = RateWindow::new(130.0).labeled("Session");
        let out = render_window(&window, true);

        assert!(out.contains("0% left"));
        assert_eq!(window.used_percent, 130.0);
    }
}
