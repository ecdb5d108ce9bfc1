//! End-to-end fetch chain tests against stand-in CLI binaries.
//!
//! Each test generates a small shell script that impersonates the
//! provider CLI, then points a fetcher at it. This exercises the whole
//! cascade - version probe, JSON stage, RPC stage, text scrape - the
//! same way the real tools are driven.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::time::{Duration, Instant};

use chrono::{TimeZone, Utc};
use tallybar_fetch::FetchContext;
use tallybar_providers::descriptor::CliConfig;
use tallybar_providers::{ClaudeUsageFetcher, CodexUsageFetcher};
use tempfile::TempDir;

/// Writes an executable fake CLI script and returns its config.
fn fake_cli(dir: &TempDir, script_body: &str) -> CliConfig {
    let path = dir.path().join("fakecli");
    fs::write(&path, format!("#!/bin/sh\n{script_body}")).unwrap();

    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();

    CliConfig::new(path.to_string_lossy().to_string())
}

fn codex_cli(dir: &TempDir, script_body: &str) -> CliConfig {
    CliConfig {
        rpc_args: Some(
            ["-s", "read-only", "-a", "untrusted", "app-server"]
                .iter()
                .map(ToString::to_string)
                .collect(),
        ),
        ..fake_cli(dir, script_body)
    }
}

const RPC_PAYLOAD: &str = r#"{"account":{"type":"chatgpt","email":"dev@example.com","planType":"pro"},"primary":{"usedPercent":28.5,"windowDurationMins":300,"resetsAt":1700000000},"secondary":{"usedPercent":59.0,"windowDurationMins":10080}}"#;

#[tokio::test]
async fn invalid_json_stage_falls_through_to_rpc() {
    let dir = TempDir::new().unwrap();
    let script = format!(
        r#"for arg in "$@"; do
  if [ "$arg" = "app-server" ]; then
    echo '{RPC_PAYLOAD}'
    exit 0
  fi
done
case "$1" in
  --version)
    echo "fakecodex 9.9.9"
    ;;
  status)
    if [ "$2" = "--json" ]; then
      echo '{{ this is not json'
    else
      echo "Session: 41%"
    fi
    ;;
esac
"#
    );
    let fetcher = CodexUsageFetcher::with_cli(codex_cli(&dir, &script));
    let ctx = FetchContext::new();

    let usage = fetcher.fetch(&ctx).await;

    // The RPC stage's data must win over the later text stage
    assert!(usage.error.is_none());
    assert_eq!(usage.version.as_deref(), Some("9.9.9"));

    let primary = usage.primary.expect("primary window from RPC");
    assert_eq!(primary.used_percent, 28.5);
    assert_eq!(primary.window_minutes, Some(300));
    assert_eq!(primary.reset_description.as_deref(), Some("Session"));
    assert_eq!(
        primary.resets_at,
        Some(Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap())
    );

    let secondary = usage.secondary.expect("secondary window from RPC");
    assert_eq!(secondary.used_percent, 59.0);
    assert_eq!(secondary.reset_description.as_deref(), Some("Weekly"));

    assert_eq!(usage.account_email.as_deref(), Some("dev@example.com"));
    assert_eq!(usage.account_plan.as_deref(), Some("pro"));
}

#[tokio::test]
async fn silent_rpc_times_out_and_falls_through_to_text() {
    let dir = TempDir::new().unwrap();
    let script = r#"for arg in "$@"; do
  if [ "$arg" = "app-server" ]; then
    sleep 30
    exit 0
  fi
done
case "$1" in
  --version)
    echo "fakecodex 9.9.9"
    ;;
  status)
    if [ "$2" = "--json" ]; then
      echo '{ this is not json'
    else
      echo "Session usage: 41%"
      echo "Weekly usage: 12%"
      echo "Email: dev@example.com"
    fi
    ;;
esac
"#;
    let fetcher = CodexUsageFetcher::with_cli(codex_cli(&dir, script));
    let ctx = FetchContext::builder()
        .timeout(Duration::from_millis(500))
        .build();

    let start = Instant::now();
    let usage = fetcher.fetch(&ctx).await;

    // The hung subprocess must be killed, not waited out
    assert!(start.elapsed() < Duration::from_secs(10));

    assert!(usage.error.is_none());
    assert_eq!(usage.primary.expect("primary from text").used_percent, 41.0);
    assert_eq!(usage.secondary.expect("secondary from text").used_percent, 12.0);
    assert_eq!(usage.account_email.as_deref(), Some("dev@example.com"));
}

#[tokio::test]
async fn json_stage_success_short_circuits() {
    let dir = TempDir::new().unwrap();
    let script = r#"case "$1" in
  --version)
    echo "fakecodex 2.0.0"
    ;;
  status)
    if [ "$2" = "--json" ]; then
      echo '{"primary":{"usedPercent":10.5},"account":{"email":"json@example.com"}}'
    else
      echo "Session: 99%"
    fi
    ;;
esac
"#;
    let fetcher = CodexUsageFetcher::with_cli(codex_cli(&dir, script));
    let ctx = FetchContext::new();

    let usage = fetcher.fetch(&ctx).await;

    // Richest stage answered; the text stage's numbers never appear
    assert_eq!(usage.primary.expect("primary from JSON").used_percent, 10.5);
    assert_eq!(usage.account_email.as_deref(), Some("json@example.com"));
    assert_eq!(usage.version.as_deref(), Some("2.0.0"));
}

#[tokio::test]
async fn failed_version_probe_is_terminal() {
    let dir = TempDir::new().unwrap();
    // Version command fails; nothing else should even be attempted
    let script = r#"case "$1" in
  --version)
    exit 1
    ;;
  *)
    echo "Session: 50%"
    ;;
esac
"#;
    let fetcher = CodexUsageFetcher::with_cli(codex_cli(&dir, script));
    let ctx = FetchContext::new();

    let usage = fetcher.fetch(&ctx).await;

    assert!(usage.needs_login);
    assert!(usage.error.as_deref().unwrap().contains("codex login"));
    assert!(usage.primary.is_none());
    assert!(usage.version.is_none());
}

#[tokio::test]
async fn text_stage_converts_its_own_failure_into_needs_login() {
    let dir = TempDir::new().unwrap();
    // Version works, everything after it fails
    let script = r#"case "$1" in
  --version)
    echo "fakecodex 3.1.4"
    ;;
  *)
    exit 2
    ;;
esac
"#;
    // No RPC mode configured: JSON fails, text catches
    let fetcher = CodexUsageFetcher::with_cli(fake_cli(&dir, script));
    let ctx = FetchContext::new();

    let usage = fetcher.fetch(&ctx).await;

    assert!(usage.needs_login);
    assert!(usage.error.as_deref().unwrap().contains("login"));
    // Partial metadata survives on failure records, window data does not
    assert_eq!(usage.version.as_deref(), Some("3.1.4"));
    assert!(usage.primary.is_none());
    assert!(usage.secondary.is_none());
}

#[tokio::test]
async fn fetch_always_yields_a_stamped_record() {
    let dir = TempDir::new().unwrap();
    // Every invocation misbehaves differently
    let script = r#"case "$1" in
  --version)
    echo "no digits here"
    ;;
  status)
    if [ "$2" = "--json" ]; then
      echo 'null'
    else
      echo "weird output with no percentages"
    fi
    ;;
esac
"#;
    let fetcher = CodexUsageFetcher::with_cli(fake_cli(&dir, script));
    let ctx = FetchContext::new();

    let before = Utc::now();
    let usage = fetcher.fetch(&ctx).await;

    // Version pattern missing is not a probe failure
    assert_eq!(usage.version.as_deref(), Some("unknown"));
    // Text stage ran and found nothing: no windows, but a valid record
    assert!(usage.primary.is_none());
    assert!(usage.updated_at >= before);
}

#[tokio::test]
async fn claude_chain_runs_without_rpc_stage() {
    let dir = TempDir::new().unwrap();
    let script = r#"case "$1" in
  --version)
    echo "1.0.128 (fakeclaude)"
    ;;
  usage)
    if [ "$2" = "--json" ]; then
      echo '{"session":{"used_percent":63.0,"resets_at":"2023-11-14T22:13:20Z"},"weekly":{"used_percent":9.5},"account":{"email":"me@example.com","plan":"Max"}}'
    else
      echo "Session: 1%"
    fi
    ;;
esac
"#;
    let cli = CliConfig {
        status_json_args: vec!["usage".to_string(), "--json".to_string()],
        status_args: vec!["usage".to_string()],
        ..fake_cli(&dir, script)
    };
    let fetcher = ClaudeUsageFetcher::with_cli(cli);
    let ctx = FetchContext::new();

    let usage = fetcher.fetch(&ctx).await;

    assert_eq!(usage.provider_id, "claude");
    assert_eq!(usage.version.as_deref(), Some("1.0.128"));

    let primary = usage.primary.expect("primary from JSON");
    assert_eq!(primary.used_percent, 63.0);
    assert_eq!(
        primary.resets_at,
        Some(Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap())
    );
    assert_eq!(usage.account_plan.as_deref(), Some("Max"));
}
