// domainsearch/tests/cli_integration.rs

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use tempfile::{NamedTempFile, TempDir};

/// Command isolated from the user's config files and DS_* variables.
fn domainsearch(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("domainsearch").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env_remove("RUST_LOG");
    for var in [
        "DS_HOST",
        "DS_PORT",
        "DS_TIMEOUT",
        "DS_SUFFIX",
        "DS_ONLY_AVAILABLE",
        "DS_PROGRESS",
        "DS_FAIL_FAST",
        "DS_CONFIG",
        "DS_FILE",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Helper to create a patterns file
fn create_patterns_file(lines: &[&str]) -> NamedTempFile {
    let file = NamedTempFile::new().expect("Failed to create temp file");
    fs::write(file.path(), lines.join("\n")).expect("Failed to write to temp file");
    file
}

/// Minimal WHOIS server: one connection per lookup, answers "No match for"
/// when the query is in `available`, a registration record otherwise.
fn spawn_whois_server(available: &'static [&'static str], connections: usize) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    thread::spawn(move || {
        for _ in 0..connections {
            let (mut socket, _) = listener.accept().unwrap();
            let mut buf = [0u8; 256];
            let n = socket.read(&mut buf).unwrap();
            let query = String::from_utf8_lossy(&buf[..n]).trim().to_string();
            let response = if available.contains(&query.as_str()) {
                format!("No match for \"{}\".\r\n", query.to_uppercase())
            } else {
                format!("Domain Name: {}\r\n", query.to_uppercase())
            };
            socket.write_all(response.as_bytes()).unwrap();
        }
    });
    port
}

#[test]
fn test_help_shows_flags() {
    let home = TempDir::new().unwrap();
    domainsearch(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--only"))
        .stdout(predicate::str::contains("--progress"))
        .stdout(predicate::str::contains("--host"))
        .stdout(predicate::str::contains("--fail-fast"));
}

#[test]
fn test_dry_run_expands_with_default_suffix() {
    let home = TempDir::new().unwrap();
    domainsearch(&home)
        .args(["-n", "re[dk]"])
        .assert()
        .success()
        .stdout("red.com\nrek.com\n");
}

#[test]
fn test_dry_run_keeps_explicit_tld() {
    let home = TempDir::new().unwrap();
    domainsearch(&home)
        .args(["--dry-run", "a?b.io"])
        .assert()
        .success()
        .stdout("b.io\nab.io\n");
}

#[test]
fn test_dry_run_custom_suffix() {
    let home = TempDir::new().unwrap();
    domainsearch(&home)
        .args(["-n", "--suffix", ".net", "x#"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("x0.net\nx1.net\n"))
        .stdout(predicate::str::ends_with("x9.net\n"));
}

#[test]
fn test_dry_run_json_lines() {
    let home = TempDir::new().unwrap();
    let output = domainsearch(&home)
        .args(["-n", "-j", "[xy]"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["status"], "candidate");
    assert_eq!(lines[0]["domain"], "x.com");
    assert_eq!(lines[1]["domain"], "y.com");
}

#[test]
fn test_invalid_pattern_exits_with_error() {
    let home = TempDir::new().unwrap();
    domainsearch(&home)
        .args(["-n", "re[dk"])
        .assert()
        .failure()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("no closing bracket"));
}

#[test]
fn test_invalid_pattern_does_not_stop_others() {
    let home = TempDir::new().unwrap();
    domainsearch(&home)
        .args(["-n", "?abc", "a[bc]"])
        .assert()
        .code(1)
        .stdout("ab.com\nac.com\n")
        .stderr(predicate::str::contains("'?' as the first character"));
}

#[test]
fn test_patterns_from_file() {
    let home = TempDir::new().unwrap();
    let file = create_patterns_file(&["// two letter names", "q[rs]", "", "zV?.io"]);
    let output = domainsearch(&home)
        .args(["-n", "-f"])
        .arg(file.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[..3], ["qr.com", "qs.com", "z.io"]);
    assert_eq!(lines.len(), 2 + 6);
}

#[test]
fn test_no_patterns_is_an_error() {
    let home = TempDir::new().unwrap();
    domainsearch(&home)
        .assert()
        .failure()
        .stderr(predicate::str::contains("You must specify patterns"));
}

#[test]
fn test_invalid_timeout_rejected() {
    let home = TempDir::new().unwrap();
    domainsearch(&home)
        .args(["--timeout", "soon", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timeout"));
}

#[test]
fn test_config_file_suffix() {
    let home = TempDir::new().unwrap();
    let config = create_patterns_file(&["[search]", "default_suffix = \".org\""]);
    domainsearch(&home)
        .args(["-n", "--config"])
        .arg(config.path())
        .arg("ab")
        .assert()
        .success()
        .stdout("ab.org\n");
}

#[test]
fn test_local_config_discovery() {
    let home = TempDir::new().unwrap();
    fs::write(
        home.path().join("domainsearch.toml"),
        "[search]\ndefault_suffix = \".dev\"\n",
    )
    .unwrap();
    domainsearch(&home)
        .args(["-n", "ab"])
        .assert()
        .success()
        .stdout("ab.dev\n");
}

#[test]
fn test_precedence_cli_over_env() {
    let home = TempDir::new().unwrap();
    domainsearch(&home)
        .env("DS_SUFFIX", ".net")
        .args(["-n", "ab"])
        .assert()
        .success()
        .stdout("ab.net\n");

    domainsearch(&home)
        .env("DS_SUFFIX", ".net")
        .args(["-n", "--suffix", ".io", "ab"])
        .assert()
        .success()
        .stdout("ab.io\n");
}

#[test]
fn test_lookup_against_local_server() {
    let home = TempDir::new().unwrap();
    let port = spawn_whois_server(&["rek.com"], 2);
    domainsearch(&home)
        .args(["--host", "127.0.0.1", "--port", &port.to_string(), "re[dk]"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- red.com"))
        .stdout(predicate::str::contains("✓ rek.com"))
        .stderr(predicate::str::contains(
            "2 candidates | 1 available | 1 registered | 0 failed",
        ));
}

#[test]
fn test_only_available_with_progress() {
    let home = TempDir::new().unwrap();
    let port = spawn_whois_server(&["rek.com"], 2);
    domainsearch(&home)
        .env("DS_PORT", port.to_string())
        .args(["--host", "127.0.0.1", "-o", "--progress", "re[dk]"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rek.com"))
        .stdout(predicate::str::contains("red.com").not())
        .stderr(predicate::str::contains("Count: 2 of 2"));
}

#[test]
fn test_unreachable_server_reports_failures() {
    let home = TempDir::new().unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    domainsearch(&home)
        .args(["--host", "127.0.0.1", "--port", &port.to_string(), "[ab]"])
        .assert()
        .success()
        .stdout(predicate::str::contains("! a.com (connection failed)"))
        .stdout(predicate::str::contains("! b.com (connection failed)"));

    domainsearch(&home)
        .args([
            "--host",
            "127.0.0.1",
            "--port",
            &port.to_string(),
            "--fail-fast",
            "[ab]",
        ])
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("a.com"));
}
