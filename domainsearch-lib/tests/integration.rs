// domainsearch-lib/tests/integration.rs

//! Integration tests for domainsearch-lib exports and end-to-end searches

use domainsearch_lib::{
    compile, estimate_pattern_count, expand_pattern, CollectingReporter, DomainSearchError,
    DomainSearcher, LookupStatus, Outcome, SearchConfig, WhoisClient, WhoisServer,
};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Loopback WHOIS server answering `connections` queries; names in
/// `available` get the "No match for" response.
async fn whois_server(available: &'static [&'static str], connections: usize) -> WhoisServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        for _ in 0..connections {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 256];
            let n = socket.read(&mut buf).await.unwrap();
            let query = String::from_utf8_lossy(&buf[..n]).trim().to_string();
            let response = if available.contains(&query.as_str()) {
                format!("No match for \"{}\".\r\n", query.to_uppercase())
            } else {
                format!("Domain Name: {}\r\nRegistrar: Example\r\n", query.to_uppercase())
            };
            socket.write_all(response.as_bytes()).await.unwrap();
        }
    });
    WhoisServer::new("127.0.0.1", port)
}

// ── Expansion ────────────────────────────────────────────────────────────────

#[test]
fn test_two_digits_in_order() {
    let names = expand_pattern("##").unwrap();
    assert_eq!(names.len(), 100);
    assert_eq!(names.first().map(String::as_str), Some("00"));
    assert_eq!(names[42], "42");
    assert_eq!(names.last().map(String::as_str), Some("99"));
}

#[test]
fn test_letters_and_sets() {
    let letters = expand_pattern("A").unwrap();
    assert_eq!(letters.len(), 26);
    assert_eq!(letters.concat(), "abcdefghijklmnopqrstuvwxyz");

    assert_eq!(expand_pattern("[xyz]").unwrap(), vec!["x", "y", "z"]);
    assert_eq!(expand_pattern("re[dk]").unwrap(), vec!["red", "rek"]);
}

#[test]
fn test_optional_slots() {
    assert_eq!(expand_pattern("a?b").unwrap(), vec!["b", "ab"]);

    let names = expand_pattern("A?b").unwrap();
    assert_eq!(names.len(), 27);
    assert_eq!(names[0], "b");
    assert_eq!(names[1], "ab");
    assert_eq!(names[26], "zb");
}

#[test]
fn test_trivial_patterns_yield_themselves() {
    for pattern in ["abc", "example.com", "x-y.io"] {
        let compiled = compile(pattern).unwrap();
        assert!(compiled.is_trivial());
        assert_eq!(compiled.candidates().collect::<Vec<_>>(), vec![pattern]);
    }
}

#[test]
fn test_count_matches_enumeration() {
    let corpus = [
        "", "a", "##", "A?b", "[xyz]#", "C?V?", "get*", "[ab]?c[dd]", "re[dk].com", "#?#?#?",
    ];
    for pattern in corpus {
        let compiled = compile(pattern).unwrap();
        let produced = compiled.candidates().count() as u128;
        assert_eq!(produced, compiled.combination_count(), "{:?}", pattern);
        assert_eq!(estimate_pattern_count(pattern).unwrap(), produced);
    }
}

#[test]
fn test_enumeration_is_restartable() {
    let compiled = compile("C?V").unwrap();
    let first: Vec<String> = compiled.candidates().collect();
    let second: Vec<String> = compiled.candidates().collect();
    assert_eq!(first, second);

    for (i, name) in first.iter().enumerate() {
        assert_eq!(compiled.candidate_at(i as u128).as_ref(), Some(name));
    }
    assert_eq!(compiled.candidate_at(first.len() as u128), None);
}

#[test]
fn test_malformed_patterns_rejected() {
    for bad in ["[ab", "ab]", "?abc", "a??b", "[a[b]]", "x[]"] {
        match compile(bad) {
            Err(DomainSearchError::PatternCompile { pattern, .. }) => assert_eq!(pattern, bad),
            other => panic!("{:?} should not compile: {:?}", bad, other),
        }
    }
}

// ── Searching ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_dry_run_end_to_end() {
    let searcher = DomainSearcher::new(
        SearchConfig::default()
            .with_dry_run(true)
            // nothing listens here; a dry run must not connect
            .with_server(WhoisServer::new("127.0.0.1", 9)),
    );
    let mut reporter = CollectingReporter::new();

    let summary = searcher.search_pattern("re[dk]", &mut reporter).await.unwrap();

    assert_eq!(reporter.domains(), vec!["red.com", "rek.com"]);
    assert_eq!(summary.pattern, "re[dk].com");
    assert_eq!(summary.processed, 2);
    assert_eq!(summary.failed, 0);
}

#[tokio::test]
async fn test_search_against_local_server() {
    let server = whois_server(&["rek.com"], 2).await;
    let searcher = DomainSearcher::new(
        SearchConfig::default()
            .with_server(server)
            .with_timeout(Some(Duration::from_secs(5))),
    );
    let mut reporter = CollectingReporter::new();

    let summary = searcher.search_pattern("re[dk]", &mut reporter).await.unwrap();

    assert_eq!(
        reporter.outcomes,
        vec![
            Outcome::Registered {
                domain: "red.com".to_string()
            },
            Outcome::Available {
                domain: "rek.com".to_string()
            },
        ]
    );
    assert_eq!(summary.available, 1);
    assert_eq!(summary.registered, 1);
}

#[tokio::test]
async fn test_multi_pattern_run_skips_bad_patterns() {
    let server = whois_server(&["b.io"], 2).await;
    let searcher = DomainSearcher::new(
        SearchConfig::default()
            .with_server(server)
            .with_only_available(true),
    );
    let mut reporter = CollectingReporter::new();
    let patterns = vec!["a??b".to_string(), "a?b.io".to_string()];

    let run = searcher.search_patterns(&patterns, &mut reporter).await.unwrap();

    assert_eq!(run.rejected, 1);
    assert_eq!(run.processed(), 2);
    assert_eq!(run.available(), 1);
    assert_eq!(reporter.domains(), vec!["b.io"]);
}

#[tokio::test]
async fn test_client_classifies_responses() {
    let server = whois_server(&["free.com"], 2).await;
    let client = WhoisClient::new(server);
    assert_eq!(client.lookup("free.com").await.unwrap(), LookupStatus::Available);
    assert_eq!(client.lookup("taken.com").await.unwrap(), LookupStatus::Registered);
}

#[test]
fn test_library_info() {
    let info = domainsearch_lib::info();
    assert_eq!(info.version, domainsearch_lib::VERSION);
    assert_eq!(info.default_server, "whois.crsnic.net:43");
}
