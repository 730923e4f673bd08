//! Tests for Runner
//!
//! These tests verify:
//! - Scenario composition per transport
//! - The full suite passes against a conforming server over TCP and UDP
//! - Failures are reported per scenario without stopping the run

#[path = "../common/mod.rs"]
mod common;

use mcprobe::runner::Outcome;
use mcprobe::suite;
use mcprobe::{Config, Runner, TransportKind};

use common::MockServer;

const STREAM_ONLY: [&str; 3] = [
    "recovers_from_errors_in_the_stream",
    "incomplete_command_results_in_error",
    "stream_closed_results_in_empty_response",
];

// =============================================================================
// Composition
// =============================================================================

#[test]
fn test_stream_runner_includes_stream_only_scenarios() {
    let server = MockServer::start();
    let runner = Runner::new(&server.config(TransportKind::Stream)).unwrap();
    let names = runner.scenario_names();

    assert_eq!(names.len(), suite::universal().len() + suite::stream_only().len());
    for name in STREAM_ONLY {
        assert!(names.contains(&name), "missing {}", name);
    }
}

#[test]
fn test_datagram_runner_excludes_stream_only_scenarios() {
    let server = MockServer::start();
    let runner = Runner::new(&server.config(TransportKind::Datagram)).unwrap();
    let names = runner.scenario_names();

    assert_eq!(names.len(), suite::universal().len());
    for name in STREAM_ONLY {
        assert!(!names.contains(&name), "unexpected {}", name);
    }
}

#[test]
fn test_stream_only_scenarios_are_flagged() {
    assert!(suite::stream_only().iter().all(|s| s.is_stream_only()));
    assert!(suite::universal().iter().all(|s| !s.is_stream_only()));
}

#[test]
fn test_filter_restricts_scenarios() {
    let server = MockServer::start();
    let runner = Runner::new(&server.config(TransportKind::Stream))
        .unwrap()
        .filter("expiry");

    assert_eq!(runner.scenario_names(), vec!["expiry", "expiry_at_epoch_time"]);
}

#[test]
fn test_unresolvable_server_is_config_error() {
    let config = Config::builder()
        .server_addr("not an address")
        .transport(TransportKind::Stream)
        .build();

    assert!(matches!(Runner::new(&config), Err(mcprobe::ProbeError::Config(_))));
}

// =============================================================================
// Full Runs Against A Conforming Server
// =============================================================================

fn assert_all_passed(report: &mcprobe::Report) {
    for result in &report.results {
        assert_eq!(result.outcome, Outcome::Passed, "{}", result);
    }
    assert!(report.is_success());
}

#[test]
fn test_full_suite_over_stream() {
    let server = MockServer::start();
    let runner = Runner::new(&server.config(TransportKind::Stream)).unwrap();

    let report = runner.run();
    assert_eq!(report.results.len(), runner.scenario_names().len());
    assert_all_passed(&report);
}

#[test]
fn test_full_suite_over_datagram() {
    let server = MockServer::start();
    let runner = Runner::new(&server.config(TransportKind::Datagram)).unwrap();

    let report = runner.run();
    assert_eq!(report.results.len(), suite::universal().len());
    assert_all_passed(&report);
}

// =============================================================================
// Failure Reporting
// =============================================================================

#[test]
fn test_mismatches_fail_scenarios_but_run_continues() {
    let addr = common::canned_tcp_server(b"ERROR\r\n");
    let config = Config::builder()
        .server_addr(addr.to_string())
        .transport(TransportKind::Stream)
        .read_timeout_ms(2000)
        .build();
    let runner = Runner::new(&config).unwrap();

    let mut seen = Vec::new();
    let report = runner.run_with(|result| seen.push(result.name));

    // Every scenario ran and was reported as it finished
    assert_eq!(seen, runner.scenario_names());
    assert!(!report.is_success());

    // A server that always says ERROR happens to satisfy this one
    assert_eq!(report.outcome("error_handling"), Some(&Outcome::Passed));
    assert!(matches!(
        report.outcome("basic_commands"),
        Some(Outcome::Failed(_))
    ));
    assert_eq!(report.passed() + report.failed(), report.results.len());
}

#[test]
fn test_server_losing_sync_after_parse_error_fails_recovery() {
    // Keeps answering ERROR after the malformed line instead of END
    let addr = common::line_echo_server(b"ERROR\r\n");
    let config = Config::builder()
        .server_addr(addr.to_string())
        .transport(TransportKind::Stream)
        .read_timeout_ms(2000)
        .build();
    let runner = Runner::new(&config)
        .unwrap()
        .filter("recovers_from_errors_in_the_stream");

    let report = runner.run();
    assert_eq!(report.results.len(), 1);

    match report.outcome("recovers_from_errors_in_the_stream") {
        Some(Outcome::Failed(reason)) => assert!(reason.contains("get key"), "{}", reason),
        other => panic!("Expected Failed, got {:?}", other),
    }
}

#[test]
fn test_transport_errors_reported_as_errored() {
    // Nothing listens here, so every UDP call times out
    let socket = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
    let addr = socket.local_addr().unwrap();

    let config = Config::builder()
        .server_addr(addr.to_string())
        .transport(TransportKind::Datagram)
        .read_timeout_ms(100)
        .build();
    let runner = Runner::new(&config).unwrap().filter("get_missing_key");

    let report = runner.run();
    assert_eq!(report.results.len(), 1);
    assert!(matches!(
        report.outcome("get_missing_key"),
        Some(Outcome::Errored(_))
    ));
    drop(socket);
}

#[test]
fn test_report_summary_line() {
    let server = MockServer::start();
    let runner = Runner::new(&server.config(TransportKind::Stream))
        .unwrap()
        .filter("error_handling");

    let report = runner.run();
    let summary = report.to_string();
    assert!(summary.starts_with("Ran 1 scenarios in "), "{}", summary);
    assert!(summary.ends_with("1 passed, 0 failed"), "{}", summary);
    assert_eq!(report.results[0].to_string(), "error_handling ... ok");
}
