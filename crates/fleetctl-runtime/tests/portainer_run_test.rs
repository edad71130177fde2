//! End-to-end tests of the runner over real HTTP.
//!
//! A minimal stub server on `127.0.0.1` answers a scripted sequence of
//! responses, one connection per request, and records what it received:
//! 1. Inventory listing (URL, API key header, `all=true`)
//! 2. Inventory failures (non-2xx status, unparsable body)
//! 3. Start/stop requests issued per matched container

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::JoinHandle;

use fleetctl_common::config::{EnvSettings, FleetConfig};
use fleetctl_common::error::FleetError;
use fleetctl_runtime::api::ContainerApi;
use fleetctl_runtime::client::PortainerClient;
use fleetctl_runtime::runner::{self, ActionOutcome};

// ── Stub server ─────────────────────────────────────────────────────

#[derive(Debug)]
struct RecordedRequest {
    method: String,
    path: String,
    api_key: Option<String>,
}

struct StubServer {
    base_url: String,
    handle: JoinHandle<Vec<RecordedRequest>>,
}

impl StubServer {
    fn spawn(responses: Vec<(u16, &'static str)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
        let addr = listener.local_addr().expect("local addr");

        let handle = std::thread::spawn(move || {
            let mut recorded = Vec::new();
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().expect("accept");
                recorded.push(read_request(&mut stream));
                let response = format!(
                    "HTTP/1.1 {status} Stub\r\n\
                     Content-Type: application/json\r\n\
                     Content-Length: {}\r\n\
                     Connection: close\r\n\r\n{body}",
                    body.len()
                );
                stream.write_all(response.as_bytes()).expect("write response");
            }
            recorded
        });

        Self {
            base_url: format!("http://{addr}/api"),
            handle,
        }
    }

    fn finish(self) -> Vec<RecordedRequest> {
        self.handle.join().expect("stub server thread")
    }
}

fn read_request(stream: &mut std::net::TcpStream) -> RecordedRequest {
    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    let _ = reader.read_line(&mut line).expect("request line");
    let mut parts = line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_owned();
    let path = parts.next().unwrap_or_default().to_owned();

    let mut api_key = None;
    let mut content_length = 0usize;
    loop {
        let mut header = String::new();
        let _ = reader.read_line(&mut header).expect("header line");
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            let value = value.trim();
            if name.eq_ignore_ascii_case("x-api-key") {
                api_key = Some(value.to_owned());
            } else if name.eq_ignore_ascii_case("content-length") {
                content_length = value.parse().unwrap_or(0);
            }
        }
    }

    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).expect("request body");

    RecordedRequest {
        method,
        path,
        api_key,
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

const INVENTORY: &str = r#"[
    {"Id": "aaa", "Names": ["/web"], "Labels": {"autoshutdown": "night"}, "State": "running"},
    {"Id": "bbb", "Names": ["/db"], "Labels": {"autoshutdown": "weekend"}, "State": "exited"},
    {"Id": "ccc", "Names": ["/cache"], "Labels": {"autoshutdown": "never"}, "State": "running"},
    {"Names": ["/ghost"], "Labels": {"autoshutdown": "night"}, "State": "running"},
    {"Id": "ddd", "Names": null, "Labels": {"autoshutdown": "night"}, "State": "paused"}
]"#;

fn config(base_url: &str, action: &str, dry_run: bool) -> FleetConfig {
    FleetConfig::resolve(EnvSettings {
        url: Some(base_url.to_owned()),
        api_key: Some("ptr_test_key".to_owned()),
        endpoint_id: Some("7".to_owned()),
        action: Some(action.to_owned()),
        target_label: Some("autoshutdown=night, weekend".to_owned()),
        dry_run: Some(dry_run.to_string()),
        ..EnvSettings::default()
    })
    .expect("resolve config")
}

fn client(config: &FleetConfig) -> PortainerClient {
    PortainerClient::with_builder(config, reqwest::blocking::Client::builder().no_proxy())
        .expect("build client")
}

// ── Inventory ───────────────────────────────────────────────────────

#[test]
fn inventory_request_carries_key_and_all_flag() {
    let server = StubServer::spawn(vec![(200, "[]")]);
    let cfg = config(&server.base_url, "stop", false);

    let containers = client(&cfg).list_containers().expect("list");
    assert!(containers.is_empty());

    let requests = server.finish();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(
        requests[0].path,
        "/api/endpoints/7/docker/containers/json?all=true"
    );
    assert_eq!(requests[0].api_key.as_deref(), Some("ptr_test_key"));
}

#[test]
fn inventory_error_status_aborts_before_actions() {
    let server = StubServer::spawn(vec![(403, r#"{"message":"Access denied"}"#)]);
    let cfg = config(&server.base_url, "stop", false);

    let err = runner::run(&client(&cfg), &cfg).unwrap_err();
    match err {
        FleetError::Retrieval { status, body } => {
            assert_eq!(status, 403);
            assert!(body.contains("Access denied"));
        }
        other => panic!("expected retrieval error, got {other:?}"),
    }
    assert_eq!(server.finish().len(), 1);
}

#[test]
fn unparsable_inventory_is_fatal() {
    let server = StubServer::spawn(vec![(200, "<html>login</html>")]);
    let cfg = config(&server.base_url, "start", false);

    let err = runner::run(&client(&cfg), &cfg).unwrap_err();
    assert!(matches!(err, FleetError::ParseInventory { .. }));
    assert_eq!(server.finish().len(), 1);
}

// ── Actions ─────────────────────────────────────────────────────────

#[test]
fn stop_posts_for_each_eligible_match() {
    let server = StubServer::spawn(vec![(200, INVENTORY), (204, ""), (500, "{}")]);
    let cfg = config(&server.base_url, "stop", false);

    let report = runner::run(&client(&cfg), &cfg).expect("run");
    let requests = server.finish();

    let posts: Vec<(&str, &str)> = requests[1..]
        .iter()
        .map(|r| (r.method.as_str(), r.path.as_str()))
        .collect();
    assert_eq!(
        posts,
        [
            ("POST", "/api/endpoints/7/docker/containers/aaa/stop"),
            ("POST", "/api/endpoints/7/docker/containers/ddd/stop"),
        ]
    );
    assert!(requests.iter().all(|r| r.api_key.as_deref() == Some("ptr_test_key")));

    assert_eq!(report.len(), 3);
    assert_eq!(report.entries()[0].outcome, ActionOutcome::Completed { status: 204 });
    assert_eq!(report.entries()[1].outcome, ActionOutcome::Skipped);
    assert!(matches!(report.entries()[2].outcome, ActionOutcome::Failed(_)));
    assert_eq!(report.entries()[2].container.display_name(), "ddd");
}

#[test]
fn start_dry_run_only_lists() {
    let server = StubServer::spawn(vec![(200, INVENTORY)]);
    let cfg = config(&server.base_url, "start", true);

    let report = runner::run(&client(&cfg), &cfg).expect("run");
    assert_eq!(server.finish().len(), 1);
    assert_eq!(report.dry_run(), 2);
    assert_eq!(report.skipped(), 1);
}

#[test]
fn unknown_action_fetches_but_never_posts() {
    let server = StubServer::spawn(vec![(200, INVENTORY)]);
    let cfg = config(&server.base_url, "restart", false);

    let err = runner::run(&client(&cfg), &cfg).unwrap_err();
    assert!(matches!(err, FleetError::UnknownAction { .. }));
    assert_eq!(server.finish().len(), 1);
}
