//! In-process fake RPaaS API and command runner for tests.
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use clap::Parser;

use crate::cli::{Cli, OutputCtx};
use crate::commands;
use crate::config::AppConfig;
use crate::errors::RpaasError;

/// A request as the fake API received it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is JSON")
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Clone)]
struct Reply {
    status: StatusCode,
    body: String,
    content_type: &'static str,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// HTTP server on an ephemeral port that records every request and answers
/// all of them with the same canned response. Stops when dropped.
pub struct MockApi {
    _runtime: tokio::runtime::Runtime,
    url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockApi {
    pub fn json(status: StatusCode, body: &serde_json::Value) -> Self {
        Self::start(status, body.to_string(), "application/json")
    }

    pub fn text(status: StatusCode, body: &str) -> Self {
        Self::start(status, body.to_owned(), "text/plain")
    }

    pub fn empty(status: StatusCode) -> Self {
        Self::start(status, String::new(), "text/plain")
    }

    fn start(status: StatusCode, body: String, content_type: &'static str) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let reply = Reply {
            status,
            body,
            content_type,
            requests: Arc::clone(&requests),
        };
        let router = Router::new().fallback(record).with_state(reply);

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("test runtime");
        let listener = runtime
            .block_on(tokio::net::TcpListener::bind("127.0.0.1:0"))
            .expect("bind ephemeral port");
        let url = format!("http://{}", listener.local_addr().expect("local addr"));
        runtime.spawn(async move { axum::serve(listener, router).await });

        Self {
            _runtime: runtime,
            url,
            requests,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn single_request(&self) -> RecordedRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests[0].clone()
    }
}

async fn record(
    State(reply): State<Reply>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    reply
        .requests
        .lock()
        .expect("requests lock")
        .push(RecordedRequest {
            method,
            uri,
            headers,
            body,
        });

    if reply.body.is_empty() {
        return reply.status.into_response();
    }
    (
        reply.status,
        [(header::CONTENT_TYPE, reply.content_type)],
        reply.body,
    )
        .into_response()
}

/// Parse `rpaasctl --rpaas-url <api> ARGS...`.
pub fn parse_against(api: &MockApi, args: &[&str]) -> Cli {
    let mut argv = vec!["rpaasctl", "--rpaas-url", api.url()];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).expect("valid arguments")
}

/// Run a parsed command the way `main` does, capturing stdout.
pub fn execute(cli: &Cli) -> (Result<(), RpaasError>, String) {
    let ctx = OutputCtx::new(cli.command.output_format());
    let mut out = Vec::new();
    let result = AppConfig::from_cli(cli)
        .map_err(RpaasError::from)
        .and_then(|config| commands::dispatch(&cli.command, &config, &ctx, &mut out));
    (result, String::from_utf8(out).expect("utf-8 output"))
}

/// Shorthand for `execute(&parse_against(api, args))`.
pub fn run_against(api: &MockApi, args: &[&str]) -> (Result<(), RpaasError>, String) {
    execute(&parse_against(api, args))
}

/// The two ways a command can reach the RPaaS API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Straight to the RPaaS API.
    Direct,
    /// Through the Tsuru service proxy of `my-service`, with token `abc123`.
    Tsuru,
}

pub const ROUTES: [Route; 2] = [Route::Direct, Route::Tsuru];

impl Route {
    /// Run `args` against `api` over this route, capturing stdout.
    pub fn run(self, api: &MockApi, args: &[&str]) -> (Result<(), RpaasError>, String) {
        let mut cli = parse_against(api, args);
        if self == Self::Tsuru {
            cli.rpaas_url = None;
            cli.tsuru_target = Some(api.url().to_owned());
            cli.tsuru_token = Some("abc123".to_owned());
        }
        execute(&cli)
    }

    /// Assert `request` addressed `resource` of `my-instance` with `query`
    /// (empty for none), and carried this route's credentials.
    pub fn assert_target(self, request: &RecordedRequest, resource: &str, query: &str) {
        match self {
            Self::Direct => {
                assert_eq!(request.uri.path(), format!("/resources/my-instance/{resource}"));
                assert_eq!(request.uri.query().unwrap_or_default(), query);
            }
            Self::Tsuru => {
                assert_eq!(request.uri.path(), "/services/my-service/proxy/my-instance");
                let mut expected = format!("callback=%2Fresources%2Fmy-instance%2F{resource}");
                if !query.is_empty() {
                    expected.push('&');
                    expected.push_str(query);
                }
                assert_eq!(request.uri.query(), Some(expected.as_str()));
                assert_eq!(request.header("authorization"), Some("Bearer abc123"));
            }
        }
    }
}
