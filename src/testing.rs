//! Test doubles shared by the unit tests of several modules.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use crate::http::{HttpClient, HttpResponse};
use crate::notify::{Notification, Notifier};

/// A request captured by [`MockHttpClient`]
#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub url: String,
    pub bearer: Option<String>,
    pub body: serde_json::Value,
}

enum Reply {
    Response(HttpResponse),
    TransportFailure,
}

#[derive(Default)]
struct MockState {
    replies: VecDeque<Reply>,
    requests: Vec<RecordedRequest>,
}

/// HTTP client that replays queued responses in order and records every request
#[derive(Clone, Default)]
pub(crate) struct MockHttpClient {
    state: Arc<Mutex<MockState>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, body: serde_json::Value) {
        self.respond_with_status(200, body);
    }

    pub fn respond_with_status(&self, status: u16, body: serde_json::Value) {
        self.respond_raw(status, &body.to_string());
    }

    pub fn respond_raw(&self, status: u16, body: &str) {
        self.state
            .lock()
            .unwrap()
            .replies
            .push_back(Reply::Response(HttpResponse {
                status,
                body: Bytes::from(body.to_string()),
            }));
    }

    pub fn fail_next(&self) {
        self.state
            .lock()
            .unwrap()
            .replies
            .push_back(Reply::TransportFailure);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }
}

/// Produce a genuine `reqwest::Error` without touching the network
async fn transport_error() -> reqwest::Error {
    reqwest::Client::new()
        .get("not a url")
        .send()
        .await
        .unwrap_err()
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn post_json(
        &self,
        url: &str,
        bearer: Option<&str>,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, reqwest::Error> {
        let reply = {
            let mut state = self.state.lock().unwrap();
            state.requests.push(RecordedRequest {
                url: url.to_string(),
                bearer: bearer.map(String::from),
                body: body.clone(),
            });
            state.replies.pop_front()
        };

        match reply {
            Some(Reply::Response(response)) => Ok(response),
            Some(Reply::TransportFailure) => Err(transport_error().await),
            None => panic!("unexpected request to {url}: {body}"),
        }
    }
}

/// Notifier that keeps every notification for later inspection
#[derive(Default)]
pub(crate) struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}
