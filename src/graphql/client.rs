// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::GraphQlError;
use crate::http::HttpClient;

/// Public AniList GraphQL endpoint
pub const ANILIST_GRAPHQL_ENDPOINT: &str = "https://graphql.anilist.co";

/// Options for the AniList client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// GraphQL endpoint URL
    pub endpoint: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            endpoint: ANILIST_GRAPHQL_ENDPOINT.to_string(),
        }
    }
}

/// A single entry of a GraphQL `errors` array
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GraphQlErrorEntry {
    pub message: String,
    /// AniList mirrors the HTTP status into each error
    pub status: Option<u16>,
}

/// The `{data, errors}` envelope of a GraphQL response
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQlErrorEntry>>,
}

impl<T> GraphQlResponse<T> {
    /// Whether the server reported any application errors
    pub fn has_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|errors| !errors.is_empty())
    }

    /// All error messages joined into one line
    pub fn error_messages(&self) -> String {
        self.errors
            .iter()
            .flatten()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Unwrap the payload, turning reported errors or a missing payload into an error
    pub fn into_data(self) -> Result<T, GraphQlError> {
        if self.has_errors() {
            return Err(GraphQlError::Remote(self.error_messages()));
        }
        self.data.ok_or(GraphQlError::MissingData)
    }
}

/// Thin GraphQL client for AniList on top of an [`HttpClient`]
#[derive(Clone)]
pub struct AniListClient<C> {
    http: C,
    options: ClientOptions,
}

impl<C: HttpClient> AniListClient<C> {
    pub fn new(http: C, options: ClientOptions) -> Self {
        Self { http, options }
    }

    pub fn endpoint(&self) -> &str {
        &self.options.endpoint
    }

    /// Execute a query or mutation.
    ///
    /// The bearer token is only attached when present and non-empty. The
    /// body is decoded whatever the HTTP status is, since AniList answers
    /// application errors with 4xx and an `errors` array.
    #[tracing::instrument(level = "debug", skip_all, fields(endpoint = %self.options.endpoint))]
    pub async fn execute<V, T>(
        &self,
        token: Option<&str>,
        query: &str,
        variables: &V,
    ) -> Result<GraphQlResponse<T>, GraphQlError>
    where
        V: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::json!({
            "query": query,
            "variables": serde_json::to_value(variables)?,
        });
        let token = token.filter(|t| !t.is_empty());

        let response = self
            .http
            .post_json(&self.options.endpoint, token, &body)
            .await
            .map_err(|e| GraphQlError::Request {
                endpoint: self.options.endpoint.clone(),
                source: e,
            })?;

        tracing::debug!(
            status = response.status,
            bytes = response.body.len(),
            authorized = token.is_some(),
            "received GraphQL response"
        );

        serde_json::from_slice(&response.body).map_err(|e| GraphQlError::InvalidResponse {
            endpoint: self.options.endpoint.clone(),
            status: response.status,
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    use crate::testing::MockHttpClient;

    #[derive(Debug, Deserialize)]
    struct Viewer {
        #[serde(rename = "Viewer")]
        viewer: Name,
    }

    #[derive(Debug, Deserialize)]
    struct Name {
        name: String,
    }

    fn client(http: MockHttpClient) -> AniListClient<MockHttpClient> {
        AniListClient::new(http, ClientOptions::default())
    }

    #[tokio::test]
    async fn execute_sends_query_and_variables() {
        let http = MockHttpClient::new();
        http.respond(json!({"data": {"Viewer": {"name": "kana"}}}));
        let client = client(http.clone());

        let response: GraphQlResponse<Viewer> = client
            .execute(Some("tok"), "query { Viewer { name } }", &json!({"id": 1}))
            .await
            .unwrap();

        assert_eq!(response.into_data().unwrap().viewer.name, "kana");

        let requests = http.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, ANILIST_GRAPHQL_ENDPOINT);
        assert_eq!(requests[0].bearer.as_deref(), Some("tok"));
        assert_eq!(requests[0].body["query"], "query { Viewer { name } }");
        assert_eq!(requests[0].body["variables"]["id"], 1);
    }

    #[tokio::test]
    async fn empty_token_is_not_sent() {
        let http = MockHttpClient::new();
        http.respond(json!({"data": null}));
        let client = client(http.clone());

        let _: GraphQlResponse<Viewer> = client
            .execute(Some(""), "query { Viewer { name } }", &json!({}))
            .await
            .unwrap();

        assert_eq!(http.requests()[0].bearer, None);
    }

    #[tokio::test]
    async fn error_envelope_becomes_remote_error() {
        let http = MockHttpClient::new();
        http.respond_with_status(
            400,
            json!({"data": null, "errors": [{"message": "Invalid token", "status": 400}]}),
        );
        let client = client(http);

        let response: GraphQlResponse<Viewer> = client
            .execute(Some("bad"), "query { Viewer { name } }", &json!({}))
            .await
            .unwrap();

        assert!(response.has_errors());
        match response.into_data() {
            Err(GraphQlError::Remote(message)) => assert_eq!(message, "Invalid token"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_data_is_reported() {
        let http = MockHttpClient::new();
        http.respond(json!({}));
        let client = client(http);

        let response: GraphQlResponse<Viewer> = client
            .execute(None, "query { Viewer { name } }", &json!({}))
            .await
            .unwrap();

        assert!(matches!(response.into_data(), Err(GraphQlError::MissingData)));
    }

    #[tokio::test]
    async fn non_json_body_is_invalid_response() {
        let http = MockHttpClient::new();
        http.respond_raw(502, "<html>Bad Gateway</html>");
        let client = client(http);

        let result: Result<GraphQlResponse<Viewer>, _> = client
            .execute(None, "query { Viewer { name } }", &json!({}))
            .await;

        assert!(matches!(
            result,
            Err(GraphQlError::InvalidResponse { status: 502, .. })
        ));
    }

    #[tokio::test]
    async fn transport_failure_is_request_error() {
        let http = MockHttpClient::new();
        http.fail_next();
        let client = client(http);

        let result: Result<GraphQlResponse<Viewer>, _> = client
            .execute(None, "query { Viewer { name } }", &json!({}))
            .await;

        assert!(matches!(result, Err(GraphQlError::Request { .. })));
    }

    #[test]
    fn error_messages_are_joined() {
        let response: GraphQlResponse<()> = GraphQlResponse {
            data: None,
            errors: Some(vec![
                GraphQlErrorEntry {
                    message: "first".into(),
                    status: None,
                },
                GraphQlErrorEntry {
                    message: "second".into(),
                    status: Some(404),
                },
            ]),
        };

        assert_eq!(response.error_messages(), "first; second");
    }
}
