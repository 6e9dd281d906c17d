// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Viewer lookup and session bookkeeping around an AniList access token.
//!
//! The OAuth code exchange itself belongs to whatever session layer hosts
//! this crate; these helpers cover what happens once a token exists.

use chrono::{DateTime, TimeDelta, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;

use crate::error::GraphQlError;
use crate::graphql::{AniListClient, GraphQlResponse, queries};
use crate::http::HttpClient;
use crate::list::Avatar;

/// AniList OAuth authorization endpoint
pub const AUTHORIZE_URL: &str = "https://anilist.co/api/v2/oauth/authorize";

/// Custom list registered on every account that signs in
pub const SITE_LIST_NAME: &str = "Watched Via Airin";

/// Viewer data is refetched after this many hours
const SESSION_REFRESH_HOURS: i64 = 24;

/// Build the URL a user is sent to for granting access
pub fn authorize_url(client_id: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(AUTHORIZE_URL)?;
    url.query_pairs_mut()
        .append_pair("client_id", client_id)
        .append_pair("response_type", "code");
    Ok(url)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimeListOptions {
    pub custom_lists: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaListOptions {
    pub anime_list: Option<AnimeListOptions>,
}

/// The user a token belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewer {
    pub id: u64,
    pub name: String,
    pub avatar: Option<Avatar>,
    pub banner_image: Option<String>,
    /// Unix timestamp of account creation
    pub created_at: Option<i64>,
    pub media_list_options: Option<MediaListOptions>,
}

impl Viewer {
    pub fn custom_lists(&self) -> &[String] {
        self.media_list_options
            .as_ref()
            .and_then(|o| o.anime_list.as_ref())
            .and_then(|a| a.custom_lists.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct ViewerData {
    #[serde(rename = "Viewer")]
    viewer: Option<Viewer>,
}

/// Fetch the user a token belongs to
#[tracing::instrument(level = "debug", skip_all)]
pub async fn fetch_viewer<C: HttpClient>(
    client: &AniListClient<C>,
    token: &str,
) -> Result<Viewer, GraphQlError> {
    let response: GraphQlResponse<ViewerData> = client
        .execute(Some(token), queries::VIEWER, &json!({}))
        .await?;
    response.into_data()?.viewer.ok_or(GraphQlError::MissingData)
}

/// Register [`SITE_LIST_NAME`] among the viewer's custom anime lists.
///
/// Returns `Ok(false)` without a request when the list already exists.
#[tracing::instrument(level = "debug", skip_all, fields(viewer = viewer.id))]
pub async fn ensure_custom_list<C: HttpClient>(
    client: &AniListClient<C>,
    token: &str,
    viewer: &Viewer,
) -> Result<bool, GraphQlError> {
    let existing = viewer.custom_lists();
    if existing.iter().any(|l| l == SITE_LIST_NAME) {
        return Ok(false);
    }

    let mut lists = existing.to_vec();
    lists.push(SITE_LIST_NAME.to_string());

    let response: GraphQlResponse<IgnoredAny> = client
        .execute(
            Some(token),
            queries::UPDATE_CUSTOM_LISTS,
            &json!({ "lists": lists }),
        )
        .await?;
    response.into_data()?;

    tracing::info!(viewer = viewer.id, list = SITE_LIST_NAME, "registered custom list");
    Ok(true)
}

/// A signed-in user as kept by the session layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: u64,
    pub name: String,
    pub avatar: Option<Avatar>,
    pub created_at: Option<i64>,
    pub custom_lists: Vec<String>,
    pub last_refresh: Option<DateTime<Utc>>,
}

impl Session {
    pub fn from_viewer(token: impl Into<String>, viewer: &Viewer, now: DateTime<Utc>) -> Self {
        let mut session = Self {
            token: token.into(),
            user_id: viewer.id,
            name: String::new(),
            avatar: None,
            created_at: None,
            custom_lists: Vec::new(),
            last_refresh: None,
        };
        session.apply_viewer(viewer, now);
        session
    }

    /// Whether viewer data is stale: never refreshed, or older than a day
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        match self.last_refresh {
            None => true,
            Some(last) => now - last > TimeDelta::hours(SESSION_REFRESH_HOURS),
        }
    }

    fn apply_viewer(&mut self, viewer: &Viewer, now: DateTime<Utc>) {
        self.user_id = viewer.id;
        self.name = viewer.name.clone();
        self.avatar = viewer.avatar.clone();
        self.created_at = viewer.created_at;
        self.custom_lists = viewer.custom_lists().to_vec();
        self.last_refresh = Some(now);
    }
}

/// Build a session for a freshly issued token, registering the site's
/// custom list on first sign-in
pub async fn sign_in<C: HttpClient>(
    client: &AniListClient<C>,
    token: &str,
    now: DateTime<Utc>,
) -> Result<Session, GraphQlError> {
    let viewer = fetch_viewer(client, token).await?;
    let mut session = Session::from_viewer(token, &viewer, now);

    if ensure_custom_list(client, token, &viewer).await? {
        session.custom_lists.push(SITE_LIST_NAME.to_string());
    }

    Ok(session)
}

/// Refetch viewer data when the session is stale.
///
/// Returns whether a refresh happened. On error the session is left as is.
pub async fn refresh_session<C: HttpClient>(
    client: &AniListClient<C>,
    session: &mut Session,
    now: DateTime<Utc>,
) -> Result<bool, GraphQlError> {
    if !session.needs_refresh(now) {
        return Ok(false);
    }

    let viewer = fetch_viewer(client, &session.token).await?;
    session.apply_viewer(&viewer, now);
    tracing::debug!(user_id = session.user_id, "session refreshed");
    Ok(true)
}
