// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::GraphQlError;
use crate::graphql::{AniListClient, GraphQlResponse, queries};
use crate::http::HttpClient;
use crate::media::MediaTitle;

/// Notifications fetched per page
pub const NOTIFICATIONS_PER_PAGE: u32 = 15;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageInfo {
    pub total: Option<u32>,
    pub current_page: Option<u32>,
    pub last_page: Option<u32>,
    pub has_next_page: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMedia {
    pub id: u64,
    #[serde(default)]
    pub title: MediaTitle,
}

/// An entry of the viewer's AniList notification feed.
///
/// Notification kinds the feed query does not select come back as empty
/// objects, so every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AniListNotification {
    pub id: Option<u64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub episode: Option<u32>,
    pub contexts: Vec<String>,
    pub context: Option<String>,
    pub reason: Option<String>,
    /// Unix timestamp
    pub created_at: Option<i64>,
    pub media: Option<NotificationMedia>,
}

impl AniListNotification {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Render the notification the way AniList phrases it.
    ///
    /// Airing notifications interleave `contexts` with the episode number and
    /// the media title; the other kinds put the title before `context`.
    pub fn message(&self) -> String {
        let title = self
            .media
            .as_ref()
            .map(|m| m.title.preferred())
            .unwrap_or_default();

        if let Some(episode) = self.episode {
            let part = |i: usize| self.contexts.get(i).map(String::as_str).unwrap_or("");
            return format!("{}{}{}{}{}", part(0), episode, part(1), title, part(2));
        }

        format!("{}{}", title, self.context.as_deref().unwrap_or(""))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPage {
    #[serde(default)]
    pub page_info: PageInfo,
    #[serde(default)]
    pub notifications: Vec<AniListNotification>,
}

#[derive(Debug, Deserialize)]
struct PageData {
    #[serde(rename = "Page")]
    page: Option<NotificationPage>,
}

/// Fetch one page of the viewer's notifications.
///
/// Fetching resets the viewer's unread notification count.
#[tracing::instrument(level = "debug", skip(client, token))]
pub async fn fetch_notifications<C: HttpClient>(
    client: &AniListClient<C>,
    token: &str,
    page: u32,
) -> Result<NotificationPage, GraphQlError> {
    let variables = json!({ "page": page, "perPage": NOTIFICATIONS_PER_PAGE });
    let response: GraphQlResponse<PageData> = client
        .execute(Some(token), queries::NOTIFICATIONS, &variables)
        .await?;
    response.into_data()?.page.ok_or(GraphQlError::MissingData)
}
