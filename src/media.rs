// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::GraphQlError;
use crate::graphql::{AniListClient, GraphQlResponse, queries};
use crate::http::HttpClient;
use crate::list::MediaListEntry;

/// Localized titles of a media
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaTitle {
    pub romaji: Option<String>,
    pub english: Option<String>,
    pub native: Option<String>,
}

impl MediaTitle {
    /// English title, falling back to romaji, then native
    pub fn preferred(&self) -> &str {
        [&self.english, &self.romaji, &self.native]
            .into_iter()
            .flatten()
            .find(|t| !t.is_empty())
            .map(String::as_str)
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverImage {
    pub extra_large: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextAiringEpisode {
    pub episode: u32,
    /// Unix timestamp
    pub airing_at: i64,
    /// Seconds until airing
    pub time_until_airing: i64,
}

/// Media details for the player page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaInfo {
    pub id: u64,
    pub id_mal: Option<u64>,
    #[serde(default)]
    pub title: MediaTitle,
    pub format: Option<String>,
    pub status: Option<String>,
    pub episodes: Option<u32>,
    /// Episode length in minutes
    pub duration: Option<u32>,
    pub cover_image: Option<CoverImage>,
    pub banner_image: Option<String>,
    pub next_airing_episode: Option<NextAiringEpisode>,
    pub media_list_entry: Option<MediaListEntry>,
}

impl MediaInfo {
    /// Number of episodes out so far: the announced count, or the episode
    /// before the next airing one for shows still running
    pub fn available_episodes(&self) -> Option<u32> {
        match &self.next_airing_episode {
            Some(next) => Some(next.episode.saturating_sub(1)),
            None => self.episodes,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MediaData {
    #[serde(rename = "Media")]
    media: Option<MediaInfo>,
}

/// Fetch the media details shown next to the player.
///
/// The token is optional; with it the viewer's list entry is included.
#[tracing::instrument(level = "debug", skip(client, token))]
pub async fn fetch_watch_info<C: HttpClient>(
    client: &AniListClient<C>,
    token: Option<&str>,
    media_id: u64,
) -> Result<MediaInfo, GraphQlError> {
    let response: GraphQlResponse<MediaData> = client
        .execute(token, queries::WATCH_PAGE_INFO, &json!({ "id": media_id }))
        .await?;
    response.into_data()?.media.ok_or(GraphQlError::MissingData)
}
