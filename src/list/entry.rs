// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::GraphQlError;
use crate::graphql::{AniListClient, GraphQlResponse, queries};
use crate::http::HttpClient;

/// Status of a media list entry as AniList names it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaListStatus {
    Current,
    Completed,
    Paused,
    Dropped,
    Planning,
    Repeating,
}

impl MediaListStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Current => "CURRENT",
            Self::Completed => "COMPLETED",
            Self::Paused => "PAUSED",
            Self::Dropped => "DROPPED",
            Self::Planning => "PLANNING",
            Self::Repeating => "REPEATING",
        }
    }

    /// Finished or being rewatched; progress sync never touches these
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Completed | Self::Repeating)
    }
}

impl fmt::Display for MediaListStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of the viewer's list entry for one media
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaListEntry {
    pub status: Option<MediaListStatus>,
    pub progress: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MediaEntryData {
    #[serde(rename = "Media")]
    media: Option<MediaWithEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MediaWithEntry {
    media_list_entry: Option<MediaListEntry>,
}

impl MediaEntryData {
    pub(crate) fn into_entry(self) -> Option<MediaListEntry> {
        self.media.and_then(|m| m.media_list_entry)
    }
}

/// Issue the list entry lookup and return the raw envelope
pub(crate) async fn request_list_entry<C: HttpClient>(
    client: &AniListClient<C>,
    token: Option<&str>,
    media_id: u64,
) -> Result<GraphQlResponse<MediaEntryData>, GraphQlError> {
    client
        .execute(token, queries::MEDIA_LIST_ENTRY, &json!({ "mediaId": media_id }))
        .await
}

/// Fetch the viewer's list entry for a media.
///
/// Returns `Ok(None)` when the media is not on the viewer's list.
#[tracing::instrument(level = "debug", skip(client, token))]
pub async fn fetch_list_entry<C: HttpClient>(
    client: &AniListClient<C>,
    token: Option<&str>,
    media_id: u64,
) -> Result<Option<MediaListEntry>, GraphQlError> {
    let data = request_list_entry(client, token, media_id)
        .await?
        .into_data()?;
    Ok(data.into_entry())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::graphql::ClientOptions;
    use crate::testing::MockHttpClient;

    #[test]
    fn status_uses_anilist_names() {
        let status: MediaListStatus = serde_json::from_str("\"REPEATING\"").unwrap();
        assert_eq!(status, MediaListStatus::Repeating);
        assert_eq!(
            serde_json::to_string(&MediaListStatus::Current).unwrap(),
            "\"CURRENT\""
        );
        assert_eq!(MediaListStatus::Planning.to_string(), "PLANNING");
    }

    #[test]
    fn only_completed_and_repeating_are_finished() {
        assert!(MediaListStatus::Completed.is_finished());
        assert!(MediaListStatus::Repeating.is_finished());
        assert!(!MediaListStatus::Current.is_finished());
        assert!(!MediaListStatus::Paused.is_finished());
        assert!(!MediaListStatus::Dropped.is_finished());
        assert!(!MediaListStatus::Planning.is_finished());
    }

    #[tokio::test]
    async fn fetch_list_entry_reads_status_and_progress() {
        let http = MockHttpClient::new();
        http.respond(json!({
            "data": {"Media": {"mediaListEntry": {"status": "PAUSED", "progress": 7}}}
        }));
        let client = AniListClient::new(http.clone(), ClientOptions::default());

        let entry = fetch_list_entry(&client, Some("tok"), 21).await.unwrap();

        assert_eq!(
            entry,
            Some(MediaListEntry {
                status: Some(MediaListStatus::Paused),
                progress: Some(7),
            })
        );
        assert_eq!(http.requests()[0].body["variables"]["mediaId"], 21);
    }

    #[tokio::test]
    async fn media_without_entry_is_none() {
        let http = MockHttpClient::new();
        http.respond(json!({"data": {"Media": {"mediaListEntry": null}}}));
        let client = AniListClient::new(http, ClientOptions::default());

        let entry = fetch_list_entry(&client, Some("tok"), 21).await.unwrap();

        assert_eq!(entry, None);
    }
}
