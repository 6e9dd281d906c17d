// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::GraphQlError;
use crate::graphql::{AniListClient, GraphQlResponse, queries};
use crate::http::HttpClient;
use crate::media::MediaTitle;
use crate::stats::AnimeStatistics;

use super::entry::MediaListStatus;

/// Name of the list opened first on a profile, when the user has one
const PREFERRED_LIST: &str = "Watching";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Avatar {
    pub large: Option<String>,
    pub medium: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserStatistics {
    pub anime: Option<AnimeStatistics>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUser {
    pub id: u64,
    pub name: String,
    pub avatar: Option<Avatar>,
    pub banner_image: Option<String>,
    pub statistics: Option<UserStatistics>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListMedia {
    pub id: u64,
    pub episodes: Option<u32>,
    #[serde(default)]
    pub title: MediaTitle,
}

/// One anime on one of the user's lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEntry {
    pub id: u64,
    pub status: Option<MediaListStatus>,
    pub progress: Option<u32>,
    pub score: Option<f64>,
    pub media: ListMedia,
}

/// A named list (status list or custom list) with its entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaList {
    pub name: String,
    pub status: Option<MediaListStatus>,
    #[serde(default)]
    pub is_custom_list: bool,
    #[serde(default)]
    pub entries: Vec<ListEntry>,
}

/// A user's anime lists and statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user: Option<ProfileUser>,
    #[serde(default)]
    pub lists: Vec<MediaList>,
}

impl UserProfile {
    pub fn statistics(&self) -> Option<&AnimeStatistics> {
        self.user
            .as_ref()
            .and_then(|u| u.statistics.as_ref())
            .and_then(|s| s.anime.as_ref())
    }

    pub fn list(&self, name: &str) -> Option<&MediaList> {
        self.lists.iter().find(|l| l.name == name)
    }

    /// The list a profile opens on: "Watching" if present, else the first one
    pub fn initial_list(&self) -> Option<&MediaList> {
        self.list(PREFERRED_LIST).or_else(|| self.lists.first())
    }
}

#[derive(Debug, Deserialize)]
struct CollectionData {
    #[serde(rename = "MediaListCollection")]
    collection: Option<UserProfile>,
}

/// Fetch a user's anime lists together with their statistics
#[tracing::instrument(level = "debug", skip(client, token))]
pub async fn fetch_user_profile<C: HttpClient>(
    client: &AniListClient<C>,
    token: Option<&str>,
    username: &str,
) -> Result<UserProfile, GraphQlError> {
    let response: GraphQlResponse<CollectionData> = client
        .execute(token, queries::USER_PROFILE, &json!({ "username": username }))
        .await?;

    if response.has_errors() {
        tracing::warn!(%username, errors = %response.error_messages(), "failed to fetch profile");
    }

    response
        .into_data()?
        .collection
        .ok_or(GraphQlError::MissingData)
}
