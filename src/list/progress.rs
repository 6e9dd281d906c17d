// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::Deserialize;
use serde::de::IgnoredAny;
use serde_json::json;

use crate::graphql::{AniListClient, GraphQlResponse, queries};
use crate::http::HttpClient;
use crate::notify::{Notification, SharedNotifier};

use super::entry::{MediaListEntry, MediaListStatus, request_list_entry};

const SAVE_REJECTED_MESSAGE: &str = "Failed to save progress to AniList";
const SAVE_FAILED_MESSAGE: &str = "An error occurred while updating list";

/// A local playback position to push to AniList
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub media_id: u64,
    /// Highest episode number watched
    pub progress: u32,
    /// Episode count of the media, if known
    pub total_episodes: Option<u32>,
}

impl ProgressUpdate {
    pub fn new(media_id: u64, progress: u32) -> Self {
        Self {
            media_id,
            progress,
            total_episodes: None,
        }
    }

    pub fn with_total_episodes(mut self, total_episodes: Option<u32>) -> Self {
        self.total_episodes = total_episodes;
        self
    }

    /// COMPLETED once the last episode is reached, CURRENT otherwise.
    /// An unknown or zero episode count never completes an entry.
    pub fn target_status(&self) -> MediaListStatus {
        match self.total_episodes {
            Some(total) if total > 0 && self.progress >= total => MediaListStatus::Completed,
            _ => MediaListStatus::Current,
        }
    }
}

/// Why an update was not written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The entry is completed or being rewatched
    Finished(MediaListStatus),
    /// The remote entry is already further along
    WouldRegress { remote: u32, requested: u32 },
    /// Same progress and status as the remote entry
    Unchanged,
}

/// Decision taken against a freshly fetched list entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePlan {
    Write { status: MediaListStatus },
    Skip(SkipReason),
}

/// Decide whether `update` should be written over `entry`.
///
/// The guards are checked in order: finished status, regression, no change.
/// `entry` is `None` when the media is not on the list yet.
pub fn plan_update(entry: Option<&MediaListEntry>, update: &ProgressUpdate) -> UpdatePlan {
    let status = update.target_status();

    let Some(entry) = entry else {
        return UpdatePlan::Write { status };
    };

    if let Some(remote_status) = entry.status.filter(|s| s.is_finished()) {
        return UpdatePlan::Skip(SkipReason::Finished(remote_status));
    }

    if let Some(remote) = entry.progress.filter(|&p| p > update.progress) {
        return UpdatePlan::Skip(SkipReason::WouldRegress {
            remote,
            requested: update.progress,
        });
    }

    if entry.progress == Some(update.progress) && entry.status == Some(status) {
        return UpdatePlan::Skip(SkipReason::Unchanged);
    }

    UpdatePlan::Write { status }
}

/// Result of a [`save_progress`] call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// No token was available; nothing was sent
    NoToken,
    /// The update was suppressed by one of the guards
    Skipped(SkipReason),
    /// The entry was written
    Saved {
        progress: u32,
        status: MediaListStatus,
    },
    /// AniList answered the write with errors
    Rejected(String),
    /// Transport or decoding failure
    Failed(String),
}

#[derive(Debug, Deserialize)]
struct SaveEntryData {
    #[serde(rename = "SaveMediaListEntry")]
    saved: Option<IgnoredAny>,
}

/// Push a playback position to the viewer's AniList list.
///
/// Performs one lookup and at most one write. Failures never propagate:
/// they are logged, reported through `notifier` and returned as the outcome.
/// Suppressed updates produce no notification.
#[tracing::instrument(level = "debug", skip(client, token, notifier))]
pub async fn save_progress<C: HttpClient>(
    client: &AniListClient<C>,
    token: Option<&str>,
    update: ProgressUpdate,
    notifier: &SharedNotifier,
) -> SaveOutcome {
    let Some(token) = token.filter(|t| !t.is_empty()) else {
        return SaveOutcome::NoToken;
    };

    let entry = match request_list_entry(client, Some(token), update.media_id).await {
        Ok(response) => {
            if response.has_errors() {
                tracing::warn!(
                    media_id = update.media_id,
                    errors = %response.error_messages(),
                    "list entry lookup returned errors, treating media as unlisted"
                );
            }
            response.data.and_then(|data| data.into_entry())
        }
        Err(e) => {
            tracing::warn!(media_id = update.media_id, error = %e, "list entry lookup failed");
            notifier.notify(Notification::error(SAVE_FAILED_MESSAGE));
            return SaveOutcome::Failed(e.to_string());
        }
    };

    let status = match plan_update(entry.as_ref(), &update) {
        UpdatePlan::Write { status } => status,
        UpdatePlan::Skip(reason) => {
            tracing::debug!(media_id = update.media_id, ?reason, "progress update skipped");
            return SaveOutcome::Skipped(reason);
        }
    };

    let variables = json!({
        "mediaId": update.media_id,
        "progress": update.progress,
        "status": status,
    });
    let response: GraphQlResponse<SaveEntryData> = match client
        .execute(Some(token), queries::SAVE_MEDIA_LIST_ENTRY, &variables)
        .await
    {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(media_id = update.media_id, error = %e, "saving list entry failed");
            notifier.notify(Notification::error(SAVE_FAILED_MESSAGE));
            return SaveOutcome::Failed(e.to_string());
        }
    };

    let saved = response
        .data
        .as_ref()
        .and_then(|data| data.saved.as_ref())
        .is_some();

    if saved {
        tracing::info!(
            media_id = update.media_id,
            progress = update.progress,
            %status,
            "progress saved"
        );
        notifier.notify(Notification::success(format!(
            "Episode {} saved successfully",
            update.progress
        )));
        SaveOutcome::Saved {
            progress: update.progress,
            status,
        }
    } else {
        let errors = response.error_messages();
        tracing::warn!(media_id = update.media_id, %errors, "AniList rejected progress update");
        notifier.notify(Notification::error(SAVE_REJECTED_MESSAGE));
        SaveOutcome::Rejected(errors)
    }
}
