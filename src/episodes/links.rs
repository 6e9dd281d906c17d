// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::Serialize;
use url::form_urlencoded;

use super::types::{AudioTrack, Episode, ProviderEpisodes};

/// Route of the player page
const WATCH_ROUTE: &str = "/anime/watch";

/// Whether an episode is covered by the user's progress
pub fn is_watched(progress: u32, episode_number: u32) -> bool {
    progress >= episode_number
}

/// Player link for one episode
pub fn watch_path(media_id: u64, provider: &str, episode: &Episode, track: AudioTrack) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("id", &media_id.to_string())
        .append_pair("host", provider)
        .append_pair("epid", episode.source_id().unwrap_or_default())
        .append_pair("ep", &episode.number.to_string())
        .append_pair("type", track.as_str())
        .finish();
    format!("{}?{}", WATCH_ROUTE, query)
}

/// An entry of the episode number grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpisodeLink {
    pub number: u32,
    pub href: String,
    pub watched: bool,
    pub filler: bool,
    /// The episode currently playing
    pub current: bool,
}

/// Build the episode grid of `provider` for one audio track
pub fn episode_links(
    media_id: u64,
    provider: &ProviderEpisodes,
    track: AudioTrack,
    progress: Option<u32>,
    current_episode: Option<u32>,
) -> Vec<EpisodeLink> {
    provider
        .episodes
        .for_track(track)
        .iter()
        .map(|episode| EpisodeLink {
            number: episode.number,
            href: watch_path(media_id, &provider.provider_id, episode, track),
            watched: progress.is_some_and(|p| is_watched(p, episode.number)),
            filler: episode.is_filler(),
            current: current_episode == Some(episode.number),
        })
        .collect()
}
