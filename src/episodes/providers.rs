// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::Serialize;

use super::types::{AudioTrack, ProviderEpisodes};

/// Audio tracks offered across providers and the provider to start with
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSummary {
    /// Always contains `sub`; `dub` only if some provider has dubbed episodes
    pub suboptions: Vec<AudioTrack>,
    /// Largest dubbed episode count of any provider
    pub dub_length: usize,
    /// The selected provider, or the first listed one if none was selected
    pub default_provider: Option<String>,
}

impl ProviderSummary {
    pub fn has_dub(&self) -> bool {
        self.suboptions.contains(&AudioTrack::Dub)
    }
}

/// Detect sub/dub availability and pick a default provider.
///
/// `current_default` is the provider already selected by the caller; when
/// absent the first provider in `episode_data` becomes the default.
pub fn providers_map(
    episode_data: &[ProviderEpisodes],
    current_default: Option<&str>,
) -> ProviderSummary {
    let default_provider = current_default
        .map(String::from)
        .or_else(|| episode_data.first().map(|p| p.provider_id.clone()));

    let dub_length = episode_data
        .iter()
        .map(|p| p.episodes.dub_len())
        .max()
        .unwrap_or(0);

    let mut suboptions = vec![AudioTrack::Sub];
    if dub_length > 0 {
        suboptions.push(AudioTrack::Dub);
    }

    ProviderSummary {
        suboptions,
        dub_length,
        default_provider,
    }
}
