// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Audio track an episode list is offered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioTrack {
    Sub,
    Dub,
}

impl AudioTrack {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sub => "sub",
            Self::Dub => "dub",
        }
    }
}

impl fmt::Display for AudioTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AudioTrack {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sub" => Ok(Self::Sub),
            "dub" => Ok(Self::Dub),
            other => Err(format!("unknown audio track '{}', expected sub or dub", other)),
        }
    }
}

/// A single episode as listed by a provider.
///
/// Fields this crate does not know about are kept in `extra` and written
/// back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_id: Option<String>,
    #[serde(deserialize_with = "episode_number")]
    pub number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_filler: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Episode {
    pub fn new(id: impl Into<String>, number: u32) -> Self {
        Self {
            id: Some(id.into()),
            episode_id: None,
            number,
            is_filler: None,
            img: None,
            title: None,
            description: None,
            extra: Map::new(),
        }
    }

    pub fn is_filler(&self) -> bool {
        self.is_filler.unwrap_or(false)
    }

    /// Provider-side episode id: `id`, else `episodeId`
    pub fn source_id(&self) -> Option<&str> {
        [&self.id, &self.episode_id]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|s| !s.is_empty())
    }
}

/// A provider's episodes, either one flat list or split by audio track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EpisodeSet {
    Flat(Vec<Episode>),
    Split {
        #[serde(default, deserialize_with = "null_as_default")]
        sub: Vec<Episode>,
        #[serde(default, deserialize_with = "null_as_default")]
        dub: Vec<Episode>,
    },
}

impl Default for EpisodeSet {
    fn default() -> Self {
        Self::Flat(Vec::new())
    }
}

impl EpisodeSet {
    /// All episodes, sub before dub for split sets
    pub fn iter(&self) -> impl Iterator<Item = &Episode> {
        let (first, second): (&[Episode], &[Episode]) = match self {
            Self::Flat(episodes) => (episodes, &[]),
            Self::Split { sub, dub } => (sub, dub),
        };
        first.iter().chain(second)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Episode> {
        let (first, second): (&mut [Episode], &mut [Episode]) = match self {
            Self::Flat(episodes) => (episodes, &mut []),
            Self::Split { sub, dub } => (sub, dub),
        };
        first.iter_mut().chain(second)
    }

    /// Episodes offered in `track`; flat lists count as sub only
    pub fn for_track(&self, track: AudioTrack) -> &[Episode] {
        match (self, track) {
            (Self::Flat(episodes), AudioTrack::Sub) => episodes,
            (Self::Flat(_), AudioTrack::Dub) => &[],
            (Self::Split { sub, .. }, AudioTrack::Sub) => sub,
            (Self::Split { dub, .. }, AudioTrack::Dub) => dub,
        }
    }

    /// Number of dubbed episodes; zero for flat lists
    pub fn dub_len(&self) -> usize {
        self.for_track(AudioTrack::Dub).len()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Episode listing of one content provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderEpisodes {
    pub provider_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub episodes: EpisodeSet,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProviderEpisodes {
    pub fn new(provider_id: impl Into<String>, episodes: EpisodeSet) -> Self {
        Self {
            provider_id: provider_id.into(),
            episodes,
            extra: Map::new(),
        }
    }
}

/// Episode title from the metadata feed: plain, or keyed by language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataTitle {
    Text(String),
    /// Language code to title; values of any other type are ignored
    Localized(Map<String, Value>),
    /// Arrays carry no language keys and always fall back to the episode number
    List(Vec<Value>),
    Other(Value),
}

/// One record of the episode metadata feed.
///
/// Feeds disagree on field names, so alternates are all accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpisodeMetadata {
    #[serde(deserialize_with = "optional_episode_number", skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(deserialize_with = "optional_episode_number", skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<MetadataTitle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Int(u64),
    Float(f64),
    Text(String),
}

impl LooseNumber {
    fn to_episode_number(&self) -> Option<u32> {
        match self {
            Self::Int(n) => u32::try_from(*n).ok(),
            Self::Float(f) if f.fract() == 0.0 && *f >= 0.0 && *f <= f64::from(u32::MAX) => {
                Some(*f as u32)
            }
            Self::Float(_) => None,
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Episode numbers arrive as integers, floats like `3.0` or numeric strings
fn episode_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let raw = LooseNumber::deserialize(deserializer)?;
    raw.to_episode_number()
        .ok_or_else(|| D::Error::custom("episode number must be a non-negative integer"))
}

/// Like [`episode_number`], but anything unusable becomes `None`
fn optional_episode_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<u32>, D::Error> {
    let raw = Option::<LooseNumber>::deserialize(deserializer)?;
    Ok(raw.and_then(|n| n.to_episode_number()))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
