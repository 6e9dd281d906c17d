// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::HashMap;

use serde_json::Value;

use super::types::{EpisodeMetadata, MetadataTitle, ProviderEpisodes};

/// Language keys tried, in order, for a localized title
const TITLE_LANGUAGES: [&str; 2] = ["en", "x-jat"];

/// Counters reported by a merge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Episodes looked at across all providers
    pub processed: usize,
    /// Episodes that had a metadata record
    pub matched: usize,
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn first_non_empty<'a>(
    candidates: impl IntoIterator<Item = &'a Option<String>>,
) -> Option<&'a str> {
    candidates
        .into_iter()
        .flatten()
        .map(String::as_str)
        .find(|s| !s.is_empty())
}

impl EpisodeMetadata {
    /// Episode number the record is indexed under; zero counts as missing
    pub fn key(&self) -> Option<u32> {
        self.number
            .filter(|&n| n > 0)
            .or(self.episode.filter(|&n| n > 0))
    }

    /// Thumbnail from `img`, else `image`
    pub fn thumbnail(&self) -> Option<Value> {
        [&self.img, &self.image]
            .into_iter()
            .flatten()
            .find(|v| is_truthy(v))
            .cloned()
    }

    /// Display title for episode `number`.
    ///
    /// Localized titles prefer English, then romanized Japanese, then
    /// `EPISODE {number}`; arrays count as localized titles without a match.
    /// Plain titles are used as they are. A record without any title also
    /// gets `EPISODE {number}`.
    pub fn display_title(&self, number: u32) -> String {
        match &self.title {
            Some(MetadataTitle::Text(text)) => text.clone(),
            Some(MetadataTitle::Localized(titles)) => TITLE_LANGUAGES
                .iter()
                .filter_map(|lang| titles.get(*lang).and_then(Value::as_str))
                .find(|t| !t.is_empty())
                .map(String::from)
                .unwrap_or_else(|| format!("EPISODE {}", number)),
            Some(MetadataTitle::List(_)) | None => format!("EPISODE {}", number),
            Some(MetadataTitle::Other(_)) => String::new(),
        }
    }

    /// First non-empty of `description`, `overview`, `summary`
    pub fn synopsis(&self) -> Option<String> {
        first_non_empty([&self.description, &self.overview, &self.summary]).map(String::from)
    }
}

/// Metadata records indexed by episode number
#[derive(Debug, Default)]
pub struct MetadataIndex<'a> {
    by_number: HashMap<u32, &'a EpisodeMetadata>,
}

impl<'a> MetadataIndex<'a> {
    /// Index `records`; a later record for the same number replaces an earlier one
    pub fn build(records: &'a [EpisodeMetadata]) -> Self {
        let by_number = records
            .iter()
            .filter_map(|record| record.key().map(|number| (number, record)))
            .collect();
        Self { by_number }
    }

    pub fn get(&self, number: u32) -> Option<&'a EpisodeMetadata> {
        self.by_number.get(&number).copied()
    }

    pub fn len(&self) -> usize {
        self.by_number.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_number.is_empty()
    }

    /// Annotate every matching episode of every provider in place.
    ///
    /// Matched episodes get `img`, `title` and `description` replaced by the
    /// metadata values; unmatched episodes are left alone.
    pub fn annotate(&self, providers: &mut [ProviderEpisodes]) -> MergeStats {
        let mut stats = MergeStats::default();

        for provider in providers.iter_mut() {
            let mut provider_matched = 0;

            for episode in provider.episodes.iter_mut() {
                stats.processed += 1;

                let Some(meta) = self.get(episode.number) else {
                    continue;
                };

                episode.img = meta.thumbnail();
                episode.title = Some(meta.display_title(episode.number));
                episode.description = meta.synopsis();
                provider_matched += 1;
            }

            tracing::debug!(
                provider = %provider.provider_id,
                episodes = provider.episodes.len(),
                matched = provider_matched,
                "annotated provider episodes"
            );
            stats.matched += provider_matched;
        }

        stats
    }
}

/// Join provider episode lists with the metadata feed by episode number.
///
/// Returns an annotated copy; the input is not modified. With an empty feed
/// the copy is identical to the input.
pub fn combine_episode_meta(
    episode_data: &[ProviderEpisodes],
    metadata: &[EpisodeMetadata],
) -> Vec<ProviderEpisodes> {
    let mut combined = episode_data.to_vec();

    if metadata.is_empty() {
        tracing::debug!("no episode metadata available");
        return combined;
    }

    let index = MetadataIndex::build(metadata);
    let first = index.by_number.keys().min();
    let last = index.by_number.keys().max();
    if let (Some(first), Some(last)) = (first, last) {
        tracing::debug!(
            records = metadata.len(),
            first,
            last,
            "indexed episode metadata"
        );
    }

    let stats = index.annotate(&mut combined);
    tracing::debug!(
        processed = stats.processed,
        matched = stats.matched,
        "merged episode metadata"
    );

    combined
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    use crate::episodes::types::{Episode, EpisodeSet};

    fn meta(value: serde_json::Value) -> EpisodeMetadata {
        serde_json::from_value(value).unwrap()
    }

    fn flat_provider(id: &str, numbers: &[u32]) -> ProviderEpisodes {
        ProviderEpisodes::new(
            id,
            EpisodeSet::Flat(
                numbers
                    .iter()
                    .map(|&n| Episode::new(format!("{id}-{n}"), n))
                    .collect(),
            ),
        )
    }

    #[test]
    fn empty_inputs_pass_through() {
        assert!(combine_episode_meta(&[], &[meta(json!({"number": 1}))]).is_empty());

        let data = vec![flat_provider("gogo", &[1, 2, 3])];
        assert_eq!(combine_episode_meta(&data, &[]), data);
    }

    #[test]
    fn localized_titles_prefer_english_then_romaji() {
        let data = vec![flat_provider("gogo", &[5])];

        let cases = [
            (json!({"number": 5, "title": {"en": "Foo", "x-jat": "Baa"}}), "Foo"),
            (json!({"number": 5, "title": {"x-jat": "Baa"}}), "Baa"),
            (json!({"number": 5, "title": {"en": "", "x-jat": "Baa"}}), "Baa"),
            (json!({"number": 5, "title": {"ja": "\u{30d5}"}}), "EPISODE 5"),
            (json!({"number": 5, "title": {"en": "Foo", "x-jat": "Baa", "rank": 1}}), "Foo"),
            (json!({"number": 5, "title": {"en": 3, "x-jat": "Baa"}}), "Baa"),
            (json!({"number": 5, "title": ["Foo"]}), "EPISODE 5"),
            (json!({"number": 5}), "EPISODE 5"),
            (json!({"number": 5, "title": "Plain"}), "Plain"),
            (json!({"number": 5, "title": ""}), ""),
        ];

        for (record, expected) in cases {
            let merged = combine_episode_meta(&data, &[meta(record)]);
            let episode = merged[0].episodes.iter().next().unwrap();
            assert_eq!(episode.title.as_deref(), Some(expected));
        }
    }

    #[test]
    fn image_and_description_use_fallback_fields() {
        let data = vec![flat_provider("gogo", &[1, 2])];
        let metadata = vec![
            meta(json!({"episode": 1, "image": "https://img/1.jpg", "overview": "One"})),
            meta(json!({"number": 2, "img": "https://img/2a.jpg", "image": "https://img/2b.jpg",
                        "description": "", "summary": "Two"})),
        ];

        let merged = combine_episode_meta(&data, &metadata);
        let episodes: Vec<_> = merged[0].episodes.iter().collect();

        assert_eq!(episodes[0].img, Some(json!("https://img/1.jpg")));
        assert_eq!(episodes[0].description.as_deref(), Some("One"));
        assert_eq!(episodes[1].img, Some(json!("https://img/2a.jpg")));
        assert_eq!(episodes[1].description.as_deref(), Some("Two"));
    }

    #[test]
    fn unmatched_episodes_are_untouched() {
        let mut data = vec![flat_provider("gogo", &[1, 2])];
        if let EpisodeSet::Flat(episodes) = &mut data[0].episodes {
            episodes[1].title = Some("Provider title".into());
        }

        let merged = combine_episode_meta(&data, &[meta(json!({"number": 1, "title": "One"}))]);
        let episodes: Vec<_> = merged[0].episodes.iter().collect();

        assert_eq!(episodes[0].title.as_deref(), Some("One"));
        assert_eq!(episodes[1], data[0].episodes.iter().nth(1).unwrap());
    }

    #[test]
    fn later_duplicates_win() {
        let data = vec![flat_provider("gogo", &[3])];
        let metadata = vec![
            meta(json!({"number": 3, "title": "First"})),
            meta(json!({"episode": "3", "title": "Second"})),
        ];

        let merged = combine_episode_meta(&data, &metadata);

        assert_eq!(
            merged[0].episodes.iter().next().unwrap().title.as_deref(),
            Some("Second")
        );
    }

    #[test]
    fn every_provider_and_track_is_matched_independently() {
        let split = ProviderEpisodes::new(
            "zoro",
            EpisodeSet::Split {
                sub: vec![Episode::new("s1", 1), Episode::new("s2", 2)],
                dub: vec![Episode::new("d1", 1)],
            },
        );
        let mut data = vec![flat_provider("gogo", &[1, 2]), split];
        let metadata = vec![meta(json!({"number": 1, "title": "One"}))];

        let index = MetadataIndex::build(&metadata);
        let stats = index.annotate(&mut data);

        assert_eq!(
            stats,
            MergeStats {
                processed: 5,
                matched: 3
            }
        );
        let titled = data
            .iter()
            .flat_map(|p| p.episodes.iter())
            .filter(|e| e.title.as_deref() == Some("One"))
            .count();
        assert_eq!(titled, 3);
    }

    #[test]
    fn records_without_usable_number_are_not_indexed() {
        let metadata = vec![
            meta(json!({"number": 0, "title": "Zero"})),
            meta(json!({"title": "None"})),
            meta(json!({"number": 0, "episode": 7, "title": "Seven"})),
        ];

        let index = MetadataIndex::build(&metadata);

        assert_eq!(index.len(), 1);
        assert_eq!(index.get(7).map(|m| m.display_title(7)), Some("Seven".into()));
    }

    #[test]
    fn combine_does_not_modify_input() {
        let data = vec![flat_provider("gogo", &[1])];
        let before = data.clone();

        let merged = combine_episode_meta(&data, &[meta(json!({"number": 1, "title": "One"}))]);

        assert_eq!(data, before);
        assert_ne!(merged, before);
    }
}
