// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Serialize};

use crate::list::MediaListStatus;

/// Entries kept for the genre and studio rankings
pub const TOP_ENTRIES: usize = 8;

/// Score buckets of the distribution chart (AniList 100-point scale)
pub const SCORE_BUCKETS: [u32; 10] = [10, 20, 30, 40, 50, 60, 70, 80, 90, 100];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusStat {
    pub status: MediaListStatus,
    pub count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreStat {
    pub score: u32,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenreStat {
    pub genre: String,
    pub count: u32,
    pub mean_score: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Studio {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudioStat {
    pub studio: Studio,
    pub count: u32,
    pub mean_score: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseYearStat {
    pub release_year: i32,
    pub count: u32,
}

/// `User.statistics.anime` as returned by AniList
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnimeStatistics {
    pub count: u32,
    pub episodes_watched: u32,
    pub minutes_watched: u64,
    pub mean_score: f64,
    pub statuses: Vec<StatusStat>,
    pub scores: Vec<ScoreStat>,
    pub genres: Vec<GenreStat>,
    pub studios: Vec<StudioStat>,
    pub release_years: Vec<ReleaseYearStat>,
}

/// Watch time split into days, hours and minutes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WatchTime {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
}

impl WatchTime {
    pub fn from_minutes(total: u64) -> Self {
        Self {
            days: total / 1440,
            hours: (total % 1440) / 60,
            minutes: total % 60,
        }
    }
}

/// A status with its share of all list entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusShare {
    pub status: MediaListStatus,
    pub count: u32,
    /// Whole percent of the status total
    pub percent: u32,
}

/// Summary shown on a profile's statistics tab
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsOverview {
    pub total_anime: u32,
    pub episodes_watched: u32,
    pub mean_score: f64,
    pub watch_time: WatchTime,
    pub statuses: Vec<StatusShare>,
    /// One entry per [`SCORE_BUCKETS`] value, zero when unused
    pub score_distribution: Vec<ScoreStat>,
    /// Ascending by year
    pub release_years: Vec<ReleaseYearStat>,
    pub top_genres: Vec<GenreStat>,
    pub top_studios: Vec<StudioStat>,
}

impl StatsOverview {
    pub fn from_statistics(stats: &AnimeStatistics) -> Self {
        let status_total = stats.statuses.iter().map(|s| s.count).sum::<u32>().max(1);

        let statuses = stats
            .statuses
            .iter()
            .map(|s| StatusShare {
                status: s.status,
                count: s.count,
                percent: (f64::from(s.count) / f64::from(status_total) * 100.0).round() as u32,
            })
            .collect();

        let score_distribution = SCORE_BUCKETS
            .iter()
            .map(|&score| ScoreStat {
                score,
                count: stats
                    .scores
                    .iter()
                    .find(|s| s.score == score)
                    .map_or(0, |s| s.count),
            })
            .collect();

        let mut release_years = stats.release_years.clone();
        release_years.sort_by_key(|y| y.release_year);

        Self {
            total_anime: stats.count,
            episodes_watched: stats.episodes_watched,
            mean_score: stats.mean_score,
            watch_time: WatchTime::from_minutes(stats.minutes_watched),
            statuses,
            score_distribution,
            release_years,
            top_genres: stats.genres.iter().take(TOP_ENTRIES).cloned().collect(),
            top_studios: stats.studios.iter().take(TOP_ENTRIES).cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genre(name: &str, count: u32) -> GenreStat {
        GenreStat {
            genre: name.into(),
            count,
            mean_score: None,
        }
    }

    #[test]
    fn watch_time_splits_minutes() {
        assert_eq!(WatchTime::from_minutes(0), WatchTime::default());
        assert_eq!(
            WatchTime::from_minutes(1440 + 125),
            WatchTime {
                days: 1,
                hours: 2,
                minutes: 5
            }
        );
        assert_eq!(
            WatchTime::from_minutes(59),
            WatchTime {
                days: 0,
                hours: 0,
                minutes: 59
            }
        );
    }

    #[test]
    fn status_shares_are_rounded_percentages() {
        let stats = AnimeStatistics {
            statuses: vec![
                StatusStat {
                    status: MediaListStatus::Current,
                    count: 1,
                },
                StatusStat {
                    status: MediaListStatus::Completed,
                    count: 2,
                },
            ],
            ..Default::default()
        };

        let overview = StatsOverview::from_statistics(&stats);
        let percents: Vec<_> = overview.statuses.iter().map(|s| s.percent).collect();

        assert_eq!(percents, vec![33, 67]);
    }

    #[test]
    fn score_distribution_fills_every_bucket() {
        let stats = AnimeStatistics {
            scores: vec![
                ScoreStat {
                    score: 80,
                    count: 4,
                },
                ScoreStat {
                    score: 100,
                    count: 1,
                },
            ],
            ..Default::default()
        };

        let overview = StatsOverview::from_statistics(&stats);

        assert_eq!(overview.score_distribution.len(), SCORE_BUCKETS.len());
        assert_eq!(overview.score_distribution[7].count, 4);
        assert_eq!(overview.score_distribution[9].count, 1);
        assert_eq!(overview.score_distribution[0].count, 0);
    }

    #[test]
    fn release_years_are_sorted_and_rankings_truncated() {
        let stats = AnimeStatistics {
            release_years: vec![
                ReleaseYearStat {
                    release_year: 2021,
                    count: 3,
                },
                ReleaseYearStat {
                    release_year: 1998,
                    count: 1,
                },
                ReleaseYearStat {
                    release_year: 2013,
                    count: 2,
                },
            ],
            genres: (0..10).map(|i| genre(&format!("g{i}"), 10 - i)).collect(),
            ..Default::default()
        };

        let overview = StatsOverview::from_statistics(&stats);
        let years: Vec<_> = overview.release_years.iter().map(|y| y.release_year).collect();

        assert_eq!(years, vec![1998, 2013, 2021]);
        assert_eq!(overview.top_genres.len(), TOP_ENTRIES);
        assert_eq!(overview.top_genres[0].genre, "g0");
    }

    #[test]
    fn statistics_deserialize_from_anilist_shape() {
        let stats: AnimeStatistics = serde_json::from_value(serde_json::json!({
            "count": 2,
            "episodesWatched": 24,
            "minutesWatched": 576,
            "meanScore": 81.5,
            "statuses": [{"status": "COMPLETED", "count": 2}],
            "studios": [{"studio": {"name": "MAPPA"}, "count": 2, "meanScore": 81.5}]
        }))
        .unwrap();

        assert_eq!(stats.count, 2);
        assert_eq!(stats.studios[0].studio.name, "MAPPA");
        assert!(stats.genres.is_empty());
    }
}
