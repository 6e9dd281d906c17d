mod links;
mod load;
mod merge;
mod providers;
mod types;

pub use links::{EpisodeLink, episode_links, is_watched, watch_path};
pub use load::load_json_file;
pub use merge::{MergeStats, MetadataIndex, combine_episode_meta};
pub use providers::{ProviderSummary, providers_map};
pub use types::{AudioTrack, Episode, EpisodeMetadata, EpisodeSet, MetadataTitle, ProviderEpisodes};
