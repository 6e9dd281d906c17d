pub mod auth;
pub mod episodes;
pub mod error;
pub mod graphql;
pub mod http;
pub mod list;
pub mod media;
pub mod notify;
pub mod stats;

#[cfg(test)]
mod testing;

// Re-export main types for convenience
pub use auth::{Session, Viewer, authorize_url, ensure_custom_list, fetch_viewer, sign_in};
pub use episodes::{
    AudioTrack, Episode, EpisodeMetadata, EpisodeSet, ProviderEpisodes, ProviderSummary,
    combine_episode_meta, load_json_file, providers_map,
};
pub use error::{GraphQlError, InputError};
pub use graphql::{AniListClient, ClientOptions, GraphQlResponse};
pub use http::{HttpClient, HttpResponse, ReqwestClient};
pub use list::{
    MediaListEntry, MediaListStatus, ProgressUpdate, SaveOutcome, fetch_list_entry,
    fetch_notifications, fetch_user_profile, save_progress,
};
pub use media::{MediaInfo, fetch_watch_info};
pub use notify::{NoopNotifier, Notification, Notifier, SharedNotifier};
pub use stats::StatsOverview;
