mod entry;
mod notifications;
mod profile;
mod progress;

pub use entry::{MediaListEntry, MediaListStatus, fetch_list_entry};
pub use notifications::{
    AniListNotification, NOTIFICATIONS_PER_PAGE, NotificationMedia, NotificationPage, PageInfo,
    fetch_notifications,
};
pub use profile::{
    Avatar, ListEntry, ListMedia, MediaList, ProfileUser, UserProfile, UserStatistics,
    fetch_user_profile,
};
pub use progress::{
    ProgressUpdate, SaveOutcome, SkipReason, UpdatePlan, plan_update, save_progress,
};
