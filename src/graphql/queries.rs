//! GraphQL documents sent to AniList.

/// Status and progress of the viewer's list entry for one media
pub const MEDIA_LIST_ENTRY: &str = r#"
query ($mediaId: Int) {
  Media(id: $mediaId) {
    mediaListEntry {
      status
      progress
    }
  }
}
"#;

/// Create-or-update the viewer's list entry
pub const SAVE_MEDIA_LIST_ENTRY: &str = r#"
mutation ($mediaId: Int, $progress: Int, $status: MediaListStatus) {
  SaveMediaListEntry(mediaId: $mediaId, progress: $progress, status: $status) {
    id
    mediaId
    progress
    status
  }
}
"#;

/// Media details shown on the player page
pub const WATCH_PAGE_INFO: &str = r#"
query ($id: Int) {
  Media(id: $id, type: ANIME) {
    id
    idMal
    title {
      romaji
      english
      native
    }
    format
    status
    episodes
    duration
    coverImage {
      extraLarge
      color
    }
    bannerImage
    nextAiringEpisode {
      episode
      airingAt
      timeUntilAiring
    }
    mediaListEntry {
      status
      progress
    }
  }
}
"#;

/// A page of the viewer's notifications
pub const NOTIFICATIONS: &str = r#"
query ($page: Int, $perPage: Int) {
  Page(page: $page, perPage: $perPage) {
    pageInfo {
      total
      currentPage
      lastPage
      hasNextPage
    }
    notifications(resetNotificationCount: true) {
      ... on AiringNotification {
        id
        type
        episode
        contexts
        createdAt
        media {
          id
          title {
            romaji
            english
          }
        }
      }
      ... on RelatedMediaAdditionNotification {
        id
        type
        context
        createdAt
        media {
          id
          title {
            romaji
            english
          }
        }
      }
      ... on MediaDataChangeNotification {
        id
        type
        context
        reason
        createdAt
        media {
          id
          title {
            romaji
            english
          }
        }
      }
    }
  }
}
"#;

/// Anime lists and statistics of a user
pub const USER_PROFILE: &str = r#"
query ($username: String) {
  MediaListCollection(userName: $username, type: ANIME, sort: UPDATED_TIME_DESC) {
    user {
      id
      name
      avatar {
        large
      }
      bannerImage
      statistics {
        anime {
          count
          episodesWatched
          minutesWatched
          meanScore
          statuses {
            status
            count
          }
          scores(sort: MEAN_SCORE_DESC) {
            score
            count
          }
          genres(sort: COUNT_DESC) {
            genre
            count
            meanScore
          }
          studios(sort: COUNT_DESC) {
            studio {
              name
            }
            count
            meanScore
          }
          releaseYears {
            releaseYear
            count
          }
        }
      }
    }
    lists {
      name
      status
      isCustomList
      entries {
        id
        status
        progress
        score
        media {
          id
          episodes
          title {
            romaji
            english
          }
        }
      }
    }
  }
}
"#;

/// The authenticated user
pub const VIEWER: &str = r#"
query {
  Viewer {
    id
    name
    avatar {
      large
      medium
    }
    bannerImage
    createdAt
    mediaListOptions {
      animeList {
        customLists
      }
    }
  }
}
"#;

/// Replace the viewer's custom anime lists
pub const UPDATE_CUSTOM_LISTS: &str = r#"
mutation ($lists: [String]) {
  UpdateUser(animeListOptions: { customLists: $lists }) {
    id
  }
}
"#;
