mod client;
pub(crate) mod queries;

pub use client::{
    ANILIST_GRAPHQL_ENDPOINT, AniListClient, ClientOptions, GraphQlErrorEntry, GraphQlResponse,
};
