use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use crate::adapters::{HelixStream, HelixUser, TwitchApiClient};
use crate::auth::TokenManager;
use crate::error::{RelayError, RelayResult, STREAMS_FAILED_MESSAGE};

/// Maximum number of streams requested from Helix
pub const STREAM_PAGE_SIZE: usize = 10;
/// Thumbnail width substituted into the template URL
pub const THUMBNAIL_WIDTH: &str = "440";
/// Thumbnail height substituted into the template URL
pub const THUMBNAIL_HEIGHT: &str = "248";

/// A live stream as served to the frontend
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamRecord {
    pub id: String,
    #[serde(rename = "canal")]
    pub channel: String,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "avatarUrl")]
    pub avatar_url: Option<String>,
    #[serde(rename = "espectadores")]
    pub viewer_count: u64,
    #[serde(rename = "enVivo")]
    pub live: bool,
    #[serde(rename = "imagen")]
    pub thumbnail_url: String,
}

impl StreamRecord {
    /// Join a Helix stream with its broadcaster profile
    pub fn from_helix(stream: HelixStream, profile: Option<&HelixUser>) -> Self {
        Self {
            live: stream.stream_type == "live",
            thumbnail_url: sized_thumbnail(&stream.thumbnail_url),
            avatar_url: profile.map(|user| user.profile_image_url.clone()),
            id: stream.id,
            channel: stream.user_name,
            title: stream.title,
            category: stream.game_name,
            viewer_count: stream.viewer_count,
        }
    }
}

/// Substitute the fixed thumbnail dimensions into a Helix template URL
pub fn sized_thumbnail(template: &str) -> String {
    template
        .replace("{width}", THUMBNAIL_WIDTH)
        .replace("{height}", THUMBNAIL_HEIGHT)
}

/// Distinct broadcaster IDs in first-seen order
fn broadcaster_ids(streams: &[HelixStream]) -> Vec<String> {
    let mut seen = HashSet::new();
    streams
        .iter()
        .filter(|stream| seen.insert(stream.user_id.as_str()))
        .map(|stream| stream.user_id.clone())
        .collect()
}

/// Lists live streams joined with their broadcasters' avatars
pub struct StreamListingService {
    tokens: TokenManager,
    api: Arc<TwitchApiClient>,
    language: String,
}

impl StreamListingService {
    pub fn new(tokens: TokenManager, api: Arc<TwitchApiClient>, language: impl Into<String>) -> Self {
        Self {
            tokens,
            api,
            language: language.into(),
        }
    }

    /// Fetch the current live streams
    ///
    /// Fails with `ServiceUnavailable` when no app token can be obtained and
    /// with `Upstream` when either Helix call fails. Never returns partial data.
    #[instrument(skip(self), level = "debug")]
    pub async fn list_streams(&self) -> RelayResult<Vec<StreamRecord>> {
        let token = match self.tokens.ensure_app_token().await {
            Ok(token) => token,
            Err(e) => {
                warn!(code = %e.code(), "Stream listing unavailable without an app token");
                return Err(RelayError::ServiceUnavailable);
            }
        };

        let streams = self
            .api
            .fetch_live_streams(&token, STREAM_PAGE_SIZE, &self.language)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch streams from Helix");
                RelayError::upstream(STREAMS_FAILED_MESSAGE, e)
            })?;

        if streams.is_empty() {
            debug!("No live streams returned");
            return Ok(Vec::new());
        }

        let ids = broadcaster_ids(&streams);
        let users = self
            .api
            .fetch_users_by_id(&token, &ids)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch broadcaster profiles from Helix");
                RelayError::upstream(STREAMS_FAILED_MESSAGE, e)
            })?;

        let profiles: HashMap<&str, &HelixUser> =
            users.iter().map(|user| (user.id.as_str(), user)).collect();

        let records: Vec<StreamRecord> = streams
            .into_iter()
            .map(|stream| {
                let profile = profiles.get(stream.user_id.as_str()).copied();
                StreamRecord::from_helix(stream, profile)
            })
            .collect();

        info!(count = records.len(), "Listed live streams");
        Ok(records)
    }
}
