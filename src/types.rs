use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Channel profile as returned by `/api/channels/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub handle: String,
    pub display_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub subscriber_count: u64,
    pub video_count: u64,
    // Optional detail fields (populated when available)
    #[serde(default)]
    pub banner_url: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoSummary {
    pub id: String,
    pub title: String,
    pub duration_secs: u64,
    pub view_count: u64,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

/// One row of a user's watch history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub video: VideoSummary,
    pub watched_at: DateTime<Utc>,
    /// Seconds into the video the user stopped at
    pub progress_secs: u64,
}

/// One day of a channel's analytics series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsPoint {
    pub date: NaiveDate,
    pub views: u64,
    pub watch_time_minutes: u64,
    pub subscribers_gained: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelAnalytics {
    pub channel_id: String,
    pub points: Vec<AnalyticsPoint>,
}
