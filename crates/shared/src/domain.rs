use serde::{Deserialize, Serialize};

pub const FIELD_TITLE: &str = "title";
pub const FIELD_PUBLISH_DATE: &str = "publish_date";
pub const FIELD_PUBLISH_HOUR: &str = "publish_hour";
pub const FIELD_DURATION_MINUTES: &str = "duration_minutes";
pub const FIELD_TAG_COUNT: &str = "tag_count";
pub const FIELD_CHANNEL_SUBSCRIBERS: &str = "channel_subscribers";
pub const FIELD_CHANNEL_VIDEO_COUNT: &str = "channel_video_count";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
    #[serde(other)]
    Other,
}

/// Anything other than `healthy`, including a missing status, is degraded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    Healthy,
    #[default]
    #[serde(other)]
    Degraded,
}
