//! Room analytics wire models.
//!
//! The backend aggregates per-room activity into headline totals plus
//! time-series buckets over a caller-chosen date range. Viewing is
//! restricted to room admins unless the room shares analytics with
//! every member (`Room::is_analytics_public`).

use serde::{Deserialize, Serialize};

/// Bucket granularity for analytics time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFrame {
    /// One bucket per day.
    Day,
    /// One bucket per month.
    Month,
}

impl TimeFrame {
    /// The wire representation of this granularity.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Month => "month",
        }
    }
}

/// Headline totals for a room.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    /// Member count.
    #[serde(default)]
    pub no_of_members: u64,
    /// File count.
    #[serde(default)]
    pub no_of_files: u64,
    /// Chat message count.
    #[serde(default)]
    pub no_of_messages: u64,
    /// Feed post count.
    #[serde(default)]
    pub no_of_feed: u64,
    /// Storage used, in gigabytes.
    #[serde(default)]
    pub storage_used: f64,
}

/// One bucket of a per-period count series (messages, feed posts).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountPoint {
    /// Bucket date, as reported by the backend.
    pub date: String,
    /// Display label for the bucket.
    pub date_formatted: String,
    /// Events in this bucket.
    pub count: u64,
}

/// One bucket of the active-users series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveUsersPoint {
    /// Bucket date, as reported by the backend.
    pub date: String,
    /// Display label for the bucket.
    pub date_formatted: String,
    /// Distinct users active in this bucket.
    pub active_users: u64,
}

/// One bucket of the user-growth series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserGrowthPoint {
    /// Bucket date, as reported by the backend.
    pub date: String,
    /// Display label for the bucket.
    pub date_formatted: String,
    /// Users who joined in this bucket.
    pub new_users: u64,
    /// Running member total through this bucket.
    pub cumulative_users: u64,
}

/// One bucket of the storage-growth series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoragePoint {
    /// Bucket date, as reported by the backend.
    pub date: String,
    /// Display label for the bucket.
    pub date_formatted: String,
    /// Storage added in this bucket, in gigabytes.
    pub storage_added_gb: f64,
    /// Running storage total through this bucket, in gigabytes.
    pub cumulative_storage_gb: f64,
}

/// One bucket of the bandwidth series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandwidthPoint {
    /// Bucket date, as reported by the backend.
    pub date: String,
    /// Display label for the bucket.
    pub date_formatted: String,
    /// Bandwidth consumed in this bucket, in gigabytes.
    pub bandwidth_gb: f64,
}

/// A most-active member, by message volume over the range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopUser {
    /// The member's user id.
    pub user_id: u64,
    /// Display name.
    pub name: String,
    /// Messages sent over the range.
    pub message_count: u64,
    /// Share of all messages over the range, in percent.
    pub percentage_of_total: f64,
}

/// Aggregated room analytics over one date range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomAnalytics {
    /// Headline totals.
    #[serde(default)]
    pub basic: AnalyticsSummary,
    /// Distinct active users per bucket.
    #[serde(default)]
    pub active_users: Vec<ActiveUsersPoint>,
    /// New and cumulative members per bucket.
    #[serde(default)]
    pub user_growth: Vec<UserGrowthPoint>,
    /// Chat messages per bucket.
    #[serde(default)]
    pub messages: Vec<CountPoint>,
    /// Feed posts per bucket.
    #[serde(default)]
    pub feed: Vec<CountPoint>,
    /// Most active members over the range.
    #[serde(default)]
    pub top_users: Vec<TopUser>,
    /// Storage growth per bucket.
    #[serde(default)]
    pub storage: Vec<StoragePoint>,
    /// Bandwidth per bucket.
    #[serde(default)]
    pub bandwidth: Vec<BandwidthPoint>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn time_frame_uses_lowercase_wire_casing() {
        assert_eq!(serde_json::to_string(&TimeFrame::Day).unwrap(), "\"day\"");
        assert_eq!(TimeFrame::Month.as_str(), "month");
    }

    #[test]
    fn analytics_deserialize_with_missing_series() {
        let json = serde_json::json!({
            "basic": { "no_of_members": 12, "storage_used": 1.5 },
            "messages": [
                { "date": "2024-01-01", "date_formatted": "Jan 2024", "count": 40 }
            ]
        });

        let analytics: RoomAnalytics = serde_json::from_value(json).unwrap();
        assert_eq!(analytics.basic.no_of_members, 12);
        assert_eq!(analytics.basic.no_of_feed, 0);
        assert_eq!(analytics.messages[0].count, 40);
        assert!(analytics.user_growth.is_empty());
        assert!(analytics.bandwidth.is_empty());
    }
}
