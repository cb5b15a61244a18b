//! Wire models for room-scoped resources.
//!
//! These records mirror the JSON payloads inside the backend's
//! `{ "data": ... }` envelope. They double as the view model for the
//! application layer: tabs render them directly, so they carry the
//! denormalized fields the backend joins in (author, files, counters).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::file_meta::{FileExtension, FileKind};

/// Room identifier.
pub type RoomId = u64;
/// User identifier.
pub type UserId = u64;
/// Feed post identifier.
pub type FeedId = u64;
/// Chat message identifier.
pub type MessageId = u64;
/// Room membership identifier.
pub type MemberId = u64;
/// Meeting identifier.
pub type MeetingId = u64;
/// Payment identifier.
pub type PaymentId = u64;

/// File identifier. Generated client-side before upload, so it is an
/// opaque string rather than a server-assigned integer.
pub type FileId = String;

/// A user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned id.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// E-mail, if the account has one linked.
    #[serde(default)]
    pub email: Option<String>,
    /// Avatar URL, if set.
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// A tenant-scoped workspace ("room") as seen by the current user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Server-assigned id.
    pub id: RoomId,
    /// Room name.
    pub name: String,
    /// Optional description shown on the room preview.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the current user administers this room. Derived
    /// server-side; gates admin-only affordances client-side.
    #[serde(default)]
    pub is_admin: bool,
    /// Whether non-admin members may view the room's analytics.
    #[serde(default)]
    pub is_analytics_public: bool,
}

/// An admin-authored post in a room's feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedPost {
    /// Server-assigned id; doubles as the feed pagination cursor.
    pub id: FeedId,
    /// Room this post belongs to.
    pub room_id: RoomId,
    /// Post body.
    pub message: String,
    /// Post author.
    pub author: User,
    /// Attached files.
    #[serde(default)]
    pub files: Vec<FileEntry>,
    /// Like counter.
    pub likes: u64,
    /// Comment counter.
    #[serde(default)]
    pub comments_count: u64,
    /// View counter.
    #[serde(default)]
    pub views: u64,
    /// Whether the current user has liked this post.
    #[serde(default)]
    pub user_liked: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A chat message in a room (or a reply thread under a feed post).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Server-assigned id; doubles as the chat pagination cursor.
    pub id: MessageId,
    /// Room this message belongs to.
    pub room_id: RoomId,
    /// Feed post this message replies to. `None` for room chat.
    #[serde(default)]
    pub feed_id: Option<FeedId>,
    /// Message body.
    pub message: String,
    /// Message author.
    pub user: User,
    /// Attached files.
    #[serde(default)]
    pub files: Vec<FileEntry>,
    /// Number of replies under this message.
    #[serde(default)]
    pub replies_count: u64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A file or folder entry in a room's file tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Client-generated opaque id.
    pub id: FileId,
    /// Display name, including extension.
    pub file_name: String,
    /// Extension the entry was registered with.
    pub file_extension: FileExtension,
    /// Kind derived from the extension.
    pub file_type: FileKind,
    /// Size in megabytes, rounded to two decimals. Zero for folders.
    #[serde(default)]
    pub file_size: f64,
    /// Download URL. `None` for folders.
    #[serde(default)]
    pub file_url: Option<String>,
    /// Parent folder id. `None` at the room root.
    #[serde(default)]
    pub parent_id: Option<FileId>,
}

/// A room membership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Server-assigned membership id; doubles as the members cursor.
    pub id: MemberId,
    /// The member's user account.
    pub user: User,
    /// Whether this member administers the room.
    #[serde(default)]
    pub is_admin: bool,
    /// When the user joined the room.
    pub joined_at: DateTime<Utc>,
}

/// A scheduled meeting in a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    /// Server-assigned id; doubles as the meetings cursor.
    pub id: MeetingId,
    /// Room this meeting belongs to.
    pub room_id: RoomId,
    /// Meeting title.
    pub title: String,
    /// Conferencing room code, resolved when joining. The video
    /// transport itself is handled by an external SDK.
    #[serde(default)]
    pub room_code: Option<String>,
    /// Scheduled start time.
    pub scheduled_at: DateTime<Utc>,
}

/// Settlement state of a payment, as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Created but not yet settled.
    Pending,
    /// Settled via the payment gateway.
    Paid,
    /// Settlement failed or was abandoned.
    Failed,
}

/// A payment collected across a room's members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Server-assigned id.
    pub id: PaymentId,
    /// Room this payment belongs to.
    pub room_id: RoomId,
    /// What the payment is for.
    pub description: String,
    /// Total amount.
    pub amount: f64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// The current user's share of a payment. The payments tab lists
/// splits, not payments, so the split id is the pagination cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSplit {
    /// Server-assigned split id.
    pub id: u64,
    /// Amount owed by the current user.
    pub amount_due: f64,
    /// Settlement state of this share.
    pub status: PaymentStatus,
    /// The parent payment.
    pub payment: Payment,
}

/// Payload for creating a feed post.
#[derive(Debug, Clone, Serialize)]
pub struct NewFeedPost {
    /// Target room.
    pub room_id: RoomId,
    /// Post body.
    pub message: String,
    /// Metadata of files already uploaded to object storage.
    pub files: Vec<NewFileEntry>,
}

/// Payload for registering one uploaded file (or creating a folder).
#[derive(Debug, Clone, Serialize)]
pub struct NewFileEntry {
    /// Client-generated id the object was uploaded under.
    pub id: FileId,
    /// Display name, including extension.
    pub file_name: String,
    /// File extension.
    pub file_extension: FileExtension,
    /// Kind derived from the extension.
    pub file_type: FileKind,
    /// Size in megabytes, rounded to two decimals.
    pub file_size: f64,
    /// Target room.
    pub room_id: RoomId,
    /// Parent folder. `None` for the room root.
    pub parent_id: Option<FileId>,
}

/// Payload for scheduling a meeting.
#[derive(Debug, Clone, Serialize)]
pub struct NewMeeting {
    /// Target room.
    pub room_id: RoomId,
    /// Meeting title.
    pub title: String,
    /// Scheduled start time.
    pub scheduled_at: DateTime<Utc>,
}

/// Payload for creating a payment.
#[derive(Debug, Clone, Serialize)]
pub struct NewPayment {
    /// Target room.
    pub room_id: RoomId,
    /// What the payment is for.
    pub description: String,
    /// Total amount to collect.
    pub amount: f64,
}
