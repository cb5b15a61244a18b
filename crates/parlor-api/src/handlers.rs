//! Per-resource request handlers.
//!
//! Room-scoped handlers carry their `room_id` so every request is
//! tenant-scoped at the type level; list endpoints take a
//! [`PageQuery`] and translate its cursor to the wire parameters the
//! backend expects (`cursor`/`take`, or `skip`/`take` for files).

use chrono::{DateTime, Utc};
use parlor_core::{
    ChatMessage, Cursor, FeedId, FeedPost, FileEntry, Meeting, MeetingId, Member, MessageId,
    NewFeedPost, NewFileEntry, NewMeeting, NewPayment, PageQuery, PaymentId, PaymentSplit, Room,
    RoomAnalytics, RoomId, TimeFrame, User,
};
use serde::Deserialize;

use crate::{ApiClient, Result, routes};

/// Translate a [`PageQuery`] into wire parameters.
fn page_params(query: PageQuery, params: &mut Vec<(&'static str, String)>) {
    match query.cursor {
        Some(Cursor::Id(id)) => params.push(("cursor", id.to_string())),
        Some(Cursor::Offset(n)) => params.push(("skip", n.to_string())),
        None => {},
    }
    params.push(("take", query.take.to_string()));
}

/// Requests about the current user.
pub struct UserHandler {
    pub(crate) client: ApiClient,
}

impl UserHandler {
    /// The signed-in user's account.
    pub async fn me(&self) -> Result<User> {
        self.client.get_json(routes::USER, &[]).await
    }
}

/// Requests about the current user's rooms.
pub struct RoomsHandler {
    pub(crate) client: ApiClient,
}

impl RoomsHandler {
    /// Rooms the user belongs to, with the derived admin flag.
    pub async fn list(&self) -> Result<Vec<Room>> {
        self.client.get_json(routes::ROOMS, &[]).await
    }

    /// Public preview of a room the user has not joined.
    pub async fn preview(&self, room_id: RoomId) -> Result<Room> {
        self.client.get_json(&routes::room_preview(room_id), &[]).await
    }

    /// Join a room.
    pub async fn join(&self, room_id: RoomId) -> Result<()> {
        self.client.post_unit(&routes::room_join(room_id), &[], &()).await
    }

    /// Leave a room.
    pub async fn leave(&self, room_id: RoomId) -> Result<()> {
        self.client.post_unit(&routes::room_leave(room_id), &[], &()).await
    }
}

/// Requests against one room's feed.
pub struct FeedHandler {
    pub(crate) client: ApiClient,
    pub(crate) room_id: RoomId,
}

impl FeedHandler {
    /// One page of feed posts, oldest-cursor forward.
    pub async fn list(&self, query: PageQuery) -> Result<Vec<FeedPost>> {
        let mut params = vec![("room_id", self.room_id.to_string())];
        page_params(query, &mut params);
        self.client.get_json(routes::FEED, &params).await
    }

    /// Publish a post (files must already be uploaded).
    pub async fn create(&self, post: &NewFeedPost) -> Result<FeedPost> {
        self.client.post_json(routes::FEED, &[], post).await
    }

    /// Toggle the current user's like on a post.
    pub async fn like(&self, feed_id: FeedId) -> Result<()> {
        self.client
            .put_unit(routes::FEED_LIKE, &[("feed_id", feed_id.to_string())])
            .await
    }

    /// Record that the current user viewed a post.
    pub async fn record_view(&self, feed_id: FeedId) -> Result<()> {
        self.client
            .put_unit(routes::FEED_VIEW, &[("feed_id", feed_id.to_string())])
            .await
    }
}

/// Requests against one room's chat.
pub struct MessagesHandler {
    pub(crate) client: ApiClient,
    pub(crate) room_id: RoomId,
}

impl MessagesHandler {
    /// One backward page of messages, newest first on the wire.
    ///
    /// Pass `feed_id` to list a post's reply thread instead of room
    /// chat.
    pub async fn list(&self, query: PageQuery, feed_id: Option<FeedId>) -> Result<Vec<ChatMessage>> {
        let mut params = vec![("room_id", self.room_id.to_string())];
        if let Some(feed_id) = feed_id {
            params.push(("feed_id", feed_id.to_string()));
        }
        page_params(query, &mut params);
        self.client.get_json(routes::MESSAGES, &params).await
    }

    /// Messages newer than `cursor`, newest first. Used by the chat
    /// poll loop.
    pub async fn newer_than(
        &self,
        cursor: Option<MessageId>,
        take: usize,
    ) -> Result<Vec<ChatMessage>> {
        let mut params = vec![
            ("room_id", self.room_id.to_string()),
            ("listener", "true".to_owned()),
        ];
        if let Some(cursor) = cursor {
            params.push(("cursor", cursor.to_string()));
        }
        params.push(("take", take.to_string()));
        self.client.get_json(routes::MESSAGES, &params).await
    }

    /// Send a message to room chat (or a post's thread).
    pub async fn send(&self, message: &str, feed_id: Option<FeedId>) -> Result<ChatMessage> {
        let mut params = vec![("room_id", self.room_id.to_string())];
        if let Some(feed_id) = feed_id {
            params.push(("feed_id", feed_id.to_string()));
        }
        let body = serde_json::json!({ "message": message });
        self.client.post_json(routes::MESSAGES, &params, &body).await
    }
}

/// Listing parameters for the file tree, beyond plain pagination.
#[derive(Debug, Clone, Default)]
pub struct FileQuery {
    /// Folder to list. `None` for the room root.
    pub parent_id: Option<String>,
    /// Case-insensitive file name filter.
    pub search: Option<String>,
}

/// Requests against one room's file tree.
pub struct FilesHandler {
    pub(crate) client: ApiClient,
    pub(crate) room_id: RoomId,
}

impl FilesHandler {
    /// One page of entries under a folder (offset pagination).
    pub async fn list(&self, query: PageQuery, filter: &FileQuery) -> Result<Vec<FileEntry>> {
        let mut params = vec![("room_id", self.room_id.to_string())];
        if let Some(parent_id) = &filter.parent_id {
            params.push(("parent_id", parent_id.clone()));
        }
        if let Some(search) = &filter.search {
            params.push(("search_file_name", search.clone()));
        }
        page_params(query, &mut params);
        self.client.get_json(routes::FILES, &params).await
    }

    /// Register a batch of uploaded files (or create a folder) in one
    /// call. The backend treats the batch atomically.
    pub async fn create_batch(&self, files: &[NewFileEntry]) -> Result<()> {
        let body = serde_json::json!({ "files": files });
        self.client.post_unit(routes::FILES, &[], &body).await
    }
}

/// Requests against one room's memberships.
pub struct MembersHandler {
    pub(crate) client: ApiClient,
    pub(crate) room_id: RoomId,
}

impl MembersHandler {
    /// One page of members.
    pub async fn list(&self, query: PageQuery) -> Result<Vec<Member>> {
        let mut params = vec![("room_id", self.room_id.to_string())];
        page_params(query, &mut params);
        self.client.get_json(routes::MEMBERS, &params).await
    }
}

/// Requests against one room's meetings.
pub struct MeetingsHandler {
    pub(crate) client: ApiClient,
    pub(crate) room_id: RoomId,
}

impl MeetingsHandler {
    /// One page of meetings.
    pub async fn list(&self, query: PageQuery) -> Result<Vec<Meeting>> {
        let mut params = vec![("room_id", self.room_id.to_string())];
        page_params(query, &mut params);
        self.client.get_json(routes::MEETINGS, &params).await
    }

    /// Schedule a meeting.
    pub async fn create(&self, meeting: &NewMeeting) -> Result<Meeting> {
        self.client.post_json(routes::MEETINGS, &[], meeting).await
    }

    /// A single meeting, with its conferencing room code resolved.
    pub async fn get(&self, meeting_id: MeetingId) -> Result<Meeting> {
        self.client.get_json(&routes::meeting(meeting_id), &[]).await
    }
}

/// Requests against one room's analytics.
pub struct AnalyticsHandler {
    pub(crate) client: ApiClient,
    pub(crate) room_id: RoomId,
}

impl AnalyticsHandler {
    /// Aggregated analytics over a date range, bucketed by
    /// `time_frame`.
    pub async fn get(
        &self,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        time_frame: TimeFrame,
    ) -> Result<RoomAnalytics> {
        let params = vec![
            ("room_id", self.room_id.to_string()),
            ("start_date", start_date.to_rfc3339()),
            ("end_date", end_date.to_rfc3339()),
            ("time_frame", time_frame.as_str().to_owned()),
        ];
        self.client.get_json(routes::ANALYTICS, &params).await
    }
}

/// A gateway order created server-side for checkout.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentOrder {
    /// Gateway order id to hand to the checkout widget.
    pub order_id: String,
}

/// Requests against one room's payments.
pub struct PaymentsHandler {
    pub(crate) client: ApiClient,
    pub(crate) room_id: RoomId,
}

impl PaymentsHandler {
    /// One page of the current user's payment splits.
    pub async fn list(&self, query: PageQuery) -> Result<Vec<PaymentSplit>> {
        let mut params = vec![("room_id", self.room_id.to_string())];
        page_params(query, &mut params);
        self.client.get_json(routes::PAYMENTS, &params).await
    }

    /// Create a payment to collect across the room.
    pub async fn create(&self, payment: &NewPayment) -> Result<PaymentSplit> {
        self.client.post_json(routes::PAYMENTS, &[], payment).await
    }

    /// Create a gateway order for the current user's split. The
    /// checkout widget itself runs outside this crate.
    pub async fn create_order(&self, payment_id: PaymentId) -> Result<PaymentOrder> {
        let body = serde_json::json!({ "payment_id": payment_id });
        self.client.post_json(routes::PAYMENT_ORDER, &[], &body).await
    }

    /// Reconcile a checkout result reported by the gateway widget.
    pub async fn callback(&self, order_id: &str, gateway_signature: &str) -> Result<()> {
        let body = serde_json::json!({
            "order_id": order_id,
            "signature": gateway_signature,
        });
        self.client.post_unit(routes::PAYMENT_CALLBACK, &[], &body).await
    }
}
