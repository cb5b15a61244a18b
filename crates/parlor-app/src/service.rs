//! Async orchestration between the store and the API client.
//!
//! [`RoomService`] owns the [`Store`] and runs every network flow
//! against it: admit a fetch through the store's guards, run the
//! request, feed the response back. The store stays pure; this is the
//! only place the two meet.

use chrono::{DateTime, Utc};
use parlor_api::{ApiClient, FileQuery, PaymentOrder};
use parlor_core::{
    ChatMessage, CollectionKind, Cursor, FeedId, FileId, FileMetaError, Meeting, MeetingId,
    MessageId, NewFeedPost, NewMeeting, NewPayment, PageQuery, PaymentId, Room, RoomAnalytics,
    RoomId, TimeFrame,
};
use thiserror::Error;

use crate::{
    store::Store,
    upload::{UploadItem, folder_registration, upload_all},
};

/// Errors from service flows.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A room-scoped flow ran with no room selected.
    #[error("no room selected")]
    NoRoomSelected,

    /// The requested room is not in the user's room list.
    #[error("unknown room {0}")]
    UnknownRoom(RoomId),

    /// The room restricts analytics to admins and the user is not one.
    #[error("analytics are restricted to room admins")]
    AnalyticsRestricted,

    /// The backend or transport failed.
    #[error(transparent)]
    Api(#[from] parlor_api::Error),

    /// A staged file was rejected before upload.
    #[error(transparent)]
    File(#[from] FileMetaError),
}

/// Orchestrates room flows over a [`Store`] and an [`ApiClient`].
pub struct RoomService {
    client: ApiClient,
    store: Store,
    file_filter: FileQuery,
}

impl RoomService {
    /// A service with an empty session.
    pub fn new(client: ApiClient) -> Self {
        Self { client, store: Store::default(), file_filter: FileQuery::default() }
    }

    /// Read access to the session state.
    pub const fn store(&self) -> &Store {
        &self.store
    }

    /// Fetch the account and room list.
    pub async fn refresh_session(&mut self) -> Result<(), ServiceError> {
        let users = self.client.user();
        let rooms = self.client.rooms();
        let (user, room_list) = tokio::join!(users.me(), rooms.list());
        self.store.set_user(user?);
        self.store.set_rooms(room_list?);
        Ok(())
    }

    /// Drop the session state on sign-out.
    pub fn sign_out(&mut self) {
        self.store.clear_session();
        self.file_filter = FileQuery::default();
    }

    /// Switch to a room from the user's list and load its first feed
    /// page.
    pub async fn open_room(&mut self, room_id: RoomId) -> Result<(), ServiceError> {
        let room = self
            .store
            .rooms()
            .iter()
            .find(|room| room.id == room_id)
            .cloned()
            .ok_or(ServiceError::UnknownRoom(room_id))?;
        self.store.select_room(room);
        self.file_filter = FileQuery::default();
        self.fetch_page(CollectionKind::Feed, true).await?;
        Ok(())
    }

    /// Public preview of a room the user has not joined.
    pub async fn room_preview(&self, room_id: RoomId) -> Result<Room, ServiceError> {
        Ok(self.client.rooms().preview(room_id).await?)
    }

    /// Join a room and refresh the room list.
    pub async fn join_room(&mut self, room_id: RoomId) -> Result<(), ServiceError> {
        self.client.rooms().join(room_id).await?;
        self.store.set_rooms(self.client.rooms().list().await?);
        Ok(())
    }

    /// Leave a room and refresh the room list.
    pub async fn leave_room(&mut self, room_id: RoomId) -> Result<(), ServiceError> {
        self.client.rooms().leave(room_id).await?;
        self.store.set_rooms(self.client.rooms().list().await?);
        Ok(())
    }

    /// Fetch one page of `kind` for the selected room.
    ///
    /// Returns `Ok(false)` when the store refused the fetch (one is
    /// already in flight, or the listing is exhausted and `reset` is
    /// not set). On failure the loading guard is released and the
    /// error surfaced.
    pub async fn fetch_page(
        &mut self,
        kind: CollectionKind,
        reset: bool,
    ) -> Result<bool, ServiceError> {
        let room_id = self.room_id()?;
        let Some(plan) = self.store.begin_fetch(kind, reset) else {
            return Ok(false);
        };

        let outcome = match kind {
            CollectionKind::Feed => match self.client.feed(room_id).list(plan.query).await {
                Ok(page) => {
                    self.store.apply_feed_page(&plan, page);
                    Ok(())
                },
                Err(error) => Err(error),
            },
            CollectionKind::Messages => {
                match self.client.messages(room_id).list(plan.query, None).await {
                    Ok(page) => {
                        self.store.apply_messages_page(&plan, page);
                        Ok(())
                    },
                    Err(error) => Err(error),
                }
            },
            CollectionKind::Files => {
                let filter = self.file_filter.clone();
                match self.client.files(room_id).list(plan.query, &filter).await {
                    Ok(page) => {
                        self.store.apply_files_page(&plan, page);
                        Ok(())
                    },
                    Err(error) => Err(error),
                }
            },
            CollectionKind::Members => match self.client.members(room_id).list(plan.query).await {
                Ok(page) => {
                    self.store.apply_members_page(&plan, page);
                    Ok(())
                },
                Err(error) => Err(error),
            },
            CollectionKind::Meetings => {
                match self.client.meetings(room_id).list(plan.query).await {
                    Ok(page) => {
                        self.store.apply_meetings_page(&plan, page);
                        Ok(())
                    },
                    Err(error) => Err(error),
                }
            },
            CollectionKind::Payments => {
                match self.client.payments(room_id).list(plan.query).await {
                    Ok(page) => {
                        self.store.apply_payments_page(&plan, page);
                        Ok(())
                    },
                    Err(error) => Err(error),
                }
            },
        };

        match outcome {
            Ok(()) => Ok(true),
            Err(error) => {
                self.store.fail_fetch(&plan);
                tracing::warn!(?kind, %error, "page fetch failed");
                Err(error.into())
            },
        }
    }

    /// Toggle a like optimistically, reverting if the backend rejects
    /// it.
    pub async fn like_post(&mut self, feed_id: FeedId) -> Result<(), ServiceError> {
        let room_id = self.room_id()?;
        if !self.store.toggle_like(feed_id) {
            return Ok(());
        }
        if let Err(error) = self.client.feed(room_id).like(feed_id).await {
            self.store.revert_like(feed_id);
            tracing::warn!(feed_id, %error, "like rejected, reverting");
            return Err(error.into());
        }
        Ok(())
    }

    /// Record that the user viewed a post.
    pub async fn record_view(&self, feed_id: FeedId) -> Result<(), ServiceError> {
        let room_id = self.room_id()?;
        Ok(self.client.feed(room_id).record_view(feed_id).await?)
    }

    /// Publish a post: upload the attachments, create the post, reload
    /// the feed.
    ///
    /// Attachments register with the post itself, so a failed upload
    /// abandons the whole publish.
    pub async fn create_post(
        &mut self,
        message: &str,
        attachments: &mut [UploadItem],
    ) -> Result<(), ServiceError> {
        let room_id = self.room_id()?;
        upload_all(&self.client, attachments).await?;

        let post = NewFeedPost {
            room_id,
            message: message.to_owned(),
            files: attachments.iter().map(|item| item.registration(room_id, None)).collect(),
        };
        self.client.feed(room_id).create(&post).await?;
        self.fetch_page(CollectionKind::Feed, true).await?;
        Ok(())
    }

    /// Send a chat message and append it locally.
    pub async fn send_message(&mut self, text: &str) -> Result<(), ServiceError> {
        let room_id = self.room_id()?;
        let message = self.client.messages(room_id).send(text, None).await?;
        self.store.append_message(message);
        Ok(())
    }

    /// Ask for messages newer than the newest held one and append
    /// them. Returns whether anything arrived.
    pub async fn poll_newer_messages(&mut self) -> Result<bool, ServiceError> {
        let room_id = self.room_id()?;
        let cursor = self.store.messages().items().last().map(|message| message.id);
        let take = CollectionKind::Messages.page_size();
        let newer = self.client.messages(room_id).newer_than(cursor, take).await?;
        if newer.is_empty() {
            return Ok(false);
        }
        self.store.append_new_messages(newer);
        Ok(true)
    }

    /// Fetch a post's reply thread, one backward page at a time.
    pub async fn fetch_replies(
        &self,
        feed_id: FeedId,
        before: Option<MessageId>,
    ) -> Result<Vec<ChatMessage>, ServiceError> {
        let room_id = self.room_id()?;
        let kind = CollectionKind::Messages;
        let query = PageQuery { cursor: before.map(Cursor::Id), take: kind.page_size() };
        Ok(self.client.messages(room_id).list(query, Some(feed_id)).await?)
    }

    /// Navigate the file tree to `parent_id` (`None` for the room
    /// root) and reload.
    pub async fn open_folder(&mut self, parent_id: Option<FileId>) -> Result<(), ServiceError> {
        self.file_filter = FileQuery { parent_id, search: None };
        self.fetch_page(CollectionKind::Files, true).await?;
        Ok(())
    }

    /// Filter the current folder by file name and reload. `None`
    /// clears the filter.
    pub async fn search_files(&mut self, search: Option<String>) -> Result<(), ServiceError> {
        self.file_filter.search = search;
        self.fetch_page(CollectionKind::Files, true).await?;
        Ok(())
    }

    /// Create a folder under the current one and reload the listing.
    pub async fn create_folder(&mut self, name: &str) -> Result<(), ServiceError> {
        let room_id = self.room_id()?;
        let entry = folder_registration(name, room_id, self.file_filter.parent_id.clone());
        self.client.files(room_id).create_batch(&[entry]).await?;
        self.fetch_page(CollectionKind::Files, true).await?;
        Ok(())
    }

    /// Upload a batch of files into the current folder.
    ///
    /// Registration is all or nothing: if any object fails to upload,
    /// the backend never hears about the batch.
    pub async fn upload_files(&mut self, items: &mut [UploadItem]) -> Result<(), ServiceError> {
        let room_id = self.room_id()?;
        upload_all(&self.client, items).await?;

        let entries: Vec<_> = items
            .iter()
            .map(|item| item.registration(room_id, self.file_filter.parent_id.clone()))
            .collect();
        self.client.files(room_id).create_batch(&entries).await?;
        self.fetch_page(CollectionKind::Files, true).await?;
        Ok(())
    }

    /// Schedule a meeting and append it locally.
    pub async fn create_meeting(
        &mut self,
        title: &str,
        scheduled_at: DateTime<Utc>,
    ) -> Result<(), ServiceError> {
        let room_id = self.room_id()?;
        let meeting = NewMeeting { room_id, title: title.to_owned(), scheduled_at };
        let created = self.client.meetings(room_id).create(&meeting).await?;
        self.store.append_meeting(created);
        Ok(())
    }

    /// A meeting with its conferencing room code resolved, for
    /// joining.
    pub async fn join_meeting(&self, meeting_id: MeetingId) -> Result<Meeting, ServiceError> {
        let room_id = self.room_id()?;
        Ok(self.client.meetings(room_id).get(meeting_id).await?)
    }

    /// Aggregated analytics for the selected room over a date range.
    ///
    /// Gated client-side the same way the analytics tab is: admins
    /// always see them, other members only when the room shares them.
    /// No request goes out for a restricted viewer.
    pub async fn fetch_analytics(
        &self,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        time_frame: TimeFrame,
    ) -> Result<RoomAnalytics, ServiceError> {
        let room = self.store.selected_room().ok_or(ServiceError::NoRoomSelected)?;
        if !room.is_admin && !room.is_analytics_public {
            return Err(ServiceError::AnalyticsRestricted);
        }
        Ok(self.client.analytics(room.id).get(start_date, end_date, time_frame).await?)
    }

    /// Create a payment to collect across the room and append the
    /// user's split locally.
    pub async fn create_payment(
        &mut self,
        description: &str,
        amount: f64,
    ) -> Result<(), ServiceError> {
        let room_id = self.room_id()?;
        let payment = NewPayment { room_id, description: description.to_owned(), amount };
        let split = self.client.payments(room_id).create(&payment).await?;
        self.store.append_payment(split);
        Ok(())
    }

    /// Create a gateway order for the user's split, for the checkout
    /// widget.
    pub async fn start_checkout(&self, payment_id: PaymentId) -> Result<PaymentOrder, ServiceError> {
        let room_id = self.room_id()?;
        Ok(self.client.payments(room_id).create_order(payment_id).await?)
    }

    /// Report a checkout result back and reload the payments tab.
    pub async fn confirm_checkout(
        &mut self,
        order_id: &str,
        gateway_signature: &str,
    ) -> Result<(), ServiceError> {
        let room_id = self.room_id()?;
        self.client.payments(room_id).callback(order_id, gateway_signature).await?;
        self.fetch_page(CollectionKind::Payments, true).await?;
        Ok(())
    }

    fn room_id(&self) -> Result<RoomId, ServiceError> {
        self.store.selected_room().map(|room| room.id).ok_or(ServiceError::NoRoomSelected)
    }
}
