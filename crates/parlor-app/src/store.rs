//! The client-side state container.
//!
//! One [`Store`] holds everything a signed-in session renders: the
//! account, the room list, the selected room, and six paginated
//! collections scoped to that room. The store is a pure state machine;
//! all I/O lives in the service layer, which feeds responses back in
//! through the `apply_*` methods.
//!
//! Room switches bump a generation counter. Every admitted fetch is
//! stamped with the generation at admission, and a response stamped
//! with an old generation is dropped on arrival, so a fetch still in
//! flight when the user switches rooms can never leak the previous
//! room's items into the new one.

use parlor_core::{
    ChatMessage, CollectionKind, FeedId, FeedPost, FileEntry, Meeting, Member, PaymentSplit, Room,
    User,
};

use crate::collection::{CollectionState, FetchPlan};

/// Session and room state for one signed-in user.
#[derive(Debug, Clone, Default)]
pub struct Store {
    user: Option<User>,
    rooms: Vec<Room>,
    selected_room: Option<Room>,
    generation: u64,
    feed: CollectionState<FeedPost>,
    messages: CollectionState<ChatMessage>,
    files: CollectionState<FileEntry>,
    members: CollectionState<Member>,
    meetings: CollectionState<Meeting>,
    payments: CollectionState<PaymentSplit>,
}

impl Store {
    /// The signed-in user, once fetched.
    pub const fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Rooms the user belongs to.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// The room whose collections are loaded.
    pub const fn selected_room(&self) -> Option<&Room> {
        self.selected_room.as_ref()
    }

    /// The feed collection.
    pub const fn feed(&self) -> &CollectionState<FeedPost> {
        &self.feed
    }

    /// The chat collection, oldest message first.
    pub const fn messages(&self) -> &CollectionState<ChatMessage> {
        &self.messages
    }

    /// The file tree collection for the current folder.
    pub const fn files(&self) -> &CollectionState<FileEntry> {
        &self.files
    }

    /// The members collection.
    pub const fn members(&self) -> &CollectionState<Member> {
        &self.members
    }

    /// The meetings collection.
    pub const fn meetings(&self) -> &CollectionState<Meeting> {
        &self.meetings
    }

    /// The payment splits collection.
    pub const fn payments(&self) -> &CollectionState<PaymentSplit> {
        &self.payments
    }

    /// Record the signed-in user.
    pub fn set_user(&mut self, user: User) {
        self.user = Some(user);
    }

    /// Replace the room list.
    pub fn set_rooms(&mut self, rooms: Vec<Room>) {
        self.rooms = rooms;
    }

    /// Switch to `room`: wipe all six collections and bump the
    /// generation so in-flight responses for the old room are dropped.
    pub fn select_room(&mut self, room: Room) {
        self.selected_room = Some(room);
        self.generation += 1;
        self.feed.clear();
        self.messages.clear();
        self.files.clear();
        self.members.clear();
        self.meetings.clear();
        self.payments.clear();
    }

    /// Sign out: drop the session on top of everything a room switch
    /// drops.
    pub fn clear_session(&mut self) {
        self.user = None;
        self.rooms.clear();
        self.selected_room = None;
        self.generation += 1;
        self.feed.clear();
        self.messages.clear();
        self.files.clear();
        self.members.clear();
        self.meetings.clear();
        self.payments.clear();
    }

    /// Admit a fetch for `kind`, honoring its loading and end guards.
    pub fn begin_fetch(&mut self, kind: CollectionKind, reset: bool) -> Option<FetchPlan> {
        let generation = self.generation;
        match kind {
            CollectionKind::Feed => self.feed.begin_fetch(kind, reset, generation),
            CollectionKind::Messages => self.messages.begin_fetch(kind, reset, generation),
            CollectionKind::Files => self.files.begin_fetch(kind, reset, generation),
            CollectionKind::Members => self.members.begin_fetch(kind, reset, generation),
            CollectionKind::Meetings => self.meetings.begin_fetch(kind, reset, generation),
            CollectionKind::Payments => self.payments.begin_fetch(kind, reset, generation),
        }
    }

    /// Merge a fetched feed page, unless the plan is stale.
    pub fn apply_feed_page(&mut self, plan: &FetchPlan, page: Vec<FeedPost>) {
        if self.is_current(plan) {
            self.feed.apply_page(plan, page);
        }
    }

    /// Merge a fetched chat page, unless the plan is stale.
    pub fn apply_messages_page(&mut self, plan: &FetchPlan, page: Vec<ChatMessage>) {
        if self.is_current(plan) {
            self.messages.apply_page(plan, page);
        }
    }

    /// Merge a fetched file page, unless the plan is stale.
    pub fn apply_files_page(&mut self, plan: &FetchPlan, page: Vec<FileEntry>) {
        if self.is_current(plan) {
            self.files.apply_page(plan, page);
        }
    }

    /// Merge a fetched members page, unless the plan is stale.
    pub fn apply_members_page(&mut self, plan: &FetchPlan, page: Vec<Member>) {
        if self.is_current(plan) {
            self.members.apply_page(plan, page);
        }
    }

    /// Merge a fetched meetings page, unless the plan is stale.
    pub fn apply_meetings_page(&mut self, plan: &FetchPlan, page: Vec<Meeting>) {
        if self.is_current(plan) {
            self.meetings.apply_page(plan, page);
        }
    }

    /// Merge a fetched payments page, unless the plan is stale.
    pub fn apply_payments_page(&mut self, plan: &FetchPlan, page: Vec<PaymentSplit>) {
        if self.is_current(plan) {
            self.payments.apply_page(plan, page);
        }
    }

    /// Release the loading guard after a failed fetch. Stale failures
    /// are dropped like stale pages.
    pub fn fail_fetch(&mut self, plan: &FetchPlan) {
        if !self.is_current(plan) {
            return;
        }
        match plan.kind {
            CollectionKind::Feed => self.feed.fail_fetch(),
            CollectionKind::Messages => self.messages.fail_fetch(),
            CollectionKind::Files => self.files.fail_fetch(),
            CollectionKind::Members => self.members.fail_fetch(),
            CollectionKind::Meetings => self.meetings.fail_fetch(),
            CollectionKind::Payments => self.payments.fail_fetch(),
        }
    }

    /// Flip the user's like on a post locally, adjusting the counter.
    ///
    /// Returns `false` when the post is not held, in which case nothing
    /// changed.
    pub fn toggle_like(&mut self, feed_id: FeedId) -> bool {
        let Some(post) = self.feed.items_mut().iter_mut().find(|p| p.id == feed_id) else {
            return false;
        };
        if post.user_liked {
            post.user_liked = false;
            post.likes = post.likes.saturating_sub(1);
        } else {
            post.user_liked = true;
            post.likes += 1;
        }
        true
    }

    /// Undo an optimistic [`toggle_like`](Self::toggle_like) after the
    /// backend rejected it.
    pub fn revert_like(&mut self, feed_id: FeedId) {
        self.toggle_like(feed_id);
    }

    /// Append a message the user just sent.
    pub fn append_message(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Append messages the poll loop found, newest first on the wire.
    pub fn append_new_messages(&mut self, mut page: Vec<ChatMessage>) {
        page.reverse();
        self.messages.items_mut().append(&mut page);
    }

    /// Append a meeting the user just scheduled.
    pub fn append_meeting(&mut self, meeting: Meeting) {
        self.meetings.push(meeting);
    }

    /// Append a payment split the user just created.
    pub fn append_payment(&mut self, split: PaymentSplit) {
        self.payments.push(split);
    }

    fn is_current(&self, plan: &FetchPlan) -> bool {
        if plan.generation == self.generation {
            return true;
        }
        tracing::debug!(
            kind = ?plan.kind,
            plan_generation = plan.generation,
            store_generation = self.generation,
            "dropping stale page"
        );
        false
    }
}
