//! Paginated collection state.
//!
//! Each room tab holds one [`CollectionState`]. Fetching is split into
//! two pure steps so the async layer stays thin: [`begin_fetch`] decides
//! whether a request should run and produces a [`FetchPlan`], and
//! [`apply_page`] merges the response. Between the two, `loading` blocks
//! concurrent fetches of the same collection.
//!
//! [`begin_fetch`]: CollectionState::begin_fetch
//! [`apply_page`]: CollectionState::apply_page

use parlor_core::{
    ChatMessage, CollectionKind, Cursor, CursorMode, FeedPost, FileEntry, Meeting, Member,
    MergeMode, PageQuery, PaymentSplit,
};

/// An item that can be paginated by id cursor.
pub trait PageItem {
    /// Id used for cursor derivation. `None` when the collection
    /// paginates by offset instead.
    fn cursor_id(&self) -> Option<u64>;
}

impl PageItem for FeedPost {
    fn cursor_id(&self) -> Option<u64> {
        Some(self.id)
    }
}

impl PageItem for ChatMessage {
    fn cursor_id(&self) -> Option<u64> {
        Some(self.id)
    }
}

impl PageItem for Member {
    fn cursor_id(&self) -> Option<u64> {
        Some(self.id)
    }
}

impl PageItem for Meeting {
    fn cursor_id(&self) -> Option<u64> {
        Some(self.id)
    }
}

impl PageItem for PaymentSplit {
    fn cursor_id(&self) -> Option<u64> {
        Some(self.id)
    }
}

impl PageItem for FileEntry {
    fn cursor_id(&self) -> Option<u64> {
        None
    }
}

/// An admitted fetch: the request the async layer should run, stamped
/// with the store generation that admitted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPlan {
    /// Collection being fetched.
    pub kind: CollectionKind,
    /// Pagination parameters for the request.
    pub query: PageQuery,
    /// Store generation at admission time. A response whose plan
    /// generation no longer matches the store is stale and dropped.
    pub generation: u64,
}

/// One tab's items plus its fetch guards.
#[derive(Debug, Clone)]
pub struct CollectionState<T> {
    items: Vec<T>,
    loading: bool,
    reached_end: bool,
}

impl<T> Default for CollectionState<T> {
    fn default() -> Self {
        Self { items: Vec::new(), loading: false, reached_end: false }
    }
}

impl<T: PageItem> CollectionState<T> {
    /// Items currently held, oldest first for head-merged collections.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Whether a fetch is in flight.
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the listing is known to be exhausted.
    pub const fn reached_end(&self) -> bool {
        self.reached_end
    }

    /// Admit a fetch, or refuse one that would be redundant.
    ///
    /// Returns `None` while a fetch is in flight, and for non-reset
    /// fetches once the end was reached. A reset clears the held items
    /// and the end marker before admitting.
    pub fn begin_fetch(
        &mut self,
        kind: CollectionKind,
        reset: bool,
        generation: u64,
    ) -> Option<FetchPlan> {
        if self.loading || (!reset && self.reached_end) {
            return None;
        }
        if reset {
            self.items.clear();
            self.reached_end = false;
        }

        let cursor = match kind.cursor_mode() {
            CursorMode::LastId => self.items.last().and_then(PageItem::cursor_id).map(Cursor::Id),
            CursorMode::FirstId => self.items.first().and_then(PageItem::cursor_id).map(Cursor::Id),
            CursorMode::Offset => Some(Cursor::Offset(self.items.len())),
        };

        self.loading = true;
        Some(FetchPlan {
            kind,
            query: PageQuery { cursor, take: kind.page_size() },
            generation,
        })
    }

    /// Merge a fetched page per the collection's merge direction and
    /// record whether the listing is exhausted.
    ///
    /// Head-merged pages arrive newest first on the wire and are
    /// reversed before prepending, so held items stay oldest first.
    pub fn apply_page(&mut self, plan: &FetchPlan, mut page: Vec<T>) {
        self.reached_end = plan.query.exhausted(page.len());
        match plan.kind.merge_mode() {
            MergeMode::Tail => self.items.append(&mut page),
            MergeMode::Head => {
                page.reverse();
                page.append(&mut self.items);
                self.items = page;
            },
        }
        self.loading = false;
    }

    /// Release the loading guard after a failed fetch so the collection
    /// can be retried.
    pub fn fail_fetch(&mut self) {
        self.loading = false;
    }

    /// Drop all items and guards, as on a room switch.
    pub fn clear(&mut self) {
        self.items.clear();
        self.loading = false;
        self.reached_end = false;
    }

    /// Append one item after the existing ones.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Mutable access for in-place item updates.
    pub(crate) fn items_mut(&mut self) -> &mut Vec<T> {
        &mut self.items
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use parlor_core::User;

    use super::*;

    fn post(id: u64) -> FeedPost {
        FeedPost {
            id,
            room_id: 1,
            message: format!("post {id}"),
            author: User { id: 1, name: "alice".to_owned(), email: None, photo_url: None },
            files: Vec::new(),
            likes: 0,
            comments_count: 0,
            views: 0,
            user_liked: false,
            created_at: Utc::now(),
        }
    }

    fn message(id: u64) -> ChatMessage {
        ChatMessage {
            id,
            room_id: 1,
            feed_id: None,
            message: format!("msg {id}"),
            user: User { id: 1, name: "alice".to_owned(), email: None, photo_url: None },
            files: Vec::new(),
            replies_count: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn refuses_fetch_while_loading() {
        let mut state = CollectionState::<FeedPost>::default();
        let plan = state.begin_fetch(CollectionKind::Feed, false, 0).unwrap();
        assert!(state.begin_fetch(CollectionKind::Feed, false, 0).is_none());

        state.apply_page(&plan, vec![post(1)]);
        assert!(!state.is_loading());
    }

    #[test]
    fn refuses_fetch_past_the_end_until_reset() {
        let mut state = CollectionState::<FeedPost>::default();
        let plan = state.begin_fetch(CollectionKind::Feed, false, 0).unwrap();
        state.apply_page(&plan, vec![post(1)]);
        assert!(state.reached_end());

        assert!(state.begin_fetch(CollectionKind::Feed, false, 0).is_none());
        let reset = state.begin_fetch(CollectionKind::Feed, true, 0).unwrap();
        assert_eq!(reset.query.cursor, None);
        assert!(state.items().is_empty());
    }

    #[test]
    fn forward_cursor_is_last_item_id() {
        let mut state = CollectionState::<FeedPost>::default();
        let plan = state.begin_fetch(CollectionKind::Feed, false, 0).unwrap();
        state.apply_page(&plan, (1..=10).map(post).collect());

        let next = state.begin_fetch(CollectionKind::Feed, false, 0).unwrap();
        assert_eq!(next.query.cursor, Some(Cursor::Id(10)));
    }

    #[test]
    fn backward_pages_prepend_reversed() {
        let mut state = CollectionState::<ChatMessage>::default();
        let plan = state.begin_fetch(CollectionKind::Messages, true, 0).unwrap();
        // Newest first on the wire.
        state.apply_page(&plan, (11..=20).rev().map(message).collect());
        assert_eq!(state.items()[0].id, 11);
        assert_eq!(state.items()[9].id, 20);

        let older = state.begin_fetch(CollectionKind::Messages, false, 0).unwrap();
        assert_eq!(older.query.cursor, Some(Cursor::Id(11)));
        state.apply_page(&older, (1..=10).rev().map(message).collect());
        let ids: Vec<u64> = state.items().iter().map(|m| m.id).collect();
        assert_eq!(ids, (1..=20).collect::<Vec<u64>>());
    }

    #[test]
    fn offset_cursor_counts_held_items() {
        let mut state = CollectionState::<FileEntry>::default();
        let plan = state.begin_fetch(CollectionKind::Files, true, 0).unwrap();
        assert_eq!(plan.query.cursor, Some(Cursor::Offset(0)));
        assert_eq!(plan.query.take, 50);
    }

    #[test]
    fn under_size_page_marks_the_end() {
        let mut state = CollectionState::<FeedPost>::default();
        let plan = state.begin_fetch(CollectionKind::Feed, false, 0).unwrap();
        state.apply_page(&plan, (1..=10).map(post).collect());
        assert!(!state.reached_end());

        let plan = state.begin_fetch(CollectionKind::Feed, false, 0).unwrap();
        state.apply_page(&plan, (11..=13).map(post).collect());
        assert!(state.reached_end());
        assert_eq!(state.items().len(), 13);
    }
}
