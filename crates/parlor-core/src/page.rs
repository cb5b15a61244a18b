//! Per-collection pagination policy.
//!
//! Each room tab lists one resource collection, and each collection has
//! its own page size, cursor derivation, and merge direction. The policy
//! lives here as data so the store and the API client agree on it.
//!
//! End-of-list detection is uniform: a page strictly shorter than the
//! requested size means there is nothing further to fetch. A full page
//! leaves the question open, at the cost of one extra request when the
//! remainder divides evenly into the page size.

use serde::{Deserialize, Serialize};

/// The six paginated resource collections a room exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionKind {
    /// Admin-authored post stream.
    Feed,
    /// Room chat, paginated backward from the newest message.
    Messages,
    /// File tree entries under the current folder.
    Files,
    /// Room memberships.
    Members,
    /// Scheduled meetings.
    Meetings,
    /// The current user's payment splits.
    Payments,
}

impl CollectionKind {
    /// All collection kinds, in tab order.
    pub const ALL: [Self; 6] =
        [Self::Feed, Self::Messages, Self::Files, Self::Members, Self::Meetings, Self::Payments];

    /// Items requested per page.
    pub const fn page_size(self) -> usize {
        match self {
            Self::Files => 50,
            Self::Members => 30,
            Self::Feed | Self::Messages | Self::Meetings | Self::Payments => 10,
        }
    }

    /// How the next-page cursor is derived from the current items.
    pub const fn cursor_mode(self) -> CursorMode {
        match self {
            Self::Messages => CursorMode::FirstId,
            Self::Files => CursorMode::Offset,
            Self::Feed | Self::Members | Self::Meetings | Self::Payments => CursorMode::LastId,
        }
    }

    /// Where a fetched page lands relative to the current items.
    pub const fn merge_mode(self) -> MergeMode {
        match self {
            Self::Messages => MergeMode::Head,
            _ => MergeMode::Tail,
        }
    }
}

/// Cursor derivation rule for a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMode {
    /// Id of the last (newest-fetched) item; pages walk forward.
    LastId,
    /// Id of the first (oldest-held) item; pages walk backward.
    FirstId,
    /// Count of items held so far; pages walk by offset.
    Offset,
}

/// Merge direction for a fetched page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    /// Append after the existing items.
    Tail,
    /// Prepend before the existing items (backward pagination).
    Head,
}

/// An opaque position within a collection's listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    /// An item id (`LastId` / `FirstId` modes).
    Id(u64),
    /// An item count (`Offset` mode).
    Offset(usize),
}

/// Pagination parameters for one list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    /// Position to continue from. `None` fetches the first page.
    pub cursor: Option<Cursor>,
    /// Number of items requested.
    pub take: usize,
}

impl PageQuery {
    /// First page of `kind`-sized items.
    pub const fn first(kind: CollectionKind) -> Self {
        Self { cursor: None, take: kind.page_size() }
    }

    /// Whether a page of `len` items exhausts the listing.
    pub const fn exhausted(&self, len: usize) -> bool {
        len < self.take
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_sizes_match_policy() {
        assert_eq!(CollectionKind::Files.page_size(), 50);
        assert_eq!(CollectionKind::Members.page_size(), 30);
        assert_eq!(CollectionKind::Feed.page_size(), 10);
        assert_eq!(CollectionKind::Messages.page_size(), 10);
    }

    #[test]
    fn chat_paginates_backward_and_prepends() {
        assert_eq!(CollectionKind::Messages.cursor_mode(), CursorMode::FirstId);
        assert_eq!(CollectionKind::Messages.merge_mode(), MergeMode::Head);
    }

    #[test]
    fn files_use_offset_pagination() {
        assert_eq!(CollectionKind::Files.cursor_mode(), CursorMode::Offset);
        assert_eq!(CollectionKind::Files.merge_mode(), MergeMode::Tail);
    }

    #[test]
    fn under_size_page_is_exhausted_for_every_kind() {
        for kind in CollectionKind::ALL {
            let query = PageQuery::first(kind);
            assert!(query.exhausted(kind.page_size() - 1), "{kind:?}");
            assert!(query.exhausted(0), "{kind:?}");
            assert!(!query.exhausted(kind.page_size()), "{kind:?}");
        }
    }
}
