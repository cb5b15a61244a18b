//! Core domain model for the parlor workspace client.
//!
//! Pure data types shared by the API client and the application layer:
//! resource records as they appear on the wire, file metadata derivation,
//! and the per-collection pagination policy (cursor mode, page size,
//! merge direction, end-of-list rule).
//!
//! No I/O lives here; everything is deterministic and unit-testable.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod analytics;
mod file_meta;
mod model;
mod page;

pub use analytics::{
    ActiveUsersPoint, AnalyticsSummary, BandwidthPoint, CountPoint, RoomAnalytics, StoragePoint,
    TimeFrame, TopUser, UserGrowthPoint,
};
pub use file_meta::{
    FileExtension, FileKind, FileMetaError, FileMetadata, preserve_extension, size_in_mb,
};
pub use model::{
    ChatMessage, FeedId, FeedPost, FileEntry, FileId, Meeting, MeetingId, Member, MemberId,
    MessageId, NewFeedPost, NewFileEntry, NewMeeting, NewPayment, Payment, PaymentId,
    PaymentSplit, PaymentStatus, Room, RoomId, User, UserId,
};
pub use page::{CollectionKind, Cursor, CursorMode, MergeMode, PageQuery};
