//! Application layer for the parlor client.
//!
//! Pure state machines plus a thin async service that connects them to
//! the backend:
//!
//! - [`Store`]: session state and six paginated room collections, with
//!   explicit loading and end-of-list guards and generation-stamped
//!   fetches so room switches drop in-flight responses
//! - [`RoomService`]: runs network flows against the store (pagination,
//!   optimistic likes, uploads, chat)
//! - [`ChatView`] / [`ChatPoller`]: scroll and arrival logic for the
//!   chat tab, and the poll timer that feeds it
//! - [`UploadItem`]: a staged file with progress reporting, uploaded
//!   direct to object storage and registered all-or-nothing

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod chat;
mod collection;
mod service;
mod store;
mod upload;

pub use chat::{
    ChatAction, ChatPhase, ChatPoller, ChatView, NEAR_BOTTOM_PX, NEAR_TOP_PX, POLL_INTERVAL,
};
pub use collection::{CollectionState, FetchPlan, PageItem};
pub use service::{RoomService, ServiceError};
pub use store::Store;
pub use upload::{UploadItem, UploadState};
