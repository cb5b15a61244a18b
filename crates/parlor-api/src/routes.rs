//! Backend endpoint paths, kept in one place so handlers and tests
//! agree on them.

use parlor_core::{MeetingId, RoomId};

pub(crate) const USER: &str = "/user";
pub(crate) const ROOMS: &str = "/rooms";
pub(crate) const FEED: &str = "/feed";
pub(crate) const FEED_LIKE: &str = "/feed/like";
pub(crate) const FEED_VIEW: &str = "/feed/view";
pub(crate) const MESSAGES: &str = "/messages";
pub(crate) const FILES: &str = "/files";
pub(crate) const MEMBERS: &str = "/members";
pub(crate) const MEETINGS: &str = "/meetings";
pub(crate) const PAYMENTS: &str = "/payments";
pub(crate) const PAYMENT_ORDER: &str = "/payments/order";
pub(crate) const PAYMENT_CALLBACK: &str = "/payments/callback";
pub(crate) const SIGNED_URL: &str = "/get_signed_url";
pub(crate) const ANALYTICS: &str = "/analytics";

pub(crate) fn meeting(id: MeetingId) -> String {
    format!("{MEETINGS}/{id}")
}

pub(crate) fn room_preview(id: RoomId) -> String {
    format!("{ROOMS}/{id}/preview")
}

pub(crate) fn room_join(id: RoomId) -> String {
    format!("{ROOMS}/{id}/join")
}

pub(crate) fn room_leave(id: RoomId) -> String {
    format!("{ROOMS}/{id}/leave")
}
