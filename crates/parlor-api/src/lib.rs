//! REST client for the parlor backend.
//!
//! Every request carries a bearer token fetched fresh from the
//! [`TokenProvider`] (the identity-provider seam), and every successful
//! response arrives inside a `{ "data": ... }` envelope which the client
//! unwraps. Failures surface the backend's structured error body as
//! [`Error::Api`]; transport failures as [`Error::Http`]. Nothing in
//! this crate panics on a failed request.
//!
//! Resource access goes through per-resource handlers
//! ([`ApiClient::feed`], [`ApiClient::messages`], ...) so call sites
//! never build paths or query strings by hand. Direct-to-storage
//! uploads bypass the envelope and the bearer token entirely; see
//! [`ApiClient::put_object`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod auth;
mod client;
mod error;
mod handlers;
mod routes;
mod storage;

#[cfg(test)]
mod tests;

pub use auth::{AuthError, StaticToken, TokenProvider};
pub use client::{ApiClient, ApiClientBuilder};
pub use error::{ApiError, Error, Result};
pub use handlers::{
    AnalyticsHandler, FeedHandler, FileQuery, FilesHandler, MeetingsHandler, MembersHandler,
    MessagesHandler, PaymentOrder, PaymentsHandler, RoomsHandler, UserHandler,
};
pub use storage::SignedUrl;
