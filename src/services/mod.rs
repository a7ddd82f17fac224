//! Request-level operations behind the HTTP endpoints

mod authorization;
mod streams;

pub use authorization::{AuthExchangeResult, AuthExchangeService, UserProfile};
pub use streams::{sized_thumbnail, StreamListingService, StreamRecord, STREAM_PAGE_SIZE};
