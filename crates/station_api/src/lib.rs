//! Station API: the long-lived client for the download service.
mod api;
mod client;
mod config;
mod error;
mod observer;
mod types;

pub use api::{ConfigCallback, StationApi};
pub use client::StationClient;
pub use config::SESSION_NAME;
pub use error::{ApiError, ErrorDomain};
pub use observer::{ObserverRegistry, SubscriptionToken};
pub use types::{Directory, Share};
