//! Resource providers for cardpress.
//!
//! This crate provides platform-specific implementations of the
//! `ResourceProvider` trait from cardpress-traits.
//!
//! ## Available Providers
//!
//! - [`FilesystemResourceProvider`]: Loads resources from the local filesystem
//! - [`HttpResourceProvider`]: Fetches `http(s)` URLs (feature `remote`)
//! - [`RoutingResourceProvider`]: Sends URLs to a remote provider and everything
//!   else to a local one
//!
//! The in-memory provider from cardpress-traits is re-exported for tests and
//! embedders that already hold the bytes.

mod filesystem;
#[cfg(feature = "remote")]
mod http;
mod routing;

pub use filesystem::FilesystemResourceProvider;
#[cfg(feature = "remote")]
pub use http::HttpResourceProvider;
pub use routing::{is_remote, RoutingResourceProvider};

pub use cardpress_traits::InMemoryResourceProvider;
