//! HTTP transport and pagination for the ViralApp analytics API client.
//!
//! This crate provides the request pipeline:
//!
//! - [`url::resolve_base_url`] - Resolves the API root and its override
//! - [`ApiRequest`] - Request descriptor with filter-set cleaning
//! - [`Transport`] - The port handlers talk to
//! - [`ApiClient`] - Authenticated `reqwest` implementation of [`Transport`]
//! - [`fetch_all`] / [`fetch_limited`] - Pagination walker and bounded fetch

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod paginate;
mod request;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
mod transport;
pub mod url;

pub use client::{API_KEY_HEADER, ApiClient, ApiKey, ClientConfig, classify_status};
pub use paginate::{PER_PAGE, Page, fetch_all, fetch_limited, fetch_page, page_size};
pub use request::{ApiRequest, EXPORT_PATHS, HttpMethod};
pub use transport::Transport;
