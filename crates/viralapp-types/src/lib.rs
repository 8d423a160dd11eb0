//! Core types for the ViralApp analytics API client.
//!
//! This crate provides the value types shared by the transport and the
//! operation handlers:
//!
//! - [`ViralAppError`] - The error taxonomy and its [`ErrorKind`]
//! - [`DateRange`] - Validated, date-only ranges
//! - [`IdRef`] - Entity references given as IDs, locators, or lists
//! - [`clean_empty`] - Filter-set cleaning
//! - [`VideoRef`] - Platform plus video ID resolved from caller input

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod date_range;
mod error;
mod filter;
mod id_ref;
mod video;

pub use date_range::{DEFAULT_EXPORT_LOOKBACK_DAYS, DateRange, date_only};
pub use error::{DateRangeError, ErrorKind, Result, ViralAppError};
pub use filter::{clean_empty, clean_value, parse_hashtags};
pub use id_ref::{IdRef, normalize_id, normalize_ids};
pub use video::{VideoRef, platform_display_name};
