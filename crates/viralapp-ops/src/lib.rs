//! Operation handlers for the ViralApp analytics API client.
//!
//! This crate turns a host invocation (resource, operation, parameters) into
//! API calls and normalized records:
//!
//! - [`Parameters`] - Resolved parameter bag with dotted-path lookups
//! - [`resolve`] / [`dispatch`] - Resource/operation lookup and execution
//! - [`OperationOutput`] / [`ExecutionRecord`] - Handler results and host records
//! - [`BatchRunner`] - Sequential item processing with continue-on-fail
//! - [`search`] - Paged option lookups for resource pickers

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod batch;
mod binary;
mod context;
mod dispatch;
mod handlers;
mod output;
mod params;
pub mod search;
mod simplify;

pub use batch::{BatchRunner, FailureMode, Invocation};
pub use context::OperationContext;
pub use dispatch::{Operation, Resource, dispatch, dispatch_with, resolve};
pub use output::{BinaryData, ExecutionRecord, FileItem, OperationOutput};
pub use params::Parameters;
pub use search::{SearchOption, SearchResults};
