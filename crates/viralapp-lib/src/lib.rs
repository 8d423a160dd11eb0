//! Async Rust client for the ViralApp social-media analytics API.
//!
//! This is a facade crate that re-exports functionality from the viralapp
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use viralapp_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new(ClientConfig::from_env()?, ApiKey::new("my-key")?)?;
//!
//!     let params = Parameters::new()
//!         .with("returnAll", true)
//!         .with("filters", serde_json::json!({"platforms": ["tiktok"]}));
//!
//!     let output = dispatch(&client, "trackedAccounts", "getAll", &params).await?;
//!     for record in output.into_records(0) {
//!         println!("{}", serde_json::Value::Object(record.json));
//!     }
//!
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use viralapp_types::*;

// Re-export transport
pub use viralapp_fetch::{
    API_KEY_HEADER, ApiClient, ApiKey, ApiRequest, ClientConfig, HttpMethod, PER_PAGE, Page,
    Transport, classify_status, fetch_all, fetch_limited, fetch_page, url,
};

#[cfg(feature = "testing")]
pub use viralapp_fetch::testing;

// Re-export operations
#[cfg(feature = "ops")]
pub use viralapp_ops::{
    BatchRunner, BinaryData, ExecutionRecord, FailureMode, FileItem, Invocation, Operation,
    OperationContext, OperationOutput, Parameters, Resource, SearchOption, SearchResults,
    dispatch, dispatch_with, resolve, search,
};

/// Prelude module for convenient imports.
///
/// ```
/// use viralapp_lib::prelude::*;
/// ```
pub mod prelude {
    pub use viralapp_types::{DateRange, ErrorKind, IdRef, Result, VideoRef, ViralAppError};

    pub use viralapp_fetch::{ApiClient, ApiKey, ApiRequest, ClientConfig, Transport};

    #[cfg(feature = "ops")]
    pub use viralapp_ops::{
        BatchRunner, ExecutionRecord, FailureMode, Invocation, OperationOutput, Parameters,
        dispatch,
    };
}
