//! # qualitywatch-types
//!
//! The observation schema shared by qualitywatch producers (the SDK) and
//! consumers (the terminal viewer). An observation is a timestamp plus a
//! map of named scalar measures; each name becomes one plotted series.
//!
//! ## Features
//!
//! - `std` (default): Standard library support
//! - `serde`: JSON and friends via serde
//! - `minicbor`: Compact binary serialization via CBOR
//! - `all`: Enable all serialization formats
//!
//! ## Example
//!
//! ```rust
//! use qualitywatch_types::Observation;
//!
//! let obs = Observation::builder()
//!     .timestamp(3.0)
//!     .measure("tsne.kl_divergence", 1.92)
//!     .measure("tsne.gradient_norm", 0.004)
//!     .build();
//!
//! assert!(obs.is_finite());
//! assert_eq!(obs.len(), 2);
//! ```
//!
//! ## Wire format
//!
//! With `serde`, one observation is one JSON object; streams are
//! newline-delimited:
//!
//! ```text
//! {"version":{"major":1,"minor":0},"timestamp":3.0,"measures":{"loss":0.41}}
//! ```
//!
//! The current schema version is **1**.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod observation;
mod version;

pub use observation::*;
pub use version::*;

/// Current schema version.
///
/// Increment this when making breaking changes to the observation format.
pub const SCHEMA_VERSION: u32 = 1;
