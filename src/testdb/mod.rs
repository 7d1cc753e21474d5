//! Test Database Module
//!
//! In-memory stand-ins for the host's device namespace, so the whole listing
//! can be exercised without a phone attached.
//!
//! # Quick Start
//!
//! ```rust
//! use phone_photo_lister::core::lister::{run_listing, ListingRequest};
//! use phone_photo_lister::core::report::SilentReporter;
//! use phone_photo_lister::testdb::scenarios;
//!
//! let ns = scenarios::johns_phone();
//! let mut out = Vec::new();
//! let outcome = run_listing(&ns, &ListingRequest::full(), &SilentReporter, &mut out).unwrap();
//! assert_eq!(outcome.buckets.photo_count(), 2);
//! ```

pub mod mock_namespace;
pub mod scenarios;

pub use mock_namespace::{MockNamespace, MockObject, COMPUTER_ADDRESS, COMPUTER_ID};
