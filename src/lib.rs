//! # Keygate
//!
//! **Short-lived access keys for gated client features.**
//!
//! Keygate issues random access keys once a user has completed an external
//! verification flow, and answers whether a presented key is still good.
//! A game client (or any other script) holds the key and presents it to
//! unlock functionality.
//!
//! ## Features
//!
//! - **Random keys** - 16 characters from `A-Z0-9`, about 82.7 bits of entropy
//! - **Fixed lifetime** - keys expire 24 hours after issue by default
//! - **Three-way verification** - every check yields `valid`, `expired` or `invalid`
//! - **Background sweep** - a cancellable task evicts expired keys every minute
//! - **Injectable seams** - clock and random source are traits, so tests are deterministic
//!
//! ## Quickstart
//!
//! ```no_run
//! use keygate::{KeyGateConfig, KeyService, KeyStatus, KeyStore};
//!
//! fn main() -> Result<(), keygate::KeyGateError> {
//!     let config = KeyGateConfig::default();
//!     let service = KeyService::new(KeyStore::new(), &config)?;
//!
//!     let record = service.generate_key()?;
//!     assert_eq!(service.verify_key(&record.value), KeyStatus::Valid);
//!     Ok(())
//! }
//! ```
//!
//! ## Security notes
//!
//! Possession of a key is the only credential. Keys are not single-use and
//! are not bound to a caller. Raw key values are never written to logs; a
//! short SHA-256 fingerprint is logged instead.
//!
//! All state lives in process memory and is lost on restart.

#![deny(missing_docs)]

// Core modules
pub mod clock;
pub mod config;
pub mod errors;

// Key material
pub mod keys;

// Protocol layer
pub mod protocol;

// Storage layer
pub mod store;

// Service (main public API)
pub mod service;

// Policy layer
pub mod policy;

// HTTP server
pub mod server;

// Client layer
pub mod client;

// Binary configuration
pub mod cli;

// Re-exports for public API
pub use clock::{Clock, SystemClock};
pub use config::{ClientConfig, KeyGateConfig};
pub use errors::KeyGateError;
pub use keys::generator::{KeyGenerator, RandomKeyGenerator};
pub use protocol::models::{KeyRecord, KeyStatus};
pub use service::KeyService;
pub use store::{KeyStore, SweepHandle};

#[cfg(any(test, feature = "test-seams"))]
pub use clock::MockClock;
#[cfg(any(test, feature = "test-seams"))]
pub use keys::generator::SequenceGenerator;
