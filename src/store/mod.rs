//! Key record storage and expiry housekeeping.

pub mod memory;
pub mod sweep;

pub use memory::KeyStore;
pub use sweep::SweepHandle;
