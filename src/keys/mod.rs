//! Key value generation and log-safe fingerprints.

pub mod fingerprint;
pub mod generator;
