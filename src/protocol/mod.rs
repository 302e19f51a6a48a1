//! Wire and record types.

pub mod models;
