//! Access policies outside the key store.

pub mod legacy;
