//! Client side of the key exchange.

pub mod http;
