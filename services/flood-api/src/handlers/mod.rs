//! HTTP request handlers.

pub mod flood;
pub mod health;
