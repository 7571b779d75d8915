//! Infrastructure layer - Storage, crypto and service implementations

pub mod auth;
pub mod expense;
pub mod logging;
pub mod storage;
pub mod user;
