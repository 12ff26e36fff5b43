//! Infrastructure layer - Persistence collaborators and process plumbing

pub mod logging;
pub mod storage;
pub mod user;
