//! Data models

pub mod travel;
pub mod service;

pub use travel::*;
pub use service::*;
