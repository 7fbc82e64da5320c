//! Request extractors and middleware

pub mod validate;

pub use validate::ValidatedJson;
