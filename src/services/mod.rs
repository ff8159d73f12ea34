pub mod access;
pub mod converter;

pub use access::{AccessError, AccessService, ALLOWED_USER_TYPE_IDS};
