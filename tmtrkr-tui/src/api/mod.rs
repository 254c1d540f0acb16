mod client;
pub(crate) mod dev_backend;
mod dto;
mod error;

pub use client::ApiClient;
pub use dto::RecordInput;
pub use error::ApiError;
