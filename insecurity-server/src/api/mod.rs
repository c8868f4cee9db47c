pub mod comments;
pub mod error;
pub mod friends;
pub mod index;
pub mod profile;
pub mod stream;

pub use error::{ApiError, ApiResult};
