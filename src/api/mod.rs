pub mod client;
pub mod error;
pub mod http_client;
pub mod mock_client;
pub mod types;

pub use client::{BoxFuture, KnowledgeBaseApi};
pub use error::{ApiError, ApiResult};
pub use http_client::HttpApiClient;
pub use mock_client::MockApiClient;
