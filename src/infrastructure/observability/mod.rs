mod init_tracing;
mod request_id;
mod tracing_config;
mod url_sanitizer;

pub use init_tracing::init_tracing;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use tracing_config::TracingConfig;
pub use url_sanitizer::redact_signed_url;
