//! HTTP middleware stack.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, outermost, added in `main`)
//! 2. CORS (permissive; the API is called cross-origin in development)
//! 3. `TraceLayer` (request span)
//! 4. Request ID (recorded on the request span)
//! 5. Security headers

pub mod request_id;
pub mod security_headers;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::security_headers_middleware;
