pub mod auth;
pub mod envelope;

pub use auth::{jwt_auth_middleware, AuthUser};
pub use envelope::json_error_envelope;
