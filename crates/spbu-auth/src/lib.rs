//! SPBU Auth — password authentication, JWT issuance/validation and
//! logout.

pub mod config;
pub mod error;
pub mod password;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use service::{AuthService, LoginOutput};
pub use token::AccessTokenClaims;
