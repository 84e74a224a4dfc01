//! Server configuration from command-line flags and environment.

use std::net::SocketAddr;

use clap::Parser;
use spbu_auth::AuthConfig;

#[derive(Debug, Clone, Parser)]
#[command(name = "spbu-server", about = "SPBU monitoring REST API", version)]
pub struct ServerConfig {
    /// Address to listen on.
    #[arg(long, env = "SPBU_BIND", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// HMAC secret used to sign access tokens.
    #[arg(long, env = "SPBU_JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Access token lifetime in seconds.
    #[arg(long, env = "SPBU_TOKEN_TTL_SECS", default_value_t = 28_800)]
    pub token_ttl_secs: u64,

    /// Pepper prepended to passwords before hashing.
    #[arg(long, env = "SPBU_PASSWORD_PEPPER", hide_env_values = true)]
    pub pepper: Option<String>,

    /// Populate the store with a demo station and one user per role.
    #[arg(long, env = "SPBU_SEED_DEMO", default_value_t = false)]
    pub seed_demo: bool,
}

impl ServerConfig {
    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            jwt_secret: self.jwt_secret.clone(),
            access_token_lifetime_secs: self.token_ttl_secs,
            pepper: self.pepper.clone(),
            ..Default::default()
        }
    }
}
