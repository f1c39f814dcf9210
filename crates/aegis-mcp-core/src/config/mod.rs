pub mod application;
pub mod auth;
pub mod server;

use serde::{Deserialize, Serialize};

pub use application::ApplicationConfig;
pub use auth::AuthConfig;
pub use server::{ServerConfig, Transport};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub application: ApplicationConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}
