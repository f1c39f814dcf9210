use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApplicationConfig {
    #[serde(default)]
    pub log_filter: Option<String>,
    #[serde(default = "default_health_check")]
    pub health_check: bool,
    /// Registers `GET /dev/token`. Must stay off in production deployments.
    #[serde(default)]
    pub dev_token: bool,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_filter: None,
            health_check: default_health_check(),
            dev_token: false,
        }
    }
}

fn default_health_check() -> bool {
    true
}
