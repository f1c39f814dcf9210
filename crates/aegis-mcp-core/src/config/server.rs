use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use url::Url;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: SocketAddr,
    /// Externally visible base URL of this server.
    #[serde(default = "default_hostname")]
    pub hostname: Url,
    /// Mount path of the protected protocol endpoint.
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default)]
    pub transport: Transport,
}

impl ServerConfig {
    pub fn mcp_path(&self) -> String {
        if self.path.starts_with('/') {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            hostname: default_hostname(),
            path: default_path(),
            transport: Transport::default(),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// JSON-RPC over POST plus a server event stream on GET.
    #[default]
    Sse,
    /// JSON-RPC over POST only.
    Http,
}

fn default_addr() -> SocketAddr {
    SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8000)
}

fn default_hostname() -> Url {
    Url::parse("http://127.0.0.1:8000").expect("static url")
}

fn default_path() -> String {
    "/mcp".to_string()
}
