use std::path::PathBuf;

use aegis_mcp_core::Transport;
use clap::{Args, Parser, Subcommand};
use url::Url;

#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub subcommand: Subcommands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Subcommands {
    /// Serve the OAuth-protected tool endpoint.
    Run(SubcommandRun),
    /// Authenticate against a running server and probe it.
    Connect(SubcommandConnect),
}

#[derive(Args, Debug, Clone)]
pub struct SubcommandRun {
    #[arg(short, long = "config", env = "AEGIS_MCP_CONFIG_FILE")]
    pub configfile: Option<PathBuf>,

    #[arg(
        long = "log-level",
        env = "AEGIS_MCP_LOG_LEVEL",
        default_value_t = String::from("debug")
    )]
    pub log_level: String,

    #[arg(
        short,
        long = "transport",
        env = "AEGIS_MCP_TRANSPORT",
        value_enum,
        default_value = "sse"
    )]
    pub transport: Transport,

    #[arg(
        long = "host",
        env = "AEGIS_MCP_HOST",
        default_value_t = String::from("0.0.0.0")
    )]
    pub host: String,

    #[arg(long = "port", env = "AEGIS_MCP_PORT", default_value_t = 8000)]
    pub port: u16,

    #[arg(long = "base-url", env = "AEGIS_MCP_BASE_URL")]
    pub base_url: Option<Url>,

    #[arg(long = "path", env = "AEGIS_MCP_PATH")]
    pub path: Option<String>,

    #[arg(long = "issuer", env = "AEGIS_MCP_ISSUER")]
    pub issuer: Option<Url>,

    #[arg(long = "audience", env = "AEGIS_MCP_AUDIENCE")]
    pub audience: Option<String>,

    #[arg(long = "client-secret", env = "AEGIS_MCP_CLIENT_SECRET")]
    pub client_secret: Option<String>,

    #[arg(long = "jwks-url", env = "AEGIS_MCP_JWKS_URL")]
    pub jwks_url: Option<Url>,

    #[arg(
        long = "dev-token",
        env = "AEGIS_MCP_DEV_TOKEN",
        default_value_t = false
    )]
    pub dev_token: bool,

    #[arg(
        long = "health-check",
        env = "AEGIS_MCP_HEALTH_CHECK",
        default_value_t = true
    )]
    pub health_check: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SubcommandConnect {
    #[arg(
        long = "url",
        env = "AEGIS_MCP_URL",
        default_value = "http://127.0.0.1:8000"
    )]
    pub url: Url,

    #[arg(
        long = "path",
        env = "AEGIS_MCP_PATH",
        default_value_t = String::from("/mcp")
    )]
    pub path: String,

    #[arg(long = "client-id", env = "AEGIS_MCP_CLIENT_ID")]
    pub client_id: Option<String>,

    #[arg(long = "client-secret", env = "AEGIS_MCP_CLIENT_SECRET")]
    pub client_secret: Option<String>,

    #[arg(
        long = "log-level",
        env = "AEGIS_MCP_LOG_LEVEL",
        default_value_t = String::from("info")
    )]
    pub log_level: String,
}
