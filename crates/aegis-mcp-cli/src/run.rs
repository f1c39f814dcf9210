use anyhow::{Context, Result};
use figment::{
    providers::{Format, Json as FigmentJson},
    Figment,
};
use serde_json::json;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use aegis_mcp_core::Config;
use aegis_mcp_svr::router;

use crate::utils::clean_json;

use super::command::SubcommandRun;

pub async fn run(cli: &SubcommandRun) -> Result<()> {
    let configfile = cli.configfile.clone().map(FigmentJson::file);
    let config: Config = Figment::new()
        .merge(configfile.unwrap_or(FigmentJson::string("{}")))
        .merge(figment_merge(cli))
        .extract()
        .context("Failed to load configuration")?;

    let env_filter = config
        .application
        .log_filter
        .as_ref()
        .cloned()
        .unwrap_or("info".to_string())
        .parse::<EnvFilter>()
        .unwrap();

    tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(env_filter)
        .init();
    tracing::info!("{}", serde_json::to_string_pretty(&config).unwrap());

    let cancel = CancellationToken::new();
    let listener = tokio::net::TcpListener::bind(config.server.addr).await?;

    tracing::info!("Server started at: {}", config.server.addr);
    tracing::info!(
        "Protocol endpoint: {}",
        config.server.hostname.join(&config.server.mcp_path())?
    );
    if config.application.dev_token {
        tracing::info!(
            "Development token endpoint: {}",
            config.server.hostname.join("/dev/token")?
        );
    }
    tracing::info!(
        "OAuth metadata: {}",
        config
            .server
            .hostname
            .join("/.well-known/oauth-authorization-server")?
    );

    let app = router::router(cancel.clone(), config)?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel))
        .await?;

    Ok(())
}

async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutting down...");
    cancel.cancel();
}

fn figment_merge(cli: &SubcommandRun) -> figment::providers::Serialized<figment::value::Value> {
    let addr = format!("{}:{}", cli.host, cli.port);
    let result = json!({
        "application": {
            "log_filter": cli.log_level,
            "health_check": cli.health_check,
            "dev_token": cli.dev_token,
        },
        "server": {
            "addr": addr,
            "hostname": cli.base_url,
            "path": cli.path,
            "transport": cli.transport,
        },
        "auth": {
            "issuer": cli.issuer,
            "audience": cli.audience,
            "client_secret": cli.client_secret,
            "jwks_url": cli.jwks_url,
        },
    });

    let figment_value: figment::value::Value =
        serde_json::from_value(clean_json(result)).unwrap();
    figment::providers::Serialized::from(figment_value, figment::Profile::Default)
}

#[cfg(test)]
mod tests {
    use aegis_mcp_core::Transport;

    use super::*;

    fn cli_defaults() -> SubcommandRun {
        SubcommandRun {
            configfile: None,
            log_level: "debug".to_string(),
            transport: Transport::Sse,
            host: "0.0.0.0".to_string(),
            port: 8000,
            base_url: None,
            path: None,
            issuer: None,
            audience: None,
            client_secret: None,
            jwks_url: None,
            dev_token: false,
            health_check: true,
        }
    }

    #[test]
    fn defaults_extract_from_empty_config() {
        let config: Config = Figment::new()
            .merge(FigmentJson::string("{}"))
            .merge(figment_merge(&cli_defaults()))
            .extract()
            .unwrap();

        assert_eq!(config.server.addr.to_string(), "0.0.0.0:8000");
        assert_eq!(config.server.mcp_path(), "/mcp");
        assert_eq!(config.server.transport, Transport::Sse);
        assert_eq!(config.server.hostname.as_str(), "http://127.0.0.1:8000/");
        assert_eq!(config.auth.issuer.as_str(), "https://dev.example.com/");
        assert_eq!(config.auth.audience, "my-mcp-server");
        assert_eq!(config.auth.jwks_ttl, 600);
        assert_eq!(config.auth.scopes, vec!["read", "write"]);
        assert_eq!(config.application.log_filter.as_deref(), Some("debug"));
        assert!(config.application.health_check);
        assert!(!config.application.dev_token);
    }

    #[test]
    fn cli_values_override_config_file() {
        let mut cli = cli_defaults();
        cli.audience = Some("other-audience".to_string());
        cli.port = 9000;
        cli.dev_token = true;

        let file = r#"{"auth": {"audience": "file-audience", "client_secret": "from-file"}}"#;
        let config: Config = Figment::new()
            .merge(FigmentJson::string(file))
            .merge(figment_merge(&cli))
            .extract()
            .unwrap();

        assert_eq!(config.auth.audience, "other-audience");
        // CLI gaps fall back to the file value
        assert_eq!(config.auth.client_secret.expose_secret(), "from-file");
        assert_eq!(config.server.addr.port(), 9000);
        assert!(config.application.dev_token);
    }
}
