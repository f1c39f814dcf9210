use anyhow::Result;
use tracing_subscriber::EnvFilter;

use aegis_mcp_client::{Credentials, McpClient};

use super::command::SubcommandConnect;

pub async fn connect(cli: &SubcommandConnect) -> Result<()> {
    let env_filter = cli.log_level.parse::<EnvFilter>().unwrap();
    tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(env_filter)
        .init();

    let cached = cli.client_id.clone().map(|client_id| Credentials {
        client_id,
        client_secret: cli.client_secret.clone(),
    });

    let client = McpClient::connect(cli.url.clone(), &cli.path, cached).await?;

    client.ping().await?;
    println!("Ping successful: true");

    let tools = client.list_tools().await?;
    println!("Available tools:");
    for tool in &tools {
        println!("- {}: {}", tool.name, tool.description);
    }

    Ok(())
}
