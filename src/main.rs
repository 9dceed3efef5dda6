use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rouillexfer::core_auth::Credential;
use rouillexfer::core_cli::{prompt_secret, ServerCli};
use rouillexfer::core_log::init_logger;
use rouillexfer::{server, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = ServerCli::parse();
    init_logger(args.verbose);

    let mut config = Config::load(args.config.as_deref())?.server;
    args.apply(&mut config)?;

    let listener = server::bind(&config).await?;

    let secret = match config.password.clone() {
        Some(secret) => secret,
        None => tokio::task::spawn_blocking(|| {
            prompt_secret("Please set a password for connections", true)
        })
        .await??,
    };
    let credential = Credential::from_line(&secret).context("Password must not be empty")?;
    info!("Password has been set, server is running...");

    server::serve(listener, &config, credential).await
}
