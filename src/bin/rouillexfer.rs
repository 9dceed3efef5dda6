use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use rouillexfer::core_cli::{prompt_secret, ClientCli};
use rouillexfer::core_client::{read_command, run_repl, Client};
use rouillexfer::core_error::AuthError;
use rouillexfer::core_log::init_logger;
use rouillexfer::Config;
use std::io::IsTerminal;
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> Result<()> {
    let args = ClientCli::parse();
    init_logger(args.verbose);

    let mut config = Config::load(args.config.as_deref())?.client;
    args.apply(&mut config)?;

    println!("Building connection...");
    let mut client = Client::connect(&config)
        .await
        .with_context(|| format!("Error dialing {}:{}", config.host, config.port))?;

    let mut input = BufReader::new(tokio::io::stdin());
    let password = if std::io::stdin().is_terminal() {
        tokio::task::spawn_blocking(|| prompt_secret("Input password please", false)).await??
    } else {
        // Piped input: the password is the first line, commands follow.
        read_command(&mut input)
            .await?
            .filter(|line| !line.is_empty())
            .context("No password given on standard input")?
    };

    println!("Verifying password...");
    if let Err(e) = client.login(&password, config.retry_interval()).await {
        let msg = match e {
            AuthError::Rejected | AuthError::UnexpectedReply(_) => {
                "Password Not Correct! break down...".to_string()
            }
            AuthError::Unreachable(_) => {
                "Cannot contact with remote server, break down...".to_string()
            }
            AuthError::Frame(e) => format!("Cannot Receive Authentication From Server: {}", e),
        };
        eprintln!("{}", format!("ERROR: {}", msg).red());
        std::process::exit(1);
    }
    println!("Receive Authentication...");

    run_repl(client, &mut input).await
}
