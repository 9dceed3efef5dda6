use crate::core_client::client::Client;
use crate::core_client::progress::BarProgress;
use crate::core_command::Command;
use crate::core_error::TransferError;
use anyhow::{bail, Result};
use colored::Colorize;
use log::debug;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite};

/// Reads one command. A line ending in `\` continues on the next one.
/// Returns `None` once input is exhausted.
pub async fn read_command<R>(reader: &mut R) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut command = String::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).await? == 0 {
            return Ok(if command.is_empty() { None } else { Some(command) });
        }

        let line = line.trim_end_matches(&['\r', '\n'][..]);
        match line.strip_suffix('\\') {
            Some(part) => command.push_str(part),
            None => {
                command.push_str(line);
                return Ok(Some(command));
            }
        }
    }
}

/// Prompt loop. Everything runs in sequence: while a transfer is going
/// on the prompt is not available.
pub async fn run_repl<S, R>(mut client: Client<S>, input: &mut R) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
    R: AsyncBufRead + Unpin,
{
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = match read_command(input).await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                report(&format!("Failed to get your command: {}", e));
                continue;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let command = Command::parse(line);
        debug!("Parsed {:?}", command);
        match command {
            Command::Quit => break,
            Command::Unknown(_) => report("Invalid Command."),
            command => {
                if let Err(e) = execute(&mut client, command).await {
                    report(&describe(&e));
                    if e.is_connection_error() {
                        bail!("Connection to server lost: {}", e);
                    }
                }
            }
        }
    }

    if let Err(e) = client.close().await {
        debug!("Error while closing the connection: {}", e);
    }
    Ok(())
}

async fn execute<S>(client: &mut Client<S>, command: Command) -> Result<(), TransferError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    match command {
        Command::List => println!("{}", client.list().await?),
        Command::Pwd => println!("{}", client.pwd().await?),
        Command::ChangeDir(path) => client.change_dir(&path).await?,
        Command::Try => {
            if client.probe().await? {
                println!("Server is alive.");
            } else {
                report("Server did not acknowledge the probe.");
            }
        }
        Command::Get(name) => {
            let path = client.get(&name, &mut BarProgress::new()).await?;
            println!("Saved as {}", path.display());
        }
        Command::Put(name) => {
            let total = client.put(&name, &mut BarProgress::new()).await?;
            println!("Uploaded {} ({} bytes).", name, total);
        }
        Command::Quit | Command::Unknown(_) => {}
    }
    Ok(())
}

fn describe(e: &TransferError) -> String {
    match e {
        TransferError::Remote(msg) => msg.clone(),
        TransferError::FileSystem { path, source } => {
            format!("File Not Exist Or Cannot Open: {} ({})", path, source)
        }
        other => other.to_string(),
    }
}

fn report(msg: &str) {
    eprintln!("{}", format!("ERROR: {}", msg).red());
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    #[tokio::test]
    async fn test_backslash_continues_command() {
        let mut input = BufReader::new("get my\\\r\n long file.txt\nls\n".as_bytes());
        assert_eq!(
            read_command(&mut input).await.unwrap().as_deref(),
            Some("get my long file.txt")
        );
        assert_eq!(read_command(&mut input).await.unwrap().as_deref(), Some("ls"));
        assert_eq!(read_command(&mut input).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_empty_line_is_returned_as_empty() {
        let mut input = BufReader::new("\npwd".as_bytes());
        assert_eq!(read_command(&mut input).await.unwrap().as_deref(), Some(""));
        assert_eq!(read_command(&mut input).await.unwrap().as_deref(), Some("pwd"));
    }

    #[tokio::test]
    async fn test_quit_closes_without_sending() {
        let (client_io, mut server) = tokio::io::duplex(1024);
        let client = Client::new(client_io, crate::core_transfer::TransferOptions::default());
        let mut input = BufReader::new("FOO\nBye\nls\n".as_bytes());

        run_repl(client, &mut input).await.unwrap();

        // Nothing reached the server: the unknown verb is refused locally and
        // BYE just hangs up.
        assert!(matches!(
            crate::core_protocol::read_frame(&mut server).await,
            Err(crate::core_error::FrameError::Closed)
        ));
    }
}
