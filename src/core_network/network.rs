use crate::core_auth::authenticate_peer;
use crate::core_command::cd::handle_cd_command;
use crate::core_command::get::handle_get_command;
use crate::core_command::ls::handle_ls_command;
use crate::core_command::put::handle_put_command;
use crate::core_command::pwd::handle_pwd_command;
use crate::core_command::try_::handle_try_command;
use crate::core_command::Command;
use crate::core_error::{FrameError, SessionError};
use crate::core_protocol::{read_text_frame, write_text_frame, TransferHeader};
use crate::server::ServerContext;
use crate::session::Session;
use anyhow::Result;
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;

/// Accept loop. Every connection gets its own task; the loop never waits
/// for a session to finish.
pub async fn start_server(listener: TcpListener, ctx: Arc<ServerContext>) -> Result<()> {
    info!("Server listening on {}", listener.local_addr()?);

    loop {
        let (socket, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("Error accepting connection: {}", e);
                continue;
            }
        };
        info!("Received connection request from {}", addr);

        let ctx = Arc::clone(&ctx);
        tokio::spawn(async move {
            let peer = addr.to_string();
            match handle_connection(socket, peer, ctx).await {
                Ok(()) => info!("Connection closed for {}", addr),
                Err(e) => warn!("Connection with {} ended: {}", addr, e),
            }
        });
    }
}

/// Runs one session: the password exchange, then one command per
/// iteration until the peer goes away.
pub async fn handle_connection<S>(
    mut stream: S,
    peer: String,
    ctx: Arc<ServerContext>,
) -> Result<(), SessionError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut session = Session::new(peer, ctx.root_dir.clone());

    authenticate_peer(&mut stream, &ctx.authenticator, &session.peer).await?;
    session.mark_authenticated();
    debug_assert!(session.is_authenticated());

    loop {
        let line = match read_command(&mut stream, ctx.idle_timeout).await {
            Ok(line) => line,
            Err(FrameError::Closed) => {
                debug!("{} disconnected", session.peer);
                return Ok(());
            }
            Err(e) if e.is_connection_error() => return Err(e.into()),
            Err(e) => {
                warn!("Malformed command from {}: {}", session.peer, e);
                write_text_frame(&mut stream, &TransferHeader::Failed.encode()).await?;
                continue;
            }
        };
        info!("Receiving from {}: {}", session.peer, line);

        match Command::parse(&line) {
            Command::Get(name) => handle_get_command(&mut stream, &ctx, &mut session, &name).await?,
            Command::Put(name) => handle_put_command(&mut stream, &ctx, &mut session, &name).await?,
            Command::List => handle_ls_command(&mut stream, &ctx, &mut session).await?,
            Command::ChangeDir(path) => {
                handle_cd_command(&mut stream, &ctx, &mut session, &path).await?
            }
            Command::Pwd => handle_pwd_command(&mut stream, &session).await?,
            Command::Try => handle_try_command(&mut stream).await?,
            Command::Quit => return Ok(()),
            Command::Unknown(line) => {
                warn!("Invalid command from {}: {:?}", session.peer, line);
                write_text_frame(&mut stream, &TransferHeader::Failed.encode()).await?;
            }
        }
    }
}

async fn read_command<S>(stream: &mut S, idle_timeout: Option<Duration>) -> Result<String, FrameError>
where
    S: AsyncRead + Unpin,
{
    match idle_timeout {
        None => read_text_frame(stream).await,
        Some(limit) => match tokio::time::timeout(limit, read_text_frame(stream)).await {
            Ok(result) => result,
            Err(_) => Err(FrameError::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                format!("idle for more than {:?}", limit),
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_auth::{Authenticator, Credential};
    use crate::core_directory::LocalDirectory;
    use crate::core_error::AuthError;
    use crate::core_protocol::{read_frame, write_frame};
    use crate::core_transfer::TransferOptions;
    use std::path::Path;

    fn context(root: &Path) -> Arc<ServerContext> {
        Arc::new(ServerContext {
            authenticator: Authenticator::new(Credential::new("pw")),
            directory: Arc::new(LocalDirectory),
            options: TransferOptions::unthrottled(16),
            idle_timeout: None,
            root_dir: root.canonicalize().unwrap(),
        })
    }

    #[tokio::test]
    async fn test_wrong_password_closes_without_reply() {
        let dir = tempfile::tempdir().unwrap();
        let (mut client, server) = tokio::io::duplex(1024);
        let task = tokio::spawn(handle_connection(server, "t".into(), context(dir.path())));

        write_frame(&mut client, b"nope").await.unwrap();
        assert!(matches!(read_frame(&mut client).await, Err(FrameError::Closed)));
        assert!(matches!(
            task.await.unwrap(),
            Err(SessionError::Authentication(AuthError::Rejected))
        ));
    }

    #[tokio::test]
    async fn test_unknown_verb_keeps_connection_open() {
        let dir = tempfile::tempdir().unwrap();
        let (mut client, server) = tokio::io::duplex(1024);
        let task = tokio::spawn(handle_connection(server, "t".into(), context(dir.path())));

        write_frame(&mut client, b"pw").await.unwrap();
        assert_eq!(read_text_frame(&mut client).await.unwrap(), "CONNECTION SUCCEED");

        write_frame(&mut client, b"DELETE x").await.unwrap();
        assert_eq!(read_text_frame(&mut client).await.unwrap(), "FAILED");

        write_frame(&mut client, b"try").await.unwrap();
        assert_eq!(read_text_frame(&mut client).await.unwrap(), "SUCCEED");

        drop(client);
        assert!(task.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_mixed_case_pwd_and_cd() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        let root = dir.path().canonicalize().unwrap();
        let (mut client, server) = tokio::io::duplex(1024);
        let task = tokio::spawn(handle_connection(server, "t".into(), context(dir.path())));

        write_frame(&mut client, b"pw").await.unwrap();
        read_frame(&mut client).await.unwrap();

        write_frame(&mut client, b"Pwd").await.unwrap();
        let pwd = read_text_frame(&mut client).await.unwrap();
        assert_eq!(pwd, root.to_string_lossy().replace('\\', "/"));

        write_frame(&mut client, b"cd docs").await.unwrap();
        assert_eq!(read_text_frame(&mut client).await.unwrap(), "SUCCEED");

        write_frame(&mut client, b"CD nowhere").await.unwrap();
        assert_ne!(read_text_frame(&mut client).await.unwrap(), "SUCCEED");

        write_frame(&mut client, b"PWD").await.unwrap();
        let pwd = read_text_frame(&mut client).await.unwrap();
        assert!(pwd.ends_with("/docs"));

        drop(client);
        task.await.unwrap().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_timeout_ends_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(dir.path());
        Arc::get_mut(&mut ctx).unwrap().idle_timeout = Some(Duration::from_secs(5));

        let (mut client, server) = tokio::io::duplex(1024);
        let task = tokio::spawn(handle_connection(server, "t".into(), ctx));
        write_frame(&mut client, b"pw").await.unwrap();
        read_frame(&mut client).await.unwrap();

        assert!(matches!(
            task.await.unwrap(),
            Err(SessionError::Connection(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_upload_ends_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(dir.path());
        Arc::get_mut(&mut ctx).unwrap().options =
            TransferOptions::unthrottled(16).with_io_timeout(Some(Duration::from_secs(5)));

        let (mut client, server) = tokio::io::duplex(1024);
        let task = tokio::spawn(handle_connection(server, "t".into(), ctx));
        write_frame(&mut client, b"pw").await.unwrap();
        read_frame(&mut client).await.unwrap();

        write_frame(&mut client, b"PUT slow.bin").await.unwrap();
        write_frame(&mut client, b"10").await.unwrap();
        assert_eq!(read_text_frame(&mut client).await.unwrap(), "SUCCEED");
        tokio::io::AsyncWriteExt::write_all(&mut client, b"ab")
            .await
            .unwrap();

        assert!(matches!(
            task.await.unwrap(),
            Err(SessionError::Connection(_))
        ));
        assert!(!dir.path().join("slow.bin").exists());
        drop(client);
    }
}
