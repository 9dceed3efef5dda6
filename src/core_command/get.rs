use crate::core_error::SessionError;
use crate::core_protocol::{write_text_frame, TransferHeader};
use crate::core_transfer::{open_source, send_payload, Direction, LogProgress, TransferSession};
use crate::server::ServerContext;
use crate::session::Session;
use log::{error, warn};
use tokio::io::{AsyncRead, AsyncWrite};

/// Handles `GET <name>`: the server is the sending side.
///
/// A file that cannot be opened is answered with `FAILED`. Once the
/// `SUCCEED<N>` header is out the client waits for N bytes, so any later
/// failure ends the session.
pub async fn handle_get_command<S>(
    stream: &mut S,
    ctx: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> Result<(), SessionError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let path = ctx.directory.resolve(&session.current_dir, arg);
    let (mut file, total) = match open_source(&path).await {
        Ok(opened) => opened,
        Err(e) => {
            warn!("GET from {} refused: {}", session.peer, e);
            write_text_frame(stream, &TransferHeader::Failed.encode()).await?;
            return Ok(());
        }
    };

    write_text_frame(stream, &TransferHeader::Succeed(total).encode()).await?;

    let mut transfer = TransferSession::new(Direction::Send, arg, total);
    if let Err(e) = send_payload(&mut file, stream, &mut transfer, ctx.options, &mut LogProgress).await
    {
        error!(
            "Sending {} to {} failed after {} of {} bytes: {}",
            arg,
            session.peer,
            transfer.transferred(),
            total,
            e
        );
        return Err(e.into());
    }
    Ok(())
}
