use crate::constants::TAG_SUCCEED;
use crate::core_error::SessionError;
use crate::core_protocol::{parse_length, read_frame, write_text_frame, TransferHeader};
use crate::core_transfer::{create_destination, recv_payload, Direction, LogProgress, TransferSession};
use crate::server::ServerContext;
use crate::session::Session;
use log::{error, warn};
use tokio::io::{AsyncRead, AsyncWrite, BufWriter};

/// Handles `PUT <name>`: the server is the receiving side.
///
/// Exchange: length frame from the client, `SUCCEED` (ready) or `FAILED`
/// from the server, the raw payload, then a final `SUCCEED`/`FAILED`.
pub async fn handle_put_command<S>(
    stream: &mut S,
    ctx: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> Result<(), SessionError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let failed = TransferHeader::Failed.encode();

    let length = read_frame(stream).await?;
    let total = match parse_length(&length) {
        Ok(total) => total,
        Err(e) => {
            warn!("PUT from {}: {}", session.peer, e);
            write_text_frame(stream, &failed).await?;
            return Ok(());
        }
    };

    let path = ctx.directory.resolve(&session.current_dir, arg);
    let file = match create_destination(&path).await {
        Ok(file) => file,
        Err(e) => {
            warn!("PUT from {} refused: {}", session.peer, e);
            write_text_frame(stream, &failed).await?;
            return Ok(());
        }
    };
    write_text_frame(stream, TAG_SUCCEED).await?;

    let mut writer = BufWriter::new(file);
    let mut transfer = TransferSession::new(Direction::Receive, arg, total);
    let result = recv_payload(stream, &mut writer, &mut transfer, ctx.options, &mut LogProgress).await;
    drop(writer);

    match result {
        Ok(()) => {
            write_text_frame(stream, TAG_SUCCEED).await?;
            Ok(())
        }
        Err(e) => {
            error!(
                "Receiving {} from {} failed after {} of {} bytes: {}",
                arg,
                session.peer,
                transfer.transferred(),
                total,
                e
            );
            // Partial uploads are not kept.
            if let Err(rm) = tokio::fs::remove_file(&path).await {
                warn!("Failed to remove partial upload {}: {}", path.display(), rm);
            }
            if e.is_connection_error() {
                return Err(e.into());
            }
            write_text_frame(stream, &failed).await?;
            Ok(())
        }
    }
}
