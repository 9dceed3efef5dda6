use crate::core_error::SessionError;
use crate::core_protocol::{write_text_frame, TransferHeader};
use crate::server::ServerContext;
use crate::session::Session;
use log::{debug, error};
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Handles `LS`/`DIR`: a `SUCCEED<N>` header, then the N listing bytes.
pub async fn handle_ls_command<S>(
    stream: &mut S,
    ctx: &ServerContext,
    session: &mut Session,
) -> Result<(), SessionError>
where
    S: AsyncWrite + Unpin,
{
    let listing = match ctx.directory.list(&session.current_dir) {
        Ok(listing) => listing,
        Err(e) => {
            error!(
                "Failed to list {}: {}",
                session.current_dir.display(),
                e
            );
            write_text_frame(stream, &TransferHeader::Failed.encode()).await?;
            return Ok(());
        }
    };

    let header = TransferHeader::Succeed(listing.len() as u64);
    write_text_frame(stream, &header.encode()).await?;
    stream.write_all(listing.as_bytes()).await?;
    stream.flush().await?;
    debug!("Sent listing of {} bytes to {}", listing.len(), session.peer);
    Ok(())
}
