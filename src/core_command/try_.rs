use crate::constants::TAG_SUCCEED;
use crate::core_error::SessionError;
use crate::core_protocol::write_text_frame;
use log::debug;
use tokio::io::AsyncWrite;

/// Liveness probe, acknowledged with a bare `SUCCEED`.
pub async fn handle_try_command<S>(stream: &mut S) -> Result<(), SessionError>
where
    S: AsyncWrite + Unpin,
{
    debug!("Liveness probe");
    write_text_frame(stream, TAG_SUCCEED).await?;
    Ok(())
}
