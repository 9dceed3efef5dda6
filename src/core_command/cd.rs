use crate::constants::TAG_SUCCEED;
use crate::core_error::SessionError;
use crate::core_protocol::write_text_frame;
use crate::server::ServerContext;
use crate::session::Session;
use log::{info, warn};
use tokio::io::AsyncWrite;

/// Handles `CD <path>`. Only this session's directory moves; the reply is
/// `SUCCEED` or the OS error text.
pub async fn handle_cd_command<S>(
    stream: &mut S,
    ctx: &ServerContext,
    session: &mut Session,
    arg: &str,
) -> Result<(), SessionError>
where
    S: AsyncWrite + Unpin,
{
    match ctx.directory.change_directory(&session.current_dir, arg) {
        Ok(new_dir) => {
            info!("{} changed directory to {}", session.peer, new_dir.display());
            session.current_dir = new_dir;
            write_text_frame(stream, TAG_SUCCEED).await?;
        }
        Err(e) => {
            warn!("{} failed to change directory to {}: {}", session.peer, arg, e);
            write_text_frame(stream, &e.to_string()).await?;
        }
    }
    Ok(())
}
