use crate::core_error::SessionError;
use crate::core_protocol::write_text_frame;
use crate::session::Session;
use tokio::io::AsyncWrite;

pub async fn handle_pwd_command<S>(stream: &mut S, session: &Session) -> Result<(), SessionError>
where
    S: AsyncWrite + Unpin,
{
    write_text_frame(stream, &session.current_dir_display()).await?;
    Ok(())
}
