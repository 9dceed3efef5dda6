use crate::constants::{FRAME_PREFIX_LEN, MAX_FRAME_LEN};
use crate::core_error::FrameError;
use log::trace;
use std::io::ErrorKind;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Writes one length-prefixed frame and flushes it.
pub async fn write_frame<W>(writer: &mut W, body: &[u8]) -> Result<(), FrameError>
where
    W: AsyncWrite + Unpin,
{
    if body.len() > MAX_FRAME_LEN {
        return Err(FrameError::TooLarge(body.len()));
    }

    let mut buf = Vec::with_capacity(FRAME_PREFIX_LEN + body.len());
    buf.extend_from_slice(&(body.len() as u32).to_be_bytes());
    buf.extend_from_slice(body);
    writer.write_all(&buf).await?;
    writer.flush().await?;
    trace!("Sent frame of {} bytes", body.len());
    Ok(())
}

pub async fn write_text_frame<W>(writer: &mut W, text: &str) -> Result<(), FrameError>
where
    W: AsyncWrite + Unpin,
{
    write_frame(writer, text.as_bytes()).await
}

/// Reads exactly one frame. A stream that ends before a complete frame
/// yields `FrameError::Closed`.
pub async fn read_frame<R>(reader: &mut R) -> Result<Vec<u8>, FrameError>
where
    R: AsyncRead + Unpin,
{
    let mut prefix = [0u8; FRAME_PREFIX_LEN];
    read_exact_or_closed(reader, &mut prefix).await?;

    let len = u32::from_be_bytes(prefix) as usize;
    if len > MAX_FRAME_LEN {
        return Err(FrameError::TooLarge(len));
    }

    let mut body = vec![0u8; len];
    read_exact_or_closed(reader, &mut body).await?;
    trace!("Received frame of {} bytes", len);
    Ok(body)
}

pub async fn read_text_frame<R>(reader: &mut R) -> Result<String, FrameError>
where
    R: AsyncRead + Unpin,
{
    let body = read_frame(reader).await?;
    String::from_utf8(body).map_err(|_| FrameError::InvalidUtf8)
}

async fn read_exact_or_closed<R>(reader: &mut R, buf: &mut [u8]) -> Result<(), FrameError>
where
    R: AsyncRead + Unpin,
{
    match reader.read_exact(buf).await {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(FrameError::Closed),
        Err(e) => Err(FrameError::Io(e)),
    }
}
