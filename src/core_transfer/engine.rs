use crate::constants::{BUFFER_SIZE, CHUNK_INTERVAL_MS};
use crate::core_error::TransferError;
use crate::core_transfer::throttle::Throttle;
use crate::core_transfer::transfer::{ProgressObserver, TransferSession};
use log::{debug, warn};
use std::future::Future;
use std::io;
use std::path::Path;
use std::time::Duration;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

#[derive(Debug, Clone, Copy)]
pub struct TransferOptions {
    pub buffer_size: usize,
    pub chunk_interval: Duration,
    /// Longest wait for a single chunk to move over the connection.
    pub io_timeout: Option<Duration>,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            buffer_size: BUFFER_SIZE,
            chunk_interval: Duration::from_millis(CHUNK_INTERVAL_MS),
            io_timeout: None,
        }
    }
}

impl TransferOptions {
    pub fn unthrottled(buffer_size: usize) -> Self {
        Self {
            buffer_size,
            chunk_interval: Duration::ZERO,
            io_timeout: None,
        }
    }

    pub fn with_io_timeout(mut self, io_timeout: Option<Duration>) -> Self {
        self.io_timeout = io_timeout;
        self
    }
}

/// Opens a file to be sent and returns it with its size.
pub async fn open_source(path: &Path) -> Result<(File, u64), TransferError> {
    let display = path.display().to_string();
    let file = File::open(path)
        .await
        .map_err(|e| TransferError::file_system(&display, e))?;
    let metadata = file
        .metadata()
        .await
        .map_err(|e| TransferError::file_system(&display, e))?;
    if !metadata.is_file() {
        return Err(TransferError::file_system(
            display,
            io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
        ));
    }
    Ok((file, metadata.len()))
}

/// Opens (creating or truncating) the file a payload is written into.
pub async fn create_destination(path: &Path) -> Result<File, TransferError> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .await
        .map_err(|e| TransferError::file_system(path.display().to_string(), e))
}

/// Streams `session.total` bytes from `source` to `writer`, one
/// buffer-sized chunk per throttle tick.
///
/// The source running dry before `total` leaves the peer waiting for bytes
/// that never come, so it is reported as a truncated stream.
pub async fn send_payload<R, W>(
    source: &mut R,
    writer: &mut W,
    session: &mut TransferSession,
    options: TransferOptions,
    observer: &mut dyn ProgressObserver,
) -> Result<(), TransferError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = vec![0u8; options.buffer_size.max(1)];
    let mut throttle = Throttle::new(options.chunk_interval);
    observer.on_start(session);

    while !session.is_complete() {
        throttle.tick().await;

        let want = chunk_len(&buf, session.remaining());
        let n = source
            .read(&mut buf[..want])
            .await
            .map_err(|e| TransferError::file_system(&session.filename, e))?;
        if n == 0 {
            return Err(TransferError::Truncated {
                transferred: session.transferred(),
                total: session.total,
            });
        }

        within(options.io_timeout, writer.write_all(&buf[..n]))
            .await
            .map_err(TransferError::Io)?;
        if let Some(percent) = session.record(n as u64) {
            observer.on_progress(session, percent);
        }
    }

    within(options.io_timeout, writer.flush())
        .await
        .map_err(TransferError::Io)?;
    observer.on_complete(session);
    Ok(())
}

/// Reads exactly `session.total` bytes from `reader` into `sink`.
///
/// Never reads past `total`, so whatever the peer sends next stays in the
/// stream. A local write failure drains the rest of the declared payload
/// first, which keeps the connection usable for the next command.
pub async fn recv_payload<R, W>(
    reader: &mut R,
    sink: &mut W,
    session: &mut TransferSession,
    options: TransferOptions,
    observer: &mut dyn ProgressObserver,
) -> Result<(), TransferError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    observer.on_start(session);
    if session.is_complete() {
        observer.on_complete(session);
        return Ok(());
    }

    let mut buf = vec![0u8; options.buffer_size.max(1)];
    let mut throttle = Throttle::new(options.chunk_interval);

    while !session.is_complete() {
        throttle.tick().await;

        let want = chunk_len(&buf, session.remaining());
        let n = within(options.io_timeout, reader.read(&mut buf[..want]))
            .await
            .map_err(TransferError::Io)?;
        if n == 0 {
            return Err(TransferError::Truncated {
                transferred: session.transferred(),
                total: session.total,
            });
        }

        let written = match write_chunk(sink, &buf[..n]).await {
            Ok(written) => written,
            Err(e) => {
                let left = session.remaining() - n as u64;
                drain(reader, left, &mut buf, options.io_timeout).await?;
                return Err(TransferError::file_system(&session.filename, e));
            }
        };
        if written != n {
            let left = session.remaining() - n as u64;
            drain(reader, left, &mut buf, options.io_timeout).await?;
            return Err(TransferError::Write {
                expected: n,
                written,
            });
        }

        if let Some(percent) = session.record(n as u64) {
            observer.on_progress(session, percent);
        }
    }

    sink.flush()
        .await
        .map_err(|e| TransferError::file_system(&session.filename, e))?;
    observer.on_complete(session);
    Ok(())
}

/// Consumes and throws away a declared payload of `total` bytes.
pub async fn discard_payload<R>(
    reader: &mut R,
    total: u64,
    options: TransferOptions,
) -> Result<(), TransferError>
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; options.buffer_size.max(1)];
    drain(reader, total, &mut buf, options.io_timeout).await
}

async fn drain<R>(
    reader: &mut R,
    mut left: u64,
    buf: &mut [u8],
    io_timeout: Option<Duration>,
) -> Result<(), TransferError>
where
    R: AsyncRead + Unpin,
{
    if left > 0 {
        debug!("Draining {} unwanted payload bytes", left);
    }
    let total = left;
    while left > 0 {
        let want = chunk_len(buf, left);
        let n = within(io_timeout, reader.read(&mut buf[..want]))
            .await
            .map_err(TransferError::Io)?;
        if n == 0 {
            return Err(TransferError::Truncated {
                transferred: total - left,
                total,
            });
        }
        left -= n as u64;
    }
    Ok(())
}

/// Writes a chunk, returning how many bytes the sink accepted before it
/// stopped taking more.
async fn write_chunk<W>(sink: &mut W, chunk: &[u8]) -> io::Result<usize>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0;
    while written < chunk.len() {
        match sink.write(&chunk[written..]).await? {
            0 => {
                warn!("Sink accepted {} of {} bytes", written, chunk.len());
                break;
            }
            n => written += n,
        }
    }
    Ok(written)
}

/// Runs one socket operation, failing with `TimedOut` once `limit` passes.
async fn within<F, T>(limit: Option<Duration>, op: F) -> io::Result<T>
where
    F: Future<Output = io::Result<T>>,
{
    match limit {
        None => op.await,
        Some(limit) => tokio::time::timeout(limit, op).await.unwrap_or_else(|_| {
            Err(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("no progress for {:?}", limit),
            ))
        }),
    }
}

fn chunk_len(buf: &[u8], remaining: u64) -> usize {
    (buf.len() as u64).min(remaining) as usize
}
