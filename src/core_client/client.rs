use crate::config::ClientConfig;
use crate::constants::PASSWORD_SEND_ATTEMPTS;
use crate::core_auth::login;
use crate::core_command::Command;
use crate::core_error::{AuthError, FrameError, TransferError};
use crate::core_protocol::{is_succeed, read_frame, write_text_frame, TransferHeader};
use crate::core_transfer::{
    create_destination, discard_payload, open_source, recv_payload, send_payload, Direction,
    NoProgress, ProgressObserver, TransferOptions, TransferSession,
};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;

/// One authenticated connection to a server. Calls are strictly
/// sequential: each one sends a request and waits for its whole reply.
pub struct Client<S = TcpStream> {
    stream: S,
    options: TransferOptions,
    local_dir: PathBuf,
}

impl Client<TcpStream> {
    pub async fn connect(config: &ClientConfig) -> std::io::Result<Self> {
        let addr = format!("{}:{}", config.host, config.port);
        let stream = TcpStream::connect(&addr).await?;
        info!("Connected to {}", addr);
        Ok(Self::new(stream, config.transfer_options()))
    }
}

impl<S> Client<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, options: TransferOptions) -> Self {
        Self {
            stream,
            options,
            local_dir: PathBuf::from("."),
        }
    }

    /// Directory downloads land in and uploads are read from.
    pub fn with_local_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.local_dir = dir.into();
        self
    }

    /// Bounds every wait on the server, replies and payload chunks alike.
    pub fn with_io_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.options.io_timeout = timeout;
        self
    }

    pub async fn login(&mut self, password: &str, retry_interval: Duration) -> Result<(), AuthError> {
        login(&mut self.stream, password, PASSWORD_SEND_ATTEMPTS, retry_interval).await
    }

    /// `LS`: the listing text of the server side directory.
    pub async fn list(&mut self) -> Result<String, TransferError> {
        self.send(&Command::List).await?;
        let total = match TransferHeader::decode(&self.reply().await?)? {
            TransferHeader::Succeed(total) => total,
            TransferHeader::Failed => {
                return Err(TransferError::Remote("Server Internal Error.".to_string()))
            }
        };

        let mut listing = Vec::new();
        let mut session = TransferSession::new(Direction::Receive, "listing", total);
        recv_payload(
            &mut self.stream,
            &mut listing,
            &mut session,
            TransferOptions {
                chunk_interval: Duration::ZERO,
                ..self.options
            },
            &mut NoProgress,
        )
        .await?;
        Ok(String::from_utf8_lossy(&listing).into_owned())
    }

    pub async fn pwd(&mut self) -> Result<String, TransferError> {
        self.send(&Command::Pwd).await?;
        Ok(String::from_utf8_lossy(&self.reply().await?).into_owned())
    }

    /// `CD <path>`; a refusal carries the server's error text.
    pub async fn change_dir(&mut self, path: &str) -> Result<(), TransferError> {
        self.send(&Command::ChangeDir(path.to_string())).await?;
        let reply = self.reply().await?;
        if is_succeed(&reply) {
            Ok(())
        } else {
            Err(TransferError::Remote(String::from_utf8_lossy(&reply).into_owned()))
        }
    }

    /// `TRY`: true when the server acknowledged the probe.
    pub async fn probe(&mut self) -> Result<bool, TransferError> {
        self.send(&Command::Try).await?;
        Ok(is_succeed(&self.reply().await?))
    }

    /// `GET <name>`: downloads into the local directory under the file name
    /// component of `name`. Nothing is created when the server refuses.
    pub async fn get(
        &mut self,
        name: &str,
        observer: &mut dyn ProgressObserver,
    ) -> Result<PathBuf, TransferError> {
        let local = self.local_path(name)?;
        self.send(&Command::Get(name.to_string())).await?;

        let total = match TransferHeader::decode(&self.reply().await?)? {
            TransferHeader::Succeed(total) => total,
            TransferHeader::Failed => {
                return Err(TransferError::Remote(format!("No file named {} in server.", name)))
            }
        };

        let file = match create_destination(&local).await {
            Ok(file) => file,
            Err(e) => {
                discard_payload(&mut self.stream, total, self.options).await?;
                return Err(e);
            }
        };

        let mut writer = BufWriter::new(file);
        let mut session = TransferSession::new(Direction::Receive, name, total);
        let result =
            recv_payload(&mut self.stream, &mut writer, &mut session, self.options, observer).await;
        drop(writer);
        if let Err(e) = result {
            if let Err(rm) = tokio::fs::remove_file(&local).await {
                warn!("Failed to remove partial download {}: {}", local.display(), rm);
            }
            return Err(e);
        }
        debug!("Stored {} bytes in {}", total, local.display());
        Ok(local)
    }

    /// `PUT <name>`: uploads a local file under its file name component.
    pub async fn put(
        &mut self,
        name: &str,
        observer: &mut dyn ProgressObserver,
    ) -> Result<u64, TransferError> {
        let remote = remote_name(name)?;
        let (mut file, total) = open_source(&self.local_dir.join(name)).await?;

        self.send(&Command::Put(remote.clone())).await?;
        write_text_frame(&mut self.stream, &total.to_string()).await?;

        if !is_succeed(&self.reply().await?) {
            return Err(TransferError::Remote(format!(
                "Server refused to store {}.",
                remote
            )));
        }

        let mut session = TransferSession::new(Direction::Send, remote.as_str(), total);
        send_payload(&mut file, &mut self.stream, &mut session, self.options, observer).await?;

        if is_succeed(&self.reply().await?) {
            Ok(total)
        } else {
            Err(TransferError::Remote(format!("Server failed to store {}.", remote)))
        }
    }

    /// Closes the connection; the server is not told explicitly.
    pub async fn close(mut self) -> std::io::Result<()> {
        self.stream.shutdown().await
    }

    async fn send(&mut self, command: &Command) -> Result<(), FrameError> {
        match command.to_wire() {
            Some(text) => write_text_frame(&mut self.stream, &text).await,
            None => Ok(()),
        }
    }

    async fn reply(&mut self) -> Result<Vec<u8>, FrameError> {
        match self.options.io_timeout {
            None => read_frame(&mut self.stream).await,
            Some(limit) => tokio::time::timeout(limit, read_frame(&mut self.stream))
                .await
                .unwrap_or_else(|_| {
                    Err(FrameError::Io(std::io::Error::new(
                        std::io::ErrorKind::TimedOut,
                        "no reply from server",
                    )))
                }),
        }
    }

    fn local_path(&self, name: &str) -> Result<PathBuf, TransferError> {
        Ok(self.local_dir.join(remote_name(name)?))
    }
}

fn remote_name(name: &str) -> Result<String, TransferError> {
    Path::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            TransferError::file_system(
                name,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a file name"),
            )
        })
}
