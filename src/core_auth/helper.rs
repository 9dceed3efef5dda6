use crate::constants::AUTH_SUCCESS_TOKEN;
use crate::core_auth::core_auth::Authenticator;
use crate::core_error::{AuthError, FrameError};
use crate::core_protocol::{read_frame, write_frame, write_text_frame};
use log::{debug, info, warn};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};

/// Server side of the handshake: one read, one comparison.
///
/// On a mismatch nothing is written back; the caller is expected to drop
/// the connection.
pub async fn authenticate_peer<S>(
    stream: &mut S,
    authenticator: &Authenticator,
    peer: &str,
) -> Result<(), AuthError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let candidate = read_frame(stream).await?;

    if !authenticator.verify(&candidate) {
        warn!("Remote client {} verifying failed.", peer);
        return Err(AuthError::Rejected);
    }

    info!("Remote client {} verifying succeeded.", peer);
    write_text_frame(stream, AUTH_SUCCESS_TOKEN).await?;
    Ok(())
}

/// Client side of the handshake.
///
/// Only a failed local write is retried, up to `attempts` times spaced by
/// `retry_interval`. A wrong password is never retried: the server closes
/// the connection without a reply.
pub async fn login<S>(
    stream: &mut S,
    password: &str,
    attempts: u32,
    retry_interval: Duration,
) -> Result<(), AuthError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut tries = 0;
    loop {
        match write_frame(stream, password.as_bytes()).await {
            Ok(()) => break,
            Err(e) => {
                tries += 1;
                warn!("Failed to send password (attempt {}): {}", tries, e);
                if tries >= attempts {
                    return Err(AuthError::Unreachable(attempts));
                }
                tokio::time::sleep(retry_interval).await;
            }
        }
    }
    debug!("Password sent, waiting for the server verdict");

    let reply = match read_frame(stream).await {
        Ok(reply) => reply,
        Err(FrameError::Closed) => return Err(AuthError::Rejected),
        Err(e) => return Err(e.into()),
    };

    let reply = String::from_utf8_lossy(&reply);
    if reply.eq_ignore_ascii_case(AUTH_SUCCESS_TOKEN) {
        Ok(())
    } else {
        Err(AuthError::UnexpectedReply(reply.into_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_auth::Credential;
    use crate::core_protocol::read_text_frame;

    #[tokio::test]
    async fn test_handshake_with_matching_secret() {
        let (mut client, mut server) = tokio::io::duplex(256);
        let auth = Authenticator::new(Credential::new("open sesame"));

        let server_task = tokio::spawn(async move {
            authenticate_peer(&mut server, &auth, "test").await
        });

        login(&mut client, "open sesame", 6, Duration::from_millis(1))
            .await
            .unwrap();
        server_task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_handshake_with_wrong_secret() {
        let (mut client, mut server) = tokio::io::duplex(256);
        let auth = Authenticator::new(Credential::new("open sesame"));

        let server_task = tokio::spawn(async move {
            let result = authenticate_peer(&mut server, &auth, "test").await;
            // Dropping the stream is how the rejection reaches the client.
            drop(server);
            result
        });

        let result = login(&mut client, "close sesame", 6, Duration::from_millis(1)).await;
        assert!(matches!(result, Err(AuthError::Rejected)));
        assert!(matches!(
            server_task.await.unwrap(),
            Err(AuthError::Rejected)
        ));
    }

    #[tokio::test]
    async fn test_reply_token_is_case_insensitive() {
        let (mut client, mut server) = tokio::io::duplex(256);

        let server_task = tokio::spawn(async move {
            let secret = read_text_frame(&mut server).await.unwrap();
            assert_eq!(secret, "pw");
            write_text_frame(&mut server, "connection succeed").await.unwrap();
        });

        login(&mut client, "pw", 6, Duration::from_millis(1))
            .await
            .unwrap();
        server_task.await.unwrap();
    }

    #[tokio::test]
    async fn test_login_gives_up_when_peer_is_gone() {
        let (mut client, server) = tokio::io::duplex(256);
        drop(server);

        let result = login(&mut client, "pw", 3, Duration::from_millis(1)).await;
        assert!(matches!(result, Err(AuthError::Unreachable(3))));
    }
}
