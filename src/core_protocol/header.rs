use crate::constants::{TAG_FAILED, TAG_LEN, TAG_SUCCEED};
use crate::core_error::FrameError;

/// Status header sent ahead of a bulk payload: `SUCCEED<N>` or `FAILED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferHeader {
    Succeed(u64),
    Failed,
}

impl TransferHeader {
    pub fn encode(&self) -> String {
        match self {
            TransferHeader::Succeed(total) => format!("{}{}", TAG_SUCCEED, total),
            TransferHeader::Failed => TAG_FAILED.to_string(),
        }
    }

    /// Bytes `[0:7]` carry the tag, bytes `[7:]` the decimal payload length.
    pub fn decode(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() < TAG_FAILED.len() {
            return Err(FrameError::ShortRead(bytes.len()));
        }
        if bytes.starts_with(TAG_FAILED.as_bytes()) {
            return Ok(TransferHeader::Failed);
        }
        if bytes.len() < TAG_LEN {
            return Err(FrameError::ShortRead(bytes.len()));
        }

        let (tag, digits) = bytes.split_at(TAG_LEN);
        if tag != TAG_SUCCEED.as_bytes() {
            return Err(FrameError::UnexpectedTag(
                String::from_utf8_lossy(tag).into_owned(),
            ));
        }
        Ok(TransferHeader::Succeed(parse_length(digits)?))
    }
}

/// Parses a bare decimal byte count, as sent after `PUT <name>`.
pub fn parse_length(bytes: &[u8]) -> Result<u64, FrameError> {
    let header_error = || FrameError::HeaderParse(String::from_utf8_lossy(bytes).into_owned());

    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return Err(header_error());
    }
    std::str::from_utf8(bytes)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .ok_or_else(header_error)
}

/// A plain `SUCCEED` status reply, as opposed to error text.
pub fn is_succeed(bytes: &[u8]) -> bool {
    bytes == TAG_SUCCEED.as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_succeed_header() {
        assert_eq!(
            TransferHeader::decode(b"SUCCEED1048576").unwrap(),
            TransferHeader::Succeed(1_048_576)
        );
        assert_eq!(
            TransferHeader::decode(b"SUCCEED0").unwrap(),
            TransferHeader::Succeed(0)
        );
        assert_eq!(TransferHeader::Succeed(42).encode(), "SUCCEED42");
    }

    #[test]
    fn test_decode_failed_header() {
        assert_eq!(TransferHeader::decode(b"FAILED").unwrap(), TransferHeader::Failed);
        assert_eq!(TransferHeader::Failed.encode(), "FAILED");
    }

    #[test]
    fn test_decode_short_read() {
        assert!(matches!(
            TransferHeader::decode(b"SUCC"),
            Err(FrameError::ShortRead(4))
        ));
        assert!(matches!(
            TransferHeader::decode(b"SUCCEE"),
            Err(FrameError::ShortRead(6))
        ));
    }

    #[test]
    fn test_decode_bad_length() {
        assert!(matches!(
            TransferHeader::decode(b"SUCCEED"),
            Err(FrameError::HeaderParse(_))
        ));
        assert!(matches!(
            TransferHeader::decode(b"SUCCEED12a"),
            Err(FrameError::HeaderParse(_))
        ));
        assert!(matches!(
            TransferHeader::decode(b"SUCCEED-5"),
            Err(FrameError::HeaderParse(_))
        ));
    }

    #[test]
    fn test_decode_unexpected_tag() {
        assert!(matches!(
            TransferHeader::decode(b"WHATEVER12"),
            Err(FrameError::UnexpectedTag(_))
        ));
    }

    #[test]
    fn test_parse_length() {
        assert_eq!(parse_length(b"4096").unwrap(), 4096);
        assert!(parse_length(b"+12").is_err());
        assert!(parse_length(b"").is_err());
        assert!(is_succeed(b"SUCCEED"));
        assert!(!is_succeed(b"No such file or directory (os error 2)"));
    }
}
