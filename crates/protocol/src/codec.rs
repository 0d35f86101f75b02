//! Header-framed JSON transport over the child process stdio streams.
//!
//! Wire format: `Content-Length: <n>\r\n\r\n<JSON payload>`, the framing
//! convention of the language-client transport. Unknown header lines are
//! ignored.

use serde::{Serialize, de::DeserializeOwned};
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt};

/// Maximum frame size: 16 MiB.
const MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

/// Errors that can occur during frame read/write.
#[derive(Debug)]
pub enum FrameError {
    /// Underlying I/O error.
    Io(io::Error),
    /// Frame exceeds the maximum allowed size.
    TooLarge { size: usize },
    /// JSON serialization/deserialization error.
    Json(serde_json::Error),
    /// A header line could not be parsed.
    InvalidHeader(String),
    /// The header block ended without a `Content-Length` header.
    MissingContentLength,
    /// The connection was closed (EOF during read).
    ConnectionClosed,
}

impl std::fmt::Display for FrameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io error: {e}"),
            Self::TooLarge { size } => {
                write!(f, "frame too large: {size} bytes (max {MAX_FRAME_SIZE})")
            }
            Self::Json(e) => write!(f, "json error: {e}"),
            Self::InvalidHeader(line) => write!(f, "invalid header line: {line:?}"),
            Self::MissingContentLength => write!(f, "missing Content-Length header"),
            Self::ConnectionClosed => write!(f, "connection closed"),
        }
    }
}

impl std::error::Error for FrameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for FrameError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for FrameError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Write a typed message as a header-framed JSON payload.
pub async fn write_message<W, T>(writer: &mut W, msg: &T) -> Result<(), FrameError>
where
    W: tokio::io::AsyncWrite + Unpin,
    T: Serialize,
{
    let data = serde_json::to_vec(msg)?;
    if data.len() > MAX_FRAME_SIZE {
        return Err(FrameError::TooLarge { size: data.len() });
    }
    let header = format!("Content-Length: {}\r\n\r\n", data.len());
    writer.write_all(header.as_bytes()).await?;
    writer.write_all(&data).await?;
    writer.flush().await?;
    Ok(())
}

/// Read a header-framed JSON payload and deserialize into a typed message.
pub async fn read_message<R, T>(reader: &mut R) -> Result<T, FrameError>
where
    R: AsyncBufRead + Unpin,
    T: DeserializeOwned,
{
    let mut content_length: Option<usize> = None;

    loop {
        let mut line = String::new();
        let n = reader.read_line(&mut line).await?;
        if n == 0 {
            return Err(FrameError::ConnectionClosed);
        }
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            break;
        }
        if let Some(value) = line.strip_prefix("Content-Length:") {
            let size = value
                .trim()
                .parse::<usize>()
                .map_err(|_| FrameError::InvalidHeader(line.to_owned()))?;
            content_length = Some(size);
        }
        // Other headers (Content-Type) carry no information we need.
    }

    let len = content_length.ok_or(FrameError::MissingContentLength)?;
    if len > MAX_FRAME_SIZE {
        return Err(FrameError::TooLarge { size: len });
    }

    let mut buf = vec![0u8; len];
    match reader.read_exact(&mut buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            return Err(FrameError::ConnectionClosed);
        }
        Err(e) => return Err(FrameError::Io(e)),
    }

    let msg = serde_json::from_slice(&buf)?;
    Ok(msg)
}
