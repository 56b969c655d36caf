//! HTTP streaming of newline-delimited JSON bodies with read timeout.
//!
//! The body is consumed as an async byte stream and split into lines on
//! demand, so memory use is bounded by the read buffer plus the current line
//! no matter how large the upstream dataset is.

use std::io;
use std::pin::Pin;
use std::time::Duration;

use futures_util::stream::{self, BoxStream};
use futures_util::{StreamExt, TryStreamExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, BufReader};

/// Buffer size for the response body reader (64KB)
const BODY_BUF_SIZE: usize = 64 * 1024;

/// Timeouts for HTTP requests against the upstream source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpSettings {
    /// Max time to establish a TCP/TLS connection
    pub connect_timeout: Duration,
    /// Max time without a complete line (or response headers) before the
    /// stream is considered stalled
    pub read_timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            read_timeout: Duration::from_secs(60),
        }
    }
}

/// Error types for stream operations
#[derive(Debug)]
pub enum StreamError {
    /// HTTP error with optional status code
    Http {
        status: Option<u16>,
        message: String,
    },
    /// Response body could not be decoded
    Decode { line: usize, message: String },
    /// I/O error (includes read timeouts)
    Io(io::Error),
}

impl std::fmt::Display for StreamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http {
                status: Some(s),
                message,
            } => write!(f, "HTTP {s}: {message}"),
            Self::Http {
                status: None,
                message,
            } => write!(f, "HTTP error: {message}"),
            Self::Decode { line, message } => write!(f, "invalid record on line {line}: {message}"),
            Self::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for StreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl StreamError {
    /// Create HTTP error from reqwest error
    pub fn from_reqwest(e: &reqwest::Error) -> Self {
        Self::Http {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }

    fn timed_out(after: Duration) -> Self {
        Self::Io(io::Error::new(
            io::ErrorKind::TimedOut,
            format!("read timeout ({}s with no data)", after.as_secs()),
        ))
    }
}

impl From<io::Error> for StreamError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Build an HTTP client with the given timeouts.
///
/// The client is owned by whoever calls this; there is no process-wide
/// instance, so independent runs don't share connection state.
pub fn http_client(settings: &HttpSettings) -> Result<reqwest::Client, StreamError> {
    reqwest::Client::builder()
        .connect_timeout(settings.connect_timeout)
        .pool_max_idle_per_host(2)
        .user_agent(concat!("geoextract/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| StreamError::from_reqwest(&e))
}

/// GET a small response body as text
pub async fn fetch_text(
    client: &reqwest::Client,
    url: &str,
    read_timeout: Duration,
) -> Result<String, StreamError> {
    let request = async {
        client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())?
            .text()
            .await
    };
    tokio::time::timeout(read_timeout, request)
        .await
        .map_err(|_| StreamError::timed_out(read_timeout))?
        .map_err(|e| StreamError::from_reqwest(&e))
}

type BodyReader = BufReader<Pin<Box<dyn AsyncRead + Send>>>;

async fn open_body(
    client: &reqwest::Client,
    url: &str,
    read_timeout: Duration,
) -> Result<BodyReader, StreamError> {
    let send = async { client.get(url).send().await.and_then(|r| r.error_for_status()) };
    let response = tokio::time::timeout(read_timeout, send)
        .await
        .map_err(|_| StreamError::timed_out(read_timeout))?
        .map_err(|e| StreamError::from_reqwest(&e))?;

    let body = response
        .bytes_stream()
        .map(|chunk| chunk.map_err(io::Error::other));
    let reader: Pin<Box<dyn AsyncRead + Send>> =
        Box::pin(tokio_util::io::StreamReader::new(body));
    Ok(BufReader::with_capacity(BODY_BUF_SIZE, reader))
}

/// Lazily stream the non-blank lines of an NDJSON response body.
///
/// Nothing is requested until the returned stream is first polled. The
/// stream ends after the first error.
pub fn ndjson_lines(
    client: reqwest::Client,
    url: String,
    read_timeout: Duration,
) -> BoxStream<'static, Result<String, StreamError>> {
    stream::once(async move { open_body(&client, &url, read_timeout).await })
        .map_ok(move |body| read_lines(body, read_timeout))
        .try_flatten()
        .boxed()
}

/// Split a buffered reader into non-blank lines, one at a time.
///
/// Each line must arrive within `read_timeout`, otherwise the stream yields
/// a `TimedOut` I/O error and stops.
pub fn read_lines<R>(reader: R, read_timeout: Duration) -> BoxStream<'static, Result<String, StreamError>>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    stream::try_unfold(reader.lines(), move |mut lines| async move {
        loop {
            let next = tokio::time::timeout(read_timeout, lines.next_line())
                .await
                .map_err(|_| StreamError::timed_out(read_timeout))??;
            match next {
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => return Ok(Some((line, lines))),
                None => return Ok(None),
            }
        }
    })
    .boxed()
}
