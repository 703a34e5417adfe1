//! WHOIS protocol client.
//!
//! The exchange is a single round trip: connect, send the domain followed by
//! CRLF, read until the server closes the connection. A fresh connection is
//! opened for every lookup and dropped when the lookup ends, whatever the
//! outcome.

use crate::error::DomainSearchError;
use crate::types::{LookupStatus, WhoisServer};
use std::future::Future;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

/// Marker the server puts in its response when the name is not registered.
pub const NO_MATCH_MARKER: &str = "No match for";

const READ_CHUNK: usize = 1024;

/// Anything that can tell whether a domain is registered.
///
/// [`WhoisClient`] is the network implementation; the searcher only depends
/// on this trait.
pub trait DomainLookup {
    fn lookup(
        &self,
        domain: &str,
    ) -> impl Future<Output = Result<LookupStatus, DomainSearchError>> + Send;
}

/// WHOIS client talking plain TCP to one configured server.
#[derive(Debug, Clone)]
pub struct WhoisClient {
    server: WhoisServer,
    /// Limit for the whole exchange; `None` means wait indefinitely
    timeout: Option<Duration>,
}

impl WhoisClient {
    /// Create a client for the given server, without a timeout.
    pub fn new(server: WhoisServer) -> Self {
        Self {
            server,
            timeout: None,
        }
    }

    /// Set or clear the per-lookup timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn server(&self) -> &WhoisServer {
        &self.server
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Look up one domain.
    ///
    /// # Errors
    ///
    /// Returns `DomainSearchError::Transport` if the connection cannot be
    /// opened, the request cannot be sent, reading fails before the server
    /// closes the stream, or the response is not valid UTF-8. Returns
    /// `DomainSearchError::Timeout` when a timeout is set and expires.
    pub async fn lookup(&self, domain: &str) -> Result<LookupStatus, DomainSearchError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.query(domain))
                .await
                .map_err(|_| DomainSearchError::timeout(format!("WHOIS lookup of {}", domain), limit))?,
            None => self.query(domain).await,
        }
    }

    async fn query(&self, domain: &str) -> Result<LookupStatus, DomainSearchError> {
        let stream = TcpStream::connect((self.server.host.as_str(), self.server.port))
            .await
            .map_err(|e| {
                DomainSearchError::transport(
                    domain,
                    format!("failed to connect to {}: {}", self.server, e),
                )
            })?;

        // The stream is moved into the exchange and dropped when it returns.
        let response = whois_exchange(stream, domain).await?;
        let status = classify_response(&response);

        debug!(
            domain,
            server = %self.server,
            bytes = response.len(),
            %status,
            "WHOIS lookup finished"
        );
        Ok(status)
    }
}

impl DomainLookup for WhoisClient {
    fn lookup(
        &self,
        domain: &str,
    ) -> impl Future<Output = Result<LookupStatus, DomainSearchError>> + Send {
        WhoisClient::lookup(self, domain)
    }
}

/// Run one request/response exchange over an already open stream.
///
/// A clean end of stream terminates the response. An I/O error while reading
/// is a transport failure even if part of the response already arrived.
pub async fn whois_exchange<S>(mut stream: S, domain: &str) -> Result<String, DomainSearchError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let request = format!("{}\r\n", domain);
    stream
        .write_all(request.as_bytes())
        .await
        .map_err(|e| DomainSearchError::transport(domain, format!("failed to send query: {}", e)))?;
    stream
        .flush()
        .await
        .map_err(|e| DomainSearchError::transport(domain, format!("failed to send query: {}", e)))?;

    let mut response = Vec::new();
    let mut chunk = [0u8; READ_CHUNK];
    loop {
        let n = stream.read(&mut chunk).await.map_err(|e| {
            DomainSearchError::transport(
                domain,
                format!("connection failed after {} bytes: {}", response.len(), e),
            )
        })?;
        if n == 0 {
            break;
        }
        response.extend_from_slice(&chunk[..n]);
    }

    String::from_utf8(response).map_err(|e| {
        DomainSearchError::transport(domain, format!("response is not valid UTF-8: {}", e))
    })
}

/// Classify a full WHOIS response.
///
/// Only the exact, case-sensitive marker counts; everything else, including
/// an empty response, means the name is registered.
pub fn classify_response(response: &str) -> LookupStatus {
    if response.contains(NO_MATCH_MARKER) {
        LookupStatus::Available
    } else {
        LookupStatus::Registered
    }
}
