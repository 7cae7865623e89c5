//! Client for the upsd network protocol.
//!
//! Only the `LIST UPS` and `LIST VAR` queries are implemented, which is all
//! the exporter needs.

use crate::error::{NutError, Result};
use crate::nut::quote::unquote;
use crate::DEFAULT_NUT_PORT;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time;
use tracing::debug;

/// Longest response line accepted from a server, newline included.
pub const MAX_LINE_BYTES: u64 = 64 * 1024;

/// Most body lines accepted in one `LIST` response.
pub const MAX_LIST_ENTRIES: usize = 4096;

/// Variables reported by one UPS, keyed by variable name.
pub type VariableSet = HashMap<String, String>;

/// A connection to a NUT server.
///
/// The client owns its stream. [`NutClient::close`] consumes the client, so a
/// connection can only be closed once; dropping the client releases it too.
pub struct NutClient<S = TcpStream> {
    stream: BufReader<S>,
    timeout: Duration,
    peer: String,
}

/// Append the default upsd port to `addr` unless it already carries one.
///
/// Bare IPv6 literals are bracketed before the port is added.
pub fn normalize_address(addr: &str) -> String {
    if addr.parse::<SocketAddr>().is_ok() {
        return addr.to_string();
    }
    if let Some(rest) = addr.strip_prefix('[') {
        return match rest.split_once(']') {
            Some((_, "")) => format!("{addr}:{DEFAULT_NUT_PORT}"),
            _ => addr.to_string(),
        };
    }
    match addr.matches(':').count() {
        0 => format!("{addr}:{DEFAULT_NUT_PORT}"),
        1 => addr.to_string(),
        _ => format!("[{addr}]:{DEFAULT_NUT_PORT}"),
    }
}

impl NutClient<TcpStream> {
    /// Connect to the NUT server at `addr`, defaulting to port 3493.
    ///
    /// `timeout` bounds the connection attempt and every later read and write.
    pub async fn connect(addr: &str, timeout: Duration) -> Result<Self> {
        let target = normalize_address(addr);
        debug!("Connecting to NUT server at {}", target);

        let stream = match time::timeout(timeout, TcpStream::connect(&target)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => {
                return Err(NutError::connection_error(format!("{target}: {e}")));
            }
            Err(_) => {
                return Err(NutError::connection_error(format!(
                    "{target}: timed out after {}ms",
                    timeout.as_millis()
                )));
            }
        };
        stream.set_nodelay(true)?;

        Ok(Self::with_peer(stream, timeout, target))
    }
}

impl<S> NutClient<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wrap an already established stream.
    pub fn new(stream: S, timeout: Duration) -> Self {
        Self::with_peer(stream, timeout, "stream".to_string())
    }

    fn with_peer(stream: S, timeout: Duration, peer: String) -> Self {
        Self {
            stream: BufReader::new(stream),
            timeout,
            peer,
        }
    }

    /// Address this client is connected to.
    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Shut the connection down.
    pub async fn close(mut self) -> Result<()> {
        debug!("Closing connection to {}", self.peer);
        match time::timeout(self.timeout, self.stream.get_mut().shutdown()).await {
            Ok(result) => result.map_err(|e| {
                NutError::transport_error(format!("{}: close failed: {e}", self.peer))
            }),
            Err(_) => Err(NutError::transport_error(format!(
                "{}: close timed out",
                self.peer
            ))),
        }
    }

    /// Names of all UPSs served by the server.
    pub async fn list_upss(&mut self) -> Result<Vec<String>> {
        self.list("UPS")
            .await?
            .into_iter()
            .map(|line| match line.split_once(' ') {
                Some((name, _description)) => Ok(name.to_string()),
                None => Err(NutError::protocol_error(format!(
                    "UPS entry without description: {line:?}"
                ))),
            })
            .collect()
    }

    /// All variables and their unquoted values for the UPS `ups`.
    pub async fn list_variables(&mut self, ups: &str) -> Result<VariableSet> {
        self.list(&format!("VAR {ups}"))
            .await?
            .into_iter()
            .map(|line| {
                let (key, value) = line.split_once(' ').ok_or_else(|| {
                    NutError::protocol_error(format!("variable without value: {line:?}"))
                })?;
                Ok((key.to_string(), unquote(value)?))
            })
            .collect()
    }

    /// Issue `LIST <query>` and return the body lines with their prefix
    /// stripped. Any framing violation discards the whole response.
    ///
    /// The whole exchange shares one deadline, so a server trickling lines
    /// cannot hold the client past `timeout`.
    async fn list(&mut self, query: &str) -> Result<Vec<String>> {
        let command = format!("LIST {query}");
        let timeout = self.timeout;
        match time::timeout(timeout, self.exchange(&command, query)).await {
            Ok(result) => result,
            Err(_) => Err(NutError::transport_error(format!(
                "{}: {command} timed out after {}ms",
                self.peer,
                timeout.as_millis()
            ))),
        }
    }

    async fn exchange(&mut self, command: &str, query: &str) -> Result<Vec<String>> {
        self.write_line(command).await?;

        let begin = format!("BEGIN {command}");
        let first = self.read_line().await?;
        if first != begin {
            if let Some(code) = first.strip_prefix("ERR ") {
                return Err(NutError::protocol_error(format!(
                    "server answered {command:?} with error {code}"
                )));
            }
            return Err(NutError::protocol_error(format!(
                "expected {begin:?}, got {first:?}"
            )));
        }

        // After a bad body line the rest of the response is still read up to
        // END, so the connection stays usable for the next query.
        let end = format!("END {command}");
        let prefix = format!("{query} ");
        let mut lines = Vec::new();
        let mut failure = None;
        loop {
            let line = match self.read_line().await {
                Ok(line) => line,
                Err(e @ NutError::Protocol(_)) => {
                    if failure.is_none() {
                        failure = Some(e);
                    }
                    continue;
                }
                Err(e) => return Err(e),
            };
            if line == end {
                break;
            }
            if failure.is_some() {
                continue;
            }
            match line.strip_prefix(&prefix) {
                Some(body) if lines.len() < MAX_LIST_ENTRIES => lines.push(body.to_string()),
                Some(_) => {
                    failure = Some(NutError::protocol_error(format!(
                        "{command} returned more than {MAX_LIST_ENTRIES} entries"
                    )));
                }
                None => {
                    failure = Some(NutError::protocol_error(format!(
                        "expected {prefix:?}, got {line:?}"
                    )));
                }
            }
        }

        if let Some(e) = failure {
            return Err(e);
        }
        debug!("{} returned {} entries from {}", command, lines.len(), self.peer);
        Ok(lines)
    }

    async fn write_line(&mut self, line: &str) -> Result<()> {
        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');

        let stream = self.stream.get_mut();
        let write = async {
            stream.write_all(&buf).await?;
            stream.flush().await
        };
        match time::timeout(self.timeout, write).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(NutError::transport_error(format!(
                "{}: write failed: {e}",
                self.peer
            ))),
            Err(_) => Err(NutError::transport_error(format!(
                "{}: write timed out after {}ms",
                self.peer,
                self.timeout.as_millis()
            ))),
        }
    }

    async fn read_line(&mut self) -> Result<String> {
        let line = match time::timeout(self.timeout, self.read_line_bytes()).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(NutError::transport_error(format!(
                    "{}: read timed out after {}ms",
                    self.peer,
                    self.timeout.as_millis()
                )));
            }
        };
        String::from_utf8(line).map_err(|e| {
            NutError::protocol_error(format!("{}: response line is not UTF-8: {e}", self.peer))
        })
    }

    /// Read one line and strip its newline. A line longer than
    /// [`MAX_LINE_BYTES`] is consumed up to its newline and then rejected.
    async fn read_line_bytes(&mut self) -> Result<Vec<u8>> {
        let mut line = Vec::new();
        let mut read = self.read_chunk(&mut line).await?;
        if strip_newline(&mut line) {
            return Ok(line);
        }

        let overlong = read as u64 >= MAX_LINE_BYTES;
        while read as u64 >= MAX_LINE_BYTES {
            line.clear();
            read = self.read_chunk(&mut line).await?;
            if strip_newline(&mut line) {
                return Err(NutError::protocol_error(format!(
                    "{}: response line exceeds {MAX_LINE_BYTES} bytes",
                    self.peer
                )));
            }
        }

        Err(NutError::transport_error(format!(
            "{}: connection closed by server{}",
            self.peer,
            if overlong { " inside an overlong line" } else { "" }
        )))
    }

    async fn read_chunk(&mut self, buf: &mut Vec<u8>) -> Result<usize> {
        (&mut self.stream)
            .take(MAX_LINE_BYTES)
            .read_until(b'\n', buf)
            .await
            .map_err(|e| NutError::transport_error(format!("{}: read failed: {e}", self.peer)))
    }
}

/// Drop a trailing newline, reporting whether there was one.
fn strip_newline(buf: &mut Vec<u8>) -> bool {
    if buf.last() == Some(&b'\n') {
        buf.pop();
        true
    } else {
        false
    }
}
