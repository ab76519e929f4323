/*!
 * TCP line-protocol client
 *
 * Each request is one `\n`-terminated line; each response is one line.
 * A response starting with `ERR ` is an application fault reported by the
 * service and is never retried. Socket failures fault the client, which
 * the wrapper then aborts and rebuilds.
 */

use std::fmt;
use std::io::{BufRead, BufReader, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::str::FromStr;
use std::time::Duration;

use spike_core_resilience::{ConfigurableClient, ConnectionState, RemoteClient, ServiceError};

use crate::error::SpikeError;

/// Endpoint used by the parameterless constructor
pub const DEFAULT_ENDPOINT: &str = "127.0.0.1:7878";

/// Prefix marking a fault reply
const FAULT_PREFIX: &str = "ERR ";

/// Socket-level settings applied to every connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TcpBinding {
    pub connect_timeout: Duration,
    pub read_timeout: Option<Duration>,
    pub write_timeout: Option<Duration>,
}

impl Default for TcpBinding {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            read_timeout: Some(Duration::from_secs(30)),
            write_timeout: Some(Duration::from_secs(30)),
        }
    }
}

/// `host:port` address of the remote service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointAddress {
    host: String,
    port: u16,
}

impl EndpointAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    fn resolve(&self) -> std::io::Result<Vec<SocketAddr>> {
        Ok((self.host.as_str(), self.port).to_socket_addrs()?.collect())
    }
}

impl Default for EndpointAddress {
    fn default() -> Self {
        Self::new("127.0.0.1", 7878)
    }
}

impl FromStr for EndpointAddress {
    type Err = SpikeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| SpikeError::InvalidEndpoint(s.to_string()))?;
        let host = host.trim_start_matches('[').trim_end_matches(']');
        if host.is_empty() {
            return Err(SpikeError::InvalidEndpoint(s.to_string()));
        }
        let port = port
            .parse::<u16>()
            .map_err(|_| SpikeError::InvalidEndpoint(s.to_string()))?;
        Ok(Self::new(host, port))
    }
}

impl fmt::Display for EndpointAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// Client for a line-oriented TCP service
#[derive(Debug)]
pub struct LineClient {
    binding: TcpBinding,
    endpoint: EndpointAddress,
    state: ConnectionState,
    stream: Option<BufReader<TcpStream>>,
}

impl LineClient {
    pub fn endpoint(&self) -> &EndpointAddress {
        &self.endpoint
    }

    /// Connect if not connected yet
    pub fn open(&mut self) -> Result<(), ServiceError> {
        match self.state {
            ConnectionState::Opened => return Ok(()),
            ConnectionState::Created => {}
            state => return Err(ServiceError::InvalidState(state)),
        }

        self.state = ConnectionState::Opening;
        match self.connect() {
            Ok(stream) => {
                tracing::debug!(
                    host = self.endpoint.host(),
                    port = self.endpoint.port(),
                    "Connection opened"
                );
                self.stream = Some(BufReader::new(stream));
                self.state = ConnectionState::Opened;
                Ok(())
            }
            Err(e) => {
                self.state = ConnectionState::Faulted;
                Err(ServiceError::communication(format!(
                    "Failed to connect to {}: {}",
                    self.endpoint, e
                )))
            }
        }
    }

    fn connect(&self) -> std::io::Result<TcpStream> {
        let mut last_err = None;
        for addr in self.endpoint.resolve()? {
            match TcpStream::connect_timeout(&addr, self.binding.connect_timeout) {
                Ok(stream) => {
                    stream.set_read_timeout(self.binding.read_timeout)?;
                    stream.set_write_timeout(self.binding.write_timeout)?;
                    stream.set_nodelay(true)?;
                    return Ok(stream);
                }
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.unwrap_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::AddrNotAvailable,
                "endpoint resolved to no addresses",
            )
        }))
    }

    /// Send one line and wait for the one-line reply
    pub fn request(&mut self, line: &str) -> Result<String, ServiceError> {
        if line.contains('\n') {
            return Err(ServiceError::fault("request must be a single line"));
        }
        self.open()?;

        match self.exchange(line) {
            Ok(reply) => match reply.strip_prefix(FAULT_PREFIX) {
                Some(fault) => Err(ServiceError::fault(fault)),
                None => Ok(reply),
            },
            Err(e) => {
                self.state = ConnectionState::Faulted;
                Err(ServiceError::communication(format!(
                    "Request to {} failed: {}",
                    self.endpoint, e
                )))
            }
        }
    }

    fn exchange(&mut self, line: &str) -> std::io::Result<String> {
        let stream = self.stream.as_mut().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotConnected, "no open connection")
        })?;

        let socket = stream.get_mut();
        socket.write_all(line.as_bytes())?;
        socket.write_all(b"\n")?;
        socket.flush()?;

        let mut reply = String::new();
        if stream.read_line(&mut reply)? == 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "connection closed by peer",
            ));
        }
        Ok(reply.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Liveness check: `PING` must be answered with `PONG`
    pub fn ping(&mut self) -> Result<(), ServiceError> {
        let reply = self.request("PING")?;
        if reply == "PONG" {
            Ok(())
        } else {
            Err(ServiceError::fault(format!("unexpected ping reply: {}", reply)))
        }
    }
}

impl RemoteClient for LineClient {
    fn state(&self) -> ConnectionState {
        self.state
    }

    fn close(&mut self) -> Result<(), ServiceError> {
        match self.state {
            ConnectionState::Closed => return Ok(()),
            ConnectionState::Faulted => return Err(ServiceError::InvalidState(self.state)),
            _ => {}
        }

        self.state = ConnectionState::Closing;
        let result = match self.stream.take() {
            Some(stream) => stream.get_ref().shutdown(Shutdown::Both),
            None => Ok(()),
        };
        match result {
            Ok(()) => {
                self.state = ConnectionState::Closed;
                Ok(())
            }
            Err(e) => {
                self.state = ConnectionState::Faulted;
                Err(ServiceError::communication(format!(
                    "Failed to close connection to {}: {}",
                    self.endpoint, e
                )))
            }
        }
    }

    fn abort(&mut self) {
        self.stream = None;
        self.state = ConnectionState::Closed;
    }
}

impl ConfigurableClient for LineClient {
    type Binding = TcpBinding;
    type Endpoint = EndpointAddress;

    fn from_transport(binding: TcpBinding, endpoint: EndpointAddress) -> Self {
        Self {
            binding,
            endpoint,
            state: ConnectionState::Created,
            stream: None,
        }
    }
}

impl Default for LineClient {
    fn default() -> Self {
        Self::from_transport(TcpBinding::default(), EndpointAddress::default())
    }
}
