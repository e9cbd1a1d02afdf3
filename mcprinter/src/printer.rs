//! Printer adapters for sending ESC/POS data
//!
//! Network printers take raw bytes on a TCP port (9100 by convention).
//! One connection per job, one attempt, no response read.

use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{info, instrument, warn};

use crate::encoder::Encoder;
use crate::error::{PrintError, PrintResult};

/// Raw printing port used by most network printers
pub const DEFAULT_PORT: u16 = 9100;

/// Dot width of a 203 dpi head on 58 mm paper
pub const DEFAULT_DOT_WIDTH: u32 = 384;

/// Bound on establishing the connection
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Bound on writing the whole payload
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for printer adapters
#[allow(async_fn_in_trait)]
pub trait Printer {
    /// Send raw ESC/POS data to the printer
    async fn print(&self, data: &[u8]) -> PrintResult<()>;
}

/// Where a job goes and how wide it prints.
///
/// Resolved once per job and never changed while it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrinterTarget {
    pub host: String,
    pub port: u16,
    pub width: u32,
}

impl PrinterTarget {
    /// Target on [`DEFAULT_PORT`] with [`DEFAULT_DOT_WIDTH`]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            width: DEFAULT_DOT_WIDTH,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    /// Encoder for this target's width
    pub fn encoder(&self) -> PrintResult<Encoder> {
        Encoder::new(self.width)
    }

    /// Network printer for this target's address
    pub fn printer(&self) -> PrintResult<NetworkPrinter> {
        NetworkPrinter::new(&self.host, self.port)
    }
}

/// Network printer (TCP port 9100)
///
/// Most thermal printers support raw TCP printing on port 9100.
#[derive(Debug, Clone)]
pub struct NetworkPrinter {
    host: String,
    port: u16,
    connect_timeout: Duration,
    write_timeout: Duration,
}

impl NetworkPrinter {
    /// Create a new network printer
    ///
    /// `host` may be an IP address or a name; names are resolved on connect.
    pub fn new(host: &str, port: u16) -> PrintResult<Self> {
        let host = host.trim();
        if host.is_empty() {
            return Err(PrintError::InvalidConfig("Empty printer host".to_string()));
        }
        if port == 0 {
            return Err(PrintError::InvalidConfig("Printer port must be non-zero".to_string()));
        }

        Ok(Self {
            host: host.to_string(),
            port,
            connect_timeout: CONNECT_TIMEOUT,
            write_timeout: WRITE_TIMEOUT,
        })
    }

    /// Create from an address string (e.g., "192.168.1.100:9100")
    pub fn from_addr(addr: &str) -> PrintResult<Self> {
        let (host, port) = addr
            .rsplit_once(':')
            .ok_or_else(|| PrintError::InvalidConfig(format!("Invalid address: {}", addr)))?;
        let port = port
            .parse()
            .map_err(|_| PrintError::InvalidConfig(format!("Invalid address: {}", addr)))?;
        let host = host.trim_start_matches('[').trim_end_matches(']');

        Self::new(host, port)
    }

    /// Set connection timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the deadline for writing a whole job
    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Get the printer address as `host:port`
    pub fn addr(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl Printer for NetworkPrinter {
    #[instrument(skip(self, data), fields(addr = %self.addr(), data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        let addr = self.addr();
        info!("Connecting to printer");

        // The stream is dropped, and the socket closed, on every return below
        let mut stream = tokio::time::timeout(
            self.connect_timeout,
            TcpStream::connect((self.host.as_str(), self.port)),
        )
        .await
        .map_err(|_| {
            warn!(timeout = ?self.connect_timeout, "Connection timeout");
            PrintError::PrinterUnreachable {
                addr: addr.clone(),
                reason: format!("connection timed out after {:?}", self.connect_timeout),
            }
        })?
        .map_err(|e| {
            warn!(error = %e, "Connection failed");
            PrintError::PrinterUnreachable {
                addr: addr.clone(),
                reason: e.to_string(),
            }
        })?;

        info!("Connected, sending {} bytes", data.len());

        let send = async {
            stream.write_all(data).await?;
            stream.flush().await?;
            stream.shutdown().await
        };

        tokio::time::timeout(self.write_timeout, send)
            .await
            .map_err(|_| {
                warn!(timeout = ?self.write_timeout, "Write deadline exceeded");
                PrintError::PrinterWriteFailed {
                    addr: addr.clone(),
                    reason: format!("write did not complete within {:?}", self.write_timeout),
                }
            })?
            .map_err(|e| {
                warn!(error = %e, "Write failed");
                PrintError::PrinterWriteFailed {
                    addr: addr.clone(),
                    reason: e.to_string(),
                }
            })?;

        info!("Print job sent successfully");
        Ok(())
    }
}
