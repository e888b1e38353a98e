// src/probes/tcp.rs
use crate::health::{CheckResult, Checker};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};
use tracing::debug;

/// Healthy when a TCP connection to `address` opens within `timeout`. The
/// timeout covers every address the name resolves to, not each one.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    address: String,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(address: impl Into<String>, timeout: Duration) -> Self {
        Self {
            address: address.into(),
            timeout,
        }
    }

    fn connect(&self) -> Result<Duration, String> {
        let addrs = self
            .address
            .to_socket_addrs()
            .map_err(|e| format!("cannot resolve {}: {}", self.address, e))?;

        let start = Instant::now();
        connect_any(&self.address, addrs, start + self.timeout).map(|_| start.elapsed())
    }
}

/// Tries each address in turn; all attempts share one deadline.
fn connect_any(
    address: &str,
    addrs: impl IntoIterator<Item = SocketAddr>,
    deadline: Instant,
) -> Result<(), String> {
    let mut last_error = format!("no addresses for {}", address);
    for addr in addrs {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(format!("timed out connecting to {}", address));
        }

        match TcpStream::connect_timeout(&addr, remaining) {
            Ok(_) => return Ok(()),
            Err(e) => last_error = format!("{}: {}", addr, e),
        }
    }
    Err(last_error)
}

impl Checker for TcpProbe {
    fn check(&self) -> CheckResult {
        match self.connect() {
            Ok(elapsed) => {
                debug!("TCP probe {} connected in {:?}", self.address, elapsed);
                CheckResult::default()
            }
            Err(e) => CheckResult::unhealthy(e),
        }
    }
}
