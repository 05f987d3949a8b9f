//! Loopback port allocation for spawned servers.

use std::io;
use std::net::TcpListener;

use tracing::debug;

/// Ask the OS for a free loopback port.
///
/// The listener is dropped before returning, so another process could
/// grab the port before llama-server binds it; the health check catches
/// that case.
pub(crate) fn allocate_port() -> io::Result<u16> {
    let listener = TcpListener::bind(("127.0.0.1", 0))?;
    let port = listener.local_addr()?.port();
    debug!(port, "Allocated loopback port");
    Ok(port)
}
