//! Minecraft Java Edition status client

use async_trait::async_trait;
use idlewatch_host_api::{QueryError, QueryResult, ServerQuery, ServerStatus};
use idlewatch_util::ServerAddress;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::debug;

use crate::slp::{self, STATUS_PACKET_ID};

/// Queries servers with the Server List Ping protocol.
///
/// The whole exchange (connect, request, response) is bounded by `timeout`.
pub struct JavaStatusQuery {
    timeout: Duration,
    protocol_version: i32,
}

impl JavaStatusQuery {
    pub fn new(timeout: Duration, protocol_version: i32) -> Self {
        Self {
            timeout,
            protocol_version,
        }
    }

    async fn exchange(&self, address: &ServerAddress) -> QueryResult<ServerStatus> {
        let mut stream = TcpStream::connect((address.host.as_str(), address.port)).await?;

        let mut request = slp::handshake_packet(self.protocol_version, &address.host, address.port);
        request.extend_from_slice(&slp::status_request_packet());
        stream.write_all(&request).await?;

        let (packet_id, payload) = slp::read_packet(&mut stream).await?;
        if packet_id != STATUS_PACKET_ID {
            return Err(QueryError::Protocol(format!(
                "expected status response, got packet 0x{:02x}",
                packet_id
            )));
        }

        let json = slp::status_json(&payload)?;
        debug!(address = %address, len = json.len(), "Status response received");
        slp::parse_status(json)
    }
}

#[async_trait]
impl ServerQuery for JavaStatusQuery {
    async fn query(&self, address: &ServerAddress) -> QueryResult<ServerStatus> {
        tokio::time::timeout(self.timeout, self.exchange(address))
            .await
            .map_err(|_| QueryError::Timeout(self.timeout))?
    }
}
