//! Minecraft Server List Ping framing
//!
//! Every packet is `VarInt length | VarInt packet id | payload`. A status
//! exchange is Handshake (next state 1), Status Request, then one Status
//! Response carrying a JSON document as a VarInt-prefixed string.

use idlewatch_host_api::{QueryError, QueryResult, ServerStatus};
use serde::Deserialize;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Packet id shared by Handshake, Status Request and Status Response
pub(crate) const STATUS_PACKET_ID: i32 = 0x00;

/// Handshake `next state` selecting the status protocol
const NEXT_STATE_STATUS: i32 = 1;

/// Upper bound on an accepted packet
pub(crate) const MAX_PACKET_LEN: usize = 2 * 1024 * 1024;

/// A VarInt never spans more than five bytes
const MAX_VARINT_BYTES: usize = 5;

pub(crate) fn write_varint(buf: &mut Vec<u8>, value: i32) {
    let mut value = value as u32;
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            return;
        }
        buf.push(byte | 0x80);
    }
}

/// Feed one byte into a VarInt being decoded; returns true once complete
fn accumulate_varint(value: &mut u32, index: usize, byte: u8) -> QueryResult<bool> {
    if index >= MAX_VARINT_BYTES {
        return Err(QueryError::Protocol("VarInt is too long".into()));
    }
    *value |= ((byte & 0x7F) as u32) << (7 * index);
    Ok(byte & 0x80 == 0)
}

/// Decode a VarInt from the front of `buf`, advancing it
pub(crate) fn decode_varint(buf: &mut &[u8]) -> QueryResult<i32> {
    let mut value = 0u32;
    for index in 0.. {
        let (&byte, rest) = buf
            .split_first()
            .ok_or_else(|| QueryError::Protocol("truncated VarInt".into()))?;
        *buf = rest;
        if accumulate_varint(&mut value, index, byte)? {
            break;
        }
    }
    Ok(value as i32)
}

/// Read a VarInt from a stream
pub(crate) async fn read_varint<R: AsyncRead + Unpin>(reader: &mut R) -> QueryResult<i32> {
    let mut value = 0u32;
    for index in 0.. {
        let byte = reader.read_u8().await?;
        if accumulate_varint(&mut value, index, byte)? {
            break;
        }
    }
    Ok(value as i32)
}

fn write_string(buf: &mut Vec<u8>, s: &str) {
    write_varint(buf, s.len() as i32);
    buf.extend_from_slice(s.as_bytes());
}

/// Wrap a packet id and payload in a length-prefixed frame
pub(crate) fn frame(packet_id: i32, payload: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(payload.len() + 1);
    write_varint(&mut body, packet_id);
    body.extend_from_slice(payload);

    let mut packet = Vec::with_capacity(body.len() + MAX_VARINT_BYTES);
    write_varint(&mut packet, body.len() as i32);
    packet.extend_from_slice(&body);
    packet
}

pub(crate) fn handshake_packet(protocol_version: i32, host: &str, port: u16) -> Vec<u8> {
    let mut payload = Vec::new();
    write_varint(&mut payload, protocol_version);
    write_string(&mut payload, host);
    payload.extend_from_slice(&port.to_be_bytes());
    write_varint(&mut payload, NEXT_STATE_STATUS);
    frame(STATUS_PACKET_ID, &payload)
}

pub(crate) fn status_request_packet() -> Vec<u8> {
    frame(STATUS_PACKET_ID, &[])
}

/// Read one packet, returning its id and payload
pub(crate) async fn read_packet<R: AsyncRead + Unpin>(reader: &mut R) -> QueryResult<(i32, Vec<u8>)> {
    let len = read_varint(reader).await?;
    let len = usize::try_from(len)
        .map_err(|_| QueryError::Protocol(format!("negative packet length {}", len)))?;
    if len == 0 || len > MAX_PACKET_LEN {
        return Err(QueryError::Protocol(format!(
            "packet length {} out of range",
            len
        )));
    }

    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).await?;

    let mut cursor = body.as_slice();
    let packet_id = decode_varint(&mut cursor)?;
    Ok((packet_id, cursor.to_vec()))
}

/// Extract the JSON document from a Status Response payload
pub(crate) fn status_json(payload: &[u8]) -> QueryResult<&str> {
    let mut cursor = payload;
    let len = decode_varint(&mut cursor)?;
    let len = usize::try_from(len)
        .map_err(|_| QueryError::Protocol(format!("negative string length {}", len)))?;
    let bytes = cursor
        .get(..len)
        .ok_or_else(|| QueryError::Protocol("truncated status string".into()))?;
    std::str::from_utf8(bytes).map_err(|e| QueryError::Payload(e.to_string()))
}

#[derive(Debug, Deserialize)]
struct StatusDocument {
    players: Option<PlayersDocument>,
    version: Option<VersionDocument>,
}

#[derive(Debug, Deserialize)]
struct PlayersDocument {
    online: u32,
    max: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct VersionDocument {
    name: Option<String>,
}

pub(crate) fn parse_status(json: &str) -> QueryResult<ServerStatus> {
    let doc: StatusDocument =
        serde_json::from_str(json).map_err(|e| QueryError::Payload(e.to_string()))?;
    let players = doc
        .players
        .ok_or_else(|| QueryError::Payload("status has no player count".into()))?;

    Ok(ServerStatus {
        online: players.online,
        max: players.max,
        version: doc.version.and_then(|v| v.name),
    })
}
