//! # Session Snapshot Format
//!
//! Binary serialization for sessions.
//!
//! Format: Header (13 bytes) + postcard-serialized payload.
//! - 4 bytes: Magic ("SYNG")
//! - 1 byte: Version
//! - 8 bytes: Payload checksum (little endian)
//!
//! The payload stores labels rather than ids: items in creation order and
//! recipes in edge-table order. Loading replays them through the normal graph
//! operations, so ids are reassigned but every relative order (and therefore
//! every synthesis tie-break) survives the round trip.
//!
//! Size, header and checksum are validated before the payload is decoded.

use crate::condition::Condition;
use crate::primitives::{FORMAT_VERSION, MAGIC_BYTES, MAX_SNAPSHOT_SIZE};
use crate::session::Session;
use crate::{EdgeWeight, SynthError};
use serde::{Deserialize, Serialize};

/// Header length in bytes.
pub const HEADER_LEN: usize = 13;

// =============================================================================
// HEADER
// =============================================================================

/// The snapshot header precedes the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotHeader {
    pub magic: [u8; 4],
    pub version: u8,
    pub checksum: u64,
}

impl SnapshotHeader {
    /// Create a header for a payload.
    #[must_use]
    pub fn for_payload(payload: &[u8]) -> Self {
        Self {
            magic: *MAGIC_BYTES,
            version: FORMAT_VERSION,
            checksum: checksum(payload),
        }
    }

    pub fn validate(&self) -> Result<(), SynthError> {
        if &self.magic != MAGIC_BYTES {
            return Err(SynthError::SerializationError(
                "Invalid magic bytes".to_string(),
            ));
        }
        if self.version != FORMAT_VERSION {
            return Err(SynthError::SerializationError(format!(
                "Unsupported version: {} (expected {})",
                self.version, FORMAT_VERSION
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes[5..].copy_from_slice(&self.checksum.to_le_bytes());
        bytes
    }

    /// Split a header off the front of `bytes`, returning it with the rest.
    pub fn split(bytes: &[u8]) -> Result<(Self, &[u8]), SynthError> {
        let too_short = || SynthError::SerializationError("Header too short".to_string());
        let (magic, rest) = bytes.split_first_chunk::<4>().ok_or_else(too_short)?;
        let (&version, rest) = rest.split_first().ok_or_else(too_short)?;
        let (checksum, payload) = rest.split_first_chunk::<8>().ok_or_else(too_short)?;
        Ok((
            Self {
                magic: *magic,
                version,
                checksum: u64::from_le_bytes(*checksum),
            },
            payload,
        ))
    }
}

/// Order-sensitive rotate-xor checksum over the payload bytes.
///
/// Detects truncation and accidental corruption. It is not a cryptographic
/// hash.
#[must_use]
pub fn checksum(payload: &[u8]) -> u64 {
    payload
        .iter()
        .fold(0u64, |hash, &byte| hash.rotate_left(5) ^ u64::from(byte))
}

// =============================================================================
// PAYLOAD
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SnapshotEdge {
    from: String,
    to: String,
    weight: u64,
    condition: String,
    highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct SnapshotPayload {
    nodes: Vec<String>,
    edges: Vec<SnapshotEdge>,
    inventory: Vec<String>,
}

impl SnapshotPayload {
    fn capture(session: &Session) -> Self {
        let graph = session.graph();
        let edges = graph
            .edges()
            .filter_map(|edge| {
                Some(SnapshotEdge {
                    from: graph.label(edge.from)?.to_string(),
                    to: graph.label(edge.to)?.to_string(),
                    weight: edge.weight.value(),
                    condition: edge.condition.as_str().to_string(),
                    highlighted: session.is_highlighted(edge.id),
                })
            })
            .collect();

        Self {
            nodes: graph.nodes().map(|node| node.label.clone()).collect(),
            edges,
            inventory: session.inventory().iter().map(str::to_string).collect(),
        }
    }

    fn replay(self) -> Result<Session, SynthError> {
        let mut session = Session::new();
        for label in &self.nodes {
            session.graph_mut().add_node(label)?;
        }
        for edge in self.edges {
            let id = session.graph_mut().add_parsed_edge(
                &edge.from,
                &edge.to,
                EdgeWeight::new(edge.weight),
                Condition::parse(&edge.condition),
            )?;
            if edge.highlighted {
                session.highlight(id);
            }
        }
        for name in &self.inventory {
            session.inventory_mut().insert(name)?;
        }
        Ok(session)
    }
}

// =============================================================================
// SERIALIZATION FUNCTIONS
// =============================================================================

/// Serialize a session to bytes (header + payload).
///
/// Fails with `InvalidLabel` when the inventory holds a name that loading
/// would refuse, so a saved snapshot can always be restored.
pub fn session_to_bytes(session: &Session) -> Result<Vec<u8>, SynthError> {
    if let Some(name) = session.inventory().first_invalid() {
        return Err(SynthError::InvalidLabel(name.to_string()));
    }
    let payload = postcard::to_stdvec(&SnapshotPayload::capture(session))
        .map_err(|e| SynthError::SerializationError(e.to_string()))?;
    let header = SnapshotHeader::for_payload(&payload);

    let mut result = Vec::with_capacity(HEADER_LEN.saturating_add(payload.len()));
    result.extend_from_slice(&header.to_bytes());
    result.extend_from_slice(&payload);
    Ok(result)
}

/// Deserialize a session from bytes.
///
/// The last synthesis is not part of a snapshot; its highlight set is.
pub fn session_from_bytes(bytes: &[u8]) -> Result<Session, SynthError> {
    if bytes.len() > MAX_SNAPSHOT_SIZE {
        return Err(SynthError::SerializationError(format!(
            "Data size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_SNAPSHOT_SIZE
        )));
    }

    let (header, payload) = SnapshotHeader::split(bytes)?;
    header.validate()?;

    let computed = checksum(payload);
    if computed != header.checksum {
        return Err(SynthError::SerializationError(format!(
            "Checksum mismatch: expected {}, got {}",
            header.checksum, computed
        )));
    }

    let decoded: SnapshotPayload = postcard::from_bytes(payload).map_err(|e| {
        SynthError::SerializationError(format!("Failed to deserialize snapshot: {e}"))
    })?;
    decoded.replay()
}

// =============================================================================
// TESTS
// =============================================================================
