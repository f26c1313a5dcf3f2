//! Versioned binary envelope for persisted payloads.
//!
//! Both the state file and compiled `.resources` blobs are written as a
//! 4-byte little-endian header length, a bincode-encoded [`EnvelopeHeader`],
//! and the bincode-encoded payload. The header carries magic bytes, a format
//! version and a checksum of the payload so that foreign, stale, or
//! corrupted files are rejected instead of misread.

use std::io;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::hash::ContentHash;

/// Errors produced while decoding an envelope.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    /// The input is shorter than its declared header.
    #[error("truncated data ({len} bytes)")]
    Truncated {
        /// Number of bytes available.
        len: usize,
    },

    /// The magic bytes do not identify the expected kind of file.
    #[error("unrecognised file signature")]
    BadMagic,

    /// The envelope was written by an incompatible format version.
    #[error("format version mismatch: expected {expected}, got {actual}")]
    VersionMismatch {
        /// The version this build understands.
        expected: u32,
        /// The version found in the file.
        actual: u32,
    },

    /// The payload does not match the checksum stored in the header.
    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// Checksum recorded in the header.
        expected: String,
        /// Checksum of the payload actually read.
        actual: String,
    },

    /// Header or payload could not be (de)serialised.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the failure.
        reason: String,
    },
}

/// Header prepended to every envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvelopeHeader {
    /// Magic bytes identifying the file kind.
    pub magic: [u8; 4],
    /// Envelope format version.
    pub format_version: u32,
    /// Version of the tool that produced the file.
    pub tool_version: String,
    /// Content hash of the payload bytes.
    pub checksum: ContentHash,
}

/// Encoder/decoder for one kind of enveloped file.
#[derive(Debug, Clone, Copy)]
pub struct Envelope {
    magic: [u8; 4],
    format_version: u32,
}

impl Envelope {
    /// Creates an envelope codec for the given magic bytes and version.
    pub const fn new(magic: [u8; 4], format_version: u32) -> Self {
        Self {
            magic,
            format_version,
        }
    }

    /// Serialises `payload` into an enveloped byte vector.
    pub fn encode<T: Serialize>(&self, payload: &T, tool_version: &str) -> Result<Vec<u8>, EnvelopeError> {
        let body = bincode::serde::encode_to_vec(payload, bincode::config::standard())
            .map_err(|e| EnvelopeError::Serialization {
                reason: e.to_string(),
            })?;

        let header = EnvelopeHeader {
            magic: self.magic,
            format_version: self.format_version,
            tool_version: tool_version.to_string(),
            checksum: ContentHash::from_bytes(&body),
        };
        let header_bytes = bincode::serde::encode_to_vec(&header, bincode::config::standard())
            .map_err(|e| EnvelopeError::Serialization {
                reason: e.to_string(),
            })?;

        let header_len = header_bytes.len() as u32;
        let mut output = Vec::with_capacity(4 + header_bytes.len() + body.len());
        output.extend_from_slice(&header_len.to_le_bytes());
        output.extend_from_slice(&header_bytes);
        output.extend_from_slice(&body);
        Ok(output)
    }

    /// Validates and decodes an enveloped byte slice.
    pub fn decode<T: DeserializeOwned>(&self, raw: &[u8]) -> Result<T, EnvelopeError> {
        if raw.len() < 4 {
            return Err(EnvelopeError::Truncated { len: raw.len() });
        }
        let mut len_bytes = [0u8; 4];
        len_bytes.copy_from_slice(&raw[..4]);
        let header_len = u32::from_le_bytes(len_bytes) as usize;
        if raw.len() < 4 + header_len {
            return Err(EnvelopeError::Truncated { len: raw.len() });
        }

        let header: EnvelopeHeader =
            bincode::serde::decode_from_slice(&raw[4..4 + header_len], bincode::config::standard())
                .map_err(|_| EnvelopeError::BadMagic)?
                .0;

        if header.magic != self.magic {
            return Err(EnvelopeError::BadMagic);
        }
        if header.format_version != self.format_version {
            return Err(EnvelopeError::VersionMismatch {
                expected: self.format_version,
                actual: header.format_version,
            });
        }

        let body = &raw[4 + header_len..];
        let actual = ContentHash::from_bytes(body);
        if actual != header.checksum {
            return Err(EnvelopeError::ChecksumMismatch {
                expected: header.checksum.to_string(),
                actual: actual.to_string(),
            });
        }

        bincode::serde::decode_from_slice(body, bincode::config::standard())
            .map(|(value, _)| value)
            .map_err(|e| EnvelopeError::Serialization {
                reason: e.to_string(),
            })
    }
}

/// Writes `bytes` to `path` through a sibling temporary file and a rename,
/// so readers never observe a partially written file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = Path::new(&tmp_name);
    std::fs::write(tmp, bytes)?;
    std::fs::rename(tmp, path).inspect_err(|_| {
        let _ = std::fs::remove_file(tmp);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST: Envelope = Envelope::new(*b"TEST", 1);

    #[test]
    fn encode_decode_roundtrip() {
        let payload = vec!["alpha".to_string(), "beta".to_string()];
        let bytes = TEST.encode(&payload, "0.1.0").unwrap();
        let back: Vec<String> = TEST.decode(&bytes).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn short_input_is_truncated() {
        let err = TEST.decode::<Vec<String>>(&[1, 2]).unwrap_err();
        assert!(matches!(err, EnvelopeError::Truncated { len: 2 }));
    }

    #[test]
    fn wrong_magic_rejected() {
        let other = Envelope::new(*b"OTHR", 1);
        let bytes = other.encode(&1u32, "0.1.0").unwrap();
        assert!(matches!(TEST.decode::<u32>(&bytes), Err(EnvelopeError::BadMagic)));
    }

    #[test]
    fn version_mismatch_rejected() {
        let newer = Envelope::new(*b"TEST", 2);
        let bytes = newer.encode(&1u32, "0.1.0").unwrap();
        let err = TEST.decode::<u32>(&bytes).unwrap_err();
        assert!(matches!(
            err,
            EnvelopeError::VersionMismatch {
                expected: 1,
                actual: 2
            }
        ));
    }

    #[test]
    fn corrupted_payload_fails_checksum() {
        let mut bytes = TEST.encode(&"payload".to_string(), "0.1.0").unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        let err = TEST.decode::<String>(&bytes).unwrap_err();
        assert!(matches!(err, EnvelopeError::ChecksumMismatch { .. }));
    }

    #[test]
    fn plain_text_is_not_an_envelope() {
        let err = TEST.decode::<String>(b"<root>not binary</root>").unwrap_err();
        assert!(!matches!(err, EnvelopeError::ChecksumMismatch { .. }));
    }

    #[test]
    fn atomic_write_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        std::fs::write(&path, b"old").unwrap();
        write_atomic(&path, b"new").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
        assert!(!dir.path().join("out.bin.tmp").exists());
    }
}
