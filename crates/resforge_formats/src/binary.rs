//! Compiled `.resources` blobs.

use resforge_common::Envelope;

use crate::error::FormatError;
use crate::model::ResourceSet;

/// Envelope for compiled resources.
pub const RESOURCES_ENVELOPE: Envelope = Envelope::new(*b"RFRS", 1);

/// Decodes a compiled resource blob.
pub fn read(bytes: &[u8]) -> Result<ResourceSet, FormatError> {
    Ok(RESOURCES_ENVELOPE.decode(bytes)?)
}

/// Encodes a resource set as a compiled blob.
pub fn write(set: &ResourceSet) -> Result<Vec<u8>, FormatError> {
    Ok(RESOURCES_ENVELOPE.encode(set, env!("CARGO_PKG_VERSION"))?)
}
