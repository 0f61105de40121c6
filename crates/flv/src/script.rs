//! Script data interpretation.
//!
//! A script data tag carries a name followed by a value. Only `onMetaData`
//! is of interest here, every other name is skipped.

use erlab_amf0::{Amf0Object, decode};

use crate::error::FlvError;

/// The script data name carrying stream metadata.
pub const ON_META_DATA: &str = "onMetaData";

/// Extracts the `onMetaData` properties from a script data payload.
///
/// Returns an error only when the name itself cannot be decoded. Any other
/// name, or a second value that is missing, malformed or not an object, yields
/// `Ok(None)`.
pub fn on_meta_data(payload: &[u8]) -> Result<Option<Amf0Object>, FlvError> {
    let (name, offset) = decode(payload, 0)?;

    if name.as_str() != Some(ON_META_DATA) {
        tracing::debug!(?name, "ignoring script data");
        return Ok(None);
    }

    match decode(payload, offset) {
        Ok((value, _)) => {
            let object = value.into_object();
            if object.is_none() {
                tracing::warn!("onMetaData value is not an object");
            }
            Ok(object)
        }
        Err(err) => {
            tracing::warn!(%err, "failed to decode onMetaData value");
            Ok(None)
        }
    }
}
