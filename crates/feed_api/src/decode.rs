use crate::{FailureKind, NetworkError, Photo};

/// Decode a JSON array of photo records.
pub fn decode_photos(bytes: &[u8]) -> Result<Vec<Photo>, NetworkError> {
    serde_json::from_slice(bytes).map_err(|err| {
        NetworkError::new(
            FailureKind::Decode,
            format!("failed to decode photos: {err}"),
        )
    })
}
