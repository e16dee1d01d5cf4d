//! Utility functions for APDU response handling

use crate::response::error::ResponseError;
use crate::response::status::StatusWord;
use tracing::debug;

/// Split raw APDU response data into its status word and payload
///
/// The last two bytes are the status word; everything before them is payload.
///
/// # Errors
/// Returns [`ResponseError::Incomplete`] if the data is too short to contain a status word.
pub fn extract_status_and_payload(data: &[u8]) -> Result<(StatusWord, &[u8]), ResponseError> {
    let Some((payload, status)) = data.split_last_chunk::<2>() else {
        debug!("Response too short: {} bytes", data.len());
        return Err(ResponseError::Incomplete(data.len()));
    };

    Ok((StatusWord::new(status[0], status[1]), payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_status_and_payload() {
        let data = [0x01, 0x02, 0x03, 0x90, 0x00];
        let (status, payload) = extract_status_and_payload(&data).unwrap();
        assert_eq!(status, StatusWord::new(0x90, 0x00));
        assert_eq!(payload, &[0x01, 0x02, 0x03]);

        let data = [0x6A, 0x82];
        let (status, payload) = extract_status_and_payload(&data).unwrap();
        assert_eq!(status, StatusWord::new(0x6A, 0x82));
        assert!(payload.is_empty());

        assert_eq!(
            extract_status_and_payload(&[0x90]),
            Err(ResponseError::Incomplete(1))
        );
        assert_eq!(
            extract_status_and_payload(&[]),
            Err(ResponseError::Incomplete(0))
        );
    }
}
