use reachmap_core::model::{NetworkError, RawNetwork};

/// turns the downloaded feed into the raw network schema.
pub trait NetworkDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<RawNetwork, NetworkError>;
}

/// decodes the JSON rendition of the network feed.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonNetworkDecoder;

impl NetworkDecoder for JsonNetworkDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<RawNetwork, NetworkError> {
        serde_json::from_slice(bytes).map_err(|e| NetworkError::DecodeError(e.to_string()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_decode_feed() {
        let bytes = br#"{"Cityid": "x", "Stops": [{"Latitude": 1.5, "Longitude": 2.5, "Name": "A"}]}"#;
        let raw = JsonNetworkDecoder.decode(bytes).expect("feed should decode");
        assert_eq!(raw.cityid, "x");
        assert_eq!(raw.stops.len(), 1);
        assert!(raw.lines.is_empty());
    }

    #[test]
    fn test_decode_invalid_bytes() {
        let result = JsonNetworkDecoder.decode(&[0xff, 0x00, 0x12]);
        assert!(matches!(result, Err(NetworkError::DecodeError(_))));
    }
}
