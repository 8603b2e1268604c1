use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::io::prelude::*;

const BUFFER_CAPACITY: usize = 1024 * 20;

/// bincode, then gzip, then base64.
pub fn encode_to_string<T>(data: T) -> Result<String, String>
where
    T: Serialize,
{
    let serialized_data = bincode::serialize(&data).map_err(|e| e.to_string())?;

    Ok(STANDARD.encode(compress(&serialized_data)?))
}

pub fn decode_from_string<T>(data: &str) -> Result<T, String>
where
    for<'de> T: Deserialize<'de>,
{
    let compressed_data = STANDARD.decode(data.trim()).map_err(|e| e.to_string())?;

    bincode::deserialize_from(decompress(&compressed_data)?.as_slice()).map_err(|e| e.to_string())
}

fn compress(data: &[u8]) -> Result<Vec<u8>, String> {
    let mut compressor = GzEncoder::new(Vec::with_capacity(BUFFER_CAPACITY), Compression::default());

    compressor.write_all(data).map_err(|e| e.to_string())?;
    compressor.finish().map_err(|e| e.to_string())
}

fn decompress(data: &[u8]) -> Result<Vec<u8>, String> {
    let mut decompressed_data = Vec::with_capacity(BUFFER_CAPACITY);

    GzDecoder::new(data)
        .read_to_end(&mut decompressed_data)
        .map_err(|e| e.to_string())?;

    Ok(decompressed_data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn encoded_data_decodes() {
        let data: BTreeMap<u32, String> = [(1, "one".to_string()), (7, "seven".to_string())].into_iter().collect();

        let encoded = encode_to_string(&data).unwrap();
        let decoded: BTreeMap<u32, String> = decode_from_string(&encoded).unwrap();

        assert_eq!(decoded, data);
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(decode_from_string::<u32>("not base64!").is_err());
        assert!(decode_from_string::<u32>(&STANDARD.encode(b"not gzip")).is_err());
        assert!(decompress(b"not gzip").is_err());
    }
}
