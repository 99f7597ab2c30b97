// Byte -> String decoding for text inputs (KML, CSV).
// BOM first, then strict UTF-8, then Windows-1252.

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

/// Decoded text and the name of the encoding that produced it
pub struct DecodedText {
    pub text: String,
    pub encoding: &'static str,
}

pub fn decode_text(bytes: &[u8]) -> DecodedText {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return DecodedText {
            text: text.into_owned(),
            encoding: encoding.name(),
        };
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return DecodedText {
            text: text.to_string(),
            encoding: UTF_8.name(),
        };
    }

    let (text, _, _) = WINDOWS_1252.decode(bytes);
    tracing::debug!("Input is not UTF-8, decoded as windows-1252");
    DecodedText {
        text: text.into_owned(),
        encoding: WINDOWS_1252.name(),
    }
}
