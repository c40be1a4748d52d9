//! Text encoding detection and conversion
//!
//! Metadata exports are frequently UTF-16 with a byte order mark. Input is
//! detected via BOM or initial byte patterns and converted to UTF-8 before
//! parsing. The same enum selects the serializer's output encoding.

use std::borrow::Cow;

/// Supported document encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Utf8,
    Utf16Le,
    Utf16Be,
}

/// Conversion failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingError {
    pub message: &'static str,
}

impl Encoding {
    /// Detect encoding from a byte order mark or initial bytes.
    pub fn detect(input: &[u8]) -> Self {
        if input.len() < 2 {
            return Encoding::Utf8;
        }
        match (input[0], input[1]) {
            (0xFF, 0xFE) => Encoding::Utf16Le,
            (0xFE, 0xFF) => Encoding::Utf16Be,
            // No BOM: '<' next to a NUL byte is a UTF-16 document
            (0x00, b'<') => Encoding::Utf16Be,
            (b'<', 0x00) => Encoding::Utf16Le,
            _ => Encoding::Utf8,
        }
    }

    /// Label used in the XML declaration.
    pub fn name(&self) -> &'static str {
        match self {
            Encoding::Utf8 => "UTF-8",
            Encoding::Utf16Le | Encoding::Utf16Be => "UTF-16",
        }
    }
}

/// Convert input bytes to UTF-8, stripping any byte order mark.
///
/// UTF-8 input is returned borrowed; UTF-16 input is decoded. The result is
/// validated so downstream code can treat every interned slice as `str`.
pub fn to_utf8(input: &[u8]) -> Result<Cow<'_, [u8]>, EncodingError> {
    match Encoding::detect(input) {
        Encoding::Utf8 => {
            let stripped = if input.starts_with(&[0xEF, 0xBB, 0xBF]) {
                &input[3..]
            } else {
                input
            };
            std::str::from_utf8(stripped).map_err(|_| EncodingError {
                message: "input is not valid UTF-8",
            })?;
            Ok(Cow::Borrowed(stripped))
        }
        Encoding::Utf16Le => decode_utf16(input, u16::from_le_bytes).map(Cow::Owned),
        Encoding::Utf16Be => decode_utf16(input, u16::from_be_bytes).map(Cow::Owned),
    }
}

fn decode_utf16(input: &[u8], read: fn([u8; 2]) -> u16) -> Result<Vec<u8>, EncodingError> {
    if input.len() % 2 != 0 {
        return Err(EncodingError {
            message: "UTF-16 input has an odd byte length",
        });
    }

    let units = input.chunks_exact(2).map(|pair| read([pair[0], pair[1]]));
    let mut out = String::with_capacity(input.len() / 2);
    for ch in char::decode_utf16(units) {
        let ch = ch.map_err(|_| EncodingError {
            message: "UTF-16 input contains an unpaired surrogate",
        })?;
        // Skip the BOM if present as the first code point
        if out.is_empty() && ch == '\u{FEFF}' {
            continue;
        }
        out.push(ch);
    }
    Ok(out.into_bytes())
}

/// Encode serialized text into the requested output encoding. UTF-16 output
/// carries a byte order mark.
pub fn encode(text: &str, encoding: Encoding) -> Vec<u8> {
    match encoding {
        Encoding::Utf8 => text.as_bytes().to_vec(),
        Encoding::Utf16Le => {
            let mut out = vec![0xFF, 0xFE];
            for unit in text.encode_utf16() {
                out.extend_from_slice(&unit.to_le_bytes());
            }
            out
        }
        Encoding::Utf16Be => {
            let mut out = vec![0xFE, 0xFF];
            for unit in text.encode_utf16() {
                out.extend_from_slice(&unit.to_be_bytes());
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_utf8() {
        assert_eq!(Encoding::detect(b"<root/>"), Encoding::Utf8);
        assert_eq!(Encoding::detect(b""), Encoding::Utf8);
    }

    #[test]
    fn test_detect_utf16_bom() {
        assert_eq!(Encoding::detect(&[0xFF, 0xFE, b'<', 0]), Encoding::Utf16Le);
        assert_eq!(Encoding::detect(&[0xFE, 0xFF, 0, b'<']), Encoding::Utf16Be);
    }

    #[test]
    fn test_detect_utf16_no_bom() {
        assert_eq!(Encoding::detect(&[b'<', 0x00]), Encoding::Utf16Le);
        assert_eq!(Encoding::detect(&[0x00, b'<']), Encoding::Utf16Be);
    }

    #[test]
    fn test_utf8_passthrough_strips_bom() {
        let input = [0xEF, 0xBB, 0xBF, b'<', b'a', b'/', b'>'];
        let out = to_utf8(&input).unwrap();
        assert_eq!(out.as_ref(), b"<a/>");
    }

    #[test]
    fn test_utf16_round_trip() {
        let bytes = encode("<r>\u{00E9}</r>", Encoding::Utf16Le);
        let back = to_utf8(&bytes).unwrap();
        assert_eq!(back.as_ref(), "<r>\u{00E9}</r>".as_bytes());

        let bytes = encode("<r/>", Encoding::Utf16Be);
        let back = to_utf8(&bytes).unwrap();
        assert_eq!(back.as_ref(), b"<r/>");
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let err = to_utf8(&[b'<', b'a', 0xC0, b'>']).unwrap_err();
        assert_eq!(err.message, "input is not valid UTF-8");
    }

    #[test]
    fn test_odd_length_utf16_rejected() {
        let err = to_utf8(&[0xFF, 0xFE, b'<']).unwrap_err();
        assert_eq!(err.message, "UTF-16 input has an odd byte length");
    }

    #[test]
    fn test_declaration_names() {
        assert_eq!(Encoding::Utf8.name(), "UTF-8");
        assert_eq!(Encoding::Utf16Le.name(), "UTF-16");
    }
}
