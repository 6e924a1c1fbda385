//! Small helpers shared by the loader and the CLI.

use std::borrow::Cow;

/// Decode bytes to a string, handling various encodings.
///
/// This function:
/// 1. First tries UTF-8 (handles BOM automatically via encoding_rs)
/// 2. If malformed, tries the hint encoding label
/// 3. Falls back to Windows-1252 (common for documents saved by older tools)
///
/// Uses `Cow<str>` to avoid allocation when the input is valid UTF-8.
pub fn decode_text<'a>(bytes: &'a [u8], hint_encoding: Option<&str>) -> Cow<'a, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    if let Some(name) = hint_encoding
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8() {
        assert_eq!(decode_text("héllo".as_bytes(), None), "héllo");
    }

    #[test]
    fn test_decode_strips_bom() {
        let bytes = b"\xEF\xBB\xBF{}";
        assert_eq!(decode_text(bytes, None), "{}");
    }

    #[test]
    fn test_decode_falls_back_to_windows_1252() {
        // 0xE9 is 'é' in Windows-1252 and invalid as standalone UTF-8
        let bytes = b"caf\xE9";
        assert_eq!(decode_text(bytes, None), "café");
    }

    #[test]
    fn test_decode_uses_hint() {
        // 0xE9 in ISO-8859-7 is 'ι'
        let bytes = b"\xE9";
        assert_eq!(decode_text(bytes, Some("iso-8859-7")), "ι");
    }
}
