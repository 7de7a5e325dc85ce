//! Text decoding with a universal-encoding fallback.
//!
//! Congestion exports are usually published in a legacy Korean code page (CP949). Decoding is
//! strict: malformed byte sequences fail the attempt instead of being replaced, so a wrong
//! encoding is detected and the UTF-8 fallback gets a chance.

use std::borrow::Cow;

use encoding_rs::{EUC_KR, Encoding, UTF_8};

use crate::error::{LoadError, LoadResult};

/// Encoding label used when none is configured.
pub const DEFAULT_ENCODING: &str = "cp949";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Text produced by [`decode_with_fallback`].
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<'a> {
    pub text: Cow<'a, str>,
    /// Encoding that successfully decoded the input.
    pub encoding: &'static Encoding,
    /// `true` when the primary encoding failed and UTF-8 was used instead.
    pub used_fallback: bool,
}

/// Resolve an encoding label.
///
/// Accepts WHATWG labels (`euc-kr`, `utf-8`, `windows-949`, ...) plus the Windows code page
/// aliases `cp949`/`ms949`, which map to the CP949-compatible `EUC-KR` decoder.
pub fn encoding_for_label(label: &str) -> LoadResult<&'static Encoding> {
    let trimmed = label.trim();
    if let Some(enc) = Encoding::for_label(trimmed.as_bytes()) {
        return Ok(enc);
    }
    match trimmed.to_ascii_lowercase().as_str() {
        "cp949" | "ms949" | "uhc" => Ok(EUC_KR),
        _ => Err(LoadError::UnknownEncoding {
            label: label.to_string(),
        }),
    }
}

/// Decode `bytes` with `primary`, retrying with UTF-8 on failure.
///
/// Returns [`LoadError::Decode`] naming every attempted encoding when both attempts fail.
pub fn decode_with_fallback<'a>(bytes: &'a [u8], primary: &'static Encoding) -> LoadResult<Decoded<'a>> {
    if let Some(text) = decode_strict(bytes, primary) {
        return Ok(Decoded {
            text,
            encoding: primary,
            used_fallback: false,
        });
    }

    let mut attempted = vec![primary.name().to_string()];
    if primary != UTF_8 {
        tracing::debug!(primary = primary.name(), "decode failed, retrying as UTF-8");
        if let Some(text) = decode_strict(bytes, UTF_8) {
            return Ok(Decoded {
                text,
                encoding: UTF_8,
                used_fallback: true,
            });
        }
        attempted.push(UTF_8.name().to_string());
    }

    Err(LoadError::Decode { attempted })
}

fn decode_strict<'a>(bytes: &'a [u8], encoding: &'static Encoding) -> Option<Cow<'a, str>> {
    let bytes = if encoding == UTF_8 {
        bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
    } else {
        bytes
    };
    encoding.decode_without_bom_handling_and_without_replacement(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::ISO_2022_JP;

    #[test]
    fn resolves_code_page_aliases() {
        assert_eq!(encoding_for_label("cp949").unwrap(), EUC_KR);
        assert_eq!(encoding_for_label(" CP949 ").unwrap(), EUC_KR);
        assert_eq!(encoding_for_label("euc-kr").unwrap(), EUC_KR);
        assert_eq!(encoding_for_label("utf-8").unwrap(), UTF_8);
    }

    #[test]
    fn rejects_unknown_label() {
        let err = encoding_for_label("klingon").unwrap_err();
        assert!(err.to_string().contains("unknown encoding label 'klingon'"));
    }

    #[test]
    fn decodes_cp949_bytes_with_primary() {
        let (bytes, _, had_errors) = EUC_KR.encode("평일,2호선,시청");
        assert!(!had_errors);

        let decoded = decode_with_fallback(&bytes, EUC_KR).unwrap();
        assert_eq!(decoded.text, "평일,2호선,시청");
        assert_eq!(decoded.encoding, EUC_KR);
        assert!(!decoded.used_fallback);
    }

    #[test]
    fn falls_back_to_utf8_when_primary_rejects_bytes() {
        // ISO-2022-JP rejects every byte >= 0x80, so UTF-8 Hangul cannot decode with it.
        let decoded = decode_with_fallback("평일,시청".as_bytes(), ISO_2022_JP).unwrap();
        assert_eq!(decoded.text, "평일,시청");
        assert_eq!(decoded.encoding, UTF_8);
        assert!(decoded.used_fallback);
    }

    #[test]
    fn utf8_fallback_strips_bom() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice("역명".as_bytes());
        let decoded = decode_with_fallback(&bytes, ISO_2022_JP).unwrap();
        assert_eq!(decoded.text, "역명");
    }

    #[test]
    fn names_both_encodings_when_everything_fails() {
        let err = decode_with_fallback(b"\xff\xfe\xff", EUC_KR).unwrap_err();
        match &err {
            LoadError::Decode { attempted } => {
                assert_eq!(attempted, &vec!["EUC-KR".to_string(), "UTF-8".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("EUC-KR, UTF-8"));
    }
}
