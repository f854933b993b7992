//! Binary content detection.

/// Text files typically have more than 70% printable ASCII.
const MIN_PRINTABLE_RATIO: f64 = 0.70;

/// Decide whether a leading content sample looks like binary data.
///
/// 1. Empty samples are text.
/// 2. A NUL byte is a strong binary indicator.
/// 3. Valid UTF-8 (allowing a multi-byte character cut off by the sample
///    boundary) is text.
/// 4. Otherwise fall back to the ratio of printable ASCII bytes.
pub fn looks_binary(sample: &[u8]) -> bool {
    if sample.is_empty() {
        return false;
    }

    if sample.contains(&0) {
        return true;
    }

    match std::str::from_utf8(sample) {
        Ok(_) => return false,
        // error_len() == None: the sample ends inside a valid sequence
        Err(e) if e.error_len().is_none() => return false,
        Err(_) => {}
    }

    let printable_count = sample
        .iter()
        .filter(|&&b| {
            (32..=126).contains(&b) || b == 9 || b == 10 || b == 13 // printable + tab, LF, CR
        })
        .count();

    (printable_count as f64 / sample.len() as f64) < MIN_PRINTABLE_RATIO
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_samples() {
        assert!(!looks_binary(b""));
        assert!(!looks_binary(b"this is a plain text file."));
        assert!(!looks_binary(b"#!/bin/bash\necho 'hello'"));
        assert!(!looks_binary("漢字のテキスト".as_bytes()));
    }

    #[test]
    fn test_truncated_utf8_is_text() {
        let text = "abc漢".as_bytes();
        assert!(!looks_binary(&text[..text.len() - 1]));
    }

    #[test]
    fn test_binary_samples() {
        assert!(looks_binary(&[0x00, 0x01, 0x02]));
        assert!(looks_binary(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46]));
        assert!(looks_binary(&[0xC3, 0x28, 0xA0, 0xA1, 0xE2, 0x82, 0xFF, 0xFE]));
    }

    #[test]
    fn test_latin1_text_is_mostly_printable() {
        // "café au lait" in ISO-8859-1
        let sample = b"caf\xe9 au lait, cr\xe8me br\xfbl\xe9e";
        assert!(!looks_binary(sample));
    }
}
