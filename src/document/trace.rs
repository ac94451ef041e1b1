//! Content fingerprint used to detect document changes

/// Adler-32 checksum of `data`
pub fn adler32(data: &[u8]) -> u32 {
    adler2::adler32_slice(data)
}

/// Trace of sanitized content: Adler-32 over its UTF-8 bytes.
///
/// Stored as a BIGINT column, hence the widening to `i64`.
pub fn compute_trace(content: Option<&str>) -> Option<i64> {
    content.map(|c| i64::from(adler32(c.as_bytes())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_vectors() {
        assert_eq!(adler32(b""), 1);
        assert_eq!(adler32(b"a"), 0x0062_0062);
        assert_eq!(adler32(b"abc"), 0x024d_0127);
        assert_eq!(adler32(b"Wikipedia"), 0x11e6_0398);
    }

    #[test]
    fn test_long_input() {
        // Longer than one 5552-byte reduction block
        let data = vec![0xffu8; 20_000];
        let mut a: u64 = 1;
        let mut b: u64 = 0;
        for &byte in &data {
            a = (a + byte as u64) % 65_521;
            b = (b + a) % 65_521;
        }
        assert_eq!(adler32(&data) as u64, (b << 16) | a);
    }

    #[test]
    fn test_trace_absent_content() {
        assert_eq!(compute_trace(None), None);
    }

    #[test]
    fn test_trace_is_deterministic_and_utf8_based() {
        let text = "Contenu de test, déjà validé";
        let first = compute_trace(Some(text));
        assert_eq!(first, compute_trace(Some(text)));
        assert_eq!(first, Some(adler32(text.as_bytes()) as i64));
        assert_ne!(first, compute_trace(Some("Contenu de test, deja valide")));
    }
}
