//! Percent-decoding of URL path segments.

/// Percent-decodes `input` and interprets the bytes as UTF-8.
///
/// A `%` not followed by two hex digits is kept literally. `+` is a literal
/// plus: these are path segments, not form data, so S3 keys such as
/// `a+b.txt` survive. Decoded bytes that are not valid UTF-8 are an error.
pub(super) fn percent_decode(input: &str) -> Result<String, std::string::FromUtf8Error> {
    let mut out = Vec::with_capacity(input.len());
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'%' && i + 2 < bytes.len() {
            if let (Some(high), Some(low)) = (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                out.push(high << 4 | low);
                i += 3;
                continue;
            }
        }
        out.push(b);
        i += 1;
    }
    String::from_utf8(out)
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
