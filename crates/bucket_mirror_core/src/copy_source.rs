use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Bytes left as-is when encoding a key for a copy-source reference:
/// A-Z, a-z, 0-9 and `- _ . ! ~ * ' ( )`. Everything else, `/` included,
/// is percent-encoded.
pub const COPY_SOURCE_KEY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_key(key: &str) -> String {
    utf8_percent_encode(key, COPY_SOURCE_KEY_ENCODE_SET).to_string()
}

/// Builds the `bucket/key` reference a copy request uses to locate the
/// source object. The bucket name is used verbatim.
pub fn copy_source_reference(source_bucket: &str, key: &str) -> String {
    format!("{source_bucket}/{}", encode_key(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_spaces_and_plus() {
        assert_eq!(
            copy_source_reference("source-bucket", "a b+c.txt"),
            "source-bucket/a%20b%2Bc.txt"
        );
    }

    #[test]
    fn encodes_path_separators_inside_key() {
        assert_eq!(encode_key("reports/2026/q1.csv"), "reports%2F2026%2Fq1.csv");
    }

    #[test]
    fn keeps_unreserved_marks() {
        assert_eq!(encode_key("keep-_.!~*'()"), "keep-_.!~*'()");
    }

    #[test]
    fn encodes_reserved_uri_characters() {
        assert_eq!(encode_key("q?a=1&b#c%"), "q%3Fa%3D1%26b%23c%25");
    }

    #[test]
    fn encodes_non_ascii_as_utf8_bytes() {
        assert_eq!(encode_key("café.jpg"), "caf%C3%A9.jpg");
    }
}
