use token_reader::{ErrorKind, Reader, TokenKind};

fn decode(literal: &str) -> Vec<u8> {
    let mut text = literal.to_string();
    let mut reader = Reader::from_string(&mut text);
    let (token, lexeme) = reader.next_lexeme().expect("literal should decode");
    assert_eq!(token.kind, TokenKind::String);
    lexeme
}

fn decode_str(literal: &str) -> String {
    String::from_utf8(decode(literal)).expect("decoded literal should be UTF-8")
}

#[cfg(test)]
mod unicode_escape_tests {
    use super::*;

    #[test]
    fn test_four_digit_escapes() {
        assert_eq!(decode_str(r#""\u0041""#), "A");
        assert_eq!(decode_str(r#""\u03B1\u03B2""#), "\u{3B1}\u{3B2}");
        assert_eq!(decode_str(r#""\u4E2D\u6587""#), "\u{4E2D}\u{6587}");
        assert_eq!(
            decode_str(r#""\u0440\u0443\u0441\u0441\u043A\u0438\u0439""#),
            "русский"
        );
    }

    #[test]
    fn test_boundary_values() {
        assert_eq!(decode_str(r#""\u0000""#), "\u{0}");
        assert_eq!(decode_str(r#""\u007F""#), "\u{7F}");
        assert_eq!(decode_str(r#""\u00FF""#), "\u{FF}");
        assert_eq!(decode_str(r#""\uFFFF""#), "\u{FFFF}");
    }

    #[test]
    fn test_escapes_mixed_with_other_escapes() {
        assert_eq!(
            decode_str(r#""Line 1\nUnicode: \u00E9\tTab\r\nLine 2""#),
            "Line 1\nUnicode: \u{E9}\tTab\r\nLine 2"
        );
        assert_eq!(decode_str(r#""Quote: \"Hi\"""#), "Quote: \"Hi\"");
        assert_eq!(decode_str(r#"'Path\\to\\file \u2192'"#), "Path\\to\\file \u{2192}");
    }

    #[test]
    fn test_escape_only_reads_four_digits() {
        assert_eq!(decode_str(r#""\u00411234""#), "A1234");
    }

    #[test]
    fn test_raw_utf8_passes_through() {
        assert_eq!(decode_str("\"\u{1F923}\u{1F92B}\u{1F525}\""), "\u{1F923}\u{1F92B}\u{1F525}");
    }

    #[test]
    fn test_surrogate_pair_decodes_as_two_units() {
        let bytes = decode(r#""\uD83D\uDE00""#);
        assert_eq!(bytes.len(), 6);
        assert_ne!(bytes, "\u{1F600}".as_bytes());
    }

    #[test]
    fn test_invalid_unicode_escapes() {
        for literal in [
            r#""\u""#,
            r#""\u1""#,
            r#""\u12""#,
            r#""\u123""#,
            r#""\uGHIJ""#,
            r#""\u12G3""#,
            r#""\u{41}""#,
            r#""\u004"#,
        ] {
            let mut text = literal.to_string();
            let mut reader = Reader::from_string(&mut text);
            let error = reader.next_lexeme().unwrap_err();
            assert_eq!(error.kind(), ErrorKind::StringLiteral, "{literal}");
            let message = &error.diagnostic().unwrap().message;
            assert_eq!(message, "invalid Unicode escape sequence", "{literal}");
        }
    }
}
