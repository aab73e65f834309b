use percent_encoding::percent_decode_str;
use serde_json::{Map, Value};

use crate::errors::IngestError;

/// Decode one form-URL-encoded payload into a submission record.
///
/// The whole payload is unquoted first and split after, matching
/// browser form encoding: an encoded `=` inside a value becomes a
/// literal `=` before the split, so such a token counts as malformed
/// and the whole datagram is rejected.
pub fn parse_form(data: &[u8]) -> Result<Map<String, Value>, IngestError> {
    let text = std::str::from_utf8(data).map_err(|_| IngestError::InvalidEncoding)?;
    let decoded = unquote_plus(text)?;

    let mut record = Map::new();
    for token in decoded.split('&') {
        let parts: Vec<&str> = token.split('=').collect();
        let &[name, value] = parts.as_slice() else {
            return Err(IngestError::MalformedToken(token.to_string()));
        };
        // Duplicate field names: last occurrence wins.
        record.insert(name.to_string(), Value::String(value.to_string()));
    }

    Ok(record)
}

/// `+` to space, then percent-decode.
fn unquote_plus(text: &str) -> Result<String, IngestError> {
    let spaced = text.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|cow| cow.into_owned())
        .map_err(|_| IngestError::InvalidEncoding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_simple_fields() {
        let record = parse_form(b"k1=v1&k2=v2").unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(record["k1"], "v1");
        assert_eq!(record["k2"], "v2");
    }

    #[test]
    fn plus_and_percent_escapes_decode() {
        let record = parse_form(b"name=Alice&msg=Hi+there%21").unwrap();
        assert_eq!(record["name"], "Alice");
        assert_eq!(record["msg"], "Hi there!");
    }

    #[test]
    fn escapes_in_field_names_decode_too() {
        let record = parse_form(b"full%20name=Bob").unwrap();
        assert_eq!(record["full name"], "Bob");
    }

    #[test]
    fn duplicate_name_keeps_last_value() {
        let record = parse_form(b"k=first&k=second").unwrap();
        assert_eq!(record.len(), 1);
        assert_eq!(record["k"], "second");
    }

    #[test]
    fn empty_value_is_fine() {
        let record = parse_form(b"k=").unwrap();
        assert_eq!(record["k"], "");
    }

    #[test]
    fn token_without_separator_is_malformed() {
        let err = parse_form(b"not-a-valid-payload").unwrap_err();
        assert!(matches!(err, IngestError::MalformedToken(_)));
    }

    #[test]
    fn one_bad_token_rejects_the_whole_payload() {
        let err = parse_form(b"good=yes&bad").unwrap_err();
        assert!(matches!(err, IngestError::MalformedToken(_)));
    }

    #[test]
    fn encoded_separator_in_value_is_malformed() {
        // %3D decodes to '=' before the split, giving a three-part token.
        let err = parse_form(b"k=a%3Db").unwrap_err();
        assert!(matches!(err, IngestError::MalformedToken(_)));
    }

    #[test]
    fn empty_payload_is_malformed() {
        assert!(parse_form(b"").is_err());
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let err = parse_form(&[0xff, 0xfe, b'=', b'x']).unwrap_err();
        assert!(matches!(err, IngestError::InvalidEncoding));
    }

    #[test]
    fn invalid_utf8_behind_percent_escape_is_rejected() {
        let err = parse_form(b"k=%FF").unwrap_err();
        assert!(matches!(err, IngestError::InvalidEncoding));
    }

    #[test]
    fn non_ascii_values_survive() {
        let record = parse_form("msg=Привіт".as_bytes()).unwrap();
        assert_eq!(record["msg"], "Привіт");
    }
}
