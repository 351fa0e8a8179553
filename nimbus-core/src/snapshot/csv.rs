//! CSV field escaping for snapshot rows
//!
//! Standard CSV quoting: a field containing a comma, double quote, CR
//! or LF is wrapped in double quotes with embedded quotes doubled. The
//! JSON value column is always quoted, since JSON text routinely
//! contains both quotes and commas.

/// Append a key field, quoting only when required
pub fn push_key_field(out: &mut String, key: &str) {
    if key.contains([',', '"', '\n', '\r']) {
        push_quoted(out, key);
    } else {
        out.push_str(key);
    }
}

/// Append a value field, always quoted
pub fn push_value_field(out: &mut String, value: &str) {
    push_quoted(out, value);
}

fn push_quoted(out: &mut String, field: &str) {
    out.push('"');
    for c in field.chars() {
        if c == '"' {
            out.push('"');
        }
        out.push(c);
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_field(key: &str) -> String {
        let mut out = String::new();
        push_key_field(&mut out, key);
        out
    }

    #[test]
    fn test_plain_key_unquoted() {
        assert_eq!(key_field("test_42"), "test_42");
    }

    #[test]
    fn test_key_with_comma_quoted() {
        assert_eq!(key_field("a,b"), "\"a,b\"");
    }

    #[test]
    fn test_key_with_quote_doubled() {
        assert_eq!(key_field("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn test_value_always_quoted() {
        let mut out = String::new();
        push_value_field(&mut out, r#"{"id":1}"#);
        assert_eq!(out, r#""{""id"":1}""#);
    }
}
