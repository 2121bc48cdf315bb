//! Display formatting for national identity numbers (RUT).

/// Formats a raw identity number as `12.345.678-5`.
///
/// Separators in the input are ignored and a trailing `k` check character is
/// upper-cased. Anything shorter than a body plus check character is returned
/// trimmed.
pub fn format_identity(raw: &str) -> String {
    let cleaned: Vec<char> = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, 'k' | 'K'))
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if cleaned.len() < 2 {
        return raw.trim().to_string();
    }

    let (body, check) = cleaned.split_at(cleaned.len() - 1);
    let mut grouped = String::with_capacity(body.len() + body.len() / 3 + 2);
    for (i, c) in body.iter().enumerate() {
        if i > 0 && (body.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*c);
    }

    format!("{grouped}-{}", check[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_digits() {
        assert_eq!(format_identity("123456785"), "12.345.678-5");
        assert_eq!(format_identity("76543210"), "7.654.321-0");
    }

    #[test]
    fn test_already_formatted() {
        assert_eq!(format_identity("12.345.678-5"), "12.345.678-5");
    }

    #[test]
    fn test_lowercase_k() {
        assert_eq!(format_identity("7654321k"), "7.654.321-K");
        assert_eq!(format_identity(" 1-k "), "1-K");
    }

    #[test]
    fn test_short_input_untouched() {
        assert_eq!(format_identity(" 5 "), "5");
        assert_eq!(format_identity(""), "");
    }
}
