//! Small string helpers shared by the stages

/// Title-case a string: the first letter of every run of letters is
/// upper-cased, the rest lower-cased. Any non-letter (space, digit, hyphen,
/// apostrophe) starts a new run.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

/// Lower-case and collapse whitespace runs into single spaces
pub fn normalize_whitespace_lower(s: &str) -> String {
    collapse_whitespace(&s.to_lowercase())
}

/// Collapse whitespace runs into single spaces and trim the ends
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The first `max_chars` characters of `s`
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("API gateway"), "Api Gateway");
        assert_eq!(title_case("user-service"), "User-Service");
        assert_eq!(title_case("s3 bucket"), "S3 Bucket");
        assert_eq!(title_case("3d renderer"), "3D Renderer");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b  "), "a b");
        assert_eq!(normalize_whitespace_lower("The  API\nGateway"), "the api gateway");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("ab", 3), "ab");
        assert_eq!(truncate_chars("→→→", 2), "→→");
    }
}
