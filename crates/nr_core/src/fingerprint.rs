use sha2::{Digest, Sha256};

/// Content fingerprint used as the article primary key.
///
/// `title|body` with whitespace runs collapsed, trimmed and lowercased, hashed
/// with SHA-256 and rendered as lowercase hex. Field order is significant.
pub fn fingerprint(title: &str, body: &str) -> String {
    let joined = format!("{}|{}", title, body);
    let normalized = joined
        .split(is_separator)
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    hex::encode(hasher.finalize())
}

/// ECMAScript `\s`, so keys match records written by JavaScript producers.
/// Unlike `char::is_whitespace` this includes U+FEFF and excludes
/// U+0085.
fn is_separator(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\u{000B}'
            | '\u{000C}'
            | '\r'
            | ' '
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_hex_sha256() {
        let fp = fingerprint("A", "B");
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(fp, fingerprint("A", "B"));
    }

    #[test]
    fn test_fingerprint_ignores_case_and_whitespace_runs() {
        let a = fingerprint("Breaking  News", "The mayor\n\tresigned today.");
        let b = fingerprint("breaking news", "the MAYOR resigned today.");
        let c = fingerprint("  Breaking News", "The mayor resigned today.   ");
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_fingerprint_whitespace_class() {
        assert_eq!(fingerprint("A\u{FEFF}", "\u{00A0}B"), fingerprint("A", "B"));
        assert_eq!(fingerprint("x\u{2003}y", "z"), fingerprint("x y", "z"));
        assert_ne!(fingerprint("A\u{0085}", "B"), fingerprint("A", "B"));
    }

    #[test]
    fn test_fingerprint_field_order_matters() {
        assert_ne!(fingerprint("one", "two"), fingerprint("two", "one"));
    }

    #[test]
    fn test_known_digests() {
        assert_eq!(
            fingerprint("", ""),
            "cbe5cfdf7c2118a9c3d78ef1d684f3afa089201352886449a06a6511cfef74a7"
        );
        assert_eq!(
            fingerprint("A", "B"),
            "0eab8a0a3380abf4c7d1fb0b43b66aafbb64a4b953e4eb2dccca579461912d0c"
        );
    }
}
