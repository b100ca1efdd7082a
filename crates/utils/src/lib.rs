use rand::Rng;

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                            abcdefghijklmnopqrstuvwxyz\
                            0123456789";

/// Random alphanumeric string, used for generated signing secrets
pub fn create_random_secret(secret_len: usize) -> String {
    let mut rng = rand::thread_rng();

    (0..secret_len)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Shortens `text` to at most `max_chars` characters, appending `...`
/// when anything was cut off. Counts chars, not bytes, so multibyte
/// text is never split inside a code point.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_creates_random_secret() {
        let len = 30;
        let sec1 = create_random_secret(len);
        let sec2 = create_random_secret(len);
        assert_eq!(sec1.len(), 30);
        assert_eq!(sec2.len(), 30);
        assert_ne!(sec2, sec1);

        let len = 47;
        assert_eq!(len, create_random_secret(len).len())
    }

    #[test]
    fn it_truncates_long_text() {
        assert_eq!(truncate_with_ellipsis("hello", 50), "hello");
        let exact = "a".repeat(50);
        assert_eq!(truncate_with_ellipsis(&exact, 50), exact);
        let long = "b".repeat(51);
        assert_eq!(
            truncate_with_ellipsis(&long, 50),
            format!("{}...", "b".repeat(50))
        );
        assert_eq!(truncate_with_ellipsis("héllo wörld", 4), "héll...");
    }
}
