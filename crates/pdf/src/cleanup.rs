/// Clean up text decoded from a single show-text operator.
///
/// Expands typographic ligatures, drops Unicode replacement characters and
/// control characters, and turns tabs into spaces. Composition is left to the
/// outline normalizer.
pub fn clean_span_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '\u{FB00}' => result.push_str("ff"),
            '\u{FB01}' => result.push_str("fi"),
            '\u{FB02}' => result.push_str("fl"),
            '\u{FB03}' => result.push_str("ffi"),
            '\u{FB04}' => result.push_str("ffl"),
            '\u{FFFD}' => {}
            '\t' => result.push(' '),
            c if c.is_control() => {}
            c => result.push(c),
        }
    }

    result
}
