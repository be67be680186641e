//! Shell-safe literal encodings

/// Encode `s` as a single-quoted shell literal
///
/// Each embedded `'` closes the quote, emits an escaped quote and reopens,
/// so the literal decodes back to exactly `s` for any input.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\'' {
            out.push_str("'\\''");
        } else {
            out.push(c);
        }
    }
    out.push('\'');
    out
}

/// Encode `s` as `quote(s)`, escaped again for use inside an open single quote
///
/// Joining several of these with spaces and wrapping the result in one pair of
/// single quotes yields a word list the shell re-parses into the original
/// strings; this is what `compgen -W` expects.
pub fn quote_for_embedding(s: &str) -> String {
    quote(s).replace('\'', "'\\''")
}

/// Build a quoted `compgen -W` word list
pub fn word_list<'a, I>(words: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let joined = words
        .into_iter()
        .map(quote_for_embedding)
        .collect::<Vec<_>>()
        .join(" ");
    format!("'{}'", joined)
}
