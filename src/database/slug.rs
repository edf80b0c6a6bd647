use deunicode::deunicode;

/// Derive a URL-safe, lowercase key from one or more human-readable parts.
///
/// Parts are joined with a space and transliterated to ASCII. Letters and
/// digits are kept (lowercased), runs of whitespace, `-` and `_` collapse to a
/// single `-`, everything else is dropped. Leading and trailing separators are
/// trimmed.
pub fn slugify(parts: &[&str]) -> String {
    let joined = deunicode(&parts.join(" "));
    let mut slug = String::with_capacity(joined.len());
    let mut pending_separator = false;

    for c in joined.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_separator = true;
        }
    }

    slug
}
