//! Body Extractor
//!
//! Brace-depth counting from a declaration header to its closing brace. String
//! literals and comments are not recognized, so braces inside them count.

/// Braced body of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Body<'a> {
    /// Byte offset of the opening `{`
    pub open: usize,
    /// Byte offset of the matching `}`
    pub close: usize,
    /// Text strictly between the braces
    pub text: &'a str,
}

/// Body starting at the first `{` at or after `from`.
///
/// Returns `None` when a `;` ends the declaration before any `{`, when there is
/// no `{` at all, or when the braces never balance.
pub fn extract_body(source: &str, from: usize) -> Option<Body<'_>> {
    let bytes = source.as_bytes();
    let open = opening_brace(source, from)?;

    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(open) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(Body {
                        open,
                        close: i,
                        text: &source[open + 1..i],
                    });
                }
            }
            _ => {}
        }
    }
    None
}

/// Offset of the first `{` at or after `from`, unless a `;` comes first
pub fn opening_brace(source: &str, from: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    let from = from.min(bytes.len());
    let at = from + bytes[from..].iter().position(|&b| b == b'{' || b == b';')?;
    (bytes[at] == b'{').then_some(at)
}
