//! Lexical helpers shared by the heuristic scanners.
//!
//! Nothing here understands a grammar. Brackets are balanced by counting and
//! string literals are only recognized well enough to keep separators inside
//! them from splitting argument lists.

use super::language::SourceSyntax;

/// True for bytes that may appear inside an identifier
#[inline]
pub fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b == b'#'
}

/// True when `text` is a plain identifier
pub fn is_identifier(text: &str) -> bool {
    let bytes = text.as_bytes();
    !bytes.is_empty() && !bytes[0].is_ascii_digit() && bytes.iter().all(|b| is_ident_byte(*b))
}

/// First whitespace-separated word of a line
pub fn first_word(line: &str) -> &str {
    line.split(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or("")
}

/// True when a trimmed line is a comment in the given syntax
pub fn is_comment_line(trimmed: &str, syntax: SourceSyntax) -> bool {
    match syntax {
        SourceSyntax::Script => trimmed.starts_with('#'),
        _ => trimmed.starts_with("//") || trimmed.starts_with("/*") || trimmed.starts_with('*'),
    }
}

/// Net `{`/`}` balance of a line, skipping string literals and a trailing
/// line comment
pub fn brace_delta(line: &str) -> i32 {
    let bytes = line.as_bytes();
    let mut depth = 0;
    let mut quote: Option<u8> = None;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 1;
            } else if b == q {
                quote = None;
            }
            i += 1;
            continue;
        }
        match b {
            b'"' | b'\'' | b'`' => quote = Some(b),
            b'/' if bytes.get(i + 1) == Some(&b'/') => break,
            b'{' => depth += 1,
            b'}' => depth -= 1,
            _ => {}
        }
        i += 1;
    }
    depth
}

/// Net `(`/`)` balance of a line, skipping string literals
pub fn paren_delta(line: &str) -> i32 {
    let mut depth = 0;
    let mut quote: Option<u8> = None;
    for b in line.bytes() {
        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
            continue;
        }
        match b {
            b'"' | b'\'' | b'`' => quote = Some(b),
            b'(' => depth += 1,
            b')' => depth -= 1,
            _ => {}
        }
    }
    depth
}

/// Byte index of the bracket closing the one at `open`, skipping string literals.
pub fn find_matching(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let open_byte = *bytes.get(open)?;
    let close_byte = match open_byte {
        b'(' => b')',
        b'[' => b']',
        b'{' => b'}',
        b'<' => b'>',
        _ => return None,
    };

    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    for (i, &b) in bytes.iter().enumerate().skip(open) {
        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
            continue;
        }
        if b == b'"' || b == b'\'' || b == b'`' {
            // `<...>` never holds literals, and `'` is not a quote inside generics
            if open_byte != b'<' {
                quote = Some(b);
            }
        } else if b == open_byte {
            depth += 1;
        } else if b == close_byte {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// Byte index of the bracket opening the one at `close`, scanning backwards.
pub fn find_matching_backward(text: &str, close: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let close_byte = *bytes.get(close)?;
    let open_byte = match close_byte {
        b')' => b'(',
        b']' => b'[',
        b'}' => b'{',
        b'>' => b'<',
        _ => return None,
    };

    let mut depth = 0usize;
    for i in (0..=close).rev() {
        let b = bytes[i];
        if b == close_byte {
            depth += 1;
        } else if b == open_byte {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// Split `text` on `sep` wherever it sits outside brackets and string literals.
///
/// Pieces are trimmed; empty pieces are dropped.
pub fn split_top_level(text: &str, sep: u8) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth = 0i32;
    let mut quote: Option<u8> = None;
    let mut start = 0;
    let bytes = text.as_bytes();

    for (i, &b) in bytes.iter().enumerate() {
        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
            continue;
        }
        match b {
            b'"' | b'\'' | b'`' => quote = Some(b),
            b'(' | b'[' | b'{' | b'<' => depth += 1,
            // `=>` is an arrow, not a closing angle bracket
            b'>' if i > 0 && bytes[i - 1] == b'=' => {}
            b')' | b']' | b'}' | b'>' => depth = (depth - 1).max(0),
            // `=>` never splits on `=`
            _ if b == sep && depth == 0 && !(sep == b'=' && bytes.get(i + 1) == Some(&b'>')) => {
                pieces.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    pieces.push(&text[start..]);

    pieces
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Identifier ending at byte `end` (exclusive), skipping a trailing generic
/// argument list and a `?`/`!` marker. Returns the identifier's start offset.
pub fn identifier_before(text: &str, end: usize) -> Option<(usize, &str)> {
    let bytes = text.as_bytes();
    let mut i = end.min(bytes.len());

    while i > 0 && bytes[i - 1].is_ascii_whitespace() {
        i -= 1;
    }
    if i > 0 && bytes[i - 1] == b'>' {
        i = find_matching_backward(text, i - 1)?;
        while i > 0 && bytes[i - 1].is_ascii_whitespace() {
            i -= 1;
        }
    }
    if i > 0 && (bytes[i - 1] == b'?' || bytes[i - 1] == b'!') {
        i -= 1;
    }

    let stop = i;
    while i > 0 && is_ident_byte(bytes[i - 1]) {
        i -= 1;
    }
    let ident = &text[i..stop];
    is_identifier(ident).then_some((i, ident))
}

/// Type token ending at byte `end`, e.g. `Task<List<User>>` or `string[]?`.
pub fn type_token_before(text: &str, end: usize) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut i = end.min(bytes.len());
    while i > 0 && bytes[i - 1].is_ascii_whitespace() {
        i -= 1;
    }
    let stop = i;

    while i > 0 {
        let b = bytes[i - 1];
        if b == b'>' || b == b']' {
            i = find_matching_backward(text, i - 1)?;
        } else if is_ident_byte(b) || b == b'.' || b == b'?' || b == b'*' {
            i -= 1;
        } else {
            break;
        }
    }

    let token = text[i..stop].trim();
    (!token.is_empty()).then_some(token)
}

/// Leading annotations written on the same line as the code they annotate.
///
/// Returns the annotation texts and the remaining code; the remainder is empty
/// when the whole line is annotations.
pub fn split_leading_annotations(line: &str, syntax: SourceSyntax) -> (Vec<&str>, &str) {
    let mut annotations = Vec::new();
    let mut rest = line.trim();

    loop {
        match syntax {
            SourceSyntax::Attributed if rest.starts_with('[') => {
                let Some(close) = find_matching(rest, 0) else {
                    break;
                };
                annotations.push(&rest[..=close]);
                rest = rest[close + 1..].trim_start();
            }
            SourceSyntax::Decorated | SourceSyntax::Script if rest.starts_with('@') => {
                let bytes = rest.as_bytes();
                let mut end = 1;
                while end < bytes.len() && (is_ident_byte(bytes[end]) || bytes[end] == b'.') {
                    end += 1;
                }
                if end == 1 {
                    break;
                }
                let mut after = end;
                while after < bytes.len() && bytes[after] == b' ' {
                    after += 1;
                }
                if after < bytes.len() && bytes[after] == b'(' {
                    let Some(close) = find_matching(rest, after) else {
                        break;
                    };
                    end = close + 1;
                }
                annotations.push(&rest[..end]);
                rest = rest[end..].trim_start();
            }
            _ => break,
        }
    }

    (annotations, rest)
}

/// True when the whole line consists of annotations
pub fn is_annotation_line(trimmed: &str, syntax: SourceSyntax) -> bool {
    let (annotations, rest) = split_leading_annotations(trimmed, syntax);
    !annotations.is_empty() && rest.is_empty()
}

/// True when the text before `offset` on its line marks it as commented out or
/// inside a string literal.
pub fn is_masked(source: &str, offset: usize, syntax: SourceSyntax) -> bool {
    let line_start = source[..offset].rfind('\n').map_or(0, |i| i + 1);
    let prefix = &source[line_start..offset];
    let trimmed = prefix.trim_start();

    if is_comment_line(trimmed, syntax) || prefix.contains(syntax.line_comment()) {
        return true;
    }
    ['"', '\'', '`']
        .iter()
        .any(|q| prefix.matches(*q).count() % 2 == 1)
}
