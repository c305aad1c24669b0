//! Byte-length preserving text transforms used before any pattern pass.
//!
//! [`sanitize`] blanks comments, the contents of string and character
//! literals, and preprocessor lines. Offsets and line numbers in the
//! sanitized text are identical to the original, so matches found on the
//! sanitized text can be mapped straight back.

const BLANK: u8 = b' ';

/// Blank comments, literal contents and preprocessor directives.
///
/// Quote characters are kept so that "initialised with a string literal"
/// remains detectable; newlines are always kept.
pub fn sanitize(source: &str) -> String {
    let bytes = source.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    let mut at_line_start = true;

    while i < bytes.len() {
        let b = bytes[i];
        let next = bytes.get(i + 1).copied();

        if at_line_start && b == b'#' {
            i = blank_until_newline(bytes, i, &mut out);
            continue;
        }

        match (b, next) {
            (b'/', Some(b'/')) => {
                i = blank_until_newline(bytes, i, &mut out);
                continue;
            }
            (b'/', Some(b'*')) => {
                i = blank_block_comment(bytes, i, &mut out);
                at_line_start = false;
                continue;
            }
            _ => {}
        }

        if let Some(prefix_len) = string_prefix_len(bytes, i) {
            i = copy_string_literal(bytes, i, prefix_len, &mut out);
            at_line_start = false;
            continue;
        }

        if b == b'\'' {
            if let Some(end) = char_literal_end(bytes, i) {
                out.push(b'\'');
                blank_range(bytes, i + 1, end, &mut out);
                out.push(b'\'');
                i = end + 1;
                at_line_start = false;
                continue;
            }
        }

        out.push(b);
        if b == b'\n' {
            at_line_start = true;
        } else if !b.is_ascii_whitespace() {
            at_line_start = false;
        }
        i += 1;
    }

    String::from_utf8(out).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

/// Blank everything nested inside braces, keeping the braces themselves.
///
/// Applied to a type body, the result shows only member declarations at the
/// body's top level: method bodies, accessor blocks, initialiser blocks and
/// nested types' members disappear.
pub fn mask_nested_blocks(text: &str) -> String {
    let mut depth = 0usize;
    let masked: Vec<u8> = text
        .bytes()
        .map(|b| match b {
            b'{' => {
                depth += 1;
                if depth == 1 {
                    b
                } else {
                    BLANK
                }
            }
            b'}' => {
                let out = if depth <= 1 { b } else { BLANK };
                depth = depth.saturating_sub(1);
                out
            }
            b'\n' => b,
            _ if depth >= 1 => BLANK,
            _ => b,
        })
        .collect();
    String::from_utf8(masked)
        .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

/// Outcome of scanning a brace-delimited block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockScan {
    /// Offset of the matching `}` when one was found within the bound
    pub close: Option<usize>,
    /// Exclusive end of the text that belongs to the block
    pub end: usize,
    /// The nesting bound was exceeded or the text ended first
    pub truncated: bool,
}

/// Find the block that opens at `open` (which must be a `{`).
///
/// Nesting deeper than `max_depth` stops the scan; the block is then the text
/// read so far and is marked truncated.
pub fn scan_block(text: &str, open: usize, max_depth: usize) -> BlockScan {
    let bytes = text.as_bytes();
    debug_assert_eq!(bytes.get(open), Some(&b'{'));
    let mut depth = 0usize;

    for (offset, &b) in bytes.iter().enumerate().skip(open) {
        match b {
            b'{' => {
                depth += 1;
                if depth > max_depth {
                    return BlockScan {
                        close: None,
                        end: offset,
                        truncated: true,
                    };
                }
            }
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return BlockScan {
                        close: Some(offset),
                        end: offset + 1,
                        truncated: false,
                    };
                }
            }
            _ => {}
        }
    }

    BlockScan {
        close: None,
        end: bytes.len(),
        truncated: true,
    }
}

/// Net brace balance of sanitized text and the offset of the first closing
/// brace without an opener, if any.
pub fn brace_balance(text: &str) -> (isize, Option<usize>) {
    let mut balance = 0isize;
    let mut first_underflow = None;
    for (offset, b) in text.bytes().enumerate() {
        match b {
            b'{' => balance += 1,
            b'}' => {
                balance -= 1;
                if balance < 0 && first_underflow.is_none() {
                    first_underflow = Some(offset);
                }
            }
            _ => {}
        }
    }
    (balance, first_underflow)
}

fn blank_range(bytes: &[u8], start: usize, end: usize, out: &mut Vec<u8>) {
    out.extend(
        bytes[start..end]
            .iter()
            .map(|&b| if b == b'\n' { b'\n' } else { BLANK }),
    );
}

fn blank_until_newline(bytes: &[u8], start: usize, out: &mut Vec<u8>) -> usize {
    let end = bytes[start..]
        .iter()
        .position(|&b| b == b'\n')
        .map(|p| start + p)
        .unwrap_or(bytes.len());
    blank_range(bytes, start, end, out);
    end
}

fn blank_block_comment(bytes: &[u8], start: usize, out: &mut Vec<u8>) -> usize {
    let end = bytes[start + 2..]
        .windows(2)
        .position(|w| w == b"*/")
        .map(|p| start + 2 + p + 2)
        .unwrap_or(bytes.len());
    blank_range(bytes, start, end, out);
    end
}

/// Length of a string-literal prefix (`"`, `@"`, `$"`, `$@"`, `@$"`, `$$"`)
/// starting at `i`, counted up to but excluding the first quote.
fn string_prefix_len(bytes: &[u8], i: usize) -> Option<usize> {
    let mut len = 0;
    while len < 3 && matches!(bytes.get(i + len), Some(b'@') | Some(b'$')) {
        len += 1;
    }
    if bytes.get(i + len) != Some(&b'"') {
        return None;
    }
    // `@` directly after an identifier character is not a literal prefix
    if len > 0 && i > 0 && is_ident_byte(bytes[i - 1]) {
        return None;
    }
    Some(len)
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn copy_string_literal(bytes: &[u8], start: usize, prefix_len: usize, out: &mut Vec<u8>) -> usize {
    let prefix = &bytes[start..start + prefix_len];
    let verbatim = prefix.contains(&b'@');
    let interpolated = prefix.contains(&b'$');
    let quote_start = start + prefix_len;
    let quotes = bytes[quote_start..].iter().take_while(|&&b| b == b'"').count();

    out.extend_from_slice(&bytes[start..quote_start]);

    if quotes >= 3 {
        return copy_raw_string(bytes, quote_start, quotes, out);
    }
    if quotes == 2 {
        out.extend_from_slice(b"\"\"");
        return quote_start + 2;
    }

    out.push(b'"');
    let content_start = quote_start + 1;
    let mut i = content_start;
    while i < bytes.len() {
        match bytes[i] {
            b'"' if verbatim && bytes.get(i + 1) == Some(&b'"') => i += 2,
            b'"' => {
                blank_range(bytes, content_start, i, out);
                out.push(b'"');
                return i + 1;
            }
            b'\\' if !verbatim => i += 2,
            b'\n' if !verbatim => {
                blank_range(bytes, content_start, i, out);
                return i;
            }
            b'{' if interpolated => {
                if bytes.get(i + 1) == Some(&b'{') {
                    i += 2;
                } else {
                    i = skip_interpolation_hole(bytes, i);
                }
            }
            _ => i += 1,
        }
    }
    let end = bytes.len();
    blank_range(bytes, content_start, end, out);
    end
}

/// Skip an interpolation hole `{ ... }`, including nested string literals.
fn skip_interpolation_hole(bytes: &[u8], open: usize) -> usize {
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return i + 1;
                }
            }
            b'"' => {
                i += 1;
                while i < bytes.len() && bytes[i] != b'"' && bytes[i] != b'\n' {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
            }
            b'\n' => return i,
            _ => {}
        }
        i += 1;
    }
    bytes.len()
}

fn copy_raw_string(bytes: &[u8], quote_start: usize, quotes: usize, out: &mut Vec<u8>) -> usize {
    out.extend(std::iter::repeat_n(b'"', quotes));
    let content_start = quote_start + quotes;
    let mut i = content_start;
    while i < bytes.len() {
        if bytes[i] == b'"' {
            let run = bytes[i..].iter().take_while(|&&b| b == b'"').count();
            if run >= quotes {
                blank_range(bytes, content_start, i, out);
                out.extend(std::iter::repeat_n(b'"', run));
                return i + run;
            }
            i += run;
        } else {
            i += 1;
        }
    }
    blank_range(bytes, content_start, bytes.len(), out);
    bytes.len()
}

/// Offset of the closing quote of a character literal opening at `start`.
fn char_literal_end(bytes: &[u8], start: usize) -> Option<usize> {
    let first = *bytes.get(start + 1)?;
    if first == b'\n' {
        return None;
    }
    if first == b'\\' {
        // escapes: '\n', '\'', '\u0041', '\x41'
        let after_escape = start + 3;
        return bytes
            .get(after_escape..)?
            .iter()
            .take(8)
            .position(|&b| b == b'\'' || b == b'\n')
            .map(|p| after_escape + p)
            .filter(|&end| bytes[end] == b'\'');
    }
    // one character, possibly multi-byte
    bytes[start + 1..]
        .iter()
        .take(5)
        .position(|&b| b == b'\'')
        .map(|p| start + 1 + p)
        .filter(|&end| end > start + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sanitize_preserves_length_and_lines() {
        let source = "int a = 1; // comment { }\n/* block\n { */ string s = \"{ if }\";\n";
        let clean = sanitize(source);
        assert_eq!(clean.len(), source.len());
        assert_eq!(clean.lines().count(), source.lines().count());
        assert!(!clean.contains("comment"));
        assert!(!clean.contains("if"));
        assert_eq!(clean.matches('{').count(), 0);
        assert!(clean.contains("string s = \""));
    }

    #[test]
    fn test_sanitize_verbatim_and_escapes() {
        let source = r#"var a = @"C:\path ""quoted"" {"; var b = "esc \" {"; char c = '{'; char d = '\'';"#;
        let clean = sanitize(source);
        assert_eq!(clean.len(), source.len());
        assert_eq!(clean.matches('{').count(), 0);
        assert!(clean.contains("var b ="));
        assert!(clean.contains("char d ="));
    }

    #[test]
    fn test_sanitize_interpolated_with_nested_string() {
        let source = r#"var s = $"{(ok ? "yes" : "no")} {{x}}"; if (ok) { }"#;
        let clean = sanitize(source);
        assert_eq!(clean.len(), source.len());
        assert!(clean.ends_with("if (ok) { }"));
        assert!(!clean.contains("yes"));
    }

    #[test]
    fn test_sanitize_raw_string() {
        let source = "var json = \"\"\"\n{ \"a\": 1 }\n\"\"\"; int x;";
        let clean = sanitize(source);
        assert_eq!(clean.matches('{').count(), 0);
        assert!(clean.ends_with("; int x;"));
    }

    #[test]
    fn test_sanitize_preprocessor_lines() {
        let source = "#if UNITY_EDITOR\nusing UnityEditor;\n#endif\n";
        let clean = sanitize(source);
        assert_eq!(clean, "                \nusing UnityEditor;\n      \n");
    }

    #[test]
    fn test_verbatim_identifier_is_not_a_string() {
        let source = "var @class = x; string s = \"a\";";
        let clean = sanitize(source);
        assert!(clean.starts_with("var @class = x;"));
    }

    #[test]
    fn test_mask_nested_blocks() {
        let body = "int a;\nvoid F() { int b; if (x) { y(); } }\nint c;";
        let masked = mask_nested_blocks(body);
        assert_eq!(masked.len(), body.len());
        assert!(masked.contains("int a;"));
        assert!(masked.contains("int c;"));
        assert!(!masked.contains("int b;"));
        assert!(masked.contains("void F() {"));
    }

    #[test]
    fn test_scan_block_matches_braces() {
        let text = "{ a { b } c } tail";
        let scan = scan_block(text, 0, 8);
        assert_eq!(scan.close, Some(12));
        assert_eq!(scan.end, 13);
        assert!(!scan.truncated);
    }

    #[test]
    fn test_scan_block_depth_bound() {
        let text = "{ { { { } } } }";
        let scan = scan_block(text, 0, 2);
        assert!(scan.truncated);
        assert_eq!(scan.close, None);
        assert_eq!(scan.end, 4);
    }

    #[test]
    fn test_scan_block_unclosed() {
        let scan = scan_block("{ { }", 0, 8);
        assert!(scan.truncated);
        assert_eq!(scan.end, 5);
    }

    #[test]
    fn test_brace_balance() {
        assert_eq!(brace_balance("{ { } }"), (0, None));
        assert_eq!(brace_balance("{ } }"), (-1, Some(4)));
        assert_eq!(brace_balance("{ {"), (2, None));
    }
}
