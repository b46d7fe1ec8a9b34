// ---------------------------------------------------------------------------
// Tokenizer: double-quoted regions and escaped quotes.
// ---------------------------------------------------------------------------

/// Split a command line into tokens.
///
/// - Runs of whitespace outside a quoted region separate tokens.
/// - An unescaped `"` opens or closes a quoted region. The quotes themselves
///   are dropped; whitespace inside the region is kept.
/// - `\"` is a literal quote character and never opens or closes a region.
///   Any other backslash is kept as-is.
/// - An unterminated region runs to the end of the line.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    // Distinguishes `""` (an empty token) from no token at all.
    let mut started = false;
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' if chars.peek() == Some(&'"') => {
                chars.next();
                current.push('"');
                started = true;
            },
            '"' => {
                in_quotes = !in_quotes;
                started = true;
            },
            c if c.is_whitespace() && !in_quotes => {
                if started {
                    tokens.push(std::mem::take(&mut current));
                    started = false;
                }
            },
            c => {
                current.push(c);
                started = true;
            },
        }
    }

    if started {
        tokens.push(current);
    }
    tokens
}
