//! Command-line tokenizer.
//!
//! Commas and whitespace both separate tokens. Two commas in a row denote an
//! empty argument, which coerces to null ("leave unchanged"):
//!
//! ```text
//! ALT KL204,FL100        -> ["ALT", "KL204", "FL100"]
//! MOVE KL204,,,FL100     -> ["MOVE", "KL204", "", "", "FL100"]
//! ```

/// Split one command segment into tokens, preserving the original casing.
pub fn split_tokens(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut after_comma = false;

    for c in line.chars() {
        if c == ',' {
            if in_token {
                tokens.push(std::mem::take(&mut current));
                in_token = false;
            } else if after_comma {
                tokens.push(String::new());
            }
            after_comma = true;
        } else if c.is_whitespace() {
            if in_token {
                tokens.push(std::mem::take(&mut current));
                in_token = false;
            }
            after_comma = false;
        } else {
            current.push(c);
            in_token = true;
            after_comma = false;
        }
    }
    if in_token {
        tokens.push(current);
    }
    tokens
}

/// Everything after the first token, with its separator removed.
///
/// Used for commands taking a single free-text argument, so embedded
/// commas, spacing and casing survive.
pub fn remainder(line: &str) -> &str {
    let line = line.trim_start_matches(|c: char| c == ',' || c.is_whitespace());
    let end = line
        .find(|c: char| c == ',' || c.is_whitespace())
        .unwrap_or(line.len());
    let rest = line[end..].trim_start();
    rest.strip_prefix(',').unwrap_or(rest).trim()
}
