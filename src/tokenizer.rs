use std::iter::Peekable;
use std::str::Chars;

/// Flat token stream over one input line.
///
/// Only the control operators are recognised; everything between them,
/// whitespace and redirect symbols included, stays raw text.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenType {
    Text(String),   // Raw text between operators
    LogicalAnd,     // &&
    LogicalOr,      // ||
    Pipe,           // |
}

pub fn tokenize(input: &str) -> Vec<TokenType> {
    let mut tokens = Vec::new();
    let mut text = String::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        let token = match c {
            '|' => tokenize_pipe(&mut chars),
            '&' => match tokenize_ampersand(&mut chars) {
                Some(token) => token,
                None => {
                    text.push('&');
                    continue;
                }
            },
            _ => {
                text.push(c);
                chars.next();
                continue;
            }
        };
        if !text.is_empty() {
            tokens.push(TokenType::Text(std::mem::take(&mut text)));
        }
        tokens.push(token);
    }

    if !text.is_empty() {
        tokens.push(TokenType::Text(text));
    }
    tokens
}

fn tokenize_pipe(chars: &mut Peekable<Chars>) -> TokenType {
    chars.next(); // Consume the "|"
    if chars.peek() == Some(&'|') {
        chars.next();
        TokenType::LogicalOr
    } else {
        TokenType::Pipe
    }
}

// A lone "&" has no meaning here and is left in the text.
fn tokenize_ampersand(chars: &mut Peekable<Chars>) -> Option<TokenType> {
    chars.next(); // Consume the "&"
    if chars.peek() == Some(&'&') {
        chars.next();
        Some(TokenType::LogicalAnd)
    } else {
        None
    }
}
