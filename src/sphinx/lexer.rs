//! Lexer for the JavaScript object literals found in `searchindex.js`

use crate::error::DocsearchError;
use crate::Result;

/// Token types for object literal parsing
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Bare identifier (`docnames`, `Search`, `true`)
    Ident(String),
    /// Single- or double-quoted string, escapes resolved
    Str(String),
    /// Numeric literal, kept as written so integer keys survive
    Number(String),

    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    LeftParen,
    RightParen,
    Colon,
    Comma,
    Dot,
    Semicolon,

    /// End of input
    Eof,
}

/// Lexer for tokenizing object literal text
pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Current character offset, for error messages
    pub fn position(&self) -> usize {
        self.position
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace_and_comments();

        if self.position >= self.input.len() {
            return Ok(Token::Eof);
        }

        let ch = self.current_char();
        let simple = match ch {
            '{' => Some(Token::LeftBrace),
            '}' => Some(Token::RightBrace),
            '[' => Some(Token::LeftBracket),
            ']' => Some(Token::RightBracket),
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            ':' => Some(Token::Colon),
            ',' => Some(Token::Comma),
            ';' => Some(Token::Semicolon),
            '.' if !self.peek().map(|c| c.is_ascii_digit()).unwrap_or(false) => Some(Token::Dot),
            _ => None,
        };
        if let Some(token) = simple {
            self.advance();
            return Ok(token);
        }

        match ch {
            '"' | '\'' => {
                self.advance();
                self.read_string(ch)
            }
            '-' | '.' => self.read_number(),
            _ if ch.is_ascii_digit() => self.read_number(),
            _ if Self::is_ident_start(ch) => Ok(self.read_ident()),
            _ => Err(DocsearchError::SphinxImport(format!(
                "unexpected character at position {}: '{}'",
                self.position, ch
            ))),
        }
    }

    fn read_ident(&mut self) -> Token {
        let mut ident = String::new();
        while self.position < self.input.len() && Self::is_ident_char(self.current_char()) {
            ident.push(self.current_char());
            self.advance();
        }
        Token::Ident(ident)
    }

    fn read_number(&mut self) -> Result<Token> {
        let start = self.position;
        let mut text = String::new();

        if self.current_char() == '-' {
            text.push('-');
            self.advance();
        }

        while self.position < self.input.len() {
            let ch = self.current_char();
            let exponent_sign = matches!(ch, '+' | '-') && text.ends_with(|c: char| c == 'e' || c == 'E');
            if ch.is_ascii_digit() || matches!(ch, '.' | 'e' | 'E') || exponent_sign {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if text.parse::<f64>().is_err() {
            return Err(DocsearchError::SphinxImport(format!(
                "invalid number at position {}: '{}'",
                start, text
            )));
        }
        Ok(Token::Number(text))
    }

    fn read_string(&mut self, quote: char) -> Result<Token> {
        let start = self.position;
        let mut s = String::new();

        while self.position < self.input.len() {
            let ch = self.current_char();
            self.advance();

            if ch == quote {
                return Ok(Token::Str(s));
            }
            if ch != '\\' {
                s.push(ch);
                continue;
            }

            if self.position >= self.input.len() {
                break;
            }
            let escaped = self.current_char();
            self.advance();
            match escaped {
                'n' => s.push('\n'),
                't' => s.push('\t'),
                'r' => s.push('\r'),
                'b' => s.push('\u{0008}'),
                'f' => s.push('\u{000C}'),
                '0' => s.push('\0'),
                'u' => s.push(self.read_unicode_escape()?),
                other => s.push(other),
            }
        }

        Err(DocsearchError::SphinxImport(format!(
            "unterminated string starting at position {}",
            start
        )))
    }

    /// Decode the hex digits after `\u`, joining surrogate pairs
    fn read_unicode_escape(&mut self) -> Result<char> {
        let high = self.read_hex4()?;
        if (0xD800..0xDC00).contains(&high) {
            let is_pair = self.input.get(self.position) == Some(&'\\')
                && self.input.get(self.position + 1) == Some(&'u');
            if is_pair {
                self.position += 2;
                let low = self.read_hex4()?;
                if (0xDC00..0xE000).contains(&low) {
                    let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                    return Ok(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
                }
            }
            return Ok(char::REPLACEMENT_CHARACTER);
        }
        Ok(char::from_u32(high).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    fn read_hex4(&mut self) -> Result<u32> {
        let end = self.position + 4;
        if end > self.input.len() {
            return Err(DocsearchError::SphinxImport(format!(
                "truncated unicode escape at position {}",
                self.position
            )));
        }
        let digits: String = self.input[self.position..end].iter().collect();
        let code = u32::from_str_radix(&digits, 16).map_err(|_| {
            DocsearchError::SphinxImport(format!(
                "invalid unicode escape at position {}: '{}'",
                self.position, digits
            ))
        })?;
        self.position = end;
        Ok(code)
    }

    fn current_char(&self) -> char {
        self.input[self.position]
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.position < self.input.len() && self.current_char().is_whitespace() {
                self.advance();
            }
            if self.current_char_is('/') && self.peek() == Some('/') {
                while self.position < self.input.len() && self.current_char() != '\n' {
                    self.advance();
                }
            } else if self.current_char_is('/') && self.peek() == Some('*') {
                self.position += 2;
                while self.position < self.input.len()
                    && !(self.current_char() == '*' && self.peek() == Some('/'))
                {
                    self.advance();
                }
                self.position = (self.position + 2).min(self.input.len());
            } else {
                break;
            }
        }
    }

    fn current_char_is(&self, ch: char) -> bool {
        self.input.get(self.position) == Some(&ch)
    }

    fn is_ident_start(ch: char) -> bool {
        ch.is_alphabetic() || ch == '_' || ch == '$'
    }

    fn is_ident_char(ch: char) -> bool {
        ch.is_alphanumeric() || ch == '_' || ch == '$'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(input);
        let mut out = Vec::new();
        loop {
            let token = lexer.next_token().unwrap();
            if token == Token::Eof {
                break;
            }
            out.push(token);
        }
        out
    }

    #[test]
    fn test_set_index_call() {
        assert_eq!(
            tokens("Search.setIndex({a:1});"),
            vec![
                Token::Ident("Search".to_string()),
                Token::Dot,
                Token::Ident("setIndex".to_string()),
                Token::LeftParen,
                Token::LeftBrace,
                Token::Ident("a".to_string()),
                Token::Colon,
                Token::Number("1".to_string()),
                Token::RightBrace,
                Token::RightParen,
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn test_quoted_keys_and_arrays() {
        assert_eq!(
            tokens(r#"{"sphinx.domains.c":2,case_studi:[0,1]}"#),
            vec![
                Token::LeftBrace,
                Token::Str("sphinx.domains.c".to_string()),
                Token::Colon,
                Token::Number("2".to_string()),
                Token::Comma,
                Token::Ident("case_studi".to_string()),
                Token::Colon,
                Token::LeftBracket,
                Token::Number("0".to_string()),
                Token::Comma,
                Token::Number("1".to_string()),
                Token::RightBracket,
                Token::RightBrace,
            ]
        );
    }

    #[test]
    fn test_unicode_escape() {
        assert_eq!(
            tokens(r#""Welcome to DRpy\u2019s documentation!""#),
            vec![Token::Str("Welcome to DRpy\u{2019}s documentation!".to_string())]
        );
        assert_eq!(
            tokens(r#""\ud83d\udcc8""#),
            vec![Token::Str("\u{1F4C8}".to_string())]
        );
    }

    #[test]
    fn test_single_quoted_and_escapes() {
        assert_eq!(
            tokens(r#"'it\'s' "a\"b\\c\n""#),
            vec![
                Token::Str("it's".to_string()),
                Token::Str("a\"b\\c\n".to_string()),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            tokens("-1 2.5 1e3 .5"),
            vec![
                Token::Number("-1".to_string()),
                Token::Number("2.5".to_string()),
                Token::Number("1e3".to_string()),
                Token::Number(".5".to_string()),
            ]
        );
    }

    #[test]
    fn test_comments_skipped() {
        assert_eq!(
            tokens("// header\n/* block */ x"),
            vec![Token::Ident("x".to_string())]
        );
    }

    #[test]
    fn test_errors() {
        assert!(Lexer::new("\"unterminated").next_token().is_err());
        assert!(Lexer::new("\"\\u12\"").next_token().is_err());
        assert!(Lexer::new("#").next_token().is_err());
        assert!(Lexer::new("-x").next_token().is_err());
    }
}
