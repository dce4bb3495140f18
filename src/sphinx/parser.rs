//! Recursive descent parser for `searchindex.js`
//!
//! # Grammar
//!
//! ```text
//! document := (IDENT '.' IDENT '(' value ')' ';'?) | value
//! value    := object | array | STRING | NUMBER | IDENT
//! object   := '{' (key ':' value (',' key ':' value)* ','?)? '}'
//! key      := IDENT | STRING | NUMBER
//! array    := '[' (value (',' value)* ','?)? ']'
//! ```
//!
//! `true`, `false` and `null` are the only identifiers accepted as values.
//! Objects and arrays may nest at most [`MAX_DEPTH`] levels deep.

use super::lexer::{Lexer, Token};
use crate::error::DocsearchError;
use crate::Result;

/// Deepest object/array nesting accepted. Generated indices use four levels.
pub const MAX_DEPTH: usize = 128;

/// Parsed object literal value. Object entries keep source order.
#[derive(Debug, Clone, PartialEq)]
pub enum JsValue {
    Object(Vec<(String, JsValue)>),
    Array(Vec<JsValue>),
    String(String),
    Number(f64),
    Bool(bool),
    Null,
}

impl JsValue {
    /// First entry with the given key
    pub fn get(&self, key: &str) -> Option<&JsValue> {
        match self {
            JsValue::Object(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&[(String, JsValue)]> {
        match self {
            JsValue::Object(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[JsValue]> {
        match self {
            JsValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// A non-negative integer that fits in `u32`
    pub fn as_index(&self) -> Option<u32> {
        match self {
            JsValue::Number(n) if n.fract() == 0.0 && *n >= 0.0 && *n <= u32::MAX as f64 => {
                Some(*n as u32)
            }
            _ => None,
        }
    }
}

/// Parser for `Search.setIndex(...)` payloads
pub struct IndexParser {
    lexer: Lexer,
    current_token: Token,
    depth: usize,
}

impl IndexParser {
    pub fn new(input: &str) -> Result<Self> {
        let mut lexer = Lexer::new(input);
        let current_token = lexer.next_token()?;
        Ok(Self {
            lexer,
            current_token,
            depth: 0,
        })
    }

    /// Parse the whole input: a `Search.setIndex(...)` call or a bare value
    pub fn parse(&mut self) -> Result<JsValue> {
        let value = if matches!(self.current_token, Token::Ident(_)) {
            self.parse_call()?
        } else {
            self.parse_value()?
        };

        if self.current_token == Token::Semicolon {
            self.advance()?;
        }
        if self.current_token != Token::Eof {
            return Err(self.error(format!(
                "unexpected token after index: {:?}",
                self.current_token
            )));
        }
        Ok(value)
    }

    fn parse_call(&mut self) -> Result<JsValue> {
        let receiver = self.expect_ident()?;
        self.expect(Token::Dot)?;
        let method = self.expect_ident()?;
        if receiver != "Search" || method != "setIndex" {
            return Err(self.error(format!(
                "expected Search.setIndex, found {}.{}",
                receiver, method
            )));
        }
        self.expect(Token::LeftParen)?;
        let value = self.parse_value()?;
        self.expect(Token::RightParen)?;
        Ok(value)
    }

    fn parse_value(&mut self) -> Result<JsValue> {
        match self.current_token.clone() {
            Token::LeftBrace => self.nested(Self::parse_object),
            Token::LeftBracket => self.nested(Self::parse_array),
            Token::Str(s) => {
                self.advance()?;
                Ok(JsValue::String(s))
            }
            Token::Number(text) => {
                self.advance()?;
                text.parse::<f64>()
                    .map(JsValue::Number)
                    .map_err(|_| self.error(format!("invalid number: {}", text)))
            }
            Token::Ident(ident) => {
                let value = match ident.as_str() {
                    "true" => JsValue::Bool(true),
                    "false" => JsValue::Bool(false),
                    "null" => JsValue::Null,
                    _ => return Err(self.error(format!("unexpected identifier: {}", ident))),
                };
                self.advance()?;
                Ok(value)
            }
            other => Err(self.error(format!("expected a value, found {:?}", other))),
        }
    }

    fn nested(&mut self, parse: fn(&mut Self) -> Result<JsValue>) -> Result<JsValue> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("nesting too deep".to_string()));
        }
        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;
        value
    }

    fn parse_object(&mut self) -> Result<JsValue> {
        self.expect(Token::LeftBrace)?;
        let mut entries = Vec::new();

        while self.current_token != Token::RightBrace {
            let key = match self.current_token.clone() {
                Token::Ident(k) | Token::Str(k) | Token::Number(k) => k,
                other => return Err(self.error(format!("expected an object key, found {:?}", other))),
            };
            self.advance()?;
            self.expect(Token::Colon)?;
            let value = self.parse_value()?;
            entries.push((key, value));

            if self.current_token == Token::Comma {
                self.advance()?;
            } else if self.current_token != Token::RightBrace {
                return Err(self.error(format!(
                    "expected ',' or '}}' in object, found {:?}",
                    self.current_token
                )));
            }
        }

        self.advance()?;
        Ok(JsValue::Object(entries))
    }

    fn parse_array(&mut self) -> Result<JsValue> {
        self.expect(Token::LeftBracket)?;
        let mut items = Vec::new();

        while self.current_token != Token::RightBracket {
            items.push(self.parse_value()?);

            if self.current_token == Token::Comma {
                self.advance()?;
            } else if self.current_token != Token::RightBracket {
                return Err(self.error(format!(
                    "expected ',' or ']' in array, found {:?}",
                    self.current_token
                )));
            }
        }

        self.advance()?;
        Ok(JsValue::Array(items))
    }

    fn expect_ident(&mut self) -> Result<String> {
        match self.current_token.clone() {
            Token::Ident(ident) => {
                self.advance()?;
                Ok(ident)
            }
            other => Err(self.error(format!("expected an identifier, found {:?}", other))),
        }
    }

    fn expect(&mut self, expected: Token) -> Result<()> {
        if self.current_token != expected {
            return Err(self.error(format!(
                "expected {:?}, found {:?}",
                expected, self.current_token
            )));
        }
        self.advance()
    }

    fn advance(&mut self) -> Result<()> {
        self.current_token = self.lexer.next_token()?;
        Ok(())
    }

    fn error(&self, message: String) -> DocsearchError {
        DocsearchError::SphinxImport(format!("{} (near position {})", message, self.lexer.position()))
    }
}

/// Parse `searchindex.js` text into a value tree
pub fn parse(input: &str) -> Result<JsValue> {
    IndexParser::new(input)?.parse()
}
