//! Parser for the Python-literal text that scrapers wrote via `str()`.
//!
//! Handles the subset that actually shows up in scraped fields: strings in
//! single or double quotes, integers and floats, `True`/`False`/`None` (and
//! their JSON spellings), lists, tuples and dicts. Tuples become JSON arrays.
//! Dict keys that are not strings are stringified.
//!
//! Everything is `pub(crate)`: callers go through [`crate::coerce`].

use serde_json::{Map, Number, Value};

/// Nesting limit; scraped hours and localizations are at most two deep.
const MAX_DEPTH: usize = 32;

/// Parses `input` as a single Python literal. Returns `None` if the text is
/// not a literal or has trailing garbage.
pub(crate) fn parse_literal(input: &str) -> Option<Value> {
    let mut parser = Parser {
        chars: input.chars().collect(),
        pos: 0,
    };
    let value = parser.value(0)?;
    parser.skip_ws();
    if parser.pos == parser.chars.len() {
        Some(value)
    } else {
        None
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn value(&mut self, depth: usize) -> Option<Value> {
        if depth > MAX_DEPTH {
            return None;
        }
        self.skip_ws();
        match self.peek()? {
            '[' => self.sequence(']', depth).map(Value::Array),
            '(' => self.sequence(')', depth).map(Value::Array),
            '{' => self.dict(depth).map(Value::Object),
            '\'' | '"' => self.string().map(Value::String),
            c if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.number(),
            c if c.is_ascii_alphabetic() => self.keyword(),
            _ => None,
        }
    }

    /// Parses `[a, b, ...]` or `(a, b, ...)`, allowing a trailing comma.
    fn sequence(&mut self, close: char, depth: usize) -> Option<Vec<Value>> {
        self.bump();
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek()? == close {
                self.bump();
                return Some(items);
            }
            items.push(self.value(depth + 1)?);
            self.skip_ws();
            match self.bump()? {
                ',' => {}
                c if c == close => return Some(items),
                _ => return None,
            }
        }
    }

    fn dict(&mut self, depth: usize) -> Option<Map<String, Value>> {
        self.bump();
        let mut map = Map::new();
        loop {
            self.skip_ws();
            if self.peek()? == '}' {
                self.bump();
                return Some(map);
            }
            let key = match self.value(depth + 1)? {
                Value::String(s) => s,
                Value::Null | Value::Array(_) | Value::Object(_) => return None,
                other => other.to_string(),
            };
            self.skip_ws();
            if self.bump()? != ':' {
                return None;
            }
            let value = self.value(depth + 1)?;
            map.insert(key, value);
            self.skip_ws();
            match self.bump()? {
                ',' => {}
                '}' => return Some(map),
                _ => return None,
            }
        }
    }

    fn string(&mut self) -> Option<String> {
        let quote = self.bump()?;
        let mut out = String::new();
        loop {
            match self.bump()? {
                c if c == quote => return Some(out),
                '\\' => out.push(self.escape()?),
                c => out.push(c),
            }
        }
    }

    fn escape(&mut self) -> Option<char> {
        let c = match self.bump()? {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'b' => '\u{8}',
            'f' => '\u{c}',
            '0' => '\0',
            'u' => return self.hex_char(4),
            'x' => return self.hex_char(2),
            // \\, \', \", \/ and anything unknown map to the char itself.
            other => other,
        };
        Some(c)
    }

    fn hex_char(&mut self, len: usize) -> Option<char> {
        let end = self.pos.checked_add(len)?;
        let digits: String = self.chars.get(self.pos..end)?.iter().collect();
        self.pos = end;
        let code = u32::from_str_radix(&digits, 16).ok()?;
        char::from_u32(code)
    }

    fn number(&mut self) -> Option<Value> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E' | '_'))
        {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos]
            .iter()
            .filter(|c| **c != '_')
            .collect();
        if let Ok(int) = text.parse::<i64>() {
            return Some(Value::Number(int.into()));
        }
        let float = text.parse::<f64>().ok()?;
        Number::from_f64(float).map(Value::Number)
    }

    fn keyword(&mut self) -> Option<Value> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        let word: String = self.chars[start..self.pos].iter().collect();
        match word.as_str() {
            "True" | "true" => Some(Value::Bool(true)),
            "False" | "false" => Some(Value::Bool(false)),
            "None" | "null" => Some(Value::Null),
            _ => None,
        }
    }
}
