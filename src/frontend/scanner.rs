use std::str::Chars;

use crate::error;
use crate::utils::io;

/// One word of the script language. Every value-producing or stack-mutating
/// token is a single machine operation; the scanner never touches the heap.
#[derive(Debug, PartialEq)]
pub enum Tk {
    Number(f64),
    Text(String),
    Id(String),
    Null,
    Pair,
    Array,
    Append,
    Get,
    Set,
    Pop,
    Print,
    Collect,
    Comment,
    Whitespace,
    Newline,
    EOF,
}

#[derive(Debug, PartialEq)]
pub struct Token {
    pub tk: Tk,
    pub pos: io::Pos,
}

pub struct Scanner<'a> {
    stream: Chars<'a>,
    current_char: char,
    lookahead_char: char,
    cursor: io::Pos,
}

impl Token {
    pub fn new(tk: Tk, pos: io::Pos) -> Self {
        Self { tk, pos }
    }
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a io::Source) -> Self {
        let mut stream = src.char_stream();
        let cursor = io::Pos {
            offset: -1,
            column: -1,
            line: 0,
            src_id: src.id(),
        };

        Self {
            current_char: '\0',
            lookahead_char: stream.next().unwrap_or('\0'),
            stream,
            cursor,
        }
    }

    fn advance(&mut self) -> char {
        if self.current_char == '\n' {
            self.cursor.column = -1;
            self.cursor.line += 1;
        }

        self.current_char = self.lookahead_char;
        self.lookahead_char = self.stream.next().unwrap_or('\0');

        self.cursor.column += 1;
        self.cursor.offset += 1;
        self.current_char
    }

    fn next_token(&mut self) -> Result<Token, error::Error> {
        let c = self.advance();
        let pos = self.cursor;

        let tk = match c {
            c if c.is_ascii_alphabetic() || c == '_' => self.extract_identifier(),
            c if c.is_ascii_digit() => self.extract_number(),
            '"' => self.extract_text()?,
            '#' => self.extract_comment(),
            '\n' => Tk::Newline,
            '\0' => Tk::EOF,
            '\t' | '\r' | ' ' => {
                while let '\t' | '\r' | ' ' = self.lookahead_char {
                    self.advance();
                }
                Tk::Whitespace
            }
            c => return error::Error::invalid_token_char(c, pos).err(),
        };

        Ok(Token::new(tk, pos))
    }

    fn extract_identifier(&mut self) -> Tk {
        let mut buf = self.current_char.to_string();

        while self.lookahead_char.is_alphanumeric() || self.lookahead_char == '_' {
            buf.push(self.advance());
        }

        match buf.as_str() {
            "null" => Tk::Null,
            "pair" => Tk::Pair,
            "array" => Tk::Array,
            "append" => Tk::Append,
            "get" => Tk::Get,
            "set" => Tk::Set,
            "pop" => Tk::Pop,
            "print" => Tk::Print,
            "collect" => Tk::Collect,
            _ => Tk::Id(buf),
        }
    }

    fn extract_number(&mut self) -> Tk {
        let mut buf = self.current_char.to_string();
        let mut seen_point = false;

        while self.lookahead_char.is_ascii_digit() || (self.lookahead_char == '.' && !seen_point) {
            seen_point = seen_point || self.lookahead_char == '.';
            buf.push(self.advance());
        }

        Tk::Number(buf.parse::<f64>().unwrap_or(0.0))
    }

    fn extract_text(&mut self) -> Result<Tk, error::Error> {
        let mut buf = String::new();

        while self.lookahead_char != '"' && self.lookahead_char != '\0' {
            if self.lookahead_char == '\\' {
                self.advance();
                buf.push(match self.advance() {
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    '"' => '"',
                    '\\' => '\\',
                    c => return error::Error::invalid_escape_char(c, self.cursor).err(),
                });
            } else {
                buf.push(self.advance());
            }
        }

        if self.lookahead_char == '\0' {
            return error::Error::unterminated_string(self.cursor).err();
        }

        self.advance();
        Ok(Tk::Text(buf))
    }

    fn extract_comment(&mut self) -> Tk {
        while self.lookahead_char != '\n' && self.lookahead_char != '\0' {
            self.advance();
        }
        Tk::Comment
    }

    /// Next token with comments, whitespace and newlines filtered out.
    pub fn next_valid_token(&mut self) -> Result<Token, error::Error> {
        let mut token = self.next_token();
        while let Ok(ref tk) = token {
            match tk.tk {
                Tk::Comment | Tk::Whitespace | Tk::Newline => token = self.next_token(),
                _ => break,
            }
        }

        token
    }
}
