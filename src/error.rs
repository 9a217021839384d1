use crate::utils::io;

#[derive(Debug, PartialEq)]
pub enum ErrorType {
    IOError,
    NameError(String),
    SyntaxError,
    TypeError(&'static str),
    IndexError(u32),
}

#[derive(Debug)]
pub struct Error {
    pub msg: String,
    pub err_type: ErrorType,
    pub pos: Option<io::Pos>,
}

impl ErrorType {
    fn to_string(&self) -> &'static str {
        match self {
            ErrorType::IOError => "IO ERROR",
            ErrorType::NameError(_) => "NAME ERROR",
            ErrorType::SyntaxError => "SYNTAX ERROR",
            ErrorType::TypeError(_) => "TYPE ERROR",
            ErrorType::IndexError(_) => "INDEX ERROR",
        }
    }
}

impl Error {
    pub fn err<O>(self) -> Result<O, Self> {
        Err(self)
    }

    pub fn with_pos(self, pos: Option<&io::Pos>) -> Self {
        Self {
            err_type: self.err_type,
            msg: self.msg,
            pos: pos.cloned(),
        }
    }

    pub fn invalid_token_char(c: char, pos: io::Pos) -> Self {
        Self {
            msg: format!("Invalid token reached starting with {}", c),
            err_type: ErrorType::SyntaxError,
            pos: Some(pos),
        }
    }

    pub fn invalid_escape_char(c: char, pos: io::Pos) -> Self {
        Self {
            msg: format!("Invalid escape character in string: '\\{}'", c),
            err_type: ErrorType::SyntaxError,
            pos: Some(pos),
        }
    }

    pub fn unterminated_string(pos: io::Pos) -> Self {
        Self {
            msg: "String literal left unterminated".to_string(),
            err_type: ErrorType::SyntaxError,
            pos: Some(pos),
        }
    }

    pub fn file_read_error(file_path: &str) -> Self {
        Self {
            msg: format!("Cannot read file: '{}'", file_path),
            err_type: ErrorType::IOError,
            pos: None,
        }
    }

    pub fn unknown_word(name: String, pos: io::Pos) -> Self {
        Self {
            msg: format!("Unknown word referenced: '{}'", name),
            err_type: ErrorType::NameError(name),
            pos: Some(pos),
        }
    }

    pub fn type_error(expected: &'static str, found: &'static str) -> Self {
        Self {
            msg: format!(
                "Unexpected type recieved: Expected {} Recieved {}",
                expected, found
            ),
            err_type: ErrorType::TypeError(found),
            pos: None,
        }
    }

    pub fn array_index_error(idx: u32) -> Self {
        Self {
            msg: format!("Invalid index: {}", idx),
            err_type: ErrorType::IndexError(idx),
            pos: None,
        }
    }

    pub fn dump_error(&self, sources: &io::SourceManager) {
        if let Some(pos) = self.pos {
            eprintln!(
                "In file, at {} on line {}, column {}\n    {: >4} | {}\n         {}'",
                sources.get_source(pos.src_id).unwrap().get_origin(),
                pos.line + 1,
                pos.column + 1,
                pos.line + 1,
                sources.get_line(&pos).unwrap_or_default(),
                "-".repeat(pos.column as usize + 2)
            );
        }

        eprint!("{}: {}", self.err_type.to_string(), self.msg);
        if let Some(pos) = self.pos {
            eprint!(
                " at {}:{}:{}",
                sources.get_source(pos.src_id).unwrap().get_origin(),
                pos.line + 1,
                pos.column + 1
            )
        }

        eprintln!();
    }
}
