pub mod io {
    use std::{fs, str::Chars};

    use crate::error;

    type SourceId = u32;

    #[derive(Debug)]
    pub struct Source {
        id: SourceId,
        src_origin: String,
        src_content: String,
    }

    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct Pos {
        pub offset: i32,
        pub column: i32,
        pub line: u32,
        pub src_id: SourceId,
    }

    pub struct SourceManager {
        sources: Vec<Source>,
    }

    impl Source {
        pub fn id(&self) -> u32 {
            self.id
        }

        pub fn char_stream(&self) -> Chars {
            self.src_content.chars()
        }

        pub fn get_origin(&self) -> &String {
            &self.src_origin
        }
    }

    impl SourceManager {
        pub fn new() -> Self {
            Self { sources: vec![] }
        }

        pub fn get_source(&self, id: u32) -> Option<&Source> {
            self.sources.get(id as usize)
        }

        pub fn get_line(&self, pos: &Pos) -> Option<String> {
            self.get_source(pos.src_id)
                .and_then(|src| src.src_content.lines().nth(pos.line as usize))
                .map(str::to_string)
        }

        pub fn load_source_file(&mut self, file_path: &str) -> Result<&Source, error::Error> {
            match fs::read_to_string(file_path) {
                Ok(content) => Ok(self.add_source(file_path.to_string(), content)),
                Err(_) => Err(error::Error::file_read_error(file_path)),
            }
        }

        pub fn load_source_string(&mut self, source: &str) -> Result<&Source, error::Error> {
            Ok(self.add_source("<input>".to_string(), source.to_string()))
        }

        fn add_source(&mut self, origin: String, content: String) -> &Source {
            self.sources.push(Source {
                id: self.sources.len() as u32,
                src_origin: origin,
                src_content: content,
            });

            self.sources.last().unwrap()
        }
    }
}
