use std::time::Instant;

use colored::Colorize;

use crate::{
    error,
    frontend::scanner::{Scanner, Tk},
    utils::io,
    vm::{
        heap::{Alloc, Heap},
        Object, Ref,
    },
};

/// Runs scripts against a private heap. Each word of a script is one
/// operation on the heap or its root stack, which makes the interpreter a
/// plain root-providing client of the collector: it pushes and pops typed
/// values, and asks for a cycle with `collect`.
pub struct Interpreter {
    heap: Heap,
    sources: io::SourceManager,
    verbose: bool,
    debug: bool,
}

impl Interpreter {
    pub fn new(verbose: bool, debug: bool) -> Self {
        let mut heap = Heap::new(8);
        heap.set_verbose(verbose);
        Self {
            heap,
            sources: io::SourceManager::new(),
            verbose,
            debug,
        }
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn heap_mut(&mut self) -> &mut Heap {
        &mut self.heap
    }

    pub fn sources(&self) -> &io::SourceManager {
        &self.sources
    }

    fn run(&mut self, source_id: u32) -> Result<(), error::Error> {
        let src = self.sources.get_source(source_id).unwrap();
        let mut scanner = Scanner::new(src);

        loop {
            let token = scanner.next_valid_token()?;
            match token.tk {
                Tk::EOF => break,
                Tk::Number(value) => {
                    let ptr = self.heap.alloc(Object::number(value));
                    self.heap.push(Some(ptr));
                }
                Tk::Text(text) => {
                    let ptr = self.heap.alloc(Object::text(&text));
                    self.heap.push(Some(ptr));
                }
                Tk::Null => self.heap.push(None),
                Tk::Pair => {
                    let tail = self.heap.pop();
                    let head = self.heap.pop();
                    let ptr = self.heap.alloc(Object::pair(head, tail));
                    self.heap.push(Some(ptr));
                }
                Tk::Array => {
                    let ptr = self.heap.alloc(Object::array());
                    self.heap.push(Some(ptr));
                }
                Tk::Append => {
                    let element = self.heap.pop();
                    let array = self.peek_array(token.pos)?;
                    self.heap.append(array, element);
                }
                Tk::Get => {
                    let index = self.heap.pop();
                    let array = self.peek_array(token.pos)?;
                    let index = self.as_index(index, self.heap.array_len(array), token.pos)?;
                    let element = self.heap.get(array, index);
                    self.heap.push(element);
                }
                Tk::Set => {
                    let element = self.heap.pop();
                    let index = self.heap.pop();
                    let array = self.peek_array(token.pos)?;
                    let index = self.as_index(index, self.heap.array_len(array), token.pos)?;
                    self.heap.set(array, index, element);
                }
                Tk::Pop => {
                    self.heap.pop();
                }
                Tk::Print => {
                    let top = self.heap.peek();
                    println!("{}", self.heap.describe(top));
                }
                Tk::Collect => {
                    let stats = self.heap.collect();
                    if self.verbose {
                        println!(
                            "[{}] Collection kept {} and reclaimed {} objects",
                            "verbose".purple(),
                            stats.kept,
                            stats.reclaimed
                        );
                    }
                }
                Tk::Id(word) => return error::Error::unknown_word(word, token.pos).err(),
                Tk::Comment | Tk::Whitespace | Tk::Newline => {}
            }
        }

        Ok(())
    }

    /// The array operand of `append`/`get`/`set` stays on the stack; only
    /// validate that the top references an array.
    fn peek_array(&self, pos: io::Pos) -> Result<usize, error::Error> {
        match self.heap.peek() {
            Some(ptr) => match self.heap.access(ptr) {
                Object::Array { .. } => Ok(ptr),
                o => error::Error::type_error("Array", o.type_name())
                    .with_pos(Some(&pos))
                    .err(),
            },
            None => error::Error::type_error("Array", "Null")
                .with_pos(Some(&pos))
                .err(),
        }
    }

    /// Scripts index arrays through number objects; the bounds check here
    /// keeps the heap's in-bounds precondition a precondition.
    fn as_index(&self, index: Ref, len: usize, pos: io::Pos) -> Result<usize, error::Error> {
        match index {
            Some(ptr) => match self.heap.access(ptr) {
                Object::Number { mark: _, value } if *value >= 0.0 && (*value as usize) < len => {
                    Ok(*value as usize)
                }
                Object::Number { mark: _, value } => error::Error::array_index_error(*value as u32)
                    .with_pos(Some(&pos))
                    .err(),
                o => error::Error::type_error("Number", o.type_name())
                    .with_pos(Some(&pos))
                    .err(),
            },
            None => error::Error::type_error("Number", "Null")
                .with_pos(Some(&pos))
                .err(),
        }
    }

    fn execute(&mut self, source_id: u32) -> Result<(), error::Error> {
        if !self.debug && !self.verbose {
            return self.run(source_id);
        }

        let start = Instant::now();
        let result = self.run(source_id);
        if self.verbose {
            println!(
                "[{}] Execution took: {} microseconds",
                "verbose".purple(),
                start.elapsed().as_micros()
            );
        }

        if self.debug {
            self.heap.dump();
        }

        result
    }

    pub fn execute_from_file(&mut self, file_path: &str) -> Result<(), error::Error> {
        self.sources
            .load_source_file(file_path)
            .map(|src| src.id())
            .and_then(|src_id| self.execute(src_id))
    }

    pub fn execute_from_string(&mut self, source: &str) -> Result<(), error::Error> {
        self.sources
            .load_source_string(source)
            .map(|src| src.id())
            .and_then(|src_id| self.execute(src_id))
    }
}
