use clap::Parser;
use msl::Interpreter;

mod cli;

const TOUR: &str = include_str!("../demos/tour.msl");

fn main() {
    let cli = cli::Cli::parse();
    let mut interpreter = Interpreter::new(cli.verbose, cli.debug);

    let result = match &cli.file_name {
        Some(file_name) => interpreter.execute_from_file(file_name),
        None => interpreter.execute_from_string(TOUR),
    };

    if let Err(e) = result {
        e.dump_error(interpreter.sources());
    }
}
