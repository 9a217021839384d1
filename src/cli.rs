use clap::Parser;

// MSL interpreter
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to script to execute; runs the built-in tour when omitted
    #[arg(value_name = "FILE")]
    pub file_name: Option<String>,

    /// Print phase timings and collection statistics
    #[arg(short, long)]
    pub verbose: bool,

    /// Dump the heap after execution
    #[arg(short, long)]
    pub debug: bool,
}
