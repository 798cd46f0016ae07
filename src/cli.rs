use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Runner config file (JSON)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// More log output (repeat for more)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile a template into a JavaScript file
    Compile {
        /// Template document
        input: PathBuf,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compile and execute a template, printing its output
    Run {
        /// Template document
        input: PathBuf,
        /// JavaScript runtime binary
        #[arg(long)]
        node: Option<PathBuf>,
        /// Execution timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Dump runs, macros and generated statements as JSON
    Inspect {
        /// Template document
        input: PathBuf,
    },
}
