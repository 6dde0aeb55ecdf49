//! Deep clone CLI
//!
//! Entry point. Parses CLI arguments, reads the document and delegates to
//! the runner.

use clap::Parser;
use clone_cli::{logging, read_input, run, Cli};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.log_level.as_deref(), cli.json_logs);

    match read_input(&cli).and_then(|input| run(&cli, &input)) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
