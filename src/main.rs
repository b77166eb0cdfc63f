use clap::Parser;
use gatesim::cmd::Cli;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = cli.command.run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
