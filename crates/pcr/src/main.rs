use clap::{Parser, Subcommand};
use colored::Colorize;
use env_logger::Env;

mod calc;
mod inspect;

#[derive(Parser)]
#[command(name = "pcr")]
#[command(about = "Part-catalog PCR content and CO2e avoidance calculator", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true, hide = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up a part and compute mass and CO2e-avoidance figures
    #[command(alias = "c")]
    Calc(calc::CalcArgs),

    /// Inspect a catalog source: headers, column mapping, row counts
    #[command(alias = "i")]
    Inspect(inspect::InspectArgs),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e}", "Error:".red());
        for cause in e.chain().skip(1) {
            eprintln!("  {cause}");
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Default log level depends on --debug (overridden by RUST_LOG)
    let env = if cli.debug {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("warn")
    };
    env_logger::Builder::from_env(env).init();

    match cli.command {
        Commands::Calc(args) => calc::execute(args),
        Commands::Inspect(args) => inspect::execute(args),
    }
}
