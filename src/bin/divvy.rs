use clap::{Parser, Subcommand};
use divvy::{ItemId, Ledger};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn items(ledger: Ledger) {
    for item in ledger.items() {
        println!("{}", item);
    }
}

fn totals(mut ledger: Ledger, participants: Vec<String>) {
    for name in &participants {
        ledger.add_participant(name);
    }
    let roster: Vec<String> = ledger
        .participants()
        .iter()
        .map(|p| p.to_string())
        .collect();
    let ids: Vec<ItemId> = ledger.items().iter().map(|item| item.id()).collect();
    for id in ids {
        for name in &roster {
            ledger.toggle_split(id, name);
        }
    }
    let mut result = vec![];
    for (participant, total) in ledger.totals() {
        result.push(format!("{} {}", participant, total.round_dp(2)));
    }
    result.sort();
    for entry in result {
        println!("{}", entry);
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "divvy",
    about = "A bill-splitting companion for group projects.",
    version = VERSION,
)]
struct Cli {
    /// Receipt text file, as produced by the recognition engine.
    #[arg(short, required = true)]
    input: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the line items recognized in the receipt text.
    Items,
    /// Split every item evenly among all participants and print the totals.
    Totals {
        #[arg(short, long, value_delimiter = ',', required = true)]
        participants: Vec<String>,
    },
}

fn main() {
    pretty_env_logger::init();
    let args = Cli::parse();
    let (ledger, errors) = Ledger::from_file(&args.input);
    for error in &errors {
        println!("{}\n", error);
    }
    log::debug!(
        "{}: {} items, {} diagnostics",
        &args.input,
        ledger.items().len(),
        errors.len()
    );
    match args.command {
        Commands::Items => items(ledger),
        Commands::Totals { participants } => totals(ledger, participants),
    }
}
