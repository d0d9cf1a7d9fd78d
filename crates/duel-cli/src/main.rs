//! CLI frontend for the duel combat engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "duel",
    about = "Duel: a turn-based spell combat engine",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log engine decisions to stderr (AI reasoning, resolutions)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run AI-vs-AI matches and report the results
    Simulate {
        /// Number of matches to play
        #[arg(short, long, default_value = "1")]
        matches: u32,

        /// RNG seed of the first match; later matches count up from it
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Give up on a match after this many rounds
        #[arg(long, default_value = "200")]
        rounds: u32,

        /// Print every phase of every match
        #[arg(long)]
        log: bool,

        /// Print career totals as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Spellbook JSON file (default: the built-in spellbook)
        #[arg(long)]
        spellbook: Option<PathBuf>,
    },

    /// List the spells in a spellbook
    Spells {
        /// Spellbook JSON file (default: the built-in spellbook)
        #[arg(long)]
        spellbook: Option<PathBuf>,

        /// Print the spellbook as JSON
        #[arg(long)]
        json: bool,
    },

    /// Roll dice in NdM notation (e.g. 3d6, d20)
    Roll {
        /// Dice to roll
        dice: String,

        /// RNG seed
        #[arg(short, long, default_value = "42")]
        seed: u64,
    },

    /// Generate a pair of combatants
    Character {
        /// RNG seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Use the one allowed reroll before showing the sheet
        #[arg(long)]
        reroll: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Simulate {
            matches,
            seed,
            rounds,
            log,
            json,
            spellbook,
        } => commands::simulate::run(&commands::simulate::SimulateArgs {
            matches,
            seed,
            rounds,
            log,
            json,
            spellbook,
        }),
        Commands::Spells { spellbook, json } => commands::spells::run(spellbook.as_deref(), json),
        Commands::Roll { dice, seed } => commands::roll::run(&dice, seed),
        Commands::Character { seed, reroll } => commands::character::run(seed, reroll),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}
