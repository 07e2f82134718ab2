//! lumiere CLI: vocabulary study from the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod console;
mod context;

use context::AppContext;

#[derive(Parser)]
#[command(
    name = "lumiere",
    version,
    about = "Vocabulary trainer with spoken pronunciation"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List levels and whether they are open
    Levels,

    /// Show the word list of a level
    List {
        /// Level ID (e.g. "lvl-1")
        #[arg(long)]
        level: String,
    },

    /// Study a level with flashcards
    Cards {
        /// Level ID
        #[arg(long)]
        level: String,
    },

    /// Take a quiz over a level or over recorded mistakes
    Quiz {
        /// Level ID
        #[arg(long, required_unless_present = "mistakes", conflicts_with = "mistakes")]
        level: Option<String>,

        /// Quiz the mistake book instead of a level
        #[arg(long)]
        mistakes: bool,

        /// Seed for a reproducible question order
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Review words answered incorrectly
    Mistakes {
        #[command(subcommand)]
        action: Option<MistakesAction>,
    },

    /// Unlock premium levels
    Unlock {
        /// Unlock code; omit to show the current status
        code: Option<String>,

        /// Lock premium levels again
        #[arg(long, conflicts_with = "code")]
        lock: bool,
    },

    /// Speak a phrase
    Say {
        /// Text to speak
        text: String,

        /// Voice name (defaults to the configured voice)
        #[arg(long)]
        voice: Option<String>,
    },

    /// Explain a phrase in plain language
    Explain {
        /// Phrase to explain
        phrase: String,
    },

    /// Play a dialogue scenario, or list them
    Scenario {
        /// Scenario ID; omit to list scenarios
        id: Option<String>,

        /// Print the dialogue without speaking it
        #[arg(long)]
        silent: bool,
    },

    /// Validate a curriculum file
    Validate {
        /// Curriculum TOML (defaults to the configured or built-in one)
        #[arg(long)]
        curriculum: Option<PathBuf>,
    },

    /// Create a starter config
    Init,
}

#[derive(Subcommand)]
enum MistakesAction {
    /// List recorded mistakes (default)
    List,
    /// Remove one word from the mistake book
    Remove {
        /// Word ID
        id: String,
    },
    /// Forget every recorded mistake
    Clear,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lumiere=info".parse().expect("static directive")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // These two work without learner state.
    match &cli.command {
        Commands::Init => return commands::init::execute(),
        Commands::Validate { curriculum } => {
            return commands::validate::execute(curriculum.clone(), cli.config.as_deref())
        }
        _ => {}
    }

    let ctx = AppContext::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Levels => commands::levels::execute(&ctx),
        Commands::List { level } => commands::list::execute(&ctx, &level),
        Commands::Cards { level } => commands::cards::execute(&ctx, &level).await,
        Commands::Quiz {
            level,
            mistakes,
            seed,
        } => commands::quiz::execute(&ctx, level.as_deref(), mistakes, seed).await,
        Commands::Mistakes { action } => match action.unwrap_or(MistakesAction::List) {
            MistakesAction::List => commands::mistakes::list(&ctx),
            MistakesAction::Remove { id } => commands::mistakes::remove(&ctx, &id),
            MistakesAction::Clear => commands::mistakes::clear(&ctx),
        },
        Commands::Unlock { code, lock } => commands::unlock::execute(&ctx, code.as_deref(), lock),
        Commands::Say { text, voice } => commands::say::execute(&ctx, &text, voice.as_deref()).await,
        Commands::Explain { phrase } => commands::explain::execute(&ctx, &phrase).await,
        Commands::Scenario { id, silent } => {
            commands::scenario::execute(&ctx, id.as_deref(), silent).await
        }
        Commands::Init | Commands::Validate { .. } => Ok(()),
    }
}
