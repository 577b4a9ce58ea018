//! vakya CLI — the terminal front-end of the Sanskrit sentence drill.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "vakya", version, about = "Sanskrit sentence-analysis drill")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter vakya.toml
    Init,

    /// Sign in and store the credential token
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Create an account and sign in
    Register {
        /// Full name
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        /// Repeat the password
        #[arg(long)]
        confirm_password: String,
    },

    /// Forget the stored credential token
    Logout,

    /// Show whether a credential token is stored
    Status,

    /// Show the signed-in user's profile
    Profile,

    /// Play the sentence exercise
    Play {
        /// Skip the sentence service and play the built-in sentence
        #[arg(long)]
        offline: bool,

        /// Seed for shuffling, for reproducible sessions
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Play the verb-form quiz
    VerbQuiz,
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vakya=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Login { email, password } => {
            commands::auth::login(config, email, password).await
        }
        Commands::Register {
            name,
            email,
            password,
            confirm_password,
        } => commands::auth::register(config, name, email, password, confirm_password).await,
        Commands::Logout => commands::auth::logout(config),
        Commands::Status => commands::status::execute(config),
        Commands::Profile => commands::status::profile(config).await,
        Commands::Play { offline, seed } => commands::play::execute(config, offline, seed).await,
        Commands::VerbQuiz => commands::verb_quiz::execute(config).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
