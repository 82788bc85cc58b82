mod commands;
mod context;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "medox", about = "Client for the medox multi-modal medical API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage API keys
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
    /// Look up drug information
    Drug {
        /// Drug name
        name: String,

        /// Include interaction data
        #[arg(short, long)]
        interactions: bool,
    },
    /// Look up disease information
    Disease {
        /// Disease name
        name: String,

        /// Include treatment data
        #[arg(short, long)]
        treatments: bool,
    },
    /// Synthesize speech from text and download the audio
    Speak {
        /// Text to synthesize
        #[arg(short, long)]
        text: String,

        /// Voice ID (server default if omitted)
        #[arg(short, long)]
        voice: Option<String>,

        /// Output file (default: speech_<task_id>.mp3)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Describe an image (JPEG or PNG)
    DescribeImage {
        /// Image file
        path: PathBuf,

        /// Vision model to use
        #[arg(long)]
        model: Option<String>,

        /// Square resize applied before description
        #[arg(long)]
        image_size: Option<u32>,
    },
    /// Transcribe (and optionally translate) an audio file
    Transcribe {
        /// Audio file
        path: PathBuf,

        /// ISO 639-1 code; omitted means the server default
        #[arg(short = 'l', long)]
        target_language: Option<String>,
    },
    /// Watch files and run a reload command on change
    Watch {
        /// Directory to watch (overrides config)
        #[arg(short, long)]
        path: Option<String>,

        /// Reload command (overrides config)
        #[arg(short, long)]
        command: Option<String>,
    },
}

#[derive(Subcommand)]
enum KeyAction {
    /// Issue a new key and store it locally
    Create,
    /// Print the stored key
    Show,
    /// Ask the server whether the stored key is still accepted
    Validate,
    /// Revoke the stored key server-side and forget it
    Revoke,
    /// List issued keys (requires a stored key)
    List,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let rt = tokio::runtime::Runtime::new()?;

    match cli.command {
        Commands::Key { action } => match action {
            KeyAction::Create => rt.block_on(commands::key::create())?,
            KeyAction::Show => commands::key::show()?,
            KeyAction::Validate => rt.block_on(commands::key::validate())?,
            KeyAction::Revoke => rt.block_on(commands::key::revoke())?,
            KeyAction::List => rt.block_on(commands::key::list())?,
        },
        Commands::Drug {
            name,
            interactions,
        } => rt.block_on(commands::lookup::drug(&name, interactions))?,
        Commands::Disease { name, treatments } => {
            rt.block_on(commands::lookup::disease(&name, treatments))?
        }
        Commands::Speak { text, voice, out } => {
            rt.block_on(commands::media::speak(&text, voice.as_deref(), out))?
        }
        Commands::DescribeImage {
            path,
            model,
            image_size,
        } => rt.block_on(commands::media::describe_image(&path, model, image_size))?,
        Commands::Transcribe {
            path,
            target_language,
        } => rt.block_on(commands::media::transcribe(
            &path,
            target_language.as_deref(),
        ))?,
        Commands::Watch { path, command } => {
            rt.block_on(commands::watch::run(path, command))?
        }
    }

    Ok(())
}
