//! Datovka CLI
//!
//! Compose and check Czech Data Box messages offline.

mod config;
mod progress;

use clap::{Parser, Subcommand};
use console::style;
use datovka_core::endpoint::{Service, service_url_for};
use datovka_core::{MessageBuilder, MessageValidator, OutboundMessage, codec};
use std::path::{Path, PathBuf};

use config::{Config, parse_auth_mode};
use progress::{AttachmentProgress, format_bytes};

/// Datovka - compose and validate Data Box messages
#[derive(Parser)]
#[command(name = "datovka")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and validate a message
    Compose(ComposeArgs),

    /// Print the inferred MIME type of file names
    Mime {
        /// File names
        #[arg(required = true)]
        files: Vec<String>,
    },

    /// Print the service endpoint URLs
    Endpoints {
        /// Environment (test or production), defaults to the configured one
        #[arg(long)]
        environment: Option<String>,

        /// Login mode (password, certificate or hosted), defaults to the configured one
        #[arg(long)]
        auth: Option<String>,
    },

    /// Validate a message stored as JSON
    Check {
        /// Message file written by `compose --output`
        file: PathBuf,
    },
}

#[derive(clap::Args)]
struct ComposeArgs {
    /// Recipient data box ID
    #[arg(long, required = true)]
    to: String,

    /// Message subject
    #[arg(long, required = true)]
    subject: String,

    /// Sender identification
    #[arg(long)]
    sender_ident: Option<String>,

    /// Sender reference number
    #[arg(long)]
    sender_ref: Option<String>,

    /// Recipient reference number
    #[arg(long)]
    recipient_ref: Option<String>,

    /// Addressee person at the recipient
    #[arg(long)]
    to_hands: Option<String>,

    /// Message type tag
    #[arg(long = "type")]
    message_type: Option<String>,

    /// Request personal delivery
    #[arg(long)]
    personal_delivery: bool,

    /// Allow substitute delivery
    #[arg(long)]
    allow_subst_delivery: bool,

    /// File to attach (repeatable)
    #[arg(short, long = "attach")]
    attachments: Vec<PathBuf>,

    /// Inline text attachment as NAME=CONTENT (repeatable)
    #[arg(long = "text")]
    texts: Vec<String>,

    /// Write the built message as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default()?,
    };
    config.validate()?;

    init_logging(&config, cli.verbose)?;

    match cli.command {
        Commands::Compose(args) => compose(args, &config).await?,
        Commands::Mime { files } => show_mime_types(&files),
        Commands::Endpoints { environment, auth } => {
            show_endpoints(environment.as_deref(), auth.as_deref(), &config)?;
        }
        Commands::Check { file } => check_message(&file, &config)?,
    }

    Ok(())
}

fn init_logging(config: &Config, verbose: bool) -> anyhow::Result<()> {
    let level = if verbose {
        "debug".to_string()
    } else {
        config.logging.level.to_lowercase()
    };

    match &config.logging.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(level)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(level)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

/// Build a message from command-line arguments
async fn compose(args: ComposeArgs, config: &Config) -> anyhow::Result<()> {
    tracing::info!("Composing message to {}", args.to);

    let mut builder = MessageBuilder::with_limits(config.limits);
    builder.to(&args.to)?.with_subject(&args.subject)?;

    if let Some(value) = args.sender_ident {
        builder.with_sender_ident(value);
    }
    if let Some(value) = args.sender_ref {
        builder.with_sender_ref_number(value);
    }
    if let Some(value) = args.recipient_ref {
        builder.with_recipient_ref_number(value);
    }
    if let Some(value) = args.to_hands {
        builder.with_to_hands(value);
    }
    if let Some(value) = args.message_type {
        builder.with_type(value);
    }
    builder
        .personal_delivery(args.personal_delivery)
        .allow_subst_delivery(args.allow_subst_delivery);

    let progress = AttachmentProgress::new((args.attachments.len() + args.texts.len()) as u64);

    for path in &args.attachments {
        let before = builder.current_total_size();
        if let Err(err) = builder.add_attachment_path_async(path).await {
            progress.abandon();
            return Err(err.into());
        }
        progress.added(
            &path.display().to_string(),
            builder.current_total_size() - before,
        );
    }

    for text in &args.texts {
        let Some((name, content)) = text.split_once('=') else {
            progress.abandon();
            anyhow::bail!("Invalid text attachment '{}' (expected NAME=CONTENT)", text);
        };
        if let Err(err) = builder.add_text_content(name, content) {
            progress.abandon();
            return Err(err.into());
        }
        progress.added(name, content.len() as u64);
    }

    let message = match builder.build() {
        Ok(message) => message,
        Err(err) => {
            progress.abandon();
            return Err(err.into());
        }
    };
    progress.finish_with_message("Message is valid".to_string());

    print_summary(&message, builder.current_total_size(), config);

    if let Some(output) = args.output {
        let json = serde_json::to_string_pretty(&message)?;
        std::fs::write(&output, json)?;
        println!("Written to: {}", output.display());
    }

    Ok(())
}

fn print_summary(message: &OutboundMessage, total_size: u64, config: &Config) {
    println!("Recipient: {}", message.recipient_id().unwrap_or_default());
    println!("Subject: {}", message.annotation().unwrap_or_default());
    println!(
        "Attachments: {} ({} of {})",
        message.files().len(),
        format_bytes(total_size),
        format_bytes(config.limits.max_total_size_bytes)
    );
    for file in message.files() {
        let size = file.content.encoded_len().unwrap_or(0);
        println!("  {} [{}] {}", file.file_name, file.mime_type, format_bytes(size));
    }
}

fn show_mime_types(files: &[String]) {
    for file in files {
        println!("{}\t{}", file, codec::mime_type_for(file));
    }
}

fn show_endpoints(
    environment: Option<&str>,
    auth: Option<&str>,
    config: &Config,
) -> anyhow::Result<()> {
    let environment = match environment {
        Some(name) => name.parse().map_err(|err: String| anyhow::anyhow!(err))?,
        None => config.environment()?,
    };
    let certificate = match auth {
        Some(mode) => parse_auth_mode(mode)?,
        None => config.certificate_mode()?,
    };

    println!("Environment: {environment}");
    for service in Service::ALL {
        println!(
            "  {:<12}{}",
            service.to_string(),
            service_url_for(environment, certificate, service)
        );
    }
    Ok(())
}

fn check_message(file: &Path, config: &Config) -> anyhow::Result<()> {
    let contents = std::fs::read_to_string(file)?;
    let message: OutboundMessage = serde_json::from_str(&contents)?;

    let validator = MessageValidator::new(config.limits);
    match validator.validate_for_sending(&message) {
        Ok(()) => {
            println!("{} {}", style("valid").green(), file.display());
            Ok(())
        }
        Err(err) => {
            println!("{} {}: {}", style("invalid").red(), file.display(), err);
            Err(err.into())
        }
    }
}
