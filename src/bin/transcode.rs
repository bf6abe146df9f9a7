use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gateway_wire::config::{build_registry, load_config, WireConfig};
use gateway_wire::message::Payload;
use gateway_wire::observability::init_logging;
use gateway_wire::DynamicMessage;

#[derive(Parser)]
#[command(name = "transcode")]
#[command(about = "Decode request bodies with the gateway's wire codecs", long_about = None)]
struct Cli {
    /// TOML codec configuration; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a body and print the resulting message as JSON
    Decode {
        /// Content type of the input body
        #[arg(short = 't', long)]
        content_type: String,

        /// Re-encode the decoded message with this content type instead
        #[arg(long)]
        to: Option<String>,

        /// Input file; stdin when omitted
        input: Option<PathBuf>,
    },
    /// List registered content types
    Types,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => WireConfig::default(),
    };
    init_logging(&config.observability.log_level)?;

    let registry = build_registry(&config)?;

    match cli.command {
        Commands::Types => {
            for mime_type in registry.mime_types() {
                println!("{}", mime_type);
            }
        }
        Commands::Decode {
            content_type,
            to,
            input,
        } => {
            let decoder = registry
                .lookup(&content_type)
                .ok_or_else(|| format!("no codec registered for {}", content_type))?;

            let mut reader: Box<dyn Read> = match input {
                Some(path) => Box::new(File::open(path)?),
                None => Box::new(io::stdin().lock()),
            };

            let mut message = DynamicMessage::new();
            decoder.decode_from(&mut reader, &mut message)?;
            tracing::info!(
                content_type = %content_type,
                fields = message.len(),
                "Decoded body"
            );

            let mut stdout = io::stdout().lock();
            match to {
                Some(target) => {
                    let encoder = registry
                        .lookup(&target)
                        .ok_or_else(|| format!("no codec registered for {}", target))?;
                    encoder.encode_to(&mut stdout, Payload::Message(&message))?;
                }
                None => {
                    serde_json::to_writer_pretty(&mut stdout, message.fields())?;
                }
            }
            writeln!(stdout)?;
        }
    }

    Ok(())
}
