mod config;
mod generate_cmd;
mod serve_cmd;
mod show_cmd;

#[cfg(test)]
mod test_util;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use comeback_core::export::DEFAULT_FILE_NAME;

use generate_cmd::GenerateOptions;

#[derive(Parser)]
#[command(name = "comeback", about = "Roast, reality check and a day-by-day comeback plan")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a comeback config file
    Init {
        /// Completion provider API key to store in the config file
        #[arg(long)]
        api_key: Option<String>,
        /// Model identifier to store in the config file
        #[arg(long)]
        model: Option<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Run the plan generation HTTP service
    Serve {
        /// Address to bind (default: 127.0.0.1)
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on (default: 8787)
        #[arg(long)]
        port: Option<u16>,
        /// Override the completion model
        #[arg(long)]
        model: Option<String>,
    },
    /// Generate a comeback plan
    Generate {
        /// What you've been slacking on
        #[arg(long)]
        confession: String,
        /// What you want to achieve
        #[arg(long)]
        goals: String,
        /// Timeframe in days (7-100)
        #[arg(long, default_value = "30")]
        days: String,
        /// URL of a running `comeback serve` endpoint
        #[arg(long)]
        remote: Option<String>,
        /// Override the completion model (local generation only)
        #[arg(long)]
        model: Option<String>,
        /// Write the plan export to a file
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Also print the share message for this URL
        #[arg(long)]
        share_url: Option<String>,
    },
    /// Show an exported plan with progress
    Show {
        /// Plan export file
        #[arg(default_value = DEFAULT_FILE_NAME)]
        file: PathBuf,
        /// Completed day numbers (e.g. 1,2,5)
        #[arg(long, value_delimiter = ',')]
        done: Vec<u32>,
    },
}

/// Execute the `comeback init` command: write config file.
fn cmd_init(api_key: Option<String>, model: Option<String>, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let api_key = api_key.filter(|k| !k.trim().is_empty());
    let cfg = config::ConfigFile {
        provider: config::ProviderSection {
            api_key: api_key.clone(),
            model,
            ..Default::default()
        },
        server: config::ServerSection::default(),
    };

    let path = config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    match api_key {
        Some(key) => {
            let tail = key.char_indices().rev().nth(3).map_or(key.as_str(), |(i, _)| &key[i..]);
            println!("  provider.api_key = ...{tail}");
        }
        None => {
            println!("  provider.api_key not set; export COMEBACK_OPENAI_API_KEY or rerun with --api-key");
        }
    }
    println!();
    println!("Next: run `comeback serve` or `comeback generate`.");

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            api_key,
            model,
            force,
        } => {
            cmd_init(api_key, model, force)?;
        }
        Commands::Serve { bind, port, model } => {
            let file = config::load_config()?;
            // Fail before binding when no key is configured.
            let provider = config::resolve_provider(file.as_ref(), model.as_deref())?;
            let (bind, port) = config::resolve_listen(file.as_ref(), bind.as_deref(), port);
            serve_cmd::run_serve(provider, &bind, port).await?;
        }
        Commands::Generate {
            confession,
            goals,
            days,
            remote,
            model,
            output,
            share_url,
        } => {
            let file = config::load_config()?;
            let opts = GenerateOptions {
                confession,
                goals,
                days,
                remote,
                model,
                output,
                share_url,
            };
            generate_cmd::run_generate(opts, file.as_ref()).await?;
        }
        Commands::Show { file, done } => {
            show_cmd::run_show(&file, &done)?;
        }
    }

    Ok(())
}
