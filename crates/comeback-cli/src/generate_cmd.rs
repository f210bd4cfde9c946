use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};

use comeback_core::client::RemotePlanClient;
use comeback_core::composer::{Composer, Notice, PLAN_EXPORTED, PlanForm};
use comeback_core::provider::OpenAiProvider;
use comeback_core::share::{ShareOutcome, SharePayload, ShareTarget};
use comeback_core::{PlanGenerator, PlanService};

use crate::config::{self, ConfigFile};

/// Options for `comeback generate`.
#[derive(Debug)]
pub struct GenerateOptions {
    pub confession: String,
    pub goals: String,
    pub days: String,
    /// URL of a running `comeback serve`; generate in-process when absent.
    pub remote: Option<String>,
    pub model: Option<String>,
    pub output: Option<PathBuf>,
    pub share_url: Option<String>,
}

/// Prints the share payload to stdout.
struct TerminalShare;

impl ShareTarget for TerminalShare {
    fn is_available(&self) -> bool {
        true
    }

    fn share(&self, payload: &SharePayload) {
        println!("{}", payload.title);
        println!("{}", payload.text);
        println!("{}", payload.url);
    }
}

fn print_notice(notice: &Notice) {
    if notice.is_failure() {
        eprintln!("{}: {}", notice.title, notice.description);
    } else {
        println!("{}: {}", notice.title, notice.description);
    }
}

/// Fill the form and submit it; a failure notice becomes an error.
pub async fn compose(generator: &dyn PlanGenerator, form: PlanForm) -> Result<Composer> {
    let mut composer = Composer::new();
    *composer.form_mut() = form;
    let notice = composer.submit(generator).await;
    if notice.is_failure() {
        bail!("{}: {}", notice.title, notice.description);
    }
    print_notice(&notice);
    Ok(composer)
}

/// Write the text export of the current plan to `path`.
pub fn write_export(composer: &Composer, path: &Path) -> Result<()> {
    let text = composer
        .export_text()
        .context("no plan to export")?;
    std::fs::write(path, text).with_context(|| format!("cannot create output file: {}", path.display()))?;
    Ok(())
}

pub async fn run_generate(opts: GenerateOptions, file: Option<&ConfigFile>) -> Result<()> {
    let form = PlanForm::new(opts.confession, opts.goals, opts.days);

    let composer = match opts.remote.as_deref() {
        Some(endpoint) => {
            tracing::info!(%endpoint, "generating via remote plan service");
            let client = RemotePlanClient::new(
                endpoint,
                Duration::from_secs(RemotePlanClient::DEFAULT_TIMEOUT_SECS),
            )?;
            compose(&client, form).await?
        }
        None => {
            let provider = config::resolve_provider(file, opts.model.as_deref())?;
            let service = PlanService::new(Arc::new(OpenAiProvider::new(provider)?));
            compose(&service, form).await?
        }
    };

    match opts.output.as_deref() {
        Some(path) => {
            write_export(&composer, path)?;
            print_notice(&PLAN_EXPORTED);
            println!("Written to {}", path.display());
        }
        None => {
            if let Some(text) = composer.export_text() {
                print!("{text}");
            }
        }
    }

    if let Some(url) = opts.share_url.as_deref() {
        if let Some(ShareOutcome::Fallback(message)) = composer.share(&TerminalShare, url) {
            println!("{message}");
        }
    }

    Ok(())
}
