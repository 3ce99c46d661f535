//! `MailVerdict` - command-line email classifier
//!
//! Sends an email (text or file) to the classification service and prints
//! the verdict with its suggested reply.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod args;
mod clipboard;
mod view;

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use tokio::io::AsyncReadExt;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mailverdict_core::{
    ClassificationClient, FileUpload, Language, Phase, RequestDraft, Session, SubmitStatus,
};

use args::{Args, COPIED_NOTICE, Command, Input, USAGE};
use clipboard::SystemClipboard;

/// Environment variable holding the default interface language.
const LANGUAGE_ENV: &str = "MAILVERDICT_LANGUAGE";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Environment files may carry RUST_LOG, so load them before logging starts
    let env_file = load_env_file(Path::new("."));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "mailverdict=info,mailverdict_core=info,mailverdict_client=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(path) = env_file {
        debug!(path = %path.display(), "loaded environment file");
    }

    let args = match args::parse(std::env::args().skip(1)) {
        Ok(Command::Help) => {
            println!("{USAGE}");
            return Ok(());
        }
        Ok(Command::Classify(args)) => args,
        Err(e) => bail!("{e}\n\n{USAGE}"),
    };

    run(args).await
}

async fn run(args: Args) -> anyhow::Result<()> {
    let client = ClassificationClient::from_env()
        .context("classification service is not configured")?;
    info!(base_url = %client.config().base_url, "using classification service");

    let session = Session::new(client);
    let draft = build_draft(&args).await?;

    if session.submit(draft).await == SubmitStatus::Skipped {
        bail!("nothing to classify");
    }

    let state = session.snapshot();
    let result = match state.phase() {
        Phase::Success(result) => result,
        Phase::Failed(message) => bail!("{message}"),
        Phase::Idle | Phase::Submitting => bail!("classification did not complete"),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        print!("{}", view::render_result(result));
    }

    if args.copy {
        let mut clipboard = SystemClipboard::open().context("could not open the clipboard")?;
        if session.copy_suggestion(&mut clipboard)? {
            eprintln!("{COPIED_NOTICE}");
        }
    }

    Ok(())
}

async fn build_draft(args: &Args) -> anyhow::Result<RequestDraft> {
    let draft = match &args.input {
        Input::Text(text) => RequestDraft::text(text.clone()),
        Input::Stdin => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("could not read the email from standard input")?;
            RequestDraft::text(text)
        }
        Input::File(path) => {
            let upload = FileUpload::from_path(path)
                .await
                .with_context(|| format!("could not read {}", path.display()))?;
            RequestDraft::file(upload)
        }
    };

    Ok(draft.with_language(resolve_language(args.lang.as_deref())))
}

/// Picks the interface language: `--lang`, then the environment, then the default.
fn resolve_language(flag: Option<&str>) -> String {
    let code = flag
        .map(str::to_string)
        .or_else(|| std::env::var(LANGUAGE_ENV).ok())
        .unwrap_or_else(|| Language::default().code().to_string());

    match Language::parse(&code) {
        Some(language) => debug!(language = language.display_name(), "interface language"),
        None => warn!(code = %code, "unknown language, the service default will be used"),
    }
    code
}

/// Loads `.env.local`, falling back to `.env`, from `dir`.
fn load_env_file(dir: &Path) -> Option<PathBuf> {
    [".env.local", ".env"]
        .into_iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
        .and_then(|path| match dotenvy::from_path(&path) {
            Ok(()) => Some(path),
            Err(e) => {
                eprintln!("Failed to load {}: {e}", path.display());
                None
            }
        })
}
