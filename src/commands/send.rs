//! `send` command: the notification form.
//!
//! Non-interactive runs submit the flags once. Interactive runs prompt for
//! the fields, keep a draft of unsent input, and offer a retry after a
//! failed delivery. Every retry is a fresh, independent submission.

// Rust guideline compliant 2026-02

use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::config::Config;
use crate::draft::{DraftStore, DRAFT_FILE};
use crate::form::{Field, NotificationForm};
use crate::notifications::{DeliveryOptions, PushDelivery, WebPushDelivery};
use crate::sender::{NotificationSender, SendError};
use crate::status::{StatusReporter, TerminalReporter};
use crate::store::{LocalStorage, LOAD_TIMEOUT, STORE_FILE};

/// Arguments of the `send` command.
#[derive(Debug, Clone, Default)]
pub struct SendArgs {
    /// Title from the command line.
    pub title: Option<String>,
    /// Body from the command line.
    pub body: Option<String>,
    /// Per-message push options.
    pub options: DeliveryOptions,
    /// Prompt on the terminal for missing fields.
    pub interactive: bool,
}

/// Run the `send` command. Returns whether a notification was sent.
pub async fn run(config: Config, config_dir: &Path, args: SendArgs) -> Result<bool> {
    let store = LocalStorage::open(config_dir.join(STORE_FILE));
    if tokio::time::timeout(LOAD_TIMEOUT, store.ready())
        .await
        .is_err()
    {
        log::warn!("[Store] Still loading after {:?}", LOAD_TIMEOUT);
    }

    let delivery = WebPushDelivery::new(args.options.clone())?;
    let mut sender = NotificationSender::new(config, store, delivery);
    let mut reporter = TerminalReporter;

    if !args.interactive {
        let form = NotificationForm::new(
            args.title.unwrap_or_default(),
            args.body.unwrap_or_default(),
        );
        return Ok(sender.submit(&form, &mut reporter).await.is_ok());
    }

    let drafts = DraftStore::new(config_dir.join(DRAFT_FILE));
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stderr();
    run_interactive(&mut sender, &drafts, &args, &mut reporter, &mut input, &mut output).await
}

/// Prompt-submit loop of the interactive form.
pub async fn run_interactive<D: PushDelivery>(
    sender: &mut NotificationSender<D>,
    drafts: &DraftStore,
    args: &SendArgs,
    reporter: &mut dyn StatusReporter,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<bool> {
    let mut form = drafts.load();
    if let Some(title) = &args.title {
        form.title.clone_from(title);
    }
    if let Some(body) = &args.body {
        form.body.clone_from(body);
    }

    // Fields given on the command line are only prompted again after a
    // validation failure.
    let mut ask_title = args.title.is_none();
    let mut ask_body = args.body.is_none();

    loop {
        if ask_title {
            form.title = prompt_field(input, output, Field::Title, &form.title)?;
        }
        if ask_body {
            form.body = prompt_field(input, output, Field::Body, &form.body)?;
        }

        match sender.submit(&form, reporter).await {
            Ok(_) => {
                if let Err(e) = drafts.clear() {
                    log::warn!("{e:#}");
                }
                return Ok(true);
            }
            Err(SendError::Validation(errors)) => {
                save_draft(drafts, &form);
                ask_title = errors.iter().any(|e| e.field == Field::Title);
                ask_body = errors.iter().any(|e| e.field == Field::Body);
            }
            Err(SendError::Delivery(_)) => {
                save_draft(drafts, &form);
                if !confirm(input, output, "Try again?")? {
                    return Ok(false);
                }
                ask_title = true;
                ask_body = true;
            }
            Err(SendError::Unavailable(_)) => {
                save_draft(drafts, &form);
                return Ok(false);
            }
        }
    }
}

fn save_draft(drafts: &DraftStore, form: &NotificationForm) {
    if let Err(e) = drafts.save(form) {
        log::warn!("{e:#}");
    }
}

/// Ask for one field. An empty answer keeps `current`.
fn prompt_field(
    input: &mut impl BufRead,
    output: &mut impl Write,
    field: Field,
    current: &str,
) -> Result<String> {
    if current.is_empty() {
        write!(output, "{}: ", field.label())?;
    } else {
        write!(output, "{} [{}]: ", field.label(), current)?;
    }
    output.flush()?;

    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .with_context(|| format!("Failed to read {}", field.label()))?;
    anyhow::ensure!(read > 0, "Input closed while reading {}", field.label());

    let answer = line.trim_end_matches(['\r', '\n']);
    Ok(if answer.is_empty() {
        current.to_string()
    } else {
        answer.to_string()
    })
}

/// Yes/no question, defaulting to no.
fn confirm(input: &mut impl BufRead, output: &mut impl Write, question: &str) -> Result<bool> {
    write!(output, "{question} [y/N] ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}
