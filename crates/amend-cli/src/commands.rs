use std::path::{Path, PathBuf};

use amend_diff::{derive_changes, reconstruct};
use amend_session::{AmendmentSink, BoxError, SessionError};
use amend_store::{decode_amendment, decode_paragraphs, encode_amendment, InMemoryStore};
use amend_types::{Amendment, ReferenceParagraph};
use amend_workflow::Workflow;
use anyhow::{bail, Context};
use colored::Colorize;
use tracing::debug;

use crate::cli::*;
use crate::config::{AmendConfig, RenderStyle};
use crate::output;

pub fn run_command(cli: Cli, config: AmendConfig) -> anyhow::Result<()> {
    let style = cli.format.unwrap_or(config.render_style);
    match cli.command {
        Command::Diff(args) => cmd_diff(args, style),
        Command::Render(args) => cmd_render(args, style),
        Command::Paragraphs(args) => cmd_paragraphs(args, style, &config),
        Command::Edit(args) => cmd_edit(args, style, &config),
    }
}

fn cmd_diff(args: DiffArgs, style: RenderStyle) -> anyhow::Result<()> {
    let original = read_text(&args.original)?;
    let edited = read_text(&args.edited)?;
    let changes = derive_changes(&original, &edited);
    let annotated = reconstruct(&original, changes.as_slice());

    match style {
        RenderStyle::Json => {
            let amendment = Amendment::new(original, edited, changes);
            println!("{}", encode_amendment(&amendment)?);
        }
        RenderStyle::Html => println!("{}", annotated.to_html()),
        RenderStyle::Text if changes.is_empty() => println!("No changes."),
        RenderStyle::Text => {
            println!("{}", output::terminal(&annotated));
            println!("{}", output::summary(&annotated).dimmed());
        }
    }
    Ok(())
}

fn cmd_render(args: RenderArgs, style: RenderStyle) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(&args.amendment)
        .with_context(|| format!("reading {}", args.amendment.display()))?;
    let amendment = decode_amendment(&raw)
        .with_context(|| format!("decoding {}", args.amendment.display()))?;
    let annotated = reconstruct(&amendment.original_text, amendment.changes.as_slice());
    for warning in &annotated.warnings {
        eprintln!("{} {}", "warning:".yellow().bold(), warning);
    }

    match style {
        RenderStyle::Json => println!("{}", serde_json::to_string_pretty(&annotated)?),
        RenderStyle::Html => println!("{}", annotated.to_html()),
        RenderStyle::Text => {
            println!("{}", output::terminal(&annotated));
            if let Some(kind) = amendment.kind() {
                println!("{}", format!("{kind}: {}", output::summary(&annotated)).dimmed());
            }
        }
    }
    Ok(())
}

fn cmd_paragraphs(args: ParagraphsArgs, style: RenderStyle, config: &AmendConfig) -> anyhow::Result<()> {
    let workflow = load_corpus(args.corpus.corpus.as_deref(), config)?;
    match args.action {
        ParagraphsAction::Show { label } => {
            let paragraph = workflow.find_paragraph(&label)?;
            match style {
                RenderStyle::Json => println!("{}", serde_json::to_string_pretty(&paragraph)?),
                RenderStyle::Html => println!(
                    "<p>{}</p>",
                    amend_diff::escape_html(&paragraph.current_text)
                ),
                RenderStyle::Text => {
                    println!("{}", output::paragraph_line(&paragraph));
                    println!();
                    println!("{}", paragraph.current_text);
                }
            }
        }
        ParagraphsAction::List => print_paragraphs(&workflow.paragraphs()?, style)?,
        ParagraphsAction::Search { query } => {
            let found = workflow.search(&query)?;
            if found.is_empty() && style != RenderStyle::Json {
                println!("No paragraphs match {:?}.", query);
            } else {
                print_paragraphs(&found, style)?;
            }
        }
    }
    Ok(())
}

fn cmd_edit(args: EditArgs, style: RenderStyle, config: &AmendConfig) -> anyhow::Result<()> {
    let workflow = load_corpus(args.corpus.corpus.as_deref(), config)?;
    let edited = read_text(&args.edited)?;
    let (amendment, payload) = amend_paragraph(&workflow, &args.label, edited)?;

    let Some(out) = args.out else {
        println!("{payload}");
        return Ok(());
    };
    std::fs::write(&out, format!("{payload}\n"))
        .with_context(|| format!("writing {}", out.display()))?;
    println!("{} Wrote amendment to {}", "✓".green().bold(), out.display());
    if style == RenderStyle::Text {
        let annotated = reconstruct(&amendment.original_text, amendment.changes.as_slice());
        println!("{}", output::terminal(&annotated));
    }
    Ok(())
}

/// Run an edit session over `label` and return the amendment with its
/// encoded payload.
fn amend_paragraph(
    workflow: &Workflow<InMemoryStore>,
    label: &str,
    edited: String,
) -> anyhow::Result<(Amendment, String)> {
    let mut session = workflow.open_session(label)?;
    session.on_edit(edited)?;
    match session.submit(&mut PayloadSink) {
        Ok(payload) => {
            let amendment = session
                .amendment()
                .context("session lost its paragraph after submit")?;
            Ok((amendment, payload))
        }
        Err(SessionError::NoChanges) => {
            bail!("nothing changed: the edited text matches {}", label)
        }
        Err(e) => Err(e.into()),
    }
}

fn load_corpus(
    path: Option<&Path>,
    config: &AmendConfig,
) -> anyhow::Result<Workflow<InMemoryStore>> {
    let path: PathBuf = path.map_or_else(|| config.corpus_path.clone(), Path::to_path_buf);
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("reading corpus {}", path.display()))?;
    let paragraphs =
        decode_paragraphs(&raw).with_context(|| format!("decoding corpus {}", path.display()))?;
    debug!(paragraphs = paragraphs.len(), corpus = %path.display(), "corpus loaded");
    let store = InMemoryStore::with_paragraphs(paragraphs)?;
    Ok(Workflow::new(store))
}

fn print_paragraphs(paragraphs: &[ReferenceParagraph], style: RenderStyle) -> anyhow::Result<()> {
    if style == RenderStyle::Json {
        println!("{}", serde_json::to_string_pretty(paragraphs)?);
        return Ok(());
    }
    for paragraph in paragraphs {
        println!("{}", output::paragraph_line(paragraph));
    }
    Ok(())
}

/// Read a text file, dropping the final line ending editors add.
fn read_text(path: &Path) -> anyhow::Result<String> {
    let mut text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    Ok(text)
}

/// Encodes the submitted amendment as the JSON payload.
struct PayloadSink;

impl AmendmentSink for PayloadSink {
    type Receipt = String;

    fn persist(
        &mut self,
        _paragraph: &ReferenceParagraph,
        amendment: Amendment,
    ) -> Result<String, BoxError> {
        Ok(encode_amendment(&amendment)?)
    }
}
