use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::RenderStyle;

#[derive(Parser)]
#[command(
    name = "amend",
    about = "Word-level amendments to reference paragraphs",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format; defaults to the configured render style
    #[arg(long, global = true)]
    pub format: Option<RenderStyle>,

    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the word-level changes between two text files
    Diff(DiffArgs),
    /// Render a stored amendment payload with its changes marked
    Render(RenderArgs),
    /// Browse the reference paragraph corpus
    Paragraphs(ParagraphsArgs),
    /// Amend a corpus paragraph and write the amendment payload
    Edit(EditArgs),
}

#[derive(Args)]
pub struct DiffArgs {
    /// File holding the original text
    pub original: PathBuf,
    /// File holding the edited text
    pub edited: PathBuf,
}

#[derive(Args)]
pub struct RenderArgs {
    /// Amendment payload (JSON)
    pub amendment: PathBuf,
}

#[derive(Args)]
pub struct CorpusArgs {
    /// Paragraph corpus (JSON); overrides the configured path
    #[arg(long)]
    pub corpus: Option<PathBuf>,
}

#[derive(Args)]
pub struct ParagraphsArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    #[command(subcommand)]
    pub action: ParagraphsAction,
}

#[derive(Subcommand)]
pub enum ParagraphsAction {
    /// List every paragraph
    List,
    /// Show one paragraph by citation label
    Show { label: String },
    /// Find paragraphs by label, title or text
    Search { query: String },
}

#[derive(Args)]
pub struct EditArgs {
    /// Citation label of the paragraph to amend (e.g. "¶324" or "324")
    pub label: String,
    /// File holding the edited paragraph text
    pub edited: PathBuf,
    /// Write the amendment payload here instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    #[command(flatten)]
    pub corpus: CorpusArgs,
}
