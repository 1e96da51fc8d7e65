use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "selah", version, about = "Browse chord sheets and transpose them to any key")]
pub struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// JSON export of the song database (overrides the config)
    #[arg(short, long, global = true)]
    pub snapshot: Option<PathBuf>,

    /// Database path of the song collection (overrides the config)
    #[arg(long, global = true)]
    pub collection: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List songs, optionally filtered by title or artist
    List(ListCommand),
    /// Print one song's sheet, optionally in another key
    Show(ShowCommand),
    /// Transpose a chord sheet read from a file or stdin
    Transpose(TransposeCommand),
    /// Guess the original key of a chord sheet
    DetectKey(DetectKeyCommand),
    /// Add sheet files to the song database
    Import(ImportCommand),
    /// Print the keys songs can be shown in
    Keys,
}

#[derive(Args, Debug)]
pub struct ListCommand {
    /// Case-insensitive text to look for in titles and artists
    #[arg(short = 'q', long)]
    pub search: Option<String>,
}

#[derive(Args, Debug)]
pub struct ShowCommand {
    /// Record id or exact title
    pub song: String,

    /// Key to show the sheet in (defaults to the original key)
    #[arg(short, long)]
    pub key: Option<String>,
}

#[derive(Args, Debug)]
pub struct TransposeCommand {
    /// Key the sheet is written in
    #[arg(long)]
    pub from: String,

    /// Key to transpose to
    #[arg(long)]
    pub to: String,

    /// Sheet file; stdin when omitted
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DetectKeyCommand {
    /// Sheet file; stdin when omitted
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ImportCommand {
    /// Sheet files, plain text or with YAML frontmatter
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Artist for sheets whose frontmatter names none
    #[arg(short, long)]
    pub artist: Option<String>,

    /// Recorded as the record's processing label
    #[arg(long, default_value = "manual")]
    pub label: String,
}
