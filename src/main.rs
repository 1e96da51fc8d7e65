use std::collections::HashSet;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::mpsc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{error, info, warn};

use selah::{
    parse_key, parse_sheet, Config, FileSource, LoadState, PitchClass, SelahError, SnapshotEvent,
    SongSource, Viewer,
};

mod cli;
use cli::{
    Cli, Commands, DetectKeyCommand, ImportCommand, ListCommand, ShowCommand, TransposeCommand,
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::List(cmd) => list(&config, cmd, &mut out),
        Commands::Show(cmd) => show(&config, cmd, &mut out),
        Commands::Transpose(cmd) => transpose(cmd, &mut out),
        Commands::DetectKey(cmd) => detect_key(&config, cmd, &mut out),
        Commands::Import(cmd) => import(&config, cmd),
        Commands::Keys => {
            for key in PitchClass::ALL {
                writeln!(out, "{}", key)?;
            }
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Error reading config '{}'", path.display()))?,
        None => Config::default(),
    };
    if let Some(snapshot) = &cli.snapshot {
        config.snapshot = Some(snapshot.clone());
    }
    if let Some(collection) = &cli.collection {
        config.collection = collection.clone();
    }
    Ok(config)
}

fn snapshot_source(config: &Config) -> Result<FileSource> {
    let path = config
        .snapshot
        .as_ref()
        .context("No song database given; pass --snapshot or set `snapshot` in the config")?;
    Ok(FileSource::new(path))
}

/// Load the collection into a fresh viewer; a load failure is fatal.
fn open_viewer(config: &Config) -> Result<Viewer> {
    let source = snapshot_source(config)?;
    let (tx, rx) = mpsc::channel();
    let subscription = source.subscribe(
        &config.collection,
        Box::new(move |event: SnapshotEvent| {
            let _ = tx.send(event);
        }),
    );

    let mut viewer = Viewer::from_config(config);
    for event in rx.try_iter() {
        viewer.handle(event);
    }
    subscription.unsubscribe();

    if let LoadState::Failed(message) = viewer.state() {
        return Err(SelahError::LoadError(message.clone()).into());
    }
    Ok(viewer)
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Error reading file '{}'", path.display())),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text).context("Error reading stdin")?;
            Ok(text)
        }
    }
}

fn require_key(key: &str) -> Result<PitchClass> {
    parse_key(key).ok_or_else(|| SelahError::UnknownKey(key.to_string()).into())
}

fn list(config: &Config, cmd: ListCommand, out: &mut impl Write) -> Result<()> {
    let mut viewer = open_viewer(config)?;
    if let Some(query) = cmd.search {
        viewer.set_query(query);
    }

    let results = viewer.results();
    if results.is_empty() {
        writeln!(out, "No songs found")?;
        return Ok(());
    }
    for song in results {
        writeln!(
            out,
            "{}  |  {}  |  {}",
            song.title,
            song.artist().unwrap_or("—"),
            song.original_key.as_deref().filter(|k| !k.is_empty()).unwrap_or("?")
        )?;
    }
    Ok(())
}

fn show(config: &Config, cmd: ShowCommand, out: &mut impl Write) -> Result<()> {
    let mut viewer = open_viewer(config)?;
    if !viewer.select_by_id(&cmd.song) {
        bail!("Song not found: {}", cmd.song);
    }
    if let Some(key) = &cmd.key {
        viewer.set_key(require_key(key)?);
    }

    let Some(song) = viewer.selected() else {
        bail!("Song not found: {}", cmd.song);
    };
    writeln!(out, "{}", song.title)?;
    writeln!(out, "{}", song.artist().unwrap_or("—"))?;
    match song.original_key() {
        Some(original) if viewer.is_transposed() => {
            writeln!(out, "Key: {} (original: {})", viewer.key(), original)?
        }
        Some(original) => writeln!(out, "Key: {}", original)?,
        None => writeln!(out, "Key: ? (not transposable)")?,
    }
    writeln!(out)?;
    writeln!(out, "{}", viewer.rendered_sheet())?;
    Ok(())
}

fn transpose(cmd: TransposeCommand, out: &mut impl Write) -> Result<()> {
    let from = require_key(&cmd.from)?;
    let to = require_key(&cmd.to)?;
    let text = read_input(cmd.file.as_deref())?;
    let transposed = selah::transpose_text(&text, Some(from.name()), Some(to.name()));
    out.write_all(transposed.as_bytes())?;
    Ok(())
}

fn detect_key(config: &Config, cmd: DetectKeyCommand, out: &mut impl Write) -> Result<()> {
    let text = read_input(cmd.file.as_deref())?;
    writeln!(out, "{}", selah::detect_key_within(&text, config.key_scan_limit))?;
    Ok(())
}

fn import(config: &Config, cmd: ImportCommand) -> Result<()> {
    let source = snapshot_source(config)?;
    let mut imported = HashSet::new();
    let mut stored = 0usize;
    let mut failures = 0usize;

    for path in &cmd.files {
        let result = fs::read_to_string(path)
            .map_err(SelahError::from)
            .and_then(|text| parse_sheet(&text));
        let sheet = match result {
            Ok(sheet) => sheet,
            Err(e) => {
                error!("Error in {}: {}", path.display(), e);
                failures += 1;
                continue;
            }
        };

        let fallback_title = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut song = sheet.into_song(&fallback_title, config.key_scan_limit);
        if song.artist.is_none() {
            song.artist = cmd.artist.clone();
        }
        song.processed_at = Some(cmd.label.clone());

        let slug = song.slug();
        if !imported.insert(slug.clone()) {
            warn!("Duplicate skipped: {} - {}", song.title, song.artist().unwrap_or(""));
            continue;
        }

        if let Err(e) = source.store(&config.collection, &slug, &song) {
            error!("Error storing {}: {}", path.display(), e);
            failures += 1;
            continue;
        }
        stored += 1;
        info!(
            "OK -> {} | {} | Key: {} | Slug: {}",
            song.title,
            song.artist().unwrap_or(""),
            song.original_key.as_deref().unwrap_or("?"),
            slug
        );
    }

    info!("Import finished. {} songs imported or updated.", stored);
    if failures > 0 {
        bail!("{} of {} files failed to import", failures, cmd.files.len());
    }
    Ok(())
}
