//! Headless boxlabel session driven by line commands on stdin.
//!
//! ```text
//! boxlabel photo.png --import labels.csv --export labels.csv < script.txt
//! ```
//!
//! Every event the session emits is printed to stdout as one JSON object per
//! line.

use anyhow::{Context, Result, bail, ensure};
use boxlabel::format;
use boxlabel::{BoundingBox, EditorConfig, EditorSession};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "boxlabel")]
#[command(version, about = "Edit rectangle annotations for an image from a command script")]
struct Cli {
    /// Image to annotate (only its dimensions are read).
    #[arg(value_name = "IMAGE")]
    image: PathBuf,
    /// JSON editor configuration.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// CSV labels to load after the image.
    #[arg(long, value_name = "CSV")]
    import: Option<PathBuf>,
    /// CSV file to write when input ends.
    #[arg(long, value_name = "CSV")]
    export: Option<PathBuf>,
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EditorConfig::default(),
    };

    env_logger::Builder::new()
        .filter_level(config.log_level.to_level_filter())
        .parse_default_env()
        .init();

    let (width, height) = image::image_dimensions(&cli.image)
        .with_context(|| format!("failed to read image {}", cli.image.display()))?;

    let mut session = EditorSession::new(config);
    session.on_image_loaded(width, height);

    if let Some(path) = &cli.import {
        let records = format::import_path(path)
            .with_context(|| format!("failed to import {}", path.display()))?;
        session.import_records(records)?;
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    print_events(&mut out, &mut session)?;

    for line in io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Err(e) = execute(&mut session, line, &mut out) {
            log::warn!("{}: {:#}", line, e);
            writeln!(out, "{}", serde_json::json!({ "error": format!("{e:#}") }))?;
        }
        print_events(&mut out, &mut session)?;
    }

    if let Some(path) = &cli.export {
        format::export_path(&session.export_records(), path)
            .with_context(|| format!("failed to export {}", path.display()))?;
    }

    Ok(())
}

/// Run one script line against the session.
fn execute(session: &mut EditorSession, line: &str, out: &mut impl Write) -> Result<()> {
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    match verb {
        "press" => {
            let [x, y] = parse_floats(rest)?;
            session.on_pointer_press(x, y);
        }
        "drag" => {
            let [x, y] = parse_floats(rest)?;
            session.on_pointer_drag(x, y);
        }
        "release" => {
            let [x, y] = parse_floats(rest)?;
            let outcome = session.on_pointer_release(x, y);
            log::info!("Release: {:?}", outcome);
        }
        "undo" => {
            session.undo();
        }
        "redo" => {
            session.redo();
        }
        "delete" => {
            session.delete_annotation(parse_id(rest)?)?;
        }
        "name" => {
            let (id, name) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            session.set_name(parse_id(id)?, name.trim())?;
        }
        "box" => {
            let (id, coords) = rest
                .split_once(char::is_whitespace)
                .context("usage: box ID X1 Y1 X2 Y2")?;
            let values: Vec<i32> = coords
                .split_whitespace()
                .map(|v| v.parse().with_context(|| format!("invalid coordinate '{v}'")))
                .collect::<Result<_>>()?;
            ensure!(values.len() == 4, "usage: box ID X1 Y1 X2 Y2");
            let bbox = BoundingBox::new(values[0], values[1], values[2], values[3]);
            session.set_box(parse_id(id)?, bbox)?;
        }
        "select" => {
            session.select(parse_id(rest)?)?;
        }
        "zoom" => match rest {
            "in" => session.zoom(1.0),
            "out" => session.zoom(-1.0),
            other => bail!("usage: zoom in|out, got '{other}'"),
        },
        "list" => {
            writeln!(out, "{}", serde_json::to_string(&session.export_records())?)?;
        }
        other => bail!("unknown command '{other}'"),
    }
    Ok(())
}

fn parse_floats(text: &str) -> Result<[f64; 2]> {
    let mut parts = text.split_whitespace();
    let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
        bail!("expected two coordinates, got '{text}'");
    };
    Ok([
        x.parse().with_context(|| format!("invalid coordinate '{x}'"))?,
        y.parse().with_context(|| format!("invalid coordinate '{y}'"))?,
    ])
}

fn parse_id(text: &str) -> Result<u32> {
    text.trim()
        .parse()
        .with_context(|| format!("invalid annotation id '{text}'"))
}

fn print_events(out: &mut impl Write, session: &mut EditorSession) -> Result<()> {
    for event in session.take_events() {
        writeln!(out, "{}", serde_json::to_string(&event)?)?;
    }
    Ok(())
}
