// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Pathedit: inspect a saved drawing and optionally rewrite it in the
//! current schema.
//!
//! Usage: pathedit [--config editor.toml] <drawing.json> [--out out.json]

use anyhow::{Context, Result, bail};
use pathedit::data::{load_from_path, save_to_path};
use pathedit::{EditSession, EditorConfig};
use std::path::PathBuf;

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().context("--config needs a path")?;
                args.config = Some(PathBuf::from(path));
            }
            "--out" => {
                let path = iter.next().context("--out needs a path")?;
                args.output = Some(PathBuf::from(path));
            }
            _ if args.input.is_none() => args.input = Some(PathBuf::from(arg)),
            _ => bail!("unexpected argument: {arg}"),
        }
    }
    Ok(args)
}

fn main() -> Result<()> {
    pathedit::init_tracing();

    let args = parse_args()?;
    let Some(input) = args.input else {
        bail!("Usage: pathedit [--config editor.toml] <drawing.json> [--out out.json]");
    };

    let config = match &args.config {
        Some(path) => EditorConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EditorConfig::default(),
    };

    let doc = load_from_path(&input)
        .with_context(|| format!("failed to load drawing {}", input.display()))?;
    tracing::info!("Loaded {} (schema {})", input.display(), doc.version);

    let mut session = EditSession::with_config(config);
    session.replace_document(doc);

    for target in session.draw_order() {
        if let pathedit::model::ZTarget::Path(id) = target {
            let Some(path) = session.store.path(id) else {
                continue;
            };
            let bounds = session.store.path_tight_bounds(id);
            tracing::info!(
                "{} '{}': {} vertices, closed={}, kind={}, bounds={:?}",
                id,
                path.label(),
                path.len(),
                path.is_closed(),
                path.kind().name(),
                bounds
            );
        }
    }

    if let Some(output) = args.output {
        save_to_path(&session.document(), &output)
            .with_context(|| format!("failed to save drawing {}", output.display()))?;
    }
    Ok(())
}
