use anyhow::{Context, Result};
use clap::Parser;
use std::fs;

use pdf_interleave::batch::{Command, InputDocument, Session};
use pdf_interleave::cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::new()
        .filter_level(match args.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    // Read input files
    let mut inputs = Vec::with_capacity(args.inputs.len());
    for path in &args.inputs {
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "input.pdf".to_string());
        inputs.push(InputDocument { name, bytes });
    }

    log::info!("Loaded {} input file(s)", inputs.len());

    let mut session = Session::new();
    session.set_inputs(inputs);
    if session.trigger() != Command::RunBatch {
        anyhow::bail!("No files to process");
    }

    let outcome = session
        .run()
        .with_context(|| "Failed to package batch results")?;

    for failure in &outcome.failures {
        log::warn!("Skipped {}: {}", failure.file_name, failure.reason);
    }

    let download = match outcome.download {
        Some(download) => download,
        None => {
            let reason = outcome
                .failures
                .first()
                .map(|f| f.reason.clone())
                .unwrap_or_else(|| "no output produced".to_string());
            anyhow::bail!("Processing failed: {}", reason);
        }
    };

    fs::create_dir_all(&args.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            args.output_dir.display()
        )
    })?;
    let output_path = args.output_dir.join(&download.file_name);
    fs::write(&output_path, &download.bytes)
        .with_context(|| format!("Failed to write output file: {}", output_path.display()))?;

    println!(
        "Successfully wrote {} to {}",
        download.media_type,
        output_path.display()
    );
    if !outcome.failures.is_empty() {
        println!(
            "{} file(s) could not be processed and were left out",
            outcome.failures.len()
        );
    }

    Ok(())
}
