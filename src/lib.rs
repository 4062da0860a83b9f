pub mod blocks;
pub mod bundle;
pub mod c_family;
pub mod dart;
pub mod definitions;
pub mod generator;
pub mod javascript;
pub mod names;
pub mod python;
pub mod selectors;
pub mod workspace;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli;

use anyhow::Result;
use blocks::{Block, BlockView};
use generator::{generate_program, GenerateOptions, Language};
use std::path::{Path, PathBuf};

#[cfg(all(target_arch = "wasm32", feature = "wasm-bindings"))]
pub mod wasm;

#[cfg(not(target_arch = "wasm32"))]
pub fn run_cli(args: &cli::Args) -> Result<()> {
    if args.bundle && args.output.is_none() {
        anyhow::bail!("--bundle requires an OUTPUT path.");
    }

    let progress = CliProgress::new("Generate", 3);
    progress.emit(1, "Resolving input path");
    let input = canonicalize_file(&args.input)?;

    progress.emit(2, "Loading workspace");
    let blocks = workspace::load_workspace(&input)?;

    if args.bundle {
        let output = args
            .output
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("--bundle requires an OUTPUT path."))?;
        let mut bundle_stage_cb = |step: usize, total: usize, label: &str| {
            progress.emit_with_total(2 + step, 2 + total, label);
        };
        bundle::write_bundle_file_with_progress(&blocks, output, Some(&mut bundle_stage_cb))?;
        return Ok(());
    }

    progress.emit(3, &format!("Generating {}", args.language));
    let source = generate_blocks(&blocks, args.language)?;
    match &args.output {
        Some(output) => {
            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(output, source.as_bytes())?;
        }
        None => print!("{}", source),
    }
    Ok(())
}

pub fn generate_blocks(blocks: &[Block], language: Language) -> Result<String> {
    let top = blocks.iter().map(|b| b as &dyn BlockView).collect::<Vec<_>>();
    Ok(generate_program(&top, GenerateOptions { language })?)
}

/// Generates `language` source from workspace XML text.
pub fn generate_source(xml: &str, language: Language) -> Result<String> {
    let blocks = workspace::parse_workspace(xml.as_bytes())?;
    generate_blocks(&blocks, language)
}

pub fn generate_file(input: &Path, language: Language) -> Result<String> {
    let input = canonicalize_file(input)?;
    let blocks = workspace::load_workspace(&input)?;
    generate_blocks(&blocks, language)
}

pub fn canonicalize_file(path: &Path) -> Result<PathBuf> {
    if !path.exists() || !path.is_file() {
        return Err(anyhow::anyhow!("Input file not found: '{}'.", path.display()));
    }
    Ok(path.canonicalize()?)
}

#[cfg(not(target_arch = "wasm32"))]
struct CliProgress {
    prefix: &'static str,
    total: usize,
}

#[cfg(not(target_arch = "wasm32"))]
impl CliProgress {
    fn new(prefix: &'static str, total: usize) -> Self {
        Self {
            prefix,
            total: total.max(1),
        }
    }

    fn emit(&self, step: usize, label: &str) {
        self.emit_with_total(step, self.total, label);
    }

    fn emit_with_total(&self, step: usize, total: usize, label: &str) {
        let total = total.max(1);
        let step = step.clamp(1, total);
        eprintln!(
            "[{}] {}... ({}/{}) {}",
            self.prefix,
            label,
            step,
            total,
            render_progress_bar(step, total, 14)
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn render_progress_bar(step: usize, total: usize, width: usize) -> String {
    let width = width.max(1);
    let filled = ((step * width) + (total / 2)) / total;
    let mut bar = String::with_capacity(width + 2);
    bar.push('[');
    bar.extend((0..width).map(|i| if i < filled { '=' } else { '-' }));
    bar.push(']');
    bar
}
