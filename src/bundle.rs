use crate::blocks::{Block, BlockView};
use crate::generator::{generate_program, GenerateOptions, Language};
use anyhow::{anyhow, bail, Context, Result};
use serde_json::{json, Value};
use std::fs;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::ZipArchive;

const BUNDLE_FORMAT: &str = "blockgen-bundle";
const BUNDLE_VERSION: u64 = 1;

pub type BundleProgressCallback<'a> = dyn FnMut(usize, usize, &str) + 'a;

/// Program file name inside a bundle for `language`.
pub fn program_file_name(language: Language) -> String {
    format!("program.{}", language.file_extension())
}

pub fn write_bundle_file(blocks: &[Block], output_path: &Path) -> Result<()> {
    write_bundle_file_with_progress::<fn(usize, usize, &str)>(blocks, output_path, None)
}

/// Builds the bundle and writes it to `output_path`, creating parent directories.
pub fn write_bundle_file_with_progress<F>(
    blocks: &[Block],
    output_path: &Path,
    progress: Option<&mut F>,
) -> Result<()>
where
    F: FnMut(usize, usize, &str),
{
    let bytes = build_bundle_bytes_with_progress(blocks, progress)?;
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output_path, bytes)
        .with_context(|| format!("Failed to write '{}'.", output_path.display()))?;
    Ok(())
}

pub fn build_bundle_bytes(blocks: &[Block]) -> Result<Vec<u8>> {
    build_bundle_bytes_with_progress::<fn(usize, usize, &str)>(blocks, None)
}

/// Generates every target and packs the programs with a digest manifest.
pub fn build_bundle_bytes_with_progress<F>(blocks: &[Block], progress: Option<&mut F>) -> Result<Vec<u8>>
where
    F: FnMut(usize, usize, &str),
{
    let mut progress = progress.map(|cb| cb as &mut BundleProgressCallback<'_>);
    let top = blocks.iter().map(|b| b as &dyn BlockView).collect::<Vec<_>>();
    let total = Language::ALL.len();

    let mut programs = Vec::with_capacity(total);
    for (index, language) in Language::ALL.into_iter().enumerate() {
        let source = generate_program(&top, GenerateOptions { language })?;
        programs.push((language, source));
        if let Some(cb) = progress.as_deref_mut() {
            cb(index + 1, total, &format!("Generating {}", language));
        }
    }

    let mut out = Cursor::new(Vec::<u8>::new());
    let mut zip = zip::ZipWriter::new(&mut out);
    let opts = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let manifest = json!({
        "format": BUNDLE_FORMAT,
        "version": BUNDLE_VERSION,
        "top_blocks": blocks.len(),
        "files": programs
            .iter()
            .map(|(language, source)| {
                json!({
                    "name": program_file_name(*language),
                    "language": language.name(),
                    "md5": format!("{:x}", md5::compute(source.as_bytes())),
                })
            })
            .collect::<Vec<_>>(),
    });
    zip.start_file("manifest.json", opts)?;
    zip.write_all(serde_json::to_string_pretty(&manifest)?.as_bytes())?;

    for (language, source) in &programs {
        zip.start_file(program_file_name(*language), opts)?;
        zip.write_all(source.as_bytes())?;
    }
    zip.finish()?;
    info!(files = programs.len(), "packed bundle");
    Ok(out.into_inner())
}

/// Reads a bundle back, checking each program against its manifest digest.
pub fn read_bundle_bytes(bytes: &[u8]) -> Result<Vec<(Language, String)>> {
    let mut zip = ZipArchive::new(Cursor::new(bytes))
        .map_err(|_| anyhow!("Input is not a valid bundle archive."))?;
    let manifest: Value = serde_json::from_str(&read_zip_entry_text(&mut zip, "manifest.json")?)
        .context("Invalid manifest.json in bundle.")?;
    let format = manifest
        .get("format")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if format != BUNDLE_FORMAT {
        bail!("Invalid bundle format '{}'.", format);
    }
    let version = manifest
        .get("version")
        .and_then(Value::as_u64)
        .unwrap_or_default();
    if version != BUNDLE_VERSION {
        bail!(
            "Unsupported bundle version {} (expected {}).",
            version,
            BUNDLE_VERSION
        );
    }
    let files = manifest
        .get("files")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("manifest.json is missing 'files' array."))?;

    let mut programs = Vec::with_capacity(files.len());
    for file in files {
        let field = |key: &str| {
            file.get(key)
                .and_then(Value::as_str)
                .ok_or_else(|| anyhow!("Bundle file entry missing '{}'.", key))
        };
        let name = field("name")?;
        let language = field("language")?
            .parse::<Language>()
            .map_err(|e| anyhow!(e))?;
        let expected = field("md5")?;
        let source = read_zip_entry_text(&mut zip, name)?;
        let actual = format!("{:x}", md5::compute(source.as_bytes()));
        if actual != expected {
            bail!(
                "Digest mismatch for '{}': manifest has {}, content hashes to {}.",
                name,
                expected,
                actual
            );
        }
        programs.push((language, source));
    }
    Ok(programs)
}

fn read_zip_entry_text<R: Read + Seek>(zip: &mut ZipArchive<R>, name: &str) -> Result<String> {
    let mut entry = zip
        .by_name(name)
        .with_context(|| format!("Missing '{}' in bundle.", name))?;
    let mut text = String::new();
    entry
        .read_to_string(&mut text)
        .with_context(|| format!("Failed reading '{}' from bundle.", name))?;
    Ok(text)
}
