//! Extension-based import and export.

use crate::{IoError, IoResult, csv_table, csv_tree, serde_formats, text};
use mt_model::MaterialCollection;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Format {
    Json,
    Yaml,
    Csv,
    Text,
}

impl Format {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            "csv" => Some(Format::Csv),
            "txt" => Some(Format::Text),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> IoResult<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| IoError::UnsupportedExtension {
                path: path.to_path_buf(),
            })
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn read_collection(path: &Path, format: Format) -> IoResult<MaterialCollection> {
    let label = file_label(path);
    match format {
        Format::Json => serde_formats::load_json(path),
        Format::Yaml => serde_formats::load_yaml(path),
        Format::Text => text::read_text(BufReader::new(File::open(path)?), &label),
        Format::Csv => {
            let content = std::fs::read_to_string(path)?;
            if csv_tree::is_tree(&content) {
                csv_tree::read_tree(content.as_bytes(), &label)
            } else {
                let stem = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| label.clone());
                let material = csv_table::read_table(content.as_bytes(), &label, &stem)?;
                let mut collection = MaterialCollection::new();
                collection.insert(material);
                Ok(collection)
            }
        }
    }
}

/// Import one file into `collection`, merging through the rename-on-collision policy.
///
/// Returns the names the file's materials were imported under. A failed read
/// leaves `collection` untouched.
pub fn import_file(collection: &mut MaterialCollection, path: &Path) -> IoResult<Vec<String>> {
    if !path.is_file() {
        return Err(IoError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let format = Format::from_path(path)?;
    let mut incoming = read_collection(path, format)?;
    incoming.record_filename(file_label(path));

    let names = incoming.names().to_vec();
    info!(path = %path.display(), ?format, materials = names.len(), "importing");
    collection.import_collection(incoming);
    Ok(names)
}

/// Import every matching file of `dir` in file-name order.
///
/// `extension` restricts the import to one extension; `None` takes every
/// recognised format. Names containing `~` (editor lock files) are skipped.
/// Returns the number of files imported.
pub fn import_directory(
    collection: &mut MaterialCollection,
    dir: &Path,
    extension: Option<&str>,
) -> IoResult<usize> {
    if !dir.is_dir() {
        return Err(IoError::NotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if file_label(&path).contains('~') {
            debug!(path = %path.display(), "skipping lock file");
            continue;
        }
        let ext = path.extension().and_then(|e| e.to_str());
        let wanted = match (extension, ext) {
            (Some(want), Some(ext)) => want.eq_ignore_ascii_case(ext),
            (None, Some(ext)) => Format::from_extension(ext).is_some(),
            (_, None) => false,
        };
        if wanted {
            paths.push(path);
        }
    }
    paths.sort();

    for path in &paths {
        import_file(collection, path)?;
    }
    info!(dir = %dir.display(), files = paths.len(), materials = collection.len(), "directory imported");
    Ok(paths.len())
}

/// Load a collection from a file or a directory, recording `path` as its source.
pub fn open(path: &Path) -> IoResult<MaterialCollection> {
    let mut collection = MaterialCollection::with_source(path.display().to_string());
    if path.is_dir() {
        import_directory(&mut collection, path, None)?;
    } else {
        import_file(&mut collection, path)?;
    }
    Ok(collection)
}

/// Write `collection` in the format named by the extension of `path`.
///
/// Text sheets are read-only.
pub fn export_file(collection: &MaterialCollection, path: &Path) -> IoResult<()> {
    match Format::from_path(path)? {
        Format::Json => serde_formats::save_json(path, collection)?,
        Format::Yaml => serde_formats::save_yaml(path, collection)?,
        Format::Csv => csv_tree::write_tree(BufWriter::new(File::create(path)?), collection)?,
        Format::Text => {
            return Err(IoError::UnsupportedExtension {
                path: path.to_path_buf(),
            });
        }
    }
    info!(path = %path.display(), materials = collection.len(), "exported");
    Ok(())
}
