//! On-disk harvest layout.
//!
//! A corpus root holds one directory per harvest, each full of `.txt`
//! articles. Cleaned copies and the accuracy report for a harvest go to
//! `<root>/<output_dir>/<harvest>/`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::CleanerConfig;
use crate::entities::{frequent_fragments, fragments_from_names, EntityRegistry};
use crate::error::{Error, Result};
use crate::pipeline::{Cleaner, Document};

/// Outcome of cleaning one harvest directory
#[derive(Debug, Clone, PartialEq)]
pub struct HarvestSummary {
    pub harvest: String,
    pub output_dir: PathBuf,
    pub documents: usize,
    /// `None` when no document in the harvest had any tokens
    pub average_accuracy: Option<f64>,
}

/// Read an article file. Bytes that aren't valid UTF-8 become U+FFFD
/// rather than failing the whole file.
pub fn read_article(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Read every `.txt` article in `dir`, skipping the files the pipeline
/// itself reads or writes. Sorted by file name.
pub fn read_documents(dir: &Path, reserved: &[&str]) -> Result<Vec<Document>> {
    let mut documents = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("txt") {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            warn!("Skipping non UTF-8 file name: {}", path.display());
            continue;
        };
        if reserved.contains(&name) {
            continue;
        }
        documents.push(Document::new(name, read_article(&path)?));
    }
    documents.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(documents)
}

/// Clean one harvest directory and write its outputs
pub fn clean_harvest(
    cleaner: &Cleaner,
    corpus_root: &Path,
    harvest_dir: &Path,
    output_dir: &Path,
) -> Result<HarvestSummary> {
    let config = cleaner.config();
    let harvest = dir_name(harvest_dir)?;
    info!("Processing: {}", harvest);

    let entities = EntityRegistry::discover(corpus_root, harvest_dir, &config.entities_file);
    let documents = read_documents(
        harvest_dir,
        &[
            config.entities_file.as_str(),
            config.names_file.as_str(),
            config.report_file.as_str(),
        ],
    )?;

    fs::create_dir_all(output_dir)?;
    let outcome = cleaner.clean_batch(&documents, &entities);
    for document in &outcome.documents {
        fs::write(output_dir.join(&document.name), &document.text)?;
    }
    outcome
        .report
        .write_to(&output_dir.join(&config.report_file))?;

    let average_accuracy = match outcome.report.average() {
        Ok(average) => Some(average),
        Err(Error::EmptyBatch) => None,
        Err(e) => return Err(e),
    };

    Ok(HarvestSummary {
        harvest,
        output_dir: output_dir.to_path_buf(),
        documents: outcome.documents.len(),
        average_accuracy,
    })
}

/// Clean every harvest directory under `corpus_root`
pub fn clean_corpus(cleaner: &Cleaner, corpus_root: &Path) -> Result<Vec<HarvestSummary>> {
    let output_root = corpus_root.join(&cleaner.config().output_dir);
    let mut summaries = Vec::new();
    for harvest_dir in harvest_dirs(corpus_root, &output_root)? {
        let output_dir = output_root.join(dir_name(&harvest_dir)?);
        summaries.push(clean_harvest(cleaner, corpus_root, &harvest_dir, &output_dir)?);
    }
    info!("Cleaned {} harvests under {}", summaries.len(), corpus_root.display());
    Ok(summaries)
}

/// Build entity lists from names an external extraction pass wrote to
/// `names_file` in each harvest directory (one name per line).
///
/// Each harvest gets its own `entities_file` of unique fragments. The corpus
/// root gets `all_<entities_file>` with every fragment, repeats included,
/// and `entities_file` with fragments seen in more than one place.
pub fn build_entity_lists(corpus_root: &Path, config: &CleanerConfig) -> Result<EntityRegistry> {
    let names_file = config.names_file.as_str();
    let entities_file = config.entities_file.as_str();
    let output_root = corpus_root.join(&config.output_dir);
    let mut all_fragments = Vec::new();

    for harvest_dir in harvest_dirs(corpus_root, &output_root)? {
        let names_path = harvest_dir.join(names_file);
        if !names_path.exists() {
            warn!("No entity names in {}", harvest_dir.display());
            continue;
        }
        let content = read_article(&names_path)?;
        let fragments = fragments_from_names(content.lines().map(str::trim));
        EntityRegistry::from_fragments(&fragments).write(&harvest_dir.join(entities_file))?;
        all_fragments.extend(fragments);
    }

    all_fragments.sort();
    let mut all_content = all_fragments.join("\n");
    if !all_content.is_empty() {
        all_content.push('\n');
    }
    fs::write(
        corpus_root.join(format!("all_{}", entities_file)),
        all_content,
    )?;

    let registry = frequent_fragments(&all_fragments, 1);
    registry.write(&corpus_root.join(entities_file))?;
    info!(
        "Built entity list: {} fragments, {} kept",
        all_fragments.len(),
        registry.len()
    );
    Ok(registry)
}

fn harvest_dirs(corpus_root: &Path, exclude: &Path) -> Result<Vec<PathBuf>> {
    if !corpus_root.is_dir() {
        return Err(Error::MissingResource {
            what: "corpus directory",
            path: corpus_root.to_path_buf(),
        });
    }
    let mut dirs = Vec::new();
    for entry in fs::read_dir(corpus_root)? {
        let path = entry?.path();
        if path.is_dir() && path != exclude {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn dir_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| Error::Config(format!("unusable directory name: {}", path.display())))
}
