//! Per-document and per-batch accuracy reporting.
//!
//! The batch figure is the plain mean of document percentages, so a
//! ten-word notice weighs as much as a full page. That is intentional and
//! matches the figures published from earlier runs.

use std::fs;
use std::path::Path;

use chrono::{Local, NaiveDateTime};
use tracing::info;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentAccuracy {
    pub name: String,
    /// `None` when the document had no tokens
    pub accuracy: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct AccuracyReport {
    generated: NaiveDateTime,
    entries: Vec<DocumentAccuracy>,
}

impl AccuracyReport {
    pub fn new() -> Self {
        Self::with_timestamp(Local::now().naive_local())
    }

    pub fn with_timestamp(generated: NaiveDateTime) -> Self {
        Self {
            generated,
            entries: Vec::new(),
        }
    }

    pub fn record(&mut self, name: impl Into<String>, accuracy: Option<f64>) {
        self.entries.push(DocumentAccuracy {
            name: name.into(),
            accuracy,
        });
    }

    pub fn entries(&self) -> &[DocumentAccuracy] {
        &self.entries
    }

    /// Documents that had at least one token
    pub fn scored(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries
            .iter()
            .filter_map(|e| e.accuracy.map(|a| (e.name.as_str(), a)))
    }

    /// Names of documents skipped for having no tokens
    pub fn skipped(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|e| e.accuracy.is_none())
            .map(|e| e.name.as_str())
    }

    /// Unweighted mean of the scored documents
    pub fn average(&self) -> Result<f64> {
        let (sum, count) = self
            .scored()
            .fold((0.0, 0usize), |(sum, count), (_, a)| (sum + a, count + 1));
        if count == 0 {
            return Err(Error::EmptyBatch);
        }
        Ok(sum / count as f64)
    }

    pub fn sort_by_name(&mut self) {
        self.entries.sort_by(|a, b| a.name.cmp(&b.name));
    }

    pub fn render(&self) -> String {
        let mut out = format!(
            "Generated: {}\n",
            self.generated.format("%Y-%m-%dT%H:%M:%S%.6f")
        );
        for entry in &self.entries {
            let line = match entry.accuracy {
                Some(accuracy) => format!("{}: {}%\n", entry.name, accuracy),
                None => format!("{}: no tokens\n", entry.name),
            };
            out.push_str(&line);
        }
        match self.average() {
            Ok(average) => out.push_str(&format!("Average accuracy: {}%\n", average)),
            Err(_) => out.push_str("Average accuracy: n/a\n"),
        }
        out
    }

    /// Write the rendered report to `path`, replacing any earlier report
    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, self.render())?;
        info!(
            "Wrote accuracy report for {} documents to {}",
            self.entries.len(),
            path.display()
        );
        Ok(())
    }
}

impl Default for AccuracyReport {
    fn default() -> Self {
        Self::new()
    }
}
