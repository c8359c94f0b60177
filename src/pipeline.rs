//! Normalize, tokenize, classify and re-join: the full cleaning run for one
//! document or a batch of them.

use std::collections::BTreeSet;

use rayon::prelude::*;
use tracing::{debug, info, warn};
use whatlang::Lang;

use crate::classify::{Classifier, DocumentClassification};
use crate::config::CleanerConfig;
use crate::entities::EntityRegistry;
use crate::error::Result;
use crate::lexicon::LexiconProvider;
use crate::normalize::TextNormalizer;
use crate::punctuation::Rejoiner;
use crate::report::AccuracyReport;
use crate::tokenize::tokenize;

/// Raw article text as supplied by the harvester
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub name: String,
    pub text: String,
}

impl Document {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CleanedDocument {
    pub name: String,
    /// Final text with placeholders and publication spacing
    pub text: String,
    pub classification: DocumentClassification,
    /// Correction table substitutions made during normalization
    pub corrections: u64,
    /// ISO 639-3 code, when detection was reliable
    pub language: Option<&'static str>,
}

impl CleanedDocument {
    pub fn accuracy(&self) -> Option<f64> {
        self.classification.accuracy()
    }

    /// Detected as something other than English
    pub fn is_foreign(&self) -> bool {
        self.language.is_some_and(|code| code != Lang::Eng.code())
    }
}

/// Sorted unique vocabulary of a batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VocabularySummary {
    pub recognized: BTreeSet<String>,
    pub rejected: BTreeSet<String>,
    pub recognized_count: usize,
    pub rejected_count: usize,
}

#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Sorted by document name
    pub documents: Vec<CleanedDocument>,
    pub report: AccuracyReport,
}

impl BatchOutcome {
    pub fn vocabulary(&self) -> VocabularySummary {
        let mut summary = VocabularySummary::default();
        for document in &self.documents {
            for token in &document.classification.tokens {
                let surface = token.token.surface.clone();
                if token.classification.is_recognized() {
                    summary.recognized_count += 1;
                    summary.recognized.insert(surface);
                } else {
                    summary.rejected_count += 1;
                    summary.rejected.insert(surface);
                }
            }
        }
        summary
    }
}

/// Shared, read-only cleaning resources. Build once, then clean any number
/// of documents, from any number of threads.
pub struct Cleaner {
    config: CleanerConfig,
    normalizer: TextNormalizer,
    classifier: Classifier,
    rejoiner: Rejoiner,
    lexicon: LexiconProvider,
}

impl Cleaner {
    pub fn new(config: CleanerConfig, lexicon: LexiconProvider) -> Result<Self> {
        config.validate()?;
        let normalizer = TextNormalizer::new(config.fold_compatibility, config.correction_table()?);
        let classifier = Classifier::from_config(&config);
        let rejoiner = Rejoiner::new(&config.punctuation)?;
        Ok(Self {
            config,
            normalizer,
            classifier,
            rejoiner,
            lexicon,
        })
    }

    /// Load the lexicon named in the config and build a cleaner
    pub fn from_config(config: CleanerConfig) -> Result<Self> {
        let lexicon = LexiconProvider::load(&config.lexicon)?;
        Self::new(config, lexicon)
    }

    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }

    pub fn lexicon(&self) -> &LexiconProvider {
        &self.lexicon
    }

    pub fn clean(&self, document: &Document, entities: &EntityRegistry) -> CleanedDocument {
        let normalized = self.normalizer.normalize_counted(&document.text);
        let language = self.detect_language(&document.name, &normalized.text);

        let tokens = tokenize(&normalized.text);
        let classification = self.classifier.classify(tokens, &self.lexicon, entities);
        let text = self.rejoiner.rejoin(&classification.clean_text());

        match classification.accuracy() {
            Some(accuracy) => debug!(
                "{}: {}/{} tokens recognized ({:.2}%), {} corrections",
                document.name,
                classification.recognized,
                classification.total,
                accuracy,
                normalized.corrections
            ),
            None => debug!("{}: no tokens", document.name),
        }

        CleanedDocument {
            name: document.name.clone(),
            text,
            classification,
            corrections: normalized.corrections,
            language,
        }
    }

    /// Clean every document and build the batch report. Output order is by
    /// document name regardless of how the work was scheduled.
    pub fn clean_batch(&self, documents: &[Document], entities: &EntityRegistry) -> BatchOutcome {
        let mut cleaned: Vec<CleanedDocument> = if self.config.parallel {
            documents
                .par_iter()
                .map(|doc| self.clean(doc, entities))
                .collect()
        } else {
            documents.iter().map(|doc| self.clean(doc, entities)).collect()
        };
        cleaned.sort_by(|a, b| a.name.cmp(&b.name));

        let mut report = AccuracyReport::new();
        for document in &cleaned {
            report.record(document.name.clone(), document.accuracy());
        }

        match report.average() {
            Ok(average) => info!(
                "Cleaned {} documents, average accuracy {:.2}%",
                cleaned.len(),
                average
            ),
            Err(e) => warn!("Cleaned {} documents: {}", cleaned.len(), e),
        }

        BatchOutcome {
            documents: cleaned,
            report,
        }
    }

    fn detect_language(&self, name: &str, text: &str) -> Option<&'static str> {
        if !self.config.check_language {
            return None;
        }
        let info = whatlang::detect(text)?;
        if !info.is_reliable() {
            return None;
        }
        if info.lang() != Lang::Eng {
            warn!(
                "{} looks like {} rather than English; accuracy will be low",
                name,
                info.lang().eng_name()
            );
        }
        Some(info.lang().code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{Classification, Recognition};
    use crate::lexicon::{Lexicon, MorphyNormalizer};

    const WORDS: &[&str] = &[
        "the", "cat", "sat", "on", "mat", "a", "i", "dog", "was", "in", "garden", "and", "it",
        "very", "long", "term", "example", "of", "this", "is", "meeting", "held", "town", "hall",
    ];

    fn cleaner(parallel: bool) -> Cleaner {
        let config = CleanerConfig {
            parallel,
            check_language: false,
            ..Default::default()
        };
        let lexicon = LexiconProvider::new(Lexicon::from_words(WORDS))
            .with_normalizer(MorphyNormalizer::new(WORDS.iter().copied().chain(["walk"])));
        Cleaner::new(config, lexicon).unwrap()
    }

    #[test]
    fn test_clean_document() {
        let doc = Document::new("article.txt", "tbe cat sat on teh mat.The dog walked in the gar-\n den, x");
        let cleaned = cleaner(false).clean(&doc, &EntityRegistry::new());

        assert_eq!(cleaned.text, "the cat sat on [?] mat. The dog walked in the garden,");
        assert_eq!(cleaned.corrections, 1);
        // "teh" becomes a placeholder, "x" is dropped
        assert_eq!(cleaned.classification.total, 15);
        assert_eq!(cleaned.classification.recognized, 13);
        assert_eq!(cleaned.accuracy(), Some(1300.0 / 15.0));
        assert_eq!(cleaned.language, None);
    }

    #[test]
    fn test_entities_rescue_names() {
        let doc = Document::new("a.txt", "Deakin held a meeting in the town hall");
        let cleaner = cleaner(false);

        let without = cleaner.clean(&doc, &EntityRegistry::new());
        assert_eq!(without.text, "[?] held a meeting in the town hall");

        let entities = EntityRegistry::from_fragments(["deakin"]);
        let with = cleaner.clean(&doc, &entities);
        assert_eq!(with.text, "Deakin held a meeting in the town hall");
        assert_eq!(
            with.classification.tokens[0].classification,
            Classification::Recognized(Recognition::Entity)
        );
        assert_eq!(with.accuracy(), Some(100.0));
    }

    #[test]
    fn test_empty_document() {
        let cleaned = cleaner(false).clean(&Document::new("blank.txt", " \n "), &EntityRegistry::new());
        assert_eq!(cleaned.accuracy(), None);
        assert_eq!(cleaned.text, "");
    }

    #[test]
    fn test_batch_sorted_and_averaged() {
        let documents = vec![
            Document::new("b.txt", "the cat zzkq qqzk"),
            Document::new("c.txt", ""),
            Document::new("a.txt", "the cat sat"),
        ];
        for parallel in [false, true] {
            let outcome = cleaner(parallel).clean_batch(&documents, &EntityRegistry::new());
            let names: Vec<&str> = outcome.documents.iter().map(|d| d.name.as_str()).collect();
            assert_eq!(names, vec!["a.txt", "b.txt", "c.txt"]);
            assert_eq!(outcome.report.average().unwrap(), 75.0);
            assert_eq!(outcome.report.skipped().collect::<Vec<_>>(), vec!["c.txt"]);
        }
    }

    #[test]
    fn test_vocabulary_summary() {
        let documents = vec![
            Document::new("a.txt", "the cat qqzk"),
            Document::new("b.txt", "the dog qqzk x"),
        ];
        let outcome = cleaner(false).clean_batch(&documents, &EntityRegistry::new());
        let vocabulary = outcome.vocabulary();
        assert_eq!(
            vocabulary.recognized.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["cat", "dog", "the"]
        );
        assert_eq!(
            vocabulary.rejected.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["qqzk", "x"]
        );
        assert_eq!(vocabulary.recognized_count, 4);
        assert_eq!(vocabulary.rejected_count, 3);
    }

    #[test]
    fn test_language_flag() {
        let config = CleanerConfig {
            check_language: true,
            parallel: false,
            ..Default::default()
        };
        let cleaner = Cleaner::new(config, LexiconProvider::new(Lexicon::from_words(WORDS))).unwrap();
        let doc = Document::new(
            "de.txt",
            "Die Regierung hat gestern beschlossen, dass die neuen Gesetze im ganzen Land \
             sofort in Kraft treten werden und alle Bürger davon betroffen sind. Der \
             Bürgermeister der Stadt erklärte, dass er mit dieser Entscheidung sehr \
             zufrieden sei und die Verwaltung bereits mit der Umsetzung begonnen habe.",
        );
        let cleaned = cleaner.clean(&doc, &EntityRegistry::new());
        assert!(cleaned.is_foreign());
    }
}
