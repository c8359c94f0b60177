//! Reference vocabulary and morphological normalizers.
//!
//! The lexicon is a flat wordlist and must be present: recognition cannot
//! run without it. Normalizers are optional extras that accept inflected
//! forms the wordlist lacks (`running`, `churches`).

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use tracing::{info, warn};
use zspell::Dictionary;

use crate::config::LexiconConfig;
use crate::error::{Error, Result};

/// Suffix detachment rules for nouns, verbs and adjectives, tried in order
const DETACHMENTS: &[(&str, &str)] = &[
    // nouns
    ("s", ""),
    ("ses", "s"),
    ("ves", "f"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
    // verbs
    ("es", "e"),
    ("es", ""),
    ("ed", "e"),
    ("ed", ""),
    ("ing", "e"),
    ("ing", ""),
    // adjectives
    ("er", ""),
    ("est", ""),
    ("er", "e"),
    ("est", "e"),
];

/// Immutable set of lowercase known words
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    words: HashSet<String>,
}

impl Lexicon {
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Load a wordlist, one word per line. Lines starting with `#` are
    /// comments.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::MissingResource {
                what: "lexicon wordlist",
                path: path.to_path_buf(),
            });
        }
        let lexicon = Self::from_words(read_word_lines(path)?);
        info!("Loaded lexicon {}: {} words", path.display(), lexicon.len());
        Ok(lexicon)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Reduces an inflected form to its dictionary base form
pub trait Morphology: Send + Sync {
    fn base_form(&self, word: &str) -> Option<String>;

    fn name(&self) -> &'static str;
}

/// Rule-based normalizer in the style of WordNet's `morphy`: irregular
/// forms come from an exception table, regular ones from suffix rules
/// checked against a lemma inventory.
#[derive(Debug, Clone, Default)]
pub struct MorphyNormalizer {
    lemmas: HashSet<String>,
    exceptions: HashMap<String, String>,
}

impl MorphyNormalizer {
    pub fn new<I, S>(lemmas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            lemmas: lemmas
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
            exceptions: HashMap::new(),
        }
    }

    pub fn with_exception(mut self, inflected: &str, base: &str) -> Self {
        self.exceptions
            .insert(inflected.to_lowercase(), base.to_lowercase());
        self
    }

    /// Load a lemma list and an optional exception list. Exception lines
    /// hold an inflected form followed by one or more base forms; the first
    /// base wins.
    pub fn load(lemmas: &Path, exceptions: Option<&Path>) -> Result<Self> {
        if !lemmas.exists() {
            return Err(Error::MissingResource {
                what: "lemma list",
                path: lemmas.to_path_buf(),
            });
        }
        let mut normalizer = Self::new(read_word_lines(lemmas)?);

        if let Some(path) = exceptions {
            if path.exists() {
                for line in read_word_lines(path)? {
                    let mut fields = line.split_whitespace();
                    if let (Some(inflected), Some(base)) = (fields.next(), fields.next()) {
                        normalizer = normalizer.with_exception(inflected, base);
                    }
                }
            } else {
                warn!("Exception list not found: {}", path.display());
            }
        }

        info!(
            "Loaded lemma list: {} lemmas, {} exceptions",
            normalizer.lemmas.len(),
            normalizer.exceptions.len()
        );
        Ok(normalizer)
    }
}

impl Morphology for MorphyNormalizer {
    fn base_form(&self, word: &str) -> Option<String> {
        if let Some(base) = self.exceptions.get(word) {
            return Some(base.clone());
        }
        if self.lemmas.contains(word) {
            return Some(word.to_string());
        }
        DETACHMENTS
            .iter()
            .filter_map(|(suffix, ending)| {
                word.strip_suffix(suffix)
                    .map(|stem| format!("{}{}", stem, ending))
            })
            .find(|candidate| !candidate.is_empty() && self.lemmas.contains(candidate))
    }

    fn name(&self) -> &'static str {
        "morphy"
    }
}

/// Hunspell dictionary. Its affix rules accept inflected forms directly, so
/// an accepted word stands in for its own base form.
pub struct HunspellNormalizer {
    dict: Dictionary,
}

impl HunspellNormalizer {
    /// Load `<name>.aff` and `<name>.dic` from `dict_dir`
    pub fn load(dict_dir: &Path, name: &str) -> Result<Self> {
        let aff_path = dict_dir.join(format!("{}.aff", name));
        let dic_path = dict_dir.join(format!("{}.dic", name));

        for path in [&aff_path, &dic_path] {
            if !path.exists() {
                return Err(Error::MissingResource {
                    what: "hunspell dictionary",
                    path: path.clone(),
                });
            }
        }

        let aff_content = fs::read_to_string(&aff_path)?;
        let dic_content = fs::read_to_string(&dic_path)?;

        let dict = zspell::builder()
            .config_str(&aff_content)
            .dict_str(&dic_content)
            .build()
            .map_err(|e| Error::Dictionary(format!("{}: {}", name, e)))?;

        info!("Loaded hunspell dictionary: {}", name);
        Ok(Self { dict })
    }
}

impl Morphology for HunspellNormalizer {
    fn base_form(&self, word: &str) -> Option<String> {
        self.dict.check_word(word).then(|| word.to_string())
    }

    fn name(&self) -> &'static str {
        "hunspell"
    }
}

/// Lexicon plus the normalizers consulted for words it lacks
pub struct LexiconProvider {
    lexicon: Lexicon,
    normalizers: Vec<Box<dyn Morphology>>,
}

impl LexiconProvider {
    pub fn new(lexicon: Lexicon) -> Self {
        Self {
            lexicon,
            normalizers: Vec::new(),
        }
    }

    pub fn with_normalizer(mut self, normalizer: impl Morphology + 'static) -> Self {
        self.normalizers.push(Box::new(normalizer));
        self
    }

    /// Load everything named in the config. A missing wordlist is fatal;
    /// missing normalizer resources are logged and skipped.
    pub fn load(config: &LexiconConfig) -> Result<Self> {
        let wordlist = config
            .wordlist
            .as_deref()
            .ok_or_else(|| Error::Config("lexicon.wordlist is not set".to_string()))?;
        let mut provider = Self::new(Lexicon::load(wordlist)?);

        if let Some(lemmas) = &config.lemmas {
            match MorphyNormalizer::load(lemmas, config.exceptions.as_deref()) {
                Ok(normalizer) => provider = provider.with_normalizer(normalizer),
                Err(e) => warn!("Skipping morphological normalizer: {}", e),
            }
        }

        if let Some(dir) = &config.hunspell_dir {
            match HunspellNormalizer::load(dir, &config.hunspell_name) {
                Ok(normalizer) => provider = provider.with_normalizer(normalizer),
                Err(e) => warn!("Skipping hunspell dictionary: {}", e),
            }
        }

        info!("{}", provider.stats());
        Ok(provider)
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn contains(&self, word: &str) -> bool {
        self.lexicon.contains(word)
    }

    /// First base form any normalizer finds
    pub fn base_form(&self, word: &str) -> Option<String> {
        self.normalizers.iter().find_map(|n| n.base_form(word))
    }

    pub fn stats(&self) -> String {
        let names: Vec<&str> = self.normalizers.iter().map(|n| n.name()).collect();
        format!(
            "Lexicon: {} words, normalizers: [{}]",
            self.lexicon.len(),
            names.join(", ")
        )
    }
}

fn read_word_lines(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
