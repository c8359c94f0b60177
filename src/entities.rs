//! Proper-noun fragments that supplement the lexicon.
//!
//! Entity lists come from an earlier named-entity extraction pass over the
//! corpus. The registry only consumes them; it never tags text itself.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::tokenize::tokenize;

#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    fragments: HashSet<String>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fragments<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            fragments: fragments
                .into_iter()
                .map(|f| f.as_ref().trim().to_lowercase())
                .filter(|f| !f.is_empty())
                .collect(),
        }
    }

    /// Load a whitespace separated entity file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::MissingResource {
                what: "entity list",
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path)?;
        let registry = Self::from_fragments(
            tokenize(&content)
                .into_iter()
                .filter(|t| t.is_word())
                .map(|t| t.lower),
        );
        info!("Loaded {} entities from {}", registry.len(), path.display());
        Ok(registry)
    }

    /// Look for `file_name` in the corpus root first, then in the harvest
    /// directory. Without either the registry is empty.
    pub fn discover(corpus_root: &Path, harvest_dir: &Path, file_name: &str) -> Self {
        for dir in [corpus_root, harvest_dir] {
            let path = dir.join(file_name);
            if !path.exists() {
                continue;
            }
            match Self::load(&path) {
                Ok(registry) => return registry,
                Err(e) => warn!("Could not read entity list: {}", e),
            }
        }
        warn!("No entities file for {}", harvest_dir.display());
        Self::new()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.fragments.contains(word)
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn merge(&mut self, other: EntityRegistry) {
        self.fragments.extend(other.fragments);
    }

    /// Sorted fragments
    pub fn sorted(&self) -> Vec<&str> {
        let sorted: BTreeSet<&str> = self.fragments.iter().map(String::as_str).collect();
        sorted.into_iter().collect()
    }

    /// Write one fragment per line, sorted
    pub fn write(&self, path: &Path) -> Result<()> {
        let mut content = self.sorted().join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        fs::write(path, content)?;
        debug!("Wrote {} entities to {}", self.len(), path.display());
        Ok(())
    }
}

/// Turn extracted entity names into lowercase fragments, repeats kept.
///
/// Only title-case alphabetic names are trusted (`Alfred Deakin`, not
/// `THE MINISTER` or `No. 7`).
pub fn fragments_from_names<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .filter(|name| {
            let mut words = name.split_whitespace().peekable();
            words.peek().is_some() && words.all(|w| is_title_word(w))
        })
        .flat_map(|name| name.split_whitespace().map(str::to_lowercase))
        .collect()
}

/// Registry of fragments seen more than `min_count` times across harvests
pub fn frequent_fragments(fragments: &[String], min_count: usize) -> EntityRegistry {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for fragment in fragments {
        *counts.entry(fragment.as_str()).or_insert(0) += 1;
    }
    EntityRegistry::from_fragments(
        counts
            .into_iter()
            .filter(|(_, count)| *count > min_count)
            .map(|(fragment, _)| fragment),
    )
}

fn is_title_word(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() && first.is_uppercase() => {
            chars.all(|c| c.is_alphabetic() && !c.is_uppercase())
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fragments_lowercases() {
        let registry = EntityRegistry::from_fragments(["Deakin", " sydney ", ""]);
        assert!(registry.contains("deakin"));
        assert!(registry.contains("sydney"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_fragments_from_names() {
        let fragments = fragments_from_names([
            "Alfred Deakin",
            "THE MINISTER",
            "No. 7",
            "Sydney",
            "McKenzie",
            "",
        ]);
        assert_eq!(fragments, vec!["alfred", "deakin", "sydney"]);
    }

    #[test]
    fn test_frequent_fragments() {
        let fragments: Vec<String> = ["sydney", "sydney", "perth", "hobart", "hobart", "hobart"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let registry = frequent_fragments(&fragments, 1);
        assert_eq!(registry.sorted(), vec!["hobart", "sydney"]);
    }

    #[test]
    fn test_load_and_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entities.txt");
        fs::write(&path, "Sydney\nmelbourne deakin\n, \n").unwrap();

        let registry = EntityRegistry::load(&path).unwrap();
        assert_eq!(registry.sorted(), vec!["deakin", "melbourne", "sydney"]);

        let out = dir.path().join("out.txt");
        registry.write(&out).unwrap();
        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            "deakin\nmelbourne\nsydney\n"
        );
    }

    #[test]
    fn test_discover_prefers_corpus_root() {
        let root = tempfile::tempdir().unwrap();
        let harvest = root.path().join("harvest");
        fs::create_dir(&harvest).unwrap();
        fs::write(root.path().join("entities.txt"), "barton\n").unwrap();
        fs::write(harvest.join("entities.txt"), "deakin\n").unwrap();

        let registry = EntityRegistry::discover(root.path(), &harvest, "entities.txt");
        assert!(registry.contains("barton"));
        assert!(!registry.contains("deakin"));
    }

    #[test]
    fn test_discover_falls_back_to_harvest_dir() {
        let root = tempfile::tempdir().unwrap();
        let harvest = root.path().join("harvest");
        fs::create_dir(&harvest).unwrap();
        fs::write(harvest.join("entities.txt"), "deakin\n").unwrap();

        let registry = EntityRegistry::discover(root.path(), &harvest, "entities.txt");
        assert!(registry.contains("deakin"));
    }

    #[test]
    fn test_discover_missing_is_empty() {
        let root = tempfile::tempdir().unwrap();
        let registry = EntityRegistry::discover(root.path(), root.path(), "entities.txt");
        assert!(registry.is_empty());
    }

    #[test]
    fn test_load_missing() {
        let err = EntityRegistry::load(Path::new("/nonexistent/entities.txt")).unwrap_err();
        assert!(matches!(err, Error::MissingResource { .. }));
    }
}
