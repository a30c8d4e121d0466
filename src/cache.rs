//! Per-category memoization of lookup results.
//!
//! Each [`Category`] owns its own [`ResultCache`]. Clearing swaps every
//! category for a fresh instance at once; handles captured before the clear
//! keep pointing at the instance they were taken from.

use dashmap::DashMap;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Synonym,
    Antonym,
    Rhyme,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Synonym, Category::Antonym, Category::Rhyme];
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "syn" | "synonym" | "synonyms" => Ok(Category::Synonym),
            "ant" | "antonym" | "antonyms" => Ok(Category::Antonym),
            "rhyme" | "rhymes" => Ok(Category::Rhyme),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Synonym => write!(f, "synonyms"),
            Category::Antonym => write!(f, "antonyms"),
            Category::Rhyme => write!(f, "rhymes"),
        }
    }
}

/// Word to result list, for one category.
///
/// Keys are taken as a slice so compound terms can be passed later, but only
/// the first element is matched today, lowercased. An absent entry and an
/// entry holding an empty list read back the same way: as a miss.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: DashMap<String, Vec<String>>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored results for `key[0]`, or an empty list when there are none.
    pub fn get<S: AsRef<str>>(&self, key: &[S]) -> Vec<String> {
        match Self::normalize(key) {
            Some(word) => self
                .entries
                .get(&word)
                .map(|entry| entry.value().clone())
                .unwrap_or_default(),
            None => Vec::new(),
        }
    }

    /// Store or overwrite the results for `key[0]`. An empty key is ignored.
    pub fn set<S: AsRef<str>>(&self, key: &[S], results: Vec<String>) {
        if let Some(word) = Self::normalize(key) {
            self.entries.insert(word, results);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn normalize<S: AsRef<str>>(key: &[S]) -> Option<String> {
        key.first().map(|word| word.as_ref().to_lowercase())
    }
}

/// The session's caches, one per category.
#[derive(Debug)]
pub struct CacheSet {
    caches: RwLock<Arc<HashMap<Category, Arc<ResultCache>>>>,
}

impl CacheSet {
    pub fn new() -> Self {
        Self {
            caches: RwLock::new(Self::fresh()),
        }
    }

    /// Handle to the current cache for `category`.
    ///
    /// Callers should take this once per lookup and write back through the
    /// same handle.
    pub fn cache(&self, category: Category) -> Arc<ResultCache> {
        let caches = self
            .caches
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&caches[&category])
    }

    /// Replace every category cache with an empty one in a single swap.
    pub fn clear(&self) {
        let mut caches = self
            .caches
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *caches = Self::fresh();
        tracing::debug!("cleared lookup caches");
    }

    /// Number of cached words per category.
    pub fn stats(&self) -> Vec<(Category, usize)> {
        Category::ALL
            .iter()
            .map(|&category| (category, self.cache(category).len()))
            .collect()
    }

    fn fresh() -> Arc<HashMap<Category, Arc<ResultCache>>> {
        Arc::new(
            Category::ALL
                .iter()
                .map(|&category| (category, Arc::new(ResultCache::new())))
                .collect(),
        )
    }
}

impl Default for CacheSet {
    fn default() -> Self {
        Self::new()
    }
}
