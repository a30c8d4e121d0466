//! Cache-or-fetch coordination and the host-facing lookup flows.

use crate::cache::{CacheSet, Category};
use crate::config::Config;
use crate::context::ContextExtractor;
use crate::editor::{CursorEnd, Editor, Notifier, Picker};
use crate::error::LookupError;
use crate::lexical::LexicalClient;
use crate::{Span, WordContext};
use std::fmt;
use std::sync::Arc;

pub const SELECT_A_WORD: &str = "Select a word first";

/// One line of a lookup menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    /// Replace the captured span with this word.
    Replace(String),
    /// Open a picker over the full result list.
    ShowMore { hidden: usize },
}

impl fmt::Display for MenuEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuEntry::Replace(word) => write!(f, "{}", word),
            MenuEntry::ShowMore { hidden } => write!(f, "{} more…", hidden),
        }
    }
}

/// A rendered menu together with the context it was built for.
#[derive(Debug, Clone)]
pub struct Menu {
    pub context: WordContext,
    pub results: Vec<String>,
    pub entries: Vec<MenuEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Replaced(String),
    Dismissed,
    NoTarget,
    NoResults,
}

pub struct LookupCoordinator<C> {
    client: C,
    caches: Arc<CacheSet>,
    strict_antonyms: bool,
}

impl<C: LexicalClient> LookupCoordinator<C> {
    pub fn new(client: C, config: &Config) -> Self {
        Self::with_caches(client, Arc::new(CacheSet::new()), config)
    }

    pub fn with_caches(client: C, caches: Arc<CacheSet>, config: &Config) -> Self {
        Self {
            client,
            caches,
            strict_antonyms: config.strict_antonyms,
        }
    }

    pub fn caches(&self) -> &Arc<CacheSet> {
        &self.caches
    }

    pub fn clear_cache(&self) {
        self.caches.clear();
    }

    /// Cached results for `word`, fetching and storing them on a miss.
    ///
    /// An empty result is stored as-is and therefore fetched again next time.
    pub async fn process(&self, category: Category, word: &str) -> Result<Vec<String>, LookupError> {
        let cache = self.caches.cache(category);

        let cached = cache.get(&[word]);
        if !cached.is_empty() {
            tracing::debug!(%category, word, hits = cached.len(), "cache hit");
            return Ok(cached);
        }

        tracing::debug!(%category, word, "cache miss, fetching");
        let results = self.fetch(category, word).await.map_err(|err| {
            tracing::warn!(%category, word, error = %err, "lookup failed");
            err
        })?;

        cache.set(&[word], results.clone());
        Ok(results)
    }

    async fn fetch(&self, category: Category, word: &str) -> Result<Vec<String>, LookupError> {
        let results = match category {
            Category::Synonym => self.client.words_similar_to(word).await?,
            Category::Antonym => {
                self.client
                    .words_opposite_to(word, self.strict_antonyms)
                    .await?
            }
            Category::Rhyme => self.client.words_that_rhyme_with(word).await?,
        };
        Ok(results)
    }

    async fn process_in_context(
        &self,
        category: Category,
        context: &WordContext,
    ) -> Result<Vec<String>, LookupError> {
        tracing::debug!(%category, sentence = %context.sentence, "looking up in context");
        self.process(category, &context.word).await
    }

    /// Resolve the target and build menu entries, `max` of them inline.
    pub async fn menu_lookup<E: Editor + ?Sized>(
        &self,
        editor: &E,
        category: Category,
        max: usize,
    ) -> Result<Menu, LookupError> {
        let context = ContextExtractor::extract(editor);
        if context.is_empty() {
            return Err(LookupError::NoTarget);
        }

        let results = self.process_in_context(category, &context).await?;
        let entries = build_menu(&results, max);

        Ok(Menu {
            context,
            results,
            entries,
        })
    }

    /// Resolve the target, then let the user search the full result list.
    pub async fn command_lookup<E, P, N>(
        &self,
        editor: &mut E,
        category: Category,
        picker: &mut P,
        notifier: &mut N,
    ) -> Result<Outcome, LookupError>
    where
        E: Editor + ?Sized,
        P: Picker + ?Sized,
        N: Notifier + ?Sized,
    {
        let context = ContextExtractor::extract(editor);
        if context.is_empty() {
            notifier.notice(SELECT_A_WORD);
            return Ok(Outcome::NoTarget);
        }

        let results = self.process_in_context(category, &context).await?;
        if results.is_empty() {
            notifier.notice(&format!("No {} found for \"{}\"", category, context.word));
            return Ok(Outcome::NoResults);
        }

        let title = format!("{} for \"{}\"", category, context.word);
        Ok(match picker.pick(&title, &results) {
            Some(choice) => {
                apply(editor, &context.span, &choice);
                Outcome::Replaced(choice)
            }
            None => Outcome::Dismissed,
        })
    }

    /// Alliterative synonyms for the second word of a two-word selection.
    ///
    /// These are never cached; the pick replaces the whole selection.
    pub async fn alliterate<E, P, N>(
        &self,
        editor: &mut E,
        picker: &mut P,
        notifier: &mut N,
    ) -> Result<Outcome, LookupError>
    where
        E: Editor + ?Sized,
        P: Picker + ?Sized,
        N: Notifier + ?Sized,
    {
        let selection = editor.selection();
        let (prior_word, root_word) = split_alliteration_target(&selection);
        if root_word.is_empty() {
            notifier.notice(SELECT_A_WORD);
            return Ok(Outcome::NoTarget);
        }

        let results = self
            .client
            .alliterative_synonyms(prior_word, root_word)
            .await
            .map_err(|err| {
                tracing::warn!(prior_word, root_word, error = %err, "alliteration lookup failed");
                LookupError::from(err)
            })?;

        if results.is_empty() {
            notifier.notice(&format!(
                "No alliterative synonyms found for \"{}\"",
                root_word
            ));
            return Ok(Outcome::NoResults);
        }

        let title = format!("alliterative synonyms for \"{}\"", root_word);
        Ok(match picker.pick(&title, &results) {
            Some(choice) => {
                let from = editor.cursor(CursorEnd::From);
                let to = editor.cursor(CursorEnd::To);
                editor.replace_range(&choice, from, to);
                Outcome::Replaced(choice)
            }
            None => Outcome::Dismissed,
        })
    }
}

/// Inline entries for the first `max` results plus a "more" entry for the rest.
pub fn build_menu(results: &[String], max: usize) -> Vec<MenuEntry> {
    let mut entries: Vec<MenuEntry> = results
        .iter()
        .take(max)
        .cloned()
        .map(MenuEntry::Replace)
        .collect();

    if results.len() > max {
        entries.push(MenuEntry::ShowMore {
            hidden: results.len() - max,
        });
    }

    entries
}

/// Write `text` over the span captured when the lookup started.
pub fn apply<E: Editor + ?Sized>(editor: &mut E, span: &Span, text: &str) {
    editor.replace_range(text, span.from, span.to);
}

/// Split a selection on its first space into `(prior_word, root_word)`.
pub fn split_alliteration_target(selection: &str) -> (&str, &str) {
    match selection.split_once(' ') {
        Some((prior, root)) => (prior.trim(), root.trim()),
        None => (selection.trim(), ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::TextBuffer;
    use crate::error::ClientError;
    use crate::Position;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeClient {
        answers: HashMap<String, Vec<String>>,
        calls: AtomicUsize,
        alliteration_calls: Mutex<Vec<(String, String)>>,
        offline: bool,
        clear_during_fetch: Option<Arc<CacheSet>>,
    }

    impl FakeClient {
        fn with(word: &str, results: &[&str]) -> Self {
            let mut answers = HashMap::new();
            answers.insert(
                word.to_string(),
                results.iter().map(|s| s.to_string()).collect(),
            );
            Self {
                answers,
                ..Default::default()
            }
        }

        fn answer(&self, word: &str) -> Result<Vec<String>, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(caches) = &self.clear_during_fetch {
                caches.clear();
            }
            if self.offline {
                return Err(ClientError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE));
            }
            Ok(self.answers.get(word).cloned().unwrap_or_default())
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LexicalClient for FakeClient {
        async fn words_similar_to(&self, word: &str) -> Result<Vec<String>, ClientError> {
            self.answer(word)
        }

        async fn words_opposite_to(
            &self,
            word: &str,
            _strict: bool,
        ) -> Result<Vec<String>, ClientError> {
            self.answer(word)
        }

        async fn words_that_rhyme_with(&self, word: &str) -> Result<Vec<String>, ClientError> {
            self.answer(word)
        }

        async fn alliterative_synonyms(
            &self,
            prior_word: &str,
            root_word: &str,
        ) -> Result<Vec<String>, ClientError> {
            self.alliteration_calls
                .lock()
                .unwrap()
                .push((prior_word.to_string(), root_word.to_string()));
            self.answer(root_word)
        }
    }

    #[derive(Default)]
    struct Notices(Vec<String>);

    impl Notifier for Notices {
        fn notice(&mut self, message: &str) {
            self.0.push(message.to_string());
        }
    }

    /// Picks the item at `index`, remembering what it was shown.
    struct ScriptedPicker {
        index: Option<usize>,
        shown: Vec<String>,
    }

    impl ScriptedPicker {
        fn choosing(index: usize) -> Self {
            Self {
                index: Some(index),
                shown: Vec::new(),
            }
        }

        fn dismissing() -> Self {
            Self {
                index: None,
                shown: Vec::new(),
            }
        }
    }

    impl Picker for ScriptedPicker {
        fn pick(&mut self, _title: &str, items: &[String]) -> Option<String> {
            self.shown = items.to_vec();
            self.index.and_then(|i| items.get(i).cloned())
        }
    }

    fn coordinator(client: FakeClient) -> LookupCoordinator<FakeClient> {
        LookupCoordinator::new(client, &Config::default())
    }

    fn cursor_at(text: &str, ch: usize) -> TextBuffer {
        let mut buffer = TextBuffer::new(text);
        buffer.set_cursor(Position::new(0, ch));
        buffer
    }

    #[tokio::test]
    async fn test_second_lookup_is_served_from_cache() {
        let lookup = coordinator(FakeClient::with("happy", &["glad", "content"]));

        for category in Category::ALL {
            let first = lookup.process(category, "happy").await.unwrap();
            let second = lookup.process(category, "happy").await.unwrap();
            assert_eq!(first, second);
        }
        assert_eq!(lookup.client.calls(), 3);
    }

    #[tokio::test]
    async fn test_empty_result_is_fetched_again() {
        let lookup = coordinator(FakeClient::default());

        assert!(lookup.process(Category::Rhyme, "orange").await.unwrap().is_empty());
        assert!(lookup.process(Category::Rhyme, "orange").await.unwrap().is_empty());
        assert_eq!(lookup.client.calls(), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates_and_leaves_cache_alone() {
        let client = FakeClient {
            offline: true,
            ..Default::default()
        };
        let lookup = coordinator(client);

        let err = lookup.process(Category::Synonym, "calm").await.unwrap_err();
        assert!(matches!(err, LookupError::Fetch(ClientError::Status(_))));
        assert!(lookup.caches().cache(Category::Synonym).is_empty());
    }

    #[tokio::test]
    async fn test_clear_forces_refetch() {
        let lookup = coordinator(FakeClient::with("bright", &["vivid"]));

        lookup.process(Category::Synonym, "bright").await.unwrap();
        lookup.clear_cache();
        assert!(lookup.caches().cache(Category::Synonym).get(&["bright"]).is_empty());

        lookup.process(Category::Synonym, "bright").await.unwrap();
        assert_eq!(lookup.client.calls(), 2);
    }

    #[tokio::test]
    async fn test_fetch_racing_a_clear_does_not_repopulate_new_cache() {
        let caches = Arc::new(CacheSet::new());
        let mut client = FakeClient::with("swift", &["quick"]);
        client.clear_during_fetch = Some(Arc::clone(&caches));
        let lookup = LookupCoordinator::with_caches(client, Arc::clone(&caches), &Config::default());

        let results = lookup.process(Category::Synonym, "swift").await.unwrap();
        assert_eq!(results, vec!["quick"]);
        assert!(caches.cache(Category::Synonym).get(&["swift"]).is_empty());
    }

    #[test]
    fn test_menu_truncates_with_more_entry() {
        let results: Vec<String> = (0..20).map(|i| format!("word{}", i)).collect();
        let entries = build_menu(&results, 15);

        assert_eq!(entries.len(), 16);
        assert_eq!(entries[0], MenuEntry::Replace("word0".to_string()));
        assert_eq!(entries[14], MenuEntry::Replace("word14".to_string()));
        assert_eq!(entries[15], MenuEntry::ShowMore { hidden: 5 });
        assert_eq!(entries[15].to_string(), "5 more…");
    }

    #[test]
    fn test_menu_without_overflow() {
        let results = vec!["a".to_string(), "b".to_string()];
        let entries = build_menu(&results, 15);
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| matches!(e, MenuEntry::Replace(_))));
    }

    #[tokio::test]
    async fn test_menu_lookup_without_target_skips_fetch() {
        let lookup = coordinator(FakeClient::default());
        let buffer = cursor_at("one   two", 4);

        let err = lookup
            .menu_lookup(&buffer, Category::Synonym, 15)
            .await
            .unwrap_err();
        assert!(matches!(err, LookupError::NoTarget));
        assert_eq!(lookup.client.calls(), 0);
    }

    #[tokio::test]
    async fn test_menu_pick_replaces_captured_span() {
        let lookup = coordinator(FakeClient::with("quick", &["fast", "speedy"]));
        let mut buffer = cursor_at("The quick fox.", 6);

        let menu = lookup
            .menu_lookup(&buffer, Category::Synonym, 15)
            .await
            .unwrap();
        assert_eq!(menu.context.sentence, "The quick fox");

        if let MenuEntry::Replace(word) = &menu.entries[1] {
            apply(&mut buffer, &menu.context.span, word);
        }
        assert_eq!(buffer.to_string(), "The speedy fox.");
    }

    #[tokio::test]
    async fn test_command_lookup_replaces_word() {
        let lookup = coordinator(FakeClient::with("dog", &["hound", "canine"]));
        let mut buffer = cursor_at("a lazy dog", 8);
        let mut picker = ScriptedPicker::choosing(0);
        let mut notices = Notices::default();

        let outcome = lookup
            .command_lookup(&mut buffer, Category::Synonym, &mut picker, &mut notices)
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Replaced("hound".to_string()));
        assert_eq!(picker.shown, vec!["hound", "canine"]);
        assert_eq!(buffer.to_string(), "a lazy hound");
        assert!(notices.0.is_empty());
    }

    #[tokio::test]
    async fn test_command_lookup_lists_every_result() {
        let many: Vec<String> = (0..40).map(|i| format!("w{}", i)).collect();
        let refs: Vec<&str> = many.iter().map(String::as_str).collect();
        let lookup = coordinator(FakeClient::with("big", &refs));
        let mut buffer = cursor_at("big", 1);
        let mut picker = ScriptedPicker::dismissing();
        let mut notices = Notices::default();

        let outcome = lookup
            .command_lookup(&mut buffer, Category::Antonym, &mut picker, &mut notices)
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Dismissed);
        assert_eq!(picker.shown.len(), 40);
        assert_eq!(buffer.to_string(), "big");
    }

    #[tokio::test]
    async fn test_command_lookup_empty_results_shows_notice() {
        let lookup = coordinator(FakeClient::default());
        let mut buffer = cursor_at("xyzzy", 2);
        let mut picker = ScriptedPicker::choosing(0);
        let mut notices = Notices::default();

        let outcome = lookup
            .command_lookup(&mut buffer, Category::Rhyme, &mut picker, &mut notices)
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::NoResults);
        assert!(picker.shown.is_empty());
        assert_eq!(notices.0, vec!["No rhymes found for \"xyzzy\""]);
    }

    #[tokio::test]
    async fn test_command_lookup_without_target() {
        let lookup = coordinator(FakeClient::default());
        let mut buffer = cursor_at("   ", 1);
        let mut picker = ScriptedPicker::choosing(0);
        let mut notices = Notices::default();

        let outcome = lookup
            .command_lookup(&mut buffer, Category::Synonym, &mut picker, &mut notices)
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::NoTarget);
        assert_eq!(notices.0, vec![SELECT_A_WORD]);
        assert_eq!(lookup.client.calls(), 0);
    }

    #[test]
    fn test_split_alliteration_target() {
        assert_eq!(split_alliteration_target("big brave"), ("big", "brave"));
        assert_eq!(split_alliteration_target("brave"), ("brave", ""));
        assert_eq!(split_alliteration_target("a big bear"), ("a", "big bear"));
    }

    #[tokio::test]
    async fn test_alliterate_replaces_selection() {
        let lookup = coordinator(FakeClient::with("brave", &["bold", "bravehearted"]));
        let mut buffer = TextBuffer::new("a big brave bear");
        buffer.select(Position::new(0, 2), Position::new(0, 11));
        let mut picker = ScriptedPicker::choosing(0);
        let mut notices = Notices::default();

        let outcome = lookup
            .alliterate(&mut buffer, &mut picker, &mut notices)
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Replaced("bold".to_string()));
        assert_eq!(buffer.to_string(), "a bold bear");
        assert_eq!(
            *lookup.client.alliteration_calls.lock().unwrap(),
            vec![("big".to_string(), "brave".to_string())]
        );
        assert!(lookup.caches().stats().iter().all(|(_, count)| *count == 0));
    }

    #[tokio::test]
    async fn test_alliterate_single_word_needs_selection() {
        let lookup = coordinator(FakeClient::with("brave", &["bold"]));
        let mut buffer = TextBuffer::new("brave");
        buffer.select(Position::new(0, 0), Position::new(0, 5));
        let mut picker = ScriptedPicker::choosing(0);
        let mut notices = Notices::default();

        let outcome = lookup
            .alliterate(&mut buffer, &mut picker, &mut notices)
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::NoTarget);
        assert_eq!(notices.0, vec![SELECT_A_WORD]);
        assert_eq!(lookup.client.calls(), 0);
    }

    #[tokio::test]
    async fn test_alliterate_empty_results_shows_notice() {
        let lookup = coordinator(FakeClient::default());
        let mut buffer = TextBuffer::new("big brave");
        buffer.select(Position::new(0, 0), Position::new(0, 9));
        let mut picker = ScriptedPicker::choosing(0);
        let mut notices = Notices::default();

        let outcome = lookup
            .alliterate(&mut buffer, &mut picker, &mut notices)
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::NoResults);
        assert_eq!(notices.0, vec!["No alliterative synonyms found for \"brave\""]);
        assert_eq!(buffer.to_string(), "big brave");
    }
}
