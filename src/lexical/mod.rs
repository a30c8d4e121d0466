pub mod datamuse;

pub use datamuse::DatamuseClient;

use crate::error::ClientError;
use async_trait::async_trait;

/// Remote word-relation lookups. Results keep the service's order.
#[async_trait]
pub trait LexicalClient: Send + Sync {
    async fn words_similar_to(&self, word: &str) -> Result<Vec<String>, ClientError>;

    async fn words_opposite_to(&self, word: &str, strict: bool)
        -> Result<Vec<String>, ClientError>;

    async fn words_that_rhyme_with(&self, word: &str) -> Result<Vec<String>, ClientError>;

    /// Words meaning `root_word` that share the first letter of `prior_word`.
    async fn alliterative_synonyms(
        &self,
        prior_word: &str,
        root_word: &str,
    ) -> Result<Vec<String>, ClientError>;
}
