//! Datamuse (`https://api.datamuse.com/words`) backed lexical client.

use crate::config::Config;
use crate::error::ClientError;
use crate::lexical::LexicalClient;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Synonyms consulted when a non-strict antonym lookup comes back empty.
const ANTONYM_FALLBACK_SYNONYMS: usize = 3;

#[derive(Debug, Deserialize)]
struct WordEntry {
    word: String,
}

pub struct DatamuseClient {
    client: Client,
    base_url: String,
}

impl DatamuseClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("wordswap/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn query(&self, params: &[(&str, &str)]) -> Result<Vec<String>, ClientError> {
        let url = format!("{}/words", self.base_url);
        tracing::debug!(?params, "querying datamuse");

        let response = self.client.get(&url).query(params).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }

        let entries: Vec<WordEntry> = response.json().await?;
        Ok(collect_words(entries))
    }
}

fn collect_words(entries: Vec<WordEntry>) -> Vec<String> {
    entries
        .into_iter()
        .map(|entry| entry.word)
        .filter(|word| !word.trim().is_empty())
        .collect()
}

/// Datamuse spelling pattern for words starting with the same letter.
fn initial_pattern(prior_word: &str) -> Option<String> {
    prior_word
        .chars()
        .find(|c| c.is_alphanumeric())
        .map(|c| format!("{}*", c.to_lowercase()))
}

#[async_trait]
impl LexicalClient for DatamuseClient {
    async fn words_similar_to(&self, word: &str) -> Result<Vec<String>, ClientError> {
        self.query(&[("ml", word)]).await
    }

    async fn words_opposite_to(
        &self,
        word: &str,
        strict: bool,
    ) -> Result<Vec<String>, ClientError> {
        let antonyms = self.query(&[("rel_ant", word)]).await?;
        if strict || !antonyms.is_empty() {
            return Ok(antonyms);
        }

        let mut loose = Vec::new();
        let similar = self.words_similar_to(word).await?;
        for synonym in similar.iter().take(ANTONYM_FALLBACK_SYNONYMS) {
            for antonym in self.query(&[("rel_ant", synonym.as_str())]).await? {
                if antonym != word && !loose.contains(&antonym) {
                    loose.push(antonym);
                }
            }
        }
        Ok(loose)
    }

    async fn words_that_rhyme_with(&self, word: &str) -> Result<Vec<String>, ClientError> {
        self.query(&[("rel_rhy", word)]).await
    }

    async fn alliterative_synonyms(
        &self,
        prior_word: &str,
        root_word: &str,
    ) -> Result<Vec<String>, ClientError> {
        match initial_pattern(prior_word) {
            Some(pattern) => self.query(&[("ml", root_word), ("sp", pattern.as_str())]).await,
            None => self.words_similar_to(root_word).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_pattern() {
        assert_eq!(initial_pattern("big").as_deref(), Some("b*"));
        assert_eq!(initial_pattern("\"Quiet").as_deref(), Some("q*"));
        assert_eq!(initial_pattern(""), None);
    }

    #[test]
    fn test_response_keeps_order_and_skips_blanks() {
        let body = r#"[{"word":"glad","score":900},{"word":" "},{"word":"content","score":800,"tags":["adj"]}]"#;
        let entries: Vec<WordEntry> = serde_json::from_str(body).unwrap();
        assert_eq!(collect_words(entries), vec!["glad", "content"]);
    }

    #[test]
    fn test_base_url_is_normalized() {
        let config = Config {
            api_base_url: "http://localhost:9999/".to_string(),
            ..Default::default()
        };
        let client = DatamuseClient::new(&config).unwrap();
        assert_eq!(client.base_url, "http://localhost:9999");
    }
}
