//! Deterministic stand-ins for the network and model backed collaborators.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;
use std::rc::Rc;

use anyhow::{anyhow, bail};
use sha2::{Digest, Sha256};

use crate::agent::model::ReasoningModel;
use crate::agent::web::WebSearchProvider;
use crate::config::EMBEDDING_DIMENSION;
use crate::context::DocentContext;
use crate::db::driver::DatabaseDriver;
use crate::db::store::SqliteVectorStore;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::extract::{TextExtractor, file_label};
use crate::pipeline::rag::RagSystem;
use crate::providers::ProviderFactory;
use crate::settings::Settings;

/// Bag-of-words embedder: each lowercase word bumps one hashed bucket, then
/// the vector is L2-normalized. Identical texts embed identically; texts
/// sharing no words are orthogonal unless buckets collide.
#[derive(Debug, Clone, Copy)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub fn with_dimension(dimension: usize) -> Self {
        Self { dimension }
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.dimension];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let digest = Sha256::digest(word.to_lowercase().as_bytes());
            let mut bucket = [0u8; 8];
            bucket.copy_from_slice(&digest[..8]);
            #[allow(clippy::cast_possible_truncation)]
            let idx = (u64::from_le_bytes(bucket) % self.dimension as u64) as usize;
            vector[idx] += 1.0;
        }
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::with_dimension(EMBEDDING_DIMENSION)
    }
}

impl EmbeddingProvider for HashingEmbedder {
    fn embed_documents(&mut self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Treats every "PDF" as a UTF-8 text file. Invalid UTF-8 is an extraction error.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextFileExtractor;

impl TextExtractor for TextFileExtractor {
    fn extract(&self, path: &Path) -> Result<String> {
        let bytes = std::fs::read(path)?;
        String::from_utf8(bytes).map_err(|e| RagError::Extraction {
            file: file_label(path),
            message: e.to_string(),
        })
    }
}

/// Replays canned replies in order and records every prompt it was given.
pub struct ScriptedModel {
    replies: VecDeque<std::result::Result<String, String>>,
    repeat_last: bool,
    prompts: Rc<RefCell<Vec<String>>>,
}

impl ScriptedModel {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: replies.into_iter().map(|r| Ok(r.into())).collect(),
            repeat_last: false,
            prompts: Rc::default(),
        }
    }

    /// Answers every call with the same reply.
    pub fn repeating(reply: impl Into<String>) -> Self {
        let mut model = Self::new([reply]);
        model.repeat_last = true;
        model
    }

    /// Fails every call with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            replies: VecDeque::from([Err(message.into())]),
            repeat_last: true,
            prompts: Rc::default(),
        }
    }

    /// Shared handle to the prompts received so far.
    pub fn prompts(&self) -> Rc<RefCell<Vec<String>>> {
        Rc::clone(&self.prompts)
    }
}

impl ReasoningModel for ScriptedModel {
    fn complete(&mut self, prompt: &str, _stop: &[&str]) -> anyhow::Result<String> {
        self.prompts.borrow_mut().push(prompt.to_string());
        let reply = if self.repeat_last && self.replies.len() == 1 {
            self.replies.front().cloned()
        } else {
            self.replies.pop_front()
        };
        match reply {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("scripted model has no replies left")),
        }
    }
}

/// Web search returning a fixed reply and recording queries.
pub struct CannedWebSearch {
    reply: std::result::Result<String, String>,
    queries: Rc<RefCell<Vec<String>>>,
}

impl CannedWebSearch {
    pub fn reply(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
            queries: Rc::default(),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
            queries: Rc::default(),
        }
    }

    pub fn queries(&self) -> Rc<RefCell<Vec<String>>> {
        Rc::clone(&self.queries)
    }
}

impl WebSearchProvider for CannedWebSearch {
    fn run(&self, query: &str) -> anyhow::Result<String> {
        self.queries.borrow_mut().push(query.to_string());
        self.reply.clone().map_err(|message| anyhow!(message))
    }
}

/// A [`RagSystem`] over a named in-memory database with the fake embedder and extractor.
///
/// The `name` must be unique per test to prevent cross-test DB collisions.
pub fn rag_in_memory(name: &str) -> RagSystem {
    let driver = DatabaseDriver::in_memory(name).unwrap();
    let store = SqliteVectorStore::new(driver.open().unwrap());
    RagSystem::new(
        Box::new(HashingEmbedder::default()),
        Box::new(store),
        Box::new(TextFileExtractor),
    )
    .unwrap()
}

/// [`ProviderFactory`] handing out the fakes above.
///
/// Without scripted replies there is no reasoning model, mirroring a missing
/// API key. Without a web reply there is no web search.
#[derive(Debug, Clone, Default)]
pub struct FakeProviders {
    replies: Option<Vec<String>>,
    web_reply: Option<String>,
}

impl FakeProviders {
    #[must_use]
    pub fn with_replies<I, S>(mut self, replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.replies = Some(replies.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_web_reply(mut self, reply: impl Into<String>) -> Self {
        self.web_reply = Some(reply.into());
        self
    }
}

impl ProviderFactory for FakeProviders {
    fn embedder(&self, _context: &DocentContext) -> anyhow::Result<Box<dyn EmbeddingProvider>> {
        Ok(Box::new(HashingEmbedder::default()))
    }

    fn extractor(&self) -> Box<dyn TextExtractor> {
        Box::new(TextFileExtractor)
    }

    fn reasoning_model(&self, _settings: &Settings) -> anyhow::Result<Box<dyn ReasoningModel>> {
        match &self.replies {
            Some(replies) => Ok(Box::new(ScriptedModel::new(replies.clone()))),
            None => bail!("GOOGLE_API_KEY is not set"),
        }
    }

    fn web_search(&self, _settings: &Settings) -> anyhow::Result<Box<dyn WebSearchProvider>> {
        match &self.web_reply {
            Some(reply) => Ok(Box::new(CannedWebSearch::reply(reply.clone()))),
            None => bail!("TAVILY_API_KEY is not set"),
        }
    }
}
