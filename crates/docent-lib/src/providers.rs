use anyhow::Context;

use crate::agent::model::{GeminiModel, ReasoningModel};
use crate::agent::web::{TavilySearch, WebSearchProvider};
use crate::context::DocentContext;
use crate::embedding::EmbeddingProvider;
use crate::embedding::embedder::Embedder;
use crate::extract::{PdfExtractor, TextExtractor};
use crate::settings::Settings;

/// Builds the external collaborators. Swapped for fakes in tests.
pub trait ProviderFactory {
    fn embedder(&self, context: &DocentContext) -> anyhow::Result<Box<dyn EmbeddingProvider>>;

    fn extractor(&self) -> Box<dyn TextExtractor>;

    fn reasoning_model(&self, settings: &Settings) -> anyhow::Result<Box<dyn ReasoningModel>>;

    /// Fails when web search is not configured; callers treat that as "no web search".
    fn web_search(&self, settings: &Settings) -> anyhow::Result<Box<dyn WebSearchProvider>>;
}

/// Local fastembed model, pdf-extract, Gemini and Tavily.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultProviders;

impl ProviderFactory for DefaultProviders {
    fn embedder(&self, context: &DocentContext) -> anyhow::Result<Box<dyn EmbeddingProvider>> {
        let embedder = Embedder::new(context.model_cache_dir())?;
        Ok(Box::new(embedder))
    }

    fn extractor(&self) -> Box<dyn TextExtractor> {
        Box::new(PdfExtractor)
    }

    fn reasoning_model(&self, settings: &Settings) -> anyhow::Result<Box<dyn ReasoningModel>> {
        let api_key = settings
            .google_api_key
            .as_deref()
            .context("GOOGLE_API_KEY is not set")?;
        Ok(Box::new(GeminiModel::new(api_key, &settings.gemini_model)))
    }

    fn web_search(&self, settings: &Settings) -> anyhow::Result<Box<dyn WebSearchProvider>> {
        let api_key = settings
            .tavily_api_key
            .as_deref()
            .context("TAVILY_API_KEY is not set")?;
        Ok(Box::new(TavilySearch::new(api_key)))
    }
}
