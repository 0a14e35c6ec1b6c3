//! HTTP client for the hosted inference API.
//!
//! This module provides the [`InferenceClient`] type. It posts task requests
//! to `<base>/models/<model>`, escalates to `wait_for_model` once when the
//! model is still loading, and decodes the task specific responses.

use std::fmt;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::options::Options;
use crate::shape::reshape;
use crate::task::TaskRequest;
use crate::types::{
    ConversationalArgs, ConversationalOutput, FeatureExtractionArgs, FeatureExtractionOutput,
    FillMaskArgs, FillMaskOutput, QuestionAnswerArgs, QuestionAnswerOutput, SummarizationArgs,
    SummarizationOutput, TableQuestionAnswerArgs, TableQuestionAnswerOutput,
    TextClassificationArgs, TextClassificationOutput, TextGenerationArgs, TextGenerationOutput,
    TokenClassificationArgs, TokenClassificationOutput, TranslationArgs, TranslationOutput,
    ZeroShotClassificationArgs, ZeroShotClassificationOutput,
};

/// Address of the public inference API.
pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";

/// Client for the inference API.
///
/// The credential and default options are fixed at construction. Clones share
/// the underlying connection pool, so one instance can serve concurrent calls.
#[derive(Clone)]
pub struct InferenceClient {
    api_key: String,
    default_options: Options,
    base_url: String,
    http: Client,
}

impl InferenceClient {
    /// Create a client using `api_key` as bearer token.
    ///
    /// An empty key is replaced by a single space so the `Authorization`
    /// header is always present; the API then serves the request anonymously.
    pub fn new(api_key: impl Into<String>, default_options: Options) -> Self {
        let mut api_key = api_key.into();
        if api_key.is_empty() {
            api_key.push(' ');
        }
        Self {
            api_key,
            default_options,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    /// Point the client at another deployment of the API.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Use a preconfigured HTTP client, e.g. one with a request timeout.
    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn default_options(&self) -> &Options {
        &self.default_options
    }

    /// Send `request` and return the raw JSON payload.
    ///
    /// `options` override the client defaults flag by flag. When the server
    /// answers 503 and `wait_for_model` was not already set, the request is
    /// sent once more with `wait_for_model: true`. No timeout is applied to
    /// that second attempt: the server holds it until the model is ready.
    pub async fn request(&self, request: &TaskRequest, options: Option<&Options>) -> Result<Value> {
        let model = request.model();
        if model.is_empty() {
            return Err(Error::MissingModel);
        }
        let url = format!("{}/models/{}", self.base_url, model);
        let mut options = self
            .default_options
            .merge(&options.copied().unwrap_or_default());

        loop {
            let body = request_body(request, &options)?;
            debug!(%model, task = %request.kind(), ?options, "sending inference request");
            let response = self
                .http
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await?;

            if response.status() == StatusCode::SERVICE_UNAVAILABLE && !options.waits_for_model() {
                warn!(%model, "model is loading, retrying with wait_for_model");
                options = options.waiting();
                continue;
            }

            let bytes = response.bytes().await?;
            let value: Value = serde_json::from_slice(&bytes)?;
            if let Some(message) = error_message(&value) {
                debug!(%model, %message, "inference api returned an error");
                return Err(Error::Inference(message));
            }
            return Ok(value);
        }
    }

    /// Send `request` and adapt the payload to the task's response shape.
    pub async fn infer(&self, request: TaskRequest, options: Option<&Options>) -> Result<Value> {
        let raw = self.request(&request, options).await?;
        reshape(request.kind(), raw)
    }

    async fn typed<T: DeserializeOwned>(
        &self,
        request: TaskRequest,
        options: Option<&Options>,
    ) -> Result<T> {
        let value = self.infer(request, options).await?;
        serde_json::from_value(value).map_err(Error::Decode)
    }

    /// Predict the masked token of a sentence, e.g. with `bert-base-uncased`.
    pub async fn fill_mask(
        &self,
        args: FillMaskArgs,
        options: Option<&Options>,
    ) -> Result<FillMaskOutput> {
        self.typed(args.into(), options).await
    }

    /// Shorten a text, e.g. with `facebook/bart-large-cnn`.
    pub async fn summarization(
        &self,
        args: SummarizationArgs,
        options: Option<&Options>,
    ) -> Result<SummarizationOutput> {
        self.typed(args.into(), options).await
    }

    /// Extract the answer to a question from a context,
    /// e.g. with `deepset/roberta-base-squad2`.
    pub async fn question_answer(
        &self,
        args: QuestionAnswerArgs,
        options: Option<&Options>,
    ) -> Result<QuestionAnswerOutput> {
        self.typed(args.into(), options).await
    }

    /// Answer a plain text query about a table,
    /// e.g. with `google/tapas-base-finetuned-wtq`.
    pub async fn table_question_answer(
        &self,
        args: TableQuestionAnswerArgs,
        options: Option<&Options>,
    ) -> Result<TableQuestionAnswerOutput> {
        self.typed(args.into(), options).await
    }

    pub async fn text_classification(
        &self,
        args: TextClassificationArgs,
        options: Option<&Options>,
    ) -> Result<TextClassificationOutput> {
        self.typed(args.into(), options).await
    }

    /// Continue a prompt, e.g. with `gpt2`.
    pub async fn text_generation(
        &self,
        args: TextGenerationArgs,
        options: Option<&Options>,
    ) -> Result<TextGenerationOutput> {
        self.typed(args.into(), options).await
    }

    /// Named entity recognition and similar per-token labelling.
    pub async fn token_classification(
        &self,
        args: TokenClassificationArgs,
        options: Option<&Options>,
    ) -> Result<TokenClassificationOutput> {
        self.typed(args.into(), options).await
    }

    pub async fn translation(
        &self,
        args: TranslationArgs,
        options: Option<&Options>,
    ) -> Result<TranslationOutput> {
        self.typed(args.into(), options).await
    }

    /// Score the inputs against caller supplied labels,
    /// e.g. with `facebook/bart-large-mnli`.
    pub async fn zero_shot_classification(
        &self,
        args: ZeroShotClassificationArgs,
        options: Option<&Options>,
    ) -> Result<ZeroShotClassificationOutput> {
        self.typed(args.into(), options).await
    }

    pub async fn conversational(
        &self,
        args: ConversationalArgs,
        options: Option<&Options>,
    ) -> Result<ConversationalOutput> {
        self.typed(args.into(), options).await
    }

    /// Raw float features, typically embeddings for semantic search.
    pub async fn feature_extraction(
        &self,
        args: FeatureExtractionArgs,
        options: Option<&Options>,
    ) -> Result<FeatureExtractionOutput> {
        self.typed(args.into(), options).await
    }
}

impl fmt::Debug for InferenceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceClient")
            .field("base_url", &self.base_url)
            .field("default_options", &self.default_options)
            .finish_non_exhaustive()
    }
}

/// The task section of `request` plus the effective `options`.
fn request_body(request: &TaskRequest, options: &Options) -> Result<Value> {
    let mut body = serde_json::to_value(request)?;
    if let Value::Object(map) = &mut body {
        map.insert("options".into(), serde_json::to_value(options)?);
    }
    Ok(body)
}

/// The `error` field of a payload, if it is set to a truthy value.
fn error_message(value: &Value) -> Option<String> {
    match value.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
