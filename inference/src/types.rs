//! Request arguments and response payloads for each task.
//!
//! Field names follow the wire format of the hosted API. The `model` of every
//! argument struct is never serialized: it only selects the endpoint.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single string or a batch of strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<&str> for OneOrMany {
    fn from(value: &str) -> Self {
        OneOrMany::One(value.to_string())
    }
}

impl From<String> for OneOrMany {
    fn from(value: String) -> Self {
        OneOrMany::One(value)
    }
}

impl From<Vec<String>> for OneOrMany {
    fn from(value: Vec<String>) -> Self {
        OneOrMany::Many(value)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FillMaskArgs {
    #[serde(skip)]
    pub model: String,
    /// Text containing the model's mask token, e.g. `[MASK]`.
    pub inputs: String,
}

impl FillMaskArgs {
    pub fn new(model: impl Into<String>, inputs: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            inputs: inputs.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FillMaskPrediction {
    /// Probability of this token.
    pub score: f64,
    /// Vocabulary id of the token.
    pub token: u64,
    pub token_str: String,
    /// The full sequence with the mask replaced, special tokens included.
    pub sequence: String,
}

pub type FillMaskOutput = Vec<FillMaskPrediction>;

/// Sampling knobs shared by summarization and conversational models.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SummarizationParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// 0.0 to 100.0, 1.0 is regular sampling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repetition_penalty: Option<f64>,
    /// Soft limit in seconds for the whole query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_time: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SummarizationArgs {
    #[serde(skip)]
    pub model: String,
    pub inputs: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<SummarizationParameters>,
}

impl SummarizationArgs {
    pub fn new(model: impl Into<String>, inputs: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            inputs: inputs.into(),
            parameters: None,
        }
    }

    pub fn with_parameters(mut self, parameters: SummarizationParameters) -> Self {
        self.parameters = Some(parameters);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarizationOutput {
    pub summary_text: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAnswerInputs {
    pub question: String,
    pub context: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAnswerArgs {
    #[serde(skip)]
    pub model: String,
    pub inputs: QuestionAnswerInputs,
}

impl QuestionAnswerArgs {
    pub fn new(
        model: impl Into<String>,
        question: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            inputs: QuestionAnswerInputs {
                question: question.into(),
                context: context.into(),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuestionAnswerOutput {
    /// Answer span extracted from the context.
    pub answer: String,
    pub score: f64,
    /// Character offset of the answer start within the context.
    pub start: usize,
    /// Character offset of the answer end within the context.
    pub end: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableQuestionAnswerInputs {
    pub query: String,
    /// Column header to column values. Every column must have the same length.
    pub table: HashMap<String, Vec<String>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableQuestionAnswerArgs {
    #[serde(skip)]
    pub model: String,
    pub inputs: TableQuestionAnswerInputs,
}

impl TableQuestionAnswerArgs {
    pub fn new(
        model: impl Into<String>,
        query: impl Into<String>,
        table: HashMap<String, Vec<String>>,
    ) -> Self {
        Self {
            model: model.into(),
            inputs: TableQuestionAnswerInputs {
                query: query.into(),
                table,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableQuestionAnswerOutput {
    pub answer: String,
    /// `[row, column]` pairs of the cells used for the answer.
    pub coordinates: Vec<Vec<usize>>,
    pub cells: Vec<String>,
    #[serde(default)]
    pub aggregator: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextClassificationArgs {
    #[serde(skip)]
    pub model: String,
    pub inputs: String,
}

impl TextClassificationArgs {
    pub fn new(model: impl Into<String>, inputs: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            inputs: inputs.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextClassificationLabel {
    pub label: String,
    pub score: f64,
}

/// Labels for a text classification request. Most pipelines answer with one
/// list of labels per input, even for a single input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextClassificationOutput {
    Flat(Vec<TextClassificationLabel>),
    Batched(Vec<Vec<TextClassificationLabel>>),
}

impl TextClassificationOutput {
    /// Labels of the first input.
    pub fn labels(&self) -> &[TextClassificationLabel] {
        match self {
            TextClassificationOutput::Flat(labels) => labels,
            TextClassificationOutput::Batched(batches) => {
                batches.first().map(Vec::as_slice).unwrap_or_default()
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextGenerationParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repetition_penalty: Option<f64>,
    /// 0 to 250 new tokens, not counting the prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_new_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_time: Option<f64>,
    /// When false the prompt is stripped from the generated text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_full_text: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_return_sequences: Option<u32>,
    /// Sample instead of greedy decoding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub do_sample: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TextGenerationArgs {
    #[serde(skip)]
    pub model: String,
    pub inputs: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<TextGenerationParameters>,
}

impl TextGenerationArgs {
    pub fn new(model: impl Into<String>, inputs: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            inputs: inputs.into(),
            parameters: None,
        }
    }

    pub fn with_parameters(mut self, parameters: TextGenerationParameters) -> Self {
        self.parameters = Some(parameters);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextGenerationOutput {
    pub generated_text: String,
}

/// How sub-word predictions are merged into word-level entities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationStrategy {
    /// Every token is classified on its own.
    None,
    /// B- and I- tags of the same entity are merged.
    #[default]
    Simple,
    /// Like `Simple`, a word takes the tag of its first token.
    First,
    /// Like `Simple`, scores are averaged across a word's tokens.
    Average,
    /// Like `Simple`, a word takes the tag of its best scoring token.
    Max,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClassificationParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregation_strategy: Option<AggregationStrategy>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClassificationArgs {
    #[serde(skip)]
    pub model: String,
    pub inputs: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<TokenClassificationParameters>,
}

impl TokenClassificationArgs {
    pub fn new(model: impl Into<String>, inputs: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            inputs: inputs.into(),
            parameters: None,
        }
    }

    pub fn with_aggregation(mut self, strategy: AggregationStrategy) -> Self {
        self.parameters = Some(TokenClassificationParameters {
            aggregation_strategy: Some(strategy),
        });
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenClassificationEntity {
    /// Entity type. Without aggregation the server names this field `entity`.
    #[serde(alias = "entity")]
    pub entity_group: String,
    pub score: f64,
    pub word: String,
    pub start: usize,
    pub end: usize,
}

pub type TokenClassificationOutput = Vec<TokenClassificationEntity>;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationArgs {
    #[serde(skip)]
    pub model: String,
    pub inputs: String,
}

impl TranslationArgs {
    pub fn new(model: impl Into<String>, inputs: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            inputs: inputs.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationOutput {
    pub translation_text: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZeroShotClassificationParameters {
    /// Possible classes for the inputs. The API accepts at most 10.
    pub candidate_labels: Vec<String>,
    /// Set when classes can overlap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_label: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZeroShotClassificationArgs {
    #[serde(skip)]
    pub model: String,
    pub inputs: OneOrMany,
    pub parameters: ZeroShotClassificationParameters,
}

impl ZeroShotClassificationArgs {
    pub fn new(
        model: impl Into<String>,
        inputs: impl Into<OneOrMany>,
        candidate_labels: Vec<String>,
    ) -> Self {
        Self {
            model: model.into(),
            inputs: inputs.into(),
            parameters: ZeroShotClassificationParameters {
                candidate_labels,
                multi_label: None,
            },
        }
    }

    pub fn multi_label(mut self, value: bool) -> Self {
        self.parameters.multi_label = Some(value);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZeroShotClassification {
    pub sequence: String,
    pub labels: Vec<String>,
    pub scores: Vec<f64>,
}

pub type ZeroShotClassificationOutput = Vec<ZeroShotClassification>;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationalInputs {
    /// Latest user message.
    pub text: String,
    /// Earlier replies from the model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_responses: Option<Vec<String>>,
    /// Earlier user messages, same length as `generated_responses`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub past_user_inputs: Option<Vec<String>>,
}

pub type ConversationalParameters = SummarizationParameters;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationalArgs {
    #[serde(skip)]
    pub model: String,
    pub inputs: ConversationalInputs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<ConversationalParameters>,
}

impl ConversationalArgs {
    pub fn new(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            inputs: ConversationalInputs {
                text: text.into(),
                ..Default::default()
            },
            parameters: None,
        }
    }

    /// Attach the earlier turns of the conversation.
    pub fn with_history(mut self, past_user_inputs: Vec<String>, generated_responses: Vec<String>) -> Self {
        self.inputs.past_user_inputs = Some(past_user_inputs);
        self.inputs.generated_responses = Some(generated_responses);
        self
    }

    pub fn with_parameters(mut self, parameters: ConversationalParameters) -> Self {
        self.parameters = Some(parameters);
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(default)]
    pub generated_responses: Vec<String>,
    #[serde(default)]
    pub past_user_inputs: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationalOutput {
    pub generated_text: String,
    #[serde(default)]
    pub conversation: Conversation,
    #[serde(default)]
    pub warnings: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureExtractionArgs {
    #[serde(skip)]
    pub model: String,
    /// Model specific. Sentence-similarity models take
    /// `{"source_sentence": .., "sentences": [..]}`, embedding models take text.
    pub inputs: Value,
}

impl FeatureExtractionArgs {
    pub fn new(model: impl Into<String>, inputs: impl Into<Value>) -> Self {
        Self {
            model: model.into(),
            inputs: inputs.into(),
        }
    }
}

/// One entry of a feature extraction result: a score, a pooled vector, or one
/// vector per token when the model does not pool its output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Feature {
    Scalar(f64),
    Vector(Vec<f64>),
    Matrix(Vec<Vec<f64>>),
}

pub type FeatureExtractionOutput = Vec<Feature>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parameters_skip_unset_fields() {
        let args = SummarizationArgs::new("facebook/bart-large-cnn", "text").with_parameters(
            SummarizationParameters {
                max_length: Some(100),
                ..Default::default()
            },
        );
        assert_eq!(
            serde_json::to_value(&args).unwrap(),
            json!({"inputs": "text", "parameters": {"max_length": 100}})
        );
    }

    #[test]
    fn aggregation_strategy_is_lowercase() {
        let args = TokenClassificationArgs::new("ner", "Sarah lives in Paris")
            .with_aggregation(AggregationStrategy::Average);
        assert_eq!(
            serde_json::to_value(&args).unwrap()["parameters"],
            json!({"aggregation_strategy": "average"})
        );
    }

    #[test]
    fn zero_shot_accepts_batches() {
        let args = ZeroShotClassificationArgs::new(
            "facebook/bart-large-mnli",
            vec!["a".to_string(), "b".to_string()],
            vec!["x".into()],
        )
        .multi_label(true);
        assert_eq!(
            serde_json::to_value(&args).unwrap(),
            json!({
                "inputs": ["a", "b"],
                "parameters": {"candidate_labels": ["x"], "multi_label": true}
            })
        );
    }

    #[test]
    fn entity_alias_without_aggregation() {
        let entity: TokenClassificationEntity = serde_json::from_value(json!({
            "entity": "B-PER", "score": 0.99, "word": "Sarah", "start": 11, "end": 16
        }))
        .unwrap();
        assert_eq!(entity.entity_group, "B-PER");
    }

    #[test]
    fn features_mix_scalars_and_vectors() {
        let out: FeatureExtractionOutput =
            serde_json::from_value(json!([0.5, [1.0, 2.0]])).unwrap();
        assert_eq!(out, vec![Feature::Scalar(0.5), Feature::Vector(vec![1.0, 2.0])]);
    }

    #[test]
    fn unpooled_features_are_per_token_matrices() {
        let out: FeatureExtractionOutput =
            serde_json::from_value(json!([[[0.1, 0.2], [0.3, 0.4]]])).unwrap();
        assert_eq!(out, vec![Feature::Matrix(vec![vec![0.1, 0.2], vec![0.3, 0.4]])]);
    }

    #[test]
    fn text_classification_accepts_flat_and_batched() {
        let flat: TextClassificationOutput =
            serde_json::from_value(json!([{"label": "NEGATIVE", "score": 0.2}])).unwrap();
        assert_eq!(flat.labels()[0].label, "NEGATIVE");
        let batched: TextClassificationOutput =
            serde_json::from_value(json!([[{"label": "POSITIVE", "score": 0.99}]])).unwrap();
        assert!(matches!(batched, TextClassificationOutput::Batched(_)));
        assert_eq!(batched.labels()[0].label, "POSITIVE");
    }

    #[test]
    fn conversational_output_tolerates_missing_warnings() {
        let out: ConversationalOutput = serde_json::from_value(json!({
            "generated_text": "It's Die Hard.",
            "conversation": {
                "generated_responses": ["It's Die Hard."],
                "past_user_inputs": ["Which movie is the best?"]
            }
        }))
        .unwrap();
        assert!(out.warnings.is_empty());
        assert_eq!(out.conversation.past_user_inputs.len(), 1);
    }
}
