use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::shape::Shape;
use crate::types::{
    ConversationalArgs, FeatureExtractionArgs, FillMaskArgs, QuestionAnswerArgs,
    SummarizationArgs, TableQuestionAnswerArgs, TextClassificationArgs, TextGenerationArgs,
    TokenClassificationArgs, TranslationArgs, ZeroShotClassificationArgs,
};

/// The tasks served by the inference API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaskKind {
    FillMask,
    Summarization,
    QuestionAnswer,
    TableQuestionAnswer,
    TextClassification,
    TextGeneration,
    TokenClassification,
    Translation,
    ZeroShotClassification,
    Conversational,
    FeatureExtraction,
}

impl TaskKind {
    pub const ALL: [TaskKind; 11] = [
        TaskKind::FillMask,
        TaskKind::Summarization,
        TaskKind::QuestionAnswer,
        TaskKind::TableQuestionAnswer,
        TaskKind::TextClassification,
        TaskKind::TextGeneration,
        TaskKind::TokenClassification,
        TaskKind::Translation,
        TaskKind::ZeroShotClassification,
        TaskKind::Conversational,
        TaskKind::FeatureExtraction,
    ];

    /// Pipeline name of the task.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::FillMask => "fill-mask",
            TaskKind::Summarization => "summarization",
            TaskKind::QuestionAnswer => "question-answering",
            TaskKind::TableQuestionAnswer => "table-question-answering",
            TaskKind::TextClassification => "text-classification",
            TaskKind::TextGeneration => "text-generation",
            TaskKind::TokenClassification => "token-classification",
            TaskKind::Translation => "translation",
            TaskKind::ZeroShotClassification => "zero-shot-classification",
            TaskKind::Conversational => "conversational",
            TaskKind::FeatureExtraction => "feature-extraction",
        }
    }

    /// How the raw server payload is adapted before it reaches the caller.
    pub fn shape(&self) -> Shape {
        match self {
            TaskKind::Summarization | TaskKind::TextGeneration | TaskKind::Translation => {
                Shape::FirstElement
            }
            TaskKind::TokenClassification | TaskKind::ZeroShotClassification => Shape::Array,
            _ => Shape::Passthrough,
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        TaskKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::UnknownTask(s.to_string()))
    }
}

fn parse_args<T: DeserializeOwned>(kind: TaskKind, body: Value) -> Result<T> {
    serde_json::from_value(body).map_err(|e| Error::InvalidInput(format!("{kind}: {e}")))
}

macro_rules! task_requests {
    ($($variant:ident($args:ty)),* $(,)?) => {
        /// A request for one of the hosted tasks.
        ///
        /// Serializes to the task section of the request body. The model is
        /// carried alongside and never serialized.
        #[derive(Clone, Debug, PartialEq, Serialize)]
        #[serde(untagged)]
        pub enum TaskRequest {
            $($variant($args),)*
        }

        impl TaskRequest {
            pub fn model(&self) -> &str {
                match self {
                    $(TaskRequest::$variant(args) => &args.model,)*
                }
            }

            fn model_mut(&mut self) -> &mut String {
                match self {
                    $(TaskRequest::$variant(args) => &mut args.model,)*
                }
            }

            pub fn kind(&self) -> TaskKind {
                match self {
                    $(TaskRequest::$variant(_) => TaskKind::$variant,)*
                }
            }

            /// Build a request from untyped `inputs` and `parameters`.
            ///
            /// Fails with [`Error::InvalidInput`] when the values do not fit
            /// the task's argument schema.
            pub fn from_parts(
                kind: TaskKind,
                model: impl Into<String>,
                inputs: Value,
                parameters: Option<Value>,
            ) -> Result<Self> {
                let mut body = Map::new();
                body.insert("inputs".into(), inputs);
                if let Some(parameters) = parameters {
                    body.insert("parameters".into(), parameters);
                }
                let body = Value::Object(body);
                let mut request = match kind {
                    $(TaskKind::$variant => TaskRequest::$variant(parse_args(kind, body)?),)*
                };
                *request.model_mut() = model.into();
                Ok(request)
            }
        }

        $(
            impl From<$args> for TaskRequest {
                fn from(args: $args) -> Self {
                    TaskRequest::$variant(args)
                }
            }
        )*
    };
}

task_requests! {
    FillMask(FillMaskArgs),
    Summarization(SummarizationArgs),
    QuestionAnswer(QuestionAnswerArgs),
    TableQuestionAnswer(TableQuestionAnswerArgs),
    TextClassification(TextClassificationArgs),
    TextGeneration(TextGenerationArgs),
    TokenClassification(TokenClassificationArgs),
    Translation(TranslationArgs),
    ZeroShotClassification(ZeroShotClassificationArgs),
    Conversational(ConversationalArgs),
    FeatureExtraction(FeatureExtractionArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn names_round_trip() {
        for kind in TaskKind::ALL {
            assert_eq!(kind.as_str().parse::<TaskKind>().unwrap(), kind);
        }
        assert!(matches!(
            "image-segmentation".parse::<TaskKind>(),
            Err(Error::UnknownTask(name)) if name == "image-segmentation"
        ));
    }

    #[test]
    fn model_is_not_serialized() {
        let request = TaskRequest::from(FillMaskArgs::new("bert-base-uncased", "[MASK] world!"));
        assert_eq!(request.model(), "bert-base-uncased");
        assert_eq!(request.kind(), TaskKind::FillMask);
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body, json!({"inputs": "[MASK] world!"}));
    }

    #[test]
    fn from_parts_builds_typed_request() {
        let request = TaskRequest::from_parts(
            TaskKind::QuestionAnswer,
            "deepset/roberta-base-squad2",
            json!({"question": "Where?", "context": "In Paris."}),
            None,
        )
        .unwrap();
        match &request {
            TaskRequest::QuestionAnswer(args) => {
                assert_eq!(args.model, "deepset/roberta-base-squad2");
                assert_eq!(args.inputs.question, "Where?");
            }
            other => panic!("unexpected request {other:?}"),
        }
    }

    #[test]
    fn from_parts_rejects_mismatched_inputs() {
        let err = TaskRequest::from_parts(
            TaskKind::ZeroShotClassification,
            "facebook/bart-large-mnli",
            json!("hi"),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(msg) if msg.starts_with("zero-shot-classification")));
    }

    #[test]
    fn shapes_per_task() {
        assert_eq!(TaskKind::Translation.shape(), Shape::FirstElement);
        assert_eq!(TaskKind::TokenClassification.shape(), Shape::Array);
        assert_eq!(TaskKind::FillMask.shape(), Shape::Passthrough);
    }
}
