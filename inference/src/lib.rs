//! Typed client for the Hugging Face hosted inference API.
//!
//! The `inference` crate sends task requests (fill-mask, summarization,
//! question answering, classification, translation, generation and more) to
//! `<base>/models/<model>` and decodes the task specific responses. See
//! [`InferenceClient`] for the request flow and [`config`] for environment
//! configuration.
//!
//! ```no_run
//! use inference::{FillMaskArgs, InferenceClient, Options};
//!
//! # async fn run() -> inference::Result<()> {
//! let client = InferenceClient::new("hf_...", Options::default());
//! let predictions = client
//!     .fill_mask(FillMaskArgs::new("bert-base-uncased", "[MASK] world!"), None)
//!     .await?;
//! println!("{}", predictions[0].sequence);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod options;
pub mod shape;
pub mod task;
pub mod types;

pub use client::{InferenceClient, DEFAULT_BASE_URL};
pub use config::{client_from_env, options_from_env};
pub use error::{Error, Result};
pub use options::Options;
pub use shape::{reshape, Shape};
pub use task::{TaskKind, TaskRequest};
pub use types::*;
