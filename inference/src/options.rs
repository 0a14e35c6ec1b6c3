//! Per-request flags understood by the inference API.
//!
//! Every flag is optional. Unset flags are left out of the request body so
//! the server applies its own default.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    /// Route the request to a GPU worker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_gpu: Option<bool>,
    /// Allow the server to answer from its result cache.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_cache: Option<bool>,
    /// Block until the model is loaded instead of answering 503.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_for_model: Option<bool>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gpu(mut self, value: bool) -> Self {
        self.use_gpu = Some(value);
        self
    }

    pub fn with_cache(mut self, value: bool) -> Self {
        self.use_cache = Some(value);
        self
    }

    pub fn with_wait_for_model(mut self, value: bool) -> Self {
        self.wait_for_model = Some(value);
        self
    }

    /// Combine `self` with `overrides`. A flag set in `overrides` wins,
    /// otherwise the value from `self` is kept.
    pub fn merge(&self, overrides: &Options) -> Options {
        Options {
            use_gpu: overrides.use_gpu.or(self.use_gpu),
            use_cache: overrides.use_cache.or(self.use_cache),
            wait_for_model: overrides.wait_for_model.or(self.wait_for_model),
        }
    }

    /// Copy of these options that asks the server to wait for a cold model.
    pub fn waiting(&self) -> Options {
        self.with_wait_for_model(true)
    }

    pub fn waits_for_model(&self) -> bool {
        self.wait_for_model == Some(true)
    }
}
