//! Environment configuration.
//!
//! | variable            | meaning                                  |
//! |---------------------|------------------------------------------|
//! | `HF_API_KEY`        | bearer token, anonymous when unset       |
//! | `HF_INFERENCE_URL`  | base URL, defaults to the public API     |
//! | `HF_USE_GPU`        | default for [`Options::use_gpu`]         |
//! | `HF_USE_CACHE`      | default for [`Options::use_cache`]       |
//! | `HF_WAIT_FOR_MODEL` | default for [`Options::wait_for_model`]  |

use std::env;

use crate::client::InferenceClient;
use crate::options::Options;

/// Interpret a flag value. Unrecognised values count as unset.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn flag_from_env(name: &str) -> Option<bool> {
    env::var(name).ok().as_deref().and_then(parse_flag)
}

/// Read default [`Options`] from the `HF_USE_GPU`, `HF_USE_CACHE` and
/// `HF_WAIT_FOR_MODEL` environment variables.
pub fn options_from_env() -> Options {
    Options {
        use_gpu: flag_from_env("HF_USE_GPU"),
        use_cache: flag_from_env("HF_USE_CACHE"),
        wait_for_model: flag_from_env("HF_WAIT_FOR_MODEL"),
    }
}

/// Create an [`InferenceClient`] from the `HF_*` environment variables.
pub fn client_from_env() -> InferenceClient {
    let api_key = env::var("HF_API_KEY").unwrap_or_default();
    let client = InferenceClient::new(api_key, options_from_env());
    match env::var("HF_INFERENCE_URL") {
        Ok(url) if !url.trim().is_empty() => client.with_base_url(url.trim()),
        _ => client,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags() {
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag(" YES "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
        assert_eq!(parse_flag(""), None);
    }
}
