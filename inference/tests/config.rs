use inference::{client_from_env, options_from_env, Options, DEFAULT_BASE_URL};

// Single test so no other test in this binary races on the environment.
#[test]
fn reads_client_settings_from_env() {
    std::env::remove_var("HF_INFERENCE_URL");
    std::env::remove_var("HF_USE_GPU");
    std::env::remove_var("HF_USE_CACHE");
    std::env::remove_var("HF_WAIT_FOR_MODEL");
    let client = client_from_env();
    assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    assert_eq!(client.default_options(), &Options::default());

    std::env::set_var("HF_INFERENCE_URL", "http://localhost:9000/");
    std::env::set_var("HF_USE_CACHE", "false");
    std::env::set_var("HF_WAIT_FOR_MODEL", "1");
    std::env::set_var("HF_USE_GPU", "sometimes");
    let client = client_from_env();
    assert_eq!(client.base_url(), "http://localhost:9000");
    assert_eq!(
        options_from_env(),
        Options {
            use_gpu: None,
            use_cache: Some(false),
            wait_for_model: Some(true),
        }
    );
    assert_eq!(client.default_options(), &options_from_env());
}
