use assert_cmd::Command;
use httpmock::Method::POST;
use httpmock::MockServer;
use serde_json::json;

#[test]
fn prints_reshaped_result() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/models/facebook/bart-large-cnn")
            .header("authorization", "Bearer hf_test")
            .json_body(json!({
                "inputs": "The tower is 324 metres tall.",
                "parameters": {"max_length": 100},
                "options": {"use_cache": false}
            }));
        then.status(200)
            .json_body(json!([{"summary_text": "The tower is tall."}]));
    });

    let output = Command::cargo_bin("infer")
        .unwrap()
        .env("HF_API_KEY", "hf_test")
        .env("HF_INFERENCE_URL", server.base_url())
        .args([
            "summarization",
            "--model",
            "facebook/bart-large-cnn",
            "--inputs",
            "The tower is 324 metres tall.",
            "--parameters",
            "{\"max_length\": 100}",
            "--no-cache",
        ])
        .output()
        .unwrap();
    mock.assert();
    assert!(output.status.success());
    let printed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(printed, json!({"summary_text": "The tower is tall."}));
}

#[test]
fn rejects_unknown_task() {
    Command::cargo_bin("infer")
        .unwrap()
        .env("HF_INFERENCE_URL", "http://127.0.0.1:1")
        .args(["image-segmentation", "--model", "m", "--inputs", "x"])
        .assert()
        .failure();
}

#[test]
fn reports_inference_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/models/missing-model");
        then.status(400)
            .json_body(json!({"error": "Model missing-model does not exist"}));
    });

    let output = Command::cargo_bin("infer")
        .unwrap()
        .env("HF_INFERENCE_URL", server.base_url())
        .args(["fill-mask", "--model", "missing-model", "--inputs", "[MASK] world!"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Model missing-model does not exist"));
}
