use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use inference::{InferenceClient, Options, TaskKind, TaskRequest, DEFAULT_BASE_URL};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Run a single task against the hosted inference API and print the result.
#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Task name, e.g. `fill-mask` or `zero-shot-classification`
    task: String,
    /// Model identifier, e.g. `bert-base-uncased`
    #[arg(long)]
    model: String,
    /// Task inputs as JSON. Text that is not valid JSON is sent as a string.
    #[arg(long)]
    inputs: String,
    /// Task parameters as a JSON object
    #[arg(long)]
    parameters: Option<String>,
    /// Route the request to a GPU worker
    #[arg(long)]
    gpu: bool,
    /// Bypass the server side result cache
    #[arg(long)]
    no_cache: bool,
    /// Wait for a cold model instead of receiving 503
    #[arg(long)]
    wait_for_model: bool,
    #[arg(long, env = "HF_API_KEY", default_value = "", hide_env_values = true)]
    api_key: String,
    #[arg(long, env = "HF_INFERENCE_URL", default_value = DEFAULT_BASE_URL)]
    url: String,
}

impl Args {
    fn options(&self) -> Options {
        let mut options = Options::new();
        if self.gpu {
            options = options.with_gpu(true);
        }
        if self.no_cache {
            options = options.with_cache(false);
        }
        if self.wait_for_model {
            options = options.with_wait_for_model(true);
        }
        options
    }

    fn request(&self) -> anyhow::Result<TaskRequest> {
        let kind: TaskKind = self.task.parse()?;
        let parameters = self
            .parameters
            .as_deref()
            .map(serde_json::from_str::<Value>)
            .transpose()
            .context("--parameters must be a JSON object")?;
        build_request(kind, &self.model, &self.inputs, parameters)
    }
}

/// Parse `inputs` as JSON, falling back to the raw text. A JSON scalar such
/// as `42` or `true` that the task rejects is also sent as text.
fn build_request(
    kind: TaskKind,
    model: &str,
    inputs: &str,
    parameters: Option<Value>,
) -> anyhow::Result<TaskRequest> {
    let text = || Value::String(inputs.to_string());
    let parsed = match serde_json::from_str::<Value>(inputs) {
        Ok(value) => value,
        Err(_) => return Ok(TaskRequest::from_parts(kind, model, text(), parameters)?),
    };
    let scalar = matches!(parsed, Value::Null | Value::Bool(_) | Value::Number(_));
    match TaskRequest::from_parts(kind, model, parsed, parameters.clone()) {
        Ok(request) => Ok(request),
        Err(_) if scalar => Ok(TaskRequest::from_parts(kind, model, text(), parameters)?),
        Err(e) => Err(e.into()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args = Args::parse();
    let request = args.request()?;
    let client = InferenceClient::new(args.api_key.clone(), Options::default()).with_base_url(&args.url);
    info!(task = %request.kind(), model = %request.model(), "running inference");
    let output = client.infer(request, Some(&args.options())).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
