use anyhow::Context;
use clap::Parser;
use serde_json::Value;
use storefetch::config::cli::{Cli, Command, HttpArgs, StoreAction, StoreArgs};
use storefetch::utils::{logger, validation::Validate};
use storefetch::{FileStore, HttpClient, StorageAdapter, StoreFetchError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI args: {:?}", cli);

    let output = match cli.command {
        Command::Http(args) => run_http(args).await,
        Command::Store(args) => run_store(args),
    };

    match output {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Err(StoreFetchError::StatusError(response)) => {
            let response = *response;
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("❌ Request failed with status {}", status);
            eprintln!("❌ {}", status);
            if !body.is_empty() {
                eprintln!("{}", body);
            }
            std::process::exit(2);
        }
        Err(e) => Err(e).context("storefetch failed"),
    }
}

async fn run_http(args: HttpArgs) -> storefetch::Result<Value> {
    let client = HttpClient::new(args.client_config()?);
    let custom = args.request_config()?;
    let payload = args.payload()?;

    tracing::info!(
        "📡 {} {}{}",
        storefetch::HttpMethod::from(args.method),
        client.base_url(),
        args.endpoint
    );

    client
        .request(
            args.method.into(),
            &args.endpoint,
            payload.map(Into::into),
            custom.as_ref(),
        )
        .await
}

fn run_store(args: StoreArgs) -> storefetch::Result<Value> {
    args.validate()?;
    let storage = StorageAdapter::new(FileStore::new(&args.dir), args.namespace.clone());

    match args.action {
        StoreAction::Get { key: None, .. } => Ok(Value::Object(storage.bucket()?)),
        StoreAction::Get {
            key: Some(key),
            default,
        } => {
            let default = match default {
                Some(raw) => parse_value(&raw),
                None => Value::Null,
            };
            storage.get_value_or(&key, default)
        }
        StoreAction::Set { key, value } => {
            let value = parse_value(&value);
            storage.set_value(&key, &value)?;
            tracing::info!("✅ Stored '{}' in namespace '{}'", key, storage.namespace());
            Ok(Value::Object(storage.bucket()?))
        }
        StoreAction::Remove { keys } => {
            storage.remove_values(&keys)?;
            tracing::info!(
                "✅ Removed {} key(s) from namespace '{}'",
                keys.len(),
                storage.namespace()
            );
            Ok(Value::Object(storage.bucket()?))
        }
    }
}

/// JSON if it parses, otherwise the raw text as a JSON string.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
