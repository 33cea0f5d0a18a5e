use crate::config::{ClientConfig, RequestConfig};
use crate::domain::model::{Headers, HttpMethod};
use crate::utils::error::{Result, StoreFetchError};
use crate::utils::validation::{self, Validate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "storefetch")]
#[command(about = "JSON key-value storage and a small JSON HTTP client")]
pub struct Cli {
    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Send a request and print the JSON response
    Http(HttpArgs),
    /// Read or modify a namespaced bucket on disk
    Store(StoreArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    Get,
    Post,
    Put,
    Delete,
}

impl From<MethodArg> for HttpMethod {
    fn from(method: MethodArg) -> Self {
        match method {
            MethodArg::Get => HttpMethod::Get,
            MethodArg::Post => HttpMethod::Post,
            MethodArg::Put => HttpMethod::Put,
            MethodArg::Delete => HttpMethod::Delete,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct HttpArgs {
    #[arg(value_enum)]
    pub method: MethodArg,

    pub endpoint: String,

    #[arg(long, help = "TOML file with base_url and [headers]")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Base URL; overrides the config file")]
    pub base_url: Option<String>,

    #[arg(long = "header", value_name = "NAME=VALUE", help = "Per-request header, repeatable")]
    pub headers: Vec<String>,

    #[arg(long, help = "JSON request body for post/put")]
    pub data: Option<String>,
}

impl HttpArgs {
    /// Client settings from `--config`, with `--base-url` applied on top.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => ClientConfig::default(),
        };
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        config.validate()?;
        Ok(config)
    }

    pub fn request_config(&self) -> Result<Option<RequestConfig>> {
        if self.headers.is_empty() {
            return Ok(None);
        }

        let headers = self
            .headers
            .iter()
            .map(|raw| parse_header(raw))
            .collect::<Result<Headers>>()?;
        let config = RequestConfig::new().headers(headers);
        config.validate()?;
        Ok(Some(config))
    }

    pub fn payload(&self) -> Result<Option<serde_json::Value>> {
        let method = HttpMethod::from(self.method);
        match method {
            HttpMethod::Post | HttpMethod::Put => {
                let data = validation::validate_required_field("data", &self.data)?;
                Ok(Some(serde_json::from_str(data)?))
            }
            HttpMethod::Get | HttpMethod::Delete => Ok(None),
        }
    }
}

fn parse_header(raw: &str) -> Result<(String, String)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| StoreFetchError::InvalidConfigValueError {
            field: "header".to_string(),
            value: raw.to_string(),
            reason: "expected NAME=VALUE".to_string(),
        })?;
    Ok((name.trim().to_string(), value.trim().to_string()))
}

#[derive(Debug, Clone, Args)]
pub struct StoreArgs {
    #[arg(long, default_value = "./.storefetch")]
    pub dir: String,

    #[arg(long)]
    pub namespace: String,

    #[command(subcommand)]
    pub action: StoreAction,
}

impl Validate for StoreArgs {
    fn validate(&self) -> Result<()> {
        validation::validate_path("dir", &self.dir)?;
        validation::validate_non_empty_string("namespace", &self.namespace)
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum StoreAction {
    /// Print one value, or the whole bucket when no key is given
    Get {
        key: Option<String>,
        #[arg(long, help = "JSON printed when the key is absent")]
        default: Option<String>,
    },
    /// Store a JSON value (plain text is stored as a string)
    Set { key: String, value: String },
    /// Remove one or more keys
    Remove {
        #[arg(required = true)]
        keys: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::HeaderValue;

    #[test]
    fn test_parse_http_command() {
        let cli = Cli::parse_from([
            "storefetch",
            "http",
            "post",
            "/items",
            "--base-url",
            "https://api.example.com",
            "--header",
            "Authorization=Bearer t",
            "--data",
            r#"{"a":1}"#,
        ]);

        let Command::Http(args) = cli.command else {
            panic!("expected http command");
        };
        assert_eq!(args.method, MethodArg::Post);
        assert_eq!(
            args.client_config().unwrap().base_url,
            "https://api.example.com"
        );

        let request = args.request_config().unwrap().unwrap();
        assert_eq!(
            request.headers.unwrap().get("Authorization"),
            Some(&HeaderValue::from("Bearer t"))
        );
        assert_eq!(args.payload().unwrap(), Some(serde_json::json!({"a": 1})));
    }

    #[test]
    fn test_post_requires_data() {
        let cli = Cli::parse_from(["storefetch", "http", "put", "/x", "--base-url", "http://h"]);
        let Command::Http(args) = cli.command else {
            panic!("expected http command");
        };
        assert!(matches!(
            args.payload(),
            Err(StoreFetchError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_http_requires_base_url() {
        let cli = Cli::parse_from(["storefetch", "http", "get", "/x"]);
        let Command::Http(args) = cli.command else {
            panic!("expected http command");
        };
        assert!(args.client_config().is_err());
        assert_eq!(args.payload().unwrap(), None);
    }

    #[test]
    fn test_malformed_header_is_rejected() {
        assert!(parse_header("no-equals-sign").is_err());
        assert_eq!(
            parse_header("X-A = b=c").unwrap(),
            ("X-A".to_string(), "b=c".to_string())
        );
    }

    #[test]
    fn test_parse_store_command() {
        let cli = Cli::parse_from([
            "storefetch",
            "store",
            "--namespace",
            "prefs",
            "remove",
            "a",
            "b",
        ]);
        let Command::Store(args) = cli.command else {
            panic!("expected store command");
        };
        assert!(args.validate().is_ok());
        assert!(matches!(args.action, StoreAction::Remove { ref keys } if keys.len() == 2));
    }
}
