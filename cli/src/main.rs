//! Command-line host for the Unipile adapter.
//!
//! Lists the tool registry, prints input schemas, and performs single calls
//! with credentials taken from `UNIPILE_*` environment variables (a `.env`
//! file in the working directory is loaded first).

use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use unipile_core::{EnvCredentials, Operation, ToolInfo, UnipileAdapter, UreqTransport};

/// Call Unipile messaging and social endpoints from the shell.
#[derive(Parser, Debug)]
#[command(name = "unipile", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every tool with its description and tags
    Tools,

    /// Print the JSON input schema of one tool
    Schema {
        /// Tool name, e.g. list_all_chats
        tool: String,
    },

    /// Invoke one tool and print the result
    Call {
        /// Tool name, e.g. retrieve_account
        tool: String,

        /// Arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e).context("failed to load .env");
        }
    }

    let cli = Cli::parse();
    match cli.command {
        Command::Tools => print_json(&tools()),
        Command::Schema { tool } => {
            let operation: Operation = tool.parse()?;
            print_json(&operation.descriptor().input_schema())
        }
        Command::Call { tool, args } => {
            let args = parse_args(&args)?;
            let transport = UreqTransport::with_timeout(timeout_from_env()?);
            let adapter = UnipileAdapter::from_provider(&EnvCredentials, transport)
                .context("failed to resolve Unipile credentials")?;
            let result = adapter
                .call_tool(&tool, args)
                .with_context(|| format!("{tool} failed"))?;
            print_json(&result)
        }
    }
}

fn tools() -> Vec<ToolInfo> {
    Operation::ALL.iter().copied().map(ToolInfo::from).collect()
}

fn parse_args(raw: &str) -> anyhow::Result<Value> {
    let value: Value = serde_json::from_str(raw).context("--args is not valid JSON")?;
    if !value.is_object() {
        bail!("--args must be a JSON object");
    }
    Ok(value)
}

fn timeout_from_env() -> anyhow::Result<Option<Duration>> {
    match std::env::var("UNIPILE_TIMEOUT_SECS") {
        Ok(raw) => parse_timeout(&raw).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_timeout(raw: &str) -> anyhow::Result<Duration> {
    let secs: u64 = raw
        .trim()
        .parse()
        .with_context(|| format!("UNIPILE_TIMEOUT_SECS must be whole seconds, got `{raw}`"))?;
    debug!(secs, "transport timeout");
    Ok(Duration::from_secs(secs))
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_subcommand_parses() {
        let cli = Cli::try_parse_from([
            "unipile",
            "call",
            "retrieve_account",
            "--args",
            r#"{"account_id":"acc_123"}"#,
        ])
        .unwrap();
        match cli.command {
            Command::Call { tool, args } => {
                assert_eq!(tool, "retrieve_account");
                assert_eq!(parse_args(&args).unwrap()["account_id"], "acc_123");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn call_args_default_to_empty_object() {
        let cli = Cli::try_parse_from(["unipile", "call", "list_all_accounts"]).unwrap();
        match cli.command {
            Command::Call { args, .. } => assert_eq!(parse_args(&args).unwrap(), serde_json::json!({})),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn args_must_be_an_object() {
        assert!(parse_args("[1, 2]").is_err());
        assert!(parse_args("not json").is_err());
    }

    #[test]
    fn timeout_is_whole_seconds() {
        assert_eq!(parse_timeout(" 30 ").unwrap(), Duration::from_secs(30));
        assert!(parse_timeout("1.5").is_err());
    }

    #[test]
    fn tools_lists_every_operation() {
        let names: Vec<String> = tools().into_iter().map(|t| t.name.to_string()).collect();
        assert_eq!(names.len(), 16);
        assert_eq!(names[0], "list_all_chats");
    }
}
