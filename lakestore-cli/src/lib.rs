//! Argument binding and dispatch for the `lakestore` binary.
//!
//! Turns command-line input into typed requests, builds the store client,
//! and maps failures onto exit codes. The commands themselves live in
//! `lakestore-commands`.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use lakestore_client::{
    ErrorKind, StoreClient, StoreError, StoreResult, WebHdfsConfig, WebHdfsStore,
};
use lakestore_commands::join::{concatenate, JoinRequest};
use lakestore_types::{SourcePaths, StorePath};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "lakestore",
    version,
    about = "File-system commands for a remote data lake store",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Concatenate files into one destination file
    Join(JoinArgs),
}

#[derive(Args, Debug)]
pub struct JoinArgs {
    /// The store account to execute the operation in
    #[arg(long, visible_alias = "account-name", env = "LAKESTORE_ACCOUNT")]
    pub account: String,

    /// Files to concatenate, in order (e.g. /folder/file.txt)
    #[arg(long = "path", visible_alias = "paths", value_name = "PATH", num_args = 1.., required = true)]
    pub paths: Vec<String>,

    /// File the concatenation should target (e.g. /folder/out.txt)
    #[arg(long, value_name = "PATH")]
    pub destination: String,

    /// Overwrite the destination if it is an existing file
    #[arg(long)]
    pub force: bool,

    #[command(flatten)]
    pub store: StoreArgs,
}

/// Connection settings shared by every command.
#[derive(Args, Debug)]
pub struct StoreArgs {
    /// DNS suffix of the store endpoint
    #[arg(long, env = "LAKESTORE_ENDPOINT_SUFFIX", default_value = "azuredatalakestore.net")]
    pub endpoint_suffix: String,

    /// Send requests to this URL instead of the account endpoint
    #[arg(long, env = "LAKESTORE_BASE_URL")]
    pub base_url: Option<String>,

    /// Bearer token for the store
    #[arg(long, env = "LAKESTORE_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 60)]
    pub timeout_secs: u64,
}

impl StoreArgs {
    pub fn to_config(&self, account: &str) -> WebHdfsConfig {
        WebHdfsConfig {
            account: account.to_string(),
            endpoint_suffix: self.endpoint_suffix.clone(),
            base_url: self.base_url.clone(),
            access_token: self.access_token.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

impl JoinArgs {
    /// Binds the raw arguments into a validated request for the account at
    /// `host`.
    ///
    /// Fully-qualified paths must name that same host.
    pub fn to_request(&self, host: &str) -> Result<JoinRequest> {
        self.bind(host).context("invalid join arguments")
    }

    fn bind(&self, host: &str) -> StoreResult<JoinRequest> {
        let destination = parse_in_account(&self.destination, host)?;
        let sources = self
            .paths
            .iter()
            .map(|raw| parse_in_account(raw, host))
            .collect::<StoreResult<Vec<_>>>()?;
        JoinRequest::new(destination, SourcePaths::new(sources)?, self.force)
    }
}

fn parse_in_account(raw: &str, host: &str) -> StoreResult<StorePath> {
    match StorePath::parse_qualified(raw)? {
        (Some(other), _) if !other.eq_ignore_ascii_case(host) => Err(
            StoreError::InvalidArgument(format!("{raw} is not in account {host}")),
        ),
        (_, path) => Ok(path),
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` takes precedence.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

/// Runs a join against `store`, the account at `host`, and returns the
/// destination.
pub async fn run_join<S>(store: &S, host: &str, args: &JoinArgs) -> Result<StorePath>
where
    S: StoreClient + ?Sized,
{
    let request = args.to_request(host)?;
    let destination = concatenate(store, &request)
        .await
        .with_context(|| format!("failed to concatenate into {}", request.destination))?;
    Ok(destination)
}

/// Executes a parsed command line and returns what to print on stdout.
pub async fn run(cli: Cli) -> Result<String> {
    match cli.command {
        Command::Join(args) => {
            let config = args.store.to_config(&args.account);
            let host = config.host();
            let store = WebHdfsStore::new(config).context("failed to create store client")?;
            let destination = run_join(&store, &host, &args).await?;
            Ok(destination.fully_qualified(&host))
        }
    }
}

/// Maps a failure onto the process exit code.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<StoreError>().map(StoreError::kind) {
        Some(ErrorKind::InvalidArgument) => 2,
        Some(ErrorKind::DestinationConflict) => 3,
        Some(ErrorKind::SourceMissing) => 4,
        Some(ErrorKind::TransportFailure) => 5,
        Some(ErrorKind::Config) => 6,
        None => 1,
    }
}
