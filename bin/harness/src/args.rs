use clap::{Parser, Subcommand, ValueEnum};
use harness_primitives::{DeploymentSnapshot, HeaderList};
use harness_transcript::{ResponseFormat, DEFAULT_ADMIN_PORT};
use serde_json::Value;

/// Harness CLI arguments.
#[derive(Debug, Parser)]
#[command(name = "harness", about = "Debug control and HTTP transcripts for nodes under test")]
pub struct HarnessArgs {
    /// Endpoint of the node receiving administrative calls and recorded requests.
    #[arg(long, env = "HARNESS_ENDPOINT", default_value = "tcp://127.0.0.1:8529")]
    pub endpoint: String,

    /// Instance info of the deployment as JSON, e.g. `{"arangods":[{"endpoint":"tcp://..."}]}`.
    #[arg(long, env = "INSTANCEINFO", value_parser = parse_instance_info)]
    pub instance_info: Option<DeploymentSnapshot>,

    /// Port shown in the target of recorded `curl` commands.
    #[arg(long, env = "HARNESS_ADMIN_PORT", default_value_t = DEFAULT_ADMIN_PORT)]
    pub admin_port: u16,

    /// Request timeout in seconds.
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// The command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// A harness command.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Failure point control across the deployment.
    #[command(subcommand)]
    Failpoint(FailpointCommand),
    /// Ask the node at the endpoint to crash.
    Crash {
        /// Endpoint of the node to crash.
        endpoint: String,
    },
    /// Print whether the node is a cluster coordinator.
    Role,
    /// Print the health of the cluster.
    Health,
    /// Print statistics of the node.
    Stats {
        /// The statistics to print.
        #[arg(value_enum)]
        kind: StatsKind,
    },
    /// TTL queries.
    #[command(subcommand)]
    Ttl(TtlCommand),
    /// Write-ahead log queries.
    #[command(subcommand)]
    Wal(WalCommand),
    /// Rebuild the routing of the node.
    ReloadRouting,
    /// Issue a request and print its transcript.
    Curl(CurlArgs),
}

/// Failure point commands.
#[derive(Debug, Subcommand)]
pub enum FailpointCommand {
    /// Activate a failure point on every instance.
    Set {
        /// Name of the failure point.
        name: String,
    },
    /// Clear a failure point, or all of them, on every instance.
    Clear {
        /// Name of the failure point.
        name: Option<String>,
    },
    /// Print whether the nodes support failure points.
    Probe,
}

/// Statistics sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatsKind {
    /// Statistics of the node's process.
    Process,
    /// Statistics of the server.
    Server,
}

/// TTL commands.
#[derive(Debug, Subcommand)]
pub enum TtlCommand {
    /// Print the TTL statistics.
    Stats,
    /// Print the TTL properties.
    Properties {
        /// Properties to store first, as JSON.
        #[arg(long, value_parser = parse_json)]
        set: Option<Value>,
    },
}

/// Write-ahead log commands.
#[derive(Debug, Subcommand)]
pub enum WalCommand {
    /// Flush the write-ahead log.
    Flush {
        /// Wait until the flushed data is synced to disk.
        #[arg(long)]
        wait_for_sync: bool,
        /// Wait until the collector has processed the flushed data.
        #[arg(long)]
        wait_for_collector: bool,
    },
    /// Print the write-ahead log properties.
    Properties {
        /// Properties to store first, as JSON.
        #[arg(long, value_parser = parse_json)]
        set: Option<Value>,
    },
    /// Print the transactions holding on to write-ahead log files.
    Transactions,
}

/// Arguments of the `curl` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CurlArgs {
    /// HTTP method of the request.
    pub method: String,
    /// Path of the request.
    pub path: String,
    /// Text body of the request.
    #[arg(long, conflicts_with = "json")]
    pub body: Option<String>,
    /// JSON body of the request.
    #[arg(long, value_parser = parse_json)]
    pub json: Option<Value>,
    /// Request header as `Name: value`. May be repeated.
    #[arg(short = 'H', long = "header", value_name = "HEADER", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,
    /// Rendering of the response body.
    #[arg(long, value_enum, default_value_t = ResponseFormat::Raw)]
    pub render: ResponseFormat,
}

impl CurlArgs {
    /// Returns the request headers, or `None` if none were provided.
    pub fn header_list(&self) -> Option<HeaderList> {
        if self.headers.is_empty() {
            return None
        }
        Some(self.headers.iter().cloned().collect())
    }
}

fn parse_instance_info(s: &str) -> Result<DeploymentSnapshot, String> {
    DeploymentSnapshot::from_json(s).map_err(|err| format!("invalid instance info: {err}"))
}

fn parse_json(s: &str) -> Result<Value, String> {
    serde_json::from_str(s).map_err(|err| format!("invalid JSON: {err}"))
}

fn parse_header(s: &str) -> Result<(String, String), String> {
    let (name, value) =
        s.split_once(':').ok_or_else(|| format!("invalid header {s:?}, expected 'Name: value'"))?;
    Ok((name.trim().to_string(), value.trim().to_string()))
}
