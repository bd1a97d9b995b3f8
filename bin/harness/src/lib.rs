//! Command line tooling for nodes under test: fleet-wide failure points, administrative queries
//! and HTTP transcripts.

use eyre::eyre;
use harness_admin::AdminClient;
use harness_failpoints::FailurePointClient;
use harness_primitives::resolve_base_url;
use harness_transcript::{ConsoleSink, RequestBody, TranscriptRecorder};
use harness_transport::HttpTransport;
use serde_json::Value;
use std::time::Duration;

mod args;
pub use args::{
    Command, CurlArgs, FailpointCommand, HarnessArgs, StatsKind, TtlCommand, WalCommand,
};

impl HarnessArgs {
    /// Runs the command.
    pub async fn run(self) -> eyre::Result<()> {
        let Self { endpoint, instance_info, admin_port, timeout, command } = self;
        let timeout = timeout.map(Duration::from_secs);

        let node = with_timeout(HttpTransport::with_base(resolve_base_url(&endpoint)), timeout)?;
        let fleet = with_timeout(HttpTransport::new(), timeout)?;
        let deployment = instance_info.unwrap_or_default();
        let admin = AdminClient::new(node.clone());

        match command {
            Command::Failpoint(command) => {
                if deployment.instances.is_empty() {
                    return Err(eyre!("no instances: provide --instance-info or INSTANCEINFO"))
                }
                let client = FailurePointClient::new(fleet, deployment);
                match command {
                    FailpointCommand::Set { name } => client.set_failure_point(&name).await?,
                    FailpointCommand::Clear { name } => {
                        client.clear_failure_point(name.as_deref()).await?
                    }
                    FailpointCommand::Probe => println!("{}", client.can_use_failure_points().await?),
                }
            }
            Command::Crash { endpoint } => {
                FailurePointClient::new(fleet, deployment).terminate_instance(&endpoint).await
            }
            Command::Role => println!("{}", admin.is_cluster().await?),
            Command::Health => print_json(&Value::Object(admin.cluster_health().await?))?,
            Command::Stats { kind: StatsKind::Process } => {
                print_json(&admin.process_statistics().await?)?
            }
            Command::Stats { kind: StatsKind::Server } => {
                print_json(&admin.server_statistics().await?)?
            }
            Command::Ttl(TtlCommand::Stats) => print_json(&admin.ttl_statistics().await?)?,
            Command::Ttl(TtlCommand::Properties { set }) => {
                print_json(&admin.ttl_properties(set.as_ref()).await?)?
            }
            Command::Wal(WalCommand::Flush { wait_for_sync, wait_for_collector }) => {
                admin.wal_flush(wait_for_sync, wait_for_collector).await?
            }
            Command::Wal(WalCommand::Properties { set }) => {
                print_json(&admin.wal_properties(set.as_ref()).await?)?
            }
            Command::Wal(WalCommand::Transactions) => print_json(&admin.wal_transactions().await?)?,
            Command::ReloadRouting => print_json(&admin.reload_routing().await?)?,
            Command::Curl(curl) => {
                let recorder = TranscriptRecorder::new(node).with_admin_port(admin_port);
                let headers = curl.header_list();
                let body = match (curl.json, curl.body) {
                    (Some(json), _) => Some(RequestBody::Json(json)),
                    (None, body) => body.map(RequestBody::Text),
                };

                let mut sink = ConsoleSink::stdout();
                let recorded = recorder
                    .record_exchange(&mut sink, &curl.method, &curl.path, body, headers, curl.render)
                    .await;
                sink.finish()?;
                recorded?;
            }
        }

        Ok(())
    }
}

fn with_timeout(
    transport: HttpTransport,
    timeout: Option<Duration>,
) -> eyre::Result<HttpTransport> {
    match timeout {
        Some(timeout) => Ok(transport.with_timeout(timeout)?),
        None => Ok(transport),
    }
}

fn print_json(value: &Value) -> eyre::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
