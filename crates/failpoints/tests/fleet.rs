//! Fleet-wide failure point operations against a mocked deployment.

use harness_failpoints::{FailurePointClient, FailurePointError, FailurePointOperation};
use harness_primitives::{DeploymentSnapshot, Instance, Verb};
use harness_transport::test_utils::{response, MockTransport};
use std::sync::Arc;

fn fleet() -> Vec<Instance> {
    vec![
        Instance::new("tcp://127.0.0.1:8530").with_role("coordinator"),
        Instance::new("ssl://127.0.0.1:8531").with_role("dbserver"),
        Instance::new("127.0.0.1:8532").with_role("agent"),
    ]
}

#[tokio::test]
async fn test_should_set_and_clear_on_every_instance() -> eyre::Result<()> {
    let mock = Arc::new(MockTransport::new());
    let client = FailurePointClient::new(mock.clone(), fleet());

    client.set_failure_point("crashBeforeCommit").await?;
    client.clear_failure_point(Some("crashBeforeCommit")).await?;

    assert_eq!(
        mock.urls(Verb::Put),
        vec![
            "http://127.0.0.1:8530/_admin/debug/failat/crashBeforeCommit",
            "https://127.0.0.1:8531/_admin/debug/failat/crashBeforeCommit",
            "http://127.0.0.1:8532/_admin/debug/failat/crashBeforeCommit",
        ]
    );
    assert_eq!(
        mock.urls(Verb::Delete),
        vec![
            "http://127.0.0.1:8530/_admin/debug/failat/crashBeforeCommit",
            "https://127.0.0.1:8531/_admin/debug/failat/crashBeforeCommit",
            "http://127.0.0.1:8532/_admin/debug/failat/crashBeforeCommit",
        ]
    );
    assert!(mock.requests().iter().all(|r| r.body.as_deref() == Some("")));

    Ok(())
}

#[tokio::test]
async fn test_should_clear_all_failure_points_without_name() -> eyre::Result<()> {
    let mock = Arc::new(MockTransport::new());
    let snapshot = DeploymentSnapshot::from(fleet());
    let client = FailurePointClient::new(mock.clone(), &snapshot);

    client.clear_failure_point(None).await?;

    assert_eq!(
        mock.urls(Verb::Delete),
        vec![
            "http://127.0.0.1:8530/_admin/debug/failat",
            "https://127.0.0.1:8531/_admin/debug/failat",
            "http://127.0.0.1:8532/_admin/debug/failat",
        ]
    );

    Ok(())
}

#[tokio::test]
async fn test_should_stop_at_first_failing_instance() -> eyre::Result<()> {
    let mock = Arc::new(MockTransport::new().with_verb_response(
        Verb::Put,
        "https://127.0.0.1:8531/_admin/debug/failat/crashBeforeCommit",
        response(500, "{\"error\":true}"),
    ));
    let client = FailurePointClient::new(mock.clone(), fleet());

    let err = client.set_failure_point("crashBeforeCommit").await.unwrap_err();

    match err {
        FailurePointError::Control { operation, name, endpoint, status } => {
            assert_eq!(operation, FailurePointOperation::Set);
            assert_eq!(name.as_deref(), Some("crashBeforeCommit"));
            assert_eq!(endpoint, "ssl://127.0.0.1:8531");
            assert_eq!(status, 500);
        }
        err => eyre::bail!("unexpected error {err}"),
    }

    // the first instance already applied the failure point, the third was never contacted.
    assert_eq!(
        mock.urls(Verb::Put),
        vec![
            "http://127.0.0.1:8530/_admin/debug/failat/crashBeforeCommit",
            "https://127.0.0.1:8531/_admin/debug/failat/crashBeforeCommit",
        ]
    );

    Ok(())
}

#[tokio::test]
async fn test_should_stop_at_first_unreachable_instance() -> eyre::Result<()> {
    let mock = Arc::new(
        MockTransport::new().with_error("https://127.0.0.1:8531/_admin/debug/failat/crashBeforeCommit"),
    );
    let client = FailurePointClient::new(mock.clone(), fleet());

    let err = client.set_failure_point("crashBeforeCommit").await.unwrap_err();

    match &err {
        FailurePointError::Transport { operation, endpoint, .. } => {
            assert_eq!(*operation, FailurePointOperation::Set);
            assert_eq!(endpoint, "ssl://127.0.0.1:8531");
        }
        err => eyre::bail!("unexpected error {err}"),
    }
    assert!(err.to_string().starts_with("set request to ssl://127.0.0.1:8531 failed"));
    assert_eq!(
        mock.urls(Verb::Put),
        vec![
            "http://127.0.0.1:8530/_admin/debug/failat/crashBeforeCommit",
            "https://127.0.0.1:8531/_admin/debug/failat/crashBeforeCommit",
        ]
    );

    Ok(())
}

#[tokio::test]
async fn test_should_reject_any_status_other_than_ok() -> eyre::Result<()> {
    let mock = Arc::new(MockTransport::new().with_default_response(response(204, "")));
    let client = FailurePointClient::new(mock.clone(), fleet());

    let err = client.clear_failure_point(None).await.unwrap_err();

    assert!(matches!(
        err,
        FailurePointError::Control { operation: FailurePointOperation::Clear, status: 204, .. }
    ));
    assert_eq!(mock.requests().len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_should_do_nothing_for_empty_deployment() -> eyre::Result<()> {
    let mock = Arc::new(MockTransport::new());
    let client = FailurePointClient::new(mock.clone(), Vec::<Instance>::new());

    client.set_failure_point("any").await?;
    client.clear_failure_point(None).await?;

    assert!(mock.requests().is_empty());
    assert!(matches!(
        client.can_use_failure_points().await,
        Err(FailurePointError::EmptyDeployment)
    ));

    Ok(())
}

#[tokio::test]
async fn test_should_report_unreachable_probe_target() -> eyre::Result<()> {
    let mock = Arc::new(MockTransport::new().with_error("http://127.0.0.1:8530/_admin/debug/failat"));
    let client = FailurePointClient::new(mock.clone(), fleet());

    assert!(matches!(
        client.can_use_failure_points().await,
        Err(FailurePointError::Transport { operation: FailurePointOperation::Probe, .. })
    ));
    assert_eq!(mock.requests().len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_should_probe_first_instance_only() -> eyre::Result<()> {
    const PROBE_URL: &str = "http://127.0.0.1:8530/_admin/debug/failat";

    for (status, body, expected) in [
        (200, "true", true),
        (200, "false", false),
        (200, "True", false),
        (200, "1", false),
        (200, "true\n", false),
        (404, "true", false),
        (500, "", false),
    ] {
        let mock = Arc::new(MockTransport::new().with_response(PROBE_URL, response(status, body)));
        let client = FailurePointClient::new(mock.clone(), fleet());

        assert_eq!(client.can_use_failure_points().await?, expected, "{status} {body:?}");
        assert_eq!(mock.urls(Verb::Get), vec![PROBE_URL]);
        assert_eq!(mock.requests().len(), 1);
    }

    Ok(())
}

#[tokio::test]
async fn test_should_not_check_crash_response() -> eyre::Result<()> {
    let mock = Arc::new(MockTransport::new().with_default_response(response(503, "")));
    let client = FailurePointClient::new(mock.clone(), fleet());

    client.terminate_instance("ssl://10.0.0.7:8529").await;

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].verb, Verb::Put);
    assert_eq!(requests[0].url, "https://10.0.0.7:8529/_admin/debug/crash");

    Ok(())
}

#[tokio::test]
async fn test_should_ignore_dropped_crash_connection() -> eyre::Result<()> {
    let mock = Arc::new(MockTransport::new().with_error("http://10.0.0.7:8529/_admin/debug/crash"));
    let client = FailurePointClient::new(mock.clone(), fleet());

    client.terminate_instance("tcp://10.0.0.7:8529").await;

    assert_eq!(mock.urls(Verb::Put), vec!["http://10.0.0.7:8529/_admin/debug/crash"]);

    Ok(())
}
