//! Complete transcripts of mocked exchanges.

use harness_primitives::{HeaderList, Verb};
use harness_transcript::{
    BufferSink, RecordingSink, ResponseFormat, TranscriptError, TranscriptRecorder,
};
use harness_transport::test_utils::{response, MockTransport};
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_should_record_json_exchange() -> eyre::Result<()> {
    let mock = MockTransport::new().with_response(
        "/_api/ttl/properties",
        response(200, "{\"result\":{\"active\":true}}")
            .with_header("content-type", "application/json; charset=utf-8"),
    );
    let recorder = TranscriptRecorder::new(mock);
    let mut sink = BufferSink::default();

    recorder
        .record_exchange(
            &mut sink,
            "PUT",
            "/_api/ttl/properties",
            Some(json!({"active": true}).into()),
            None,
            ResponseFormat::Json,
        )
        .await?;

    let expected = "shell> curl -X PUT --header 'accept: application/json' --data-binary @- \
                    --dump - http://localhost:8529/_api/ttl/properties <<EOF\n\
                    {\n  \"active\": true\n}\n\
                    EOF\n\n\
                    HTTP/1.1 200 OK\n\
                    content-type: application/json; charset=utf-8\n\
                    \n\
                    {\n  \"result\": {\n    \"active\": true\n  }\n}\n";
    assert_eq!(sink.as_str(), expected);

    Ok(())
}

#[tokio::test]
async fn test_should_record_plain_exchange_with_custom_headers() -> eyre::Result<()> {
    let mock = Arc::new(
        MockTransport::new()
            .with_response("/_admin/metrics", response(200, "first\r\nsecond\n")),
    );
    let recorder = TranscriptRecorder::new(mock.clone()).with_admin_port(8530);
    let mut sink = BufferSink::default();
    let headers: HeaderList = [("Accept", "text/plain"), ("x-arango-async", "true")]
        .into_iter()
        .collect();

    recorder
        .record_exchange(
            &mut sink,
            "GET",
            "/_admin/metrics",
            None,
            Some(headers),
            ResponseFormat::Plain,
        )
        .await?;

    assert_eq!(
        sink.into_string(),
        "shell> curl --header 'Accept: text/plain' --header 'x-arango-async: true' \
         --dump - http://localhost:8530/_admin/metrics\n\n\
         HTTP/1.1 200 OK\n\nfirst\nsecond\n"
    );
    assert_eq!(mock.requests()[0].verb, Verb::Get);
    assert_eq!(mock.requests()[0].headers.get("accept"), None);

    Ok(())
}

#[tokio::test]
async fn test_should_keep_request_block_when_body_is_malformed() -> eyre::Result<()> {
    let mock = MockTransport::new().with_default_response(response(500, "<html>oops</html>"));
    let recorder = TranscriptRecorder::new(mock);
    let mut sink = RecordingSink::default();

    let err = recorder
        .record_exchange(&mut sink, "GET", "/_api/version", None, None, ResponseFormat::Json)
        .await
        .unwrap_err();

    assert!(matches!(err, TranscriptError::ResponseBodyDecode { .. }));
    assert!(err.to_string().contains("<html>oops</html>"));
    assert_eq!(
        sink.text(),
        "shell> curl --header 'accept: application/json' --dump - http://localhost:8529/_api/version\n\n"
    );

    Ok(())
}
