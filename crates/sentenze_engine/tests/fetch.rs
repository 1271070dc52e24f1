mod support;

use std::time::Duration;

use pretty_assertions::assert_eq;
use sentenze_engine::{
    fetch_validated, ContentKind, FailureKind, FetchSettings, FileSourceProvider,
    HttpSourceProvider, PipelineEvent, RetryPolicy, SourceProvider,
};
use support::{init_logging, pdf_with_pages, RecordingSleeper, TestSink};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn pdf_response(body: Vec<u8>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "application/pdf")
}

#[tokio::test]
async fn http_provider_returns_pdf_bytes_and_metadata() {
    init_logging();
    let server = MockServer::start().await;
    let body = pdf_with_pages(&[Some("Sentenza del giorno")]);
    Mock::given(method("GET"))
        .and(path("/sentenza.pdf"))
        .respond_with(pdf_response(body.clone()))
        .mount(&server)
        .await;

    let url = format!("{}/sentenza.pdf", server.uri());
    let provider = HttpSourceProvider::new(&url, FetchSettings::default());
    let document = provider.fetch().await.expect("fetch ok");

    assert_eq!(document.kind, ContentKind::Pdf);
    assert_eq!(document.bytes.as_ref(), body.as_slice());
    assert_eq!(document.metadata.original_url, url);
    assert_eq!(document.metadata.redirect_count, 0);
    assert_eq!(document.metadata.byte_len, body.len() as u64);
    assert_eq!(document.metadata.content_type.as_deref(), Some("application/pdf"));
    assert_eq!(document.source, url);
}

#[tokio::test]
async fn http_provider_sends_bot_headers() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sentenza.pdf"))
        .respond_with(pdf_response(b"%PDF-1.4\n".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let provider = HttpSourceProvider::new(
        format!("{}/sentenza.pdf", server.uri()),
        FetchSettings::default(),
    );
    provider.fetch().await.expect("fetch ok");

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    let header_value = |name: &str| {
        requests[0]
            .headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    assert_eq!(
        header_value("user-agent").as_deref(),
        Some("Mozilla/5.0 (SentenzeBot/1.0)")
    );
    assert_eq!(
        header_value("accept").as_deref(),
        Some("application/pdf,application/octet-stream;q=0.9,*/*;q=0.8")
    );
}

#[tokio::test]
async fn not_found_fails_once_without_waiting() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.pdf"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let provider = HttpSourceProvider::new(
        format!("{}/missing.pdf", server.uri()),
        FetchSettings::default(),
    );
    let sleeper = RecordingSleeper::new();
    let sink = TestSink::new();
    let err = fetch_validated(&provider, &RetryPolicy::default(), &sleeper, &sink)
        .await
        .expect_err("404 is permanent");

    assert_eq!(err.attempts, 1);
    assert_eq!(err.last.kind, FailureKind::HttpStatus(404));
    assert!(sleeper.delays().is_empty());
    assert!(sink.take().iter().any(|event| matches!(
        event,
        PipelineEvent::AttemptFailed {
            attempt: 1,
            retry_in: None,
            ..
        }
    )));
}

#[tokio::test]
async fn slow_server_times_out() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow.pdf"))
        .respond_with(pdf_response(b"%PDF-1.4".to_vec()).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(100),
        ..FetchSettings::default()
    };
    let provider = HttpSourceProvider::new(format!("{}/slow.pdf", server.uri()), settings);
    let err = provider.fetch().await.expect_err("must time out");
    assert_eq!(err.kind, FailureKind::Timeout);
    assert!(err.is_transient());
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/big.pdf"))
        .respond_with(pdf_response(vec![b'x'; 64]))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 16,
        ..FetchSettings::default()
    };
    let provider = HttpSourceProvider::new(format!("{}/big.pdf", server.uri()), settings);
    let err = provider.fetch().await.expect_err("too large");
    assert!(matches!(err.kind, FailureKind::TooLarge { max_bytes: 16, .. }));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn server_errors_are_retried_with_doubling_delays() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky.pdf"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky.pdf"))
        .respond_with(pdf_response(pdf_with_pages(&[Some("ok")])))
        .mount(&server)
        .await;

    let provider = HttpSourceProvider::new(
        format!("{}/flaky.pdf", server.uri()),
        FetchSettings::default(),
    );
    let sleeper = RecordingSleeper::new();
    let sink = TestSink::new();
    let fetched = fetch_validated(&provider, &RetryPolicy::default(), &sleeper, &sink)
        .await
        .expect("third attempt succeeds");

    assert_eq!(fetched.attempts, 3);
    assert_eq!(
        sleeper.delays(),
        vec![Duration::from_secs(1), Duration::from_secs(2)]
    );

    let started = sink
        .take()
        .into_iter()
        .filter_map(|event| match event {
            PipelineEvent::AttemptStarted {
                attempt,
                max_attempts,
                ..
            } => Some((attempt, max_attempts)),
            _ => None,
        })
        .collect::<Vec<_>>();
    assert_eq!(started, vec![(1, 3), (2, 3), (3, 3)]);
}

#[tokio::test]
async fn html_instead_of_pdf_exhausts_attempts() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/portal"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<!DOCTYPE html><html>login</html>", "text/html"),
        )
        .expect(2)
        .mount(&server)
        .await;

    let provider = HttpSourceProvider::new(
        format!("{}/portal", server.uri()),
        FetchSettings::default(),
    );
    let sleeper = RecordingSleeper::new();
    let policy = RetryPolicy::new(2, Duration::from_millis(10));
    let err = fetch_validated(&provider, &policy, &sleeper, &TestSink::new())
        .await
        .expect_err("never a pdf");

    assert_eq!(err.attempts, 2);
    assert!(err.is_content_mismatch());
    assert_eq!(sleeper.delays(), vec![Duration::from_millis(10)]);
}

#[tokio::test]
async fn file_provider_reads_pdf_and_text() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let pdf_path = temp.path().join("today.pdf");
    std::fs::write(&pdf_path, pdf_with_pages(&[Some("uno")])).unwrap();
    let txt_path = temp.path().join("today.txt");
    std::fs::write(&txt_path, "Testo della sentenza").unwrap();

    let pdf = FileSourceProvider::new(&pdf_path).fetch().await.unwrap();
    assert_eq!(pdf.kind, ContentKind::Pdf);

    let text = FileSourceProvider::new(&txt_path).fetch().await.unwrap();
    assert_eq!(text.kind, ContentKind::Text);
    assert_eq!(text.bytes.as_ref(), b"Testo della sentenza");
}

#[tokio::test]
async fn missing_file_is_a_permanent_failure() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let provider = FileSourceProvider::new(temp.path().join("absent.pdf"));
    let sleeper = RecordingSleeper::new();
    let err = fetch_validated(&provider, &RetryPolicy::default(), &sleeper, &TestSink::new())
        .await
        .expect_err("no file");
    assert_eq!(err.last.kind, FailureKind::SourceMissing);
    assert_eq!(err.attempts, 1);
    assert!(sleeper.delays().is_empty());
}
