use std::time::Duration;

use mzalendo_scraper::{FetchConfig, FetchError, Fetcher};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn quick_config() -> FetchConfig {
    FetchConfig {
        max_retries: 3,
        backoff_unit: Duration::from_millis(1),
        throttle_unit: Duration::from_millis(1),
    }
}

#[tokio::test]
async fn fetch_returns_page_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/parliament/senate/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>senate</html>"))
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(quick_config()).unwrap();
    let body = fetcher
        .fetch(&format!("{}/parliament/senate/", server.uri()))
        .await
        .unwrap();
    assert_eq!(body, "<html>senate</html>");
}

#[tokio::test]
async fn fetch_retries_transient_failures() {
    let server = MockServer::start().await;
    // Two failures, then success on the third and final attempt.
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_string("recovered"))
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(quick_config()).unwrap();
    let body = fetcher.fetch(&format!("{}/flaky", server.uri())).await.unwrap();
    assert_eq!(body, "recovered");
}

#[tokio::test]
async fn fetch_exhausts_after_max_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(quick_config()).unwrap();
    let url = format!("{}/down", server.uri());
    let err = fetcher.fetch(&url).await.unwrap_err();
    assert!(matches!(err, FetchError::Exhausted(ref failed) if *failed == url));
}

#[tokio::test]
async fn non_success_status_is_a_failed_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(quick_config()).unwrap();
    let result = fetcher.fetch(&format!("{}/missing", server.uri())).await;
    assert!(result.is_err());
}
