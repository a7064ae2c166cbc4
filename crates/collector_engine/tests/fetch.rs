use std::sync::Arc;
use std::time::{Duration, Instant};

use collector_core::PacingPolicy;
use collector_engine::{
    fetch_markup, FailureKind, FetchSettings, Fetcher, ListingFetcher, RateLimiter,
    ReqwestFetcher, SearchQuery,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn fetcher_returns_html_with_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/doc"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html>ok</html>", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default()).unwrap();
    let url = format!("{}/doc", server.uri());

    let output = fetcher.fetch(&url).await.expect("fetch ok");
    assert_eq!(output.metadata.final_url, url);
    assert!(output
        .metadata
        .content_type
        .unwrap()
        .starts_with("text/html"));
    assert_eq!(output.bytes, b"<html>ok</html>");
}

#[tokio::test]
async fn fetcher_sends_configured_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ua"))
        .and(header("user-agent", "collector-test/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>hi</p>", "text/html"))
        .expect(1)
        .mount(&server)
        .await;

    let settings = FetchSettings {
        user_agent: "collector-test/1.0".to_string(),
        ..FetchSettings::default()
    };
    let fetcher = ReqwestFetcher::new(settings).unwrap();
    let url = format!("{}/ua", server.uri());
    assert!(fetcher.fetch(&url).await.is_ok());
}

#[tokio::test]
async fn one_fetcher_serves_repeated_requests_and_follows_redirects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/moved"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/doc"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/doc"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>doc</p>", "text/html"))
        .expect(3)
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default()).unwrap();
    let direct = format!("{}/doc", server.uri());
    for _ in 0..2 {
        assert_eq!(fetcher.fetch(&direct).await.unwrap().bytes, b"<p>doc</p>");
    }

    let output = fetcher
        .fetch(&format!("{}/moved", server.uri()))
        .await
        .unwrap();
    assert_eq!(output.metadata.final_url, direct);
}

#[tokio::test]
async fn fetcher_stops_at_redirect_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/loop"))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        redirect_limit: 2,
        ..FetchSettings::default()
    };
    let fetcher = ReqwestFetcher::new(settings).unwrap();
    let err = fetcher
        .fetch(&format!("{}/loop", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::RedirectLimitExceeded);
}

#[tokio::test]
async fn fetcher_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default()).unwrap();
    let url = format!("{}/missing", server.uri());

    let err = fetcher.fetch(&url).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
}

#[tokio::test]
async fn fetcher_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_raw("<p>slow</p>", "text/html"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let fetcher = ReqwestFetcher::new(settings).unwrap();
    let url = format!("{}/slow", server.uri());

    let err = fetcher.fetch(&url).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn fetcher_rejects_too_large_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("01234567890", "text/html"))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 10,
        ..FetchSettings::default()
    };
    let fetcher = ReqwestFetcher::new(settings).unwrap();
    let url = format!("{}/large", server.uri());

    let err = fetcher.fetch(&url).await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
}

#[tokio::test]
async fn fetcher_rejects_non_html_content() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default()).unwrap();
    let err = fetcher
        .fetch(&format!("{}/json", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::UnsupportedContentType {
            content_type: "application/json".to_string()
        }
    );
}

#[tokio::test]
async fn invalid_url_is_a_fetch_error() {
    let fetcher = ReqwestFetcher::new(FetchSettings::default()).unwrap();
    let err = fetcher.fetch("not a url").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}

#[tokio::test]
async fn fetch_markup_honours_charset_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latin1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"caf\xe9".to_vec(), "text/html; charset=ISO-8859-1"),
        )
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default()).unwrap();
    let text = fetch_markup(&fetcher, &format!("{}/latin1", server.uri()))
        .await
        .unwrap();
    assert_eq!(text, "café");
}

#[tokio::test]
async fn listing_fetcher_sends_search_params_and_tags_offset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("keywords", "Data Scientist"))
        .and(query_param("location", "Israel"))
        .and(query_param("start", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<ul></ul>", "text/html"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("start", "50"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let query = SearchQuery {
        endpoint: format!("{}/search", server.uri()),
        ..SearchQuery::default()
    };
    let listing = ListingFetcher::new(
        Arc::new(ReqwestFetcher::new(FetchSettings::default()).unwrap()),
        query,
    );

    assert_eq!(listing.fetch_page(0).await.unwrap(), "<ul></ul>");

    let err = listing.fetch_page(50).await.unwrap_err();
    assert_eq!(err.start, 50);
    assert_eq!(err.source.kind, FailureKind::HttpStatus(503));
}

#[tokio::test]
async fn rate_limiter_sleeps_after_every_third_item() {
    let delay = Duration::from_millis(20);
    let limiter = RateLimiter::new(PacingPolicy::default(), delay);

    let started = Instant::now();
    let mut slept = Vec::new();
    for index in 1..=6 {
        slept.push(limiter.after_item(index).await);
    }
    assert_eq!(slept, vec![false, false, true, false, false, true]);
    assert!(started.elapsed() >= delay * 2);

    let silent = RateLimiter::new(PacingPolicy::default(), Duration::ZERO);
    assert!(!silent.after_item(3).await);
}
