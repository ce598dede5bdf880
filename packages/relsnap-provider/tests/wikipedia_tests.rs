use mockito::{Matcher, Server};
use relsnap_provider::providers::WikipediaProvider;
use relsnap_provider::{ReleaseSource, SourceError};
use relsnap_utils::FetchConfig;
use std::fs;

const WIKIPEDIA_URL: &str = "https://en.wikipedia.org";

fn proxied_config(server: &Server) -> FetchConfig {
    FetchConfig::new().with_reverse_proxy(&format!("{} -> {}", WIKIPEDIA_URL, server.url()))
}

#[tokio::test]
async fn test_fetch_ios() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/w/api.php")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("action".into(), "parse".into()),
            Matcher::UrlEncoded("page".into(), "iOS".into()),
            Matcher::UrlEncoded("prop".into(), "wikitext".into()),
            Matcher::UrlEncoded("format".into(), "json".into()),
        ]))
        .with_status(200)
        .with_body(fs::read_to_string("tests/web/wikipedia_ios.json").unwrap())
        .create_async()
        .await;

    let releases = WikipediaProvider::ios()
        .fetch(&proxied_config(&server))
        .await
        .unwrap();

    assert_eq!(releases.stable.version.as_deref(), Some("17.2.1"));
    assert_eq!(releases.stable.version_code.as_deref(), Some("17.2.1"));
    assert_eq!(releases.stable.release_date.as_deref(), Some("2023-12-19"));
    assert_eq!(releases.stable.source, "https://en.wikipedia.org/wiki/iOS");
    assert_eq!(
        releases.beta.version.as_deref(),
        Some("17.3 beta 2 (21D5036a)")
    );
    assert_eq!(releases.beta.release_date.as_deref(), Some("2024-01-03"));
}

#[tokio::test]
async fn test_fetch_page_with_encoded_title() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/w/api.php")
        .match_query(Matcher::UrlEncoded(
            "page".into(),
            "Android_(operating_system)".into(),
        ))
        .with_status(200)
        .with_body(r#"{"parse": {"wikitext": {"*": "| latest_release_version = 14\n"}}}"#)
        .create_async()
        .await;

    let releases = WikipediaProvider::android()
        .fetch(&proxied_config(&server))
        .await
        .unwrap();
    assert_eq!(releases.stable.version.as_deref(), Some("14"));
    assert!(releases.beta.is_empty());
}

#[tokio::test]
async fn test_fetch_missing_page() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/w/api.php")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(fs::read_to_string("tests/web/wikipedia_missing.json").unwrap())
        .create_async()
        .await;

    let err = WikipediaProvider::whale()
        .fetch(&proxied_config(&server))
        .await
        .unwrap_err();
    assert!(matches!(err, SourceError::Shape { .. }));
    assert!(err.to_string().contains("Whale_(web_browser)"));
}
