//! Integration tests for the crawler
//!
//! These tests use wiremock to stand up a small catalogue site and test
//! the full crawl cycle end-to-end.

use shelfscan::config::Config;
use shelfscan::crawler::{finalize, run_crawl, Coordinator, Fetcher};
use shelfscan::output::{ConsoleSummary, CsvSink};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server, with all
/// pacing delays disabled
fn create_test_config(base_url: &str, csv_path: &str) -> Config {
    let mut config = Config::default();
    config.site.base_url = format!("{}/", base_url.trim_end_matches('/'));
    config.site.first_page = 1;
    config.site.last_page = 2;
    config.fetch.max_retries = 2;
    config.fetch.min_delay_ms = 0;
    config.fetch.max_delay_ms = 0;
    config.fetch.retry_backoff_ms = 0;
    config.fetch.detail_delay_ms = 0;
    config.fetch.timeout_secs = 5;
    config.output.csv_path = csv_path.to_string();
    config
}

fn catalogue_html(hrefs: &[&str]) -> String {
    let entries: String = hrefs
        .iter()
        .map(|href| {
            format!(
                r#"<li><article class="product_pod"><h3><a href="{}" title="t">t</a></h3>
                   <div class="product_price"><p class="price_color">£1.00</p></div></article></li>"#,
                href
            )
        })
        .collect();
    format!(
        r#"<html><body><section><ol class="row">{}</ol></section></body></html>"#,
        entries
    )
}

fn detail_html(title: &str, price: Option<&str>, stock: &str) -> String {
    let price = price
        .map(|p| format!(r#"<p class="price_color">{}</p>"#, p))
        .unwrap_or_default();
    format!(
        r#"<html><body><article class="product_page"><div class="row">
           <div class="col-sm-6 product_main"><h1>{}</h1>{}
           <p class="instock availability"><i class="icon-ok"></i>
               {}
           </p></div></div></article></body></html>"#,
        title, price, stock
    )
}

async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Mounts a two-page catalogue: three books on page 1, two on page 2
///
/// Page 1 links are root-relative (`catalogue/...`) and page 2 links are
/// relative to the catalogue directory, as on the real site.
async fn mount_two_page_catalogue(server: &MockServer, broken_price_on: Option<u32>) {
    mount_html(
        server,
        "/",
        catalogue_html(&[
            "catalogue/book-1_1/index.html",
            "catalogue/book-2_2/index.html",
            "catalogue/book-3_3/index.html",
        ]),
    )
    .await;
    mount_html(
        server,
        "/catalogue/page-2.html",
        catalogue_html(&["book-4_4/index.html", "book-5_5/index.html"]),
    )
    .await;

    for n in 1..=5u32 {
        let price = format!("£{}.50", n * 10);
        let price = if broken_price_on == Some(n) {
            None
        } else {
            Some(price.as_str())
        };
        mount_html(
            server,
            &format!("/catalogue/book-{}_{}/index.html", n, n),
            detail_html(
                &format!("Book {}", n),
                price,
                &format!("In stock ({} available)", n + 10),
            ),
        )
        .await;
    }
}

#[tokio::test]
async fn test_full_crawl_two_pages() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_two_page_catalogue(&mock_server, None).await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("processed").join("books.csv");
    let config = create_test_config(&mock_server.uri(), csv_path.to_str().unwrap());

    let outcome = run_crawl(&config).await.expect("Crawl failed");

    let titles: Vec<&str> = outcome.records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Book 1", "Book 2", "Book 3", "Book 4", "Book 5"]);

    let first = &outcome.records[0];
    assert!((first.price - 10.5).abs() < f64::EPSILON);
    assert_eq!(first.stock_qty, 11);
    assert_eq!(
        first.url,
        format!("{}/catalogue/book-1_1/index.html", mock_server.uri())
    );
    assert_eq!(
        outcome.records[4].url,
        format!("{}/catalogue/book-5_5/index.html", mock_server.uri())
    );

    assert_eq!(outcome.stats.catalogue_pages, 2);
    assert_eq!(outcome.stats.detail_urls, 5);
    assert_eq!(outcome.stats.records, 5);

    let content = std::fs::read_to_string(&csv_path).expect("CSV not written");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "title,price,stock_qty,url");
    assert!(lines[1].starts_with("Book 1,10.5,11,"));
    assert!(lines[5].starts_with("Book 5,50.5,15,"));
}

#[tokio::test]
async fn test_robots_denies_everything() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nDisallow: /").await;

    // Catalogue page should never be requested
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(catalogue_html(&[])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("books.csv");
    let config = create_test_config(&mock_server.uri(), csv_path.to_str().unwrap());

    let mut sink = CsvSink::create(&csv_path).unwrap();
    let outcome = Coordinator::new(&config).unwrap().run().await;

    assert!(outcome.records.is_empty());
    assert_eq!(outcome.stats.empty_catalogue_pages, 2);
    assert_eq!(outcome.stats.fetch_failures, 0);

    // Empty runs are reported as an error and nothing is written
    let written = finalize(&outcome, &mut sink, &mut ConsoleSummary).unwrap();
    assert!(!written);
    assert!(!csv_path.exists(), "CSV must not be written without records");
}

#[tokio::test]
async fn test_run_crawl_with_denied_policy_writes_nothing() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nDisallow: /").await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("out").join("books.csv");
    let config = create_test_config(&mock_server.uri(), csv_path.to_str().unwrap());

    let outcome = run_crawl(&config).await.expect("Crawl failed");

    assert!(outcome.records.is_empty());
    assert!(csv_path.parent().unwrap().is_dir());
    assert!(!csv_path.exists());
}

#[tokio::test]
async fn test_malformed_detail_is_skipped() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_two_page_catalogue(&mock_server, Some(3)).await;

    let config = create_test_config(&mock_server.uri(), "unused.csv");
    let outcome = Coordinator::new(&config).unwrap().run().await;

    let titles: Vec<&str> = outcome.records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Book 1", "Book 2", "Book 4", "Book 5"]);
    assert_eq!(outcome.stats.parse_failures, 1);
    assert_eq!(outcome.stats.fetch_failures, 0);
}

#[tokio::test]
async fn test_policy_is_fetched_once_when_available() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nAllow: /"))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_two_page_catalogue(&mock_server, None).await;

    let config = create_test_config(&mock_server.uri(), "unused.csv");
    let outcome = Coordinator::new(&config).unwrap().run().await;
    assert_eq!(outcome.records.len(), 5);
}

#[tokio::test]
async fn test_policy_failure_is_retried_on_every_fetch() {
    let mock_server = MockServer::start().await;

    // One catalogue fetch plus one detail fetch, each re-trying robots.txt
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&mock_server)
        .await;
    mount_html(
        &mock_server,
        "/",
        catalogue_html(&["catalogue/only_1/index.html"]),
    )
    .await;
    mount_html(
        &mock_server,
        "/catalogue/only_1/index.html",
        detail_html("Only", Some("£9.99"), "In stock (1 available)"),
    )
    .await;

    let mut config = create_test_config(&mock_server.uri(), "unused.csv");
    config.site.last_page = 1;

    let outcome = Coordinator::new(&config).unwrap().run().await;
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].title, "Only");
}

#[tokio::test]
async fn test_missing_policy_allows_all() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_two_page_catalogue(&mock_server, None).await;

    let config = create_test_config(&mock_server.uri(), "unused.csv");
    let outcome = Coordinator::new(&config).unwrap().run().await;
    assert_eq!(outcome.records.len(), 5);
}

#[tokio::test]
async fn test_forbidden_policy_denies_all() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri(), "unused.csv");
    config.site.last_page = 1;

    let mut fetcher = Fetcher::new(&config).unwrap();
    assert!(fetcher.fetch(&config.site.base_url).await.is_none());
    assert!(fetcher.gate().is_loaded());
}

#[tokio::test]
async fn test_transient_failure_is_retried() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;

    Mock::given(method("GET"))
        .and(path("/flaky.html"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_html(&mock_server, "/flaky.html", "<html>ok</html>".to_string()).await;

    let config = create_test_config(&mock_server.uri(), "unused.csv");
    let mut fetcher = Fetcher::new(&config).unwrap();

    let page = fetcher
        .fetch(&format!("{}/flaky.html", mock_server.uri()))
        .await
        .expect("second attempt should succeed");
    assert_eq!(page.text(), "<html>ok</html>");
}

#[tokio::test]
async fn test_retries_are_bounded() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;

    Mock::given(method("GET"))
        .and(path("/down.html"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), "unused.csv");
    let mut fetcher = Fetcher::new(&config).unwrap();

    assert!(fetcher
        .fetch(&format!("{}/down.html", mock_server.uri()))
        .await
        .is_none());
}

#[tokio::test]
async fn test_unreachable_detail_is_skipped() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_html(
        &mock_server,
        "/",
        catalogue_html(&["catalogue/gone_1/index.html", "catalogue/here_2/index.html"]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/catalogue/gone_1/index.html"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    mount_html(
        &mock_server,
        "/catalogue/here_2/index.html",
        detail_html("Here", Some("£2.00"), "In stock (4 available)"),
    )
    .await;

    let mut config = create_test_config(&mock_server.uri(), "unused.csv");
    config.site.last_page = 1;

    let outcome = Coordinator::new(&config).unwrap().run().await;
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].title, "Here");
    assert_eq!(outcome.stats.fetch_failures, 1);
}

#[tokio::test]
async fn test_missing_catalogue_page_is_skipped() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;

    // Page 1 is missing; page 2 still gets crawled
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    mount_html(
        &mock_server,
        "/catalogue/page-2.html",
        catalogue_html(&["late_7/index.html"]),
    )
    .await;
    mount_html(
        &mock_server,
        "/catalogue/late_7/index.html",
        detail_html("Late", Some("£7.00"), "In stock (7 available)"),
    )
    .await;

    let config = create_test_config(&mock_server.uri(), "unused.csv");
    let outcome = Coordinator::new(&config).unwrap().run().await;

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.stats.empty_catalogue_pages, 1);
}

#[tokio::test]
async fn test_requests_carry_header_template() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;

    Mock::given(method("GET"))
        .and(path("/page.html"))
        .and(header("user-agent", "ShelfTester/1.0"))
        .and(header("accept-language", "en-GB"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri(), "unused.csv");
    config.headers.user_agents = vec!["ShelfTester/1.0".to_string()];
    config.headers.accept_language = "en-GB".to_string();

    let mut fetcher = Fetcher::new(&config).unwrap();
    assert!(fetcher
        .fetch(&format!("{}/page.html", mock_server.uri()))
        .await
        .is_some());
    assert_eq!(fetcher.user_agent(), "ShelfTester/1.0");
}

#[tokio::test]
async fn test_finalize_with_csv_sink_writes_header_and_rows() {
    let mock_server = MockServer::start().await;
    mount_robots(&mock_server, "User-agent: *\nAllow: /").await;
    mount_two_page_catalogue(&mock_server, None).await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("books.csv");
    let config = create_test_config(&mock_server.uri(), csv_path.to_str().unwrap());

    let mut sink = CsvSink::create(&csv_path).unwrap();
    let outcome = Coordinator::new(&config).unwrap().run().await;
    let written = finalize(&outcome, &mut sink, &mut ConsoleSummary).unwrap();

    assert!(written);
    let mut reader = csv::Reader::from_path(&csv_path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["title", "price", "stock_qty", "url"]
    );
    assert_eq!(reader.records().count(), 5);
}
