//! End-to-end tests for a full harvest run
//!
//! These tests drive the coordinator against a wiremock listing and check the
//! exported CSV, the URL-list cache and the fatal/non-fatal error paths.

use std::path::Path;
use wanted_harvest::config::Config;
use wanted_harvest::crawler::Coordinator;
use wanted_harvest::output::UrlSource;
use wanted_harvest::{ConfigError, HarvestError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HEADER: &str =
    "Id,Name,Sex,DateOfBirth,PlaceOfBirth,Nationality,PlaceOfCase,DateOfCase,Details,Height,Hair,Eyes,Source";

/// Creates a test configuration pointing at the mock listing
fn create_test_config(start_url: String, output: &Path, cache_dir: &Path) -> Config {
    let mut config = Config::default();
    config.source.start_url = start_url;
    config.output.output_path = output.to_string_lossy().into_owned();
    config.cache.cache_dir = cache_dir.to_string_lossy().into_owned();
    config
}

async fn mount_html(server: &MockServer, page_path: &str, body: String, times: u64) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(times)
        .mount(server)
        .await;
}

fn person_page(name: &str, hair: &str) -> String {
    format!(
        r#"<html><body>
            <h1>{}</h1>
            <p class="summary">May 5, 2015<br>Portland, Oregon</p>
            <table class="wanted-person-description"><tbody>
              <tr><td>Hair</td><td>{}</td></tr>
              <tr><td>Nationality</td><td>American</td></tr>
            </tbody></table>
            <div class="wanted-person-details"><p>Details, with a comma.</p></div>
        </body></html>"#,
        name, hair
    )
}

/// Two listing pages: /wanted/a, /wanted/missing on page 1, /wanted/b on page 2
async fn mount_two_page_listing(server: &MockServer, listing_times: u64) {
    let base_url = server.uri();

    mount_html(
        server,
        "/list/1",
        format!(
            r#"<ul>
                <li><a href="{base}/wanted/a">A</a></li>
                <li><a href="{base}/wanted/missing">Missing</a></li>
            </ul>
            <button href="{base}/list/2">View More</button>"#,
            base = base_url
        ),
        listing_times,
    )
    .await;
    mount_html(
        server,
        "/list/2",
        format!(r#"<ul><li><a href="{}/wanted/b">B</a></li></ul>"#, base_url),
        listing_times,
    )
    .await;
}

#[tokio::test]
async fn test_full_run_exports_records_in_listing_order() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let work_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = work_dir.path().join("out").join("output.csv");
    let cache_dir = work_dir.path().join("cache");

    mount_two_page_listing(&mock_server, 1).await;
    mount_html(&mock_server, "/wanted/a", person_page("ALICE", "Red"), 1).await;
    mount_html(&mock_server, "/wanted/b", person_page("BOB", "Gray"), 1).await;
    Mock::given(method("GET"))
        .and(path("/wanted/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(format!("{}/list/1", base_url), &output, &cache_dir);
    let coordinator = Coordinator::new(config, false).expect("Failed to create coordinator");
    let stats = coordinator.run().await.expect("Run failed");

    assert_eq!(stats.urls_total, 3);
    assert_eq!(stats.url_source, UrlSource::Harvested);
    assert_eq!(stats.records_extracted, 2);
    assert_eq!(stats.entries_failed, 1);
    assert!(stats.finished_at.is_some());

    let csv = std::fs::read_to_string(&output).expect("Output not written");
    let expected = format!(
        "{header}\n\
         ,ALICE,,,,American,\"Portland, Oregon\",\"May 5, 2015\",\"Details, with a comma.\",,Red,,{base}/wanted/a\n\
         ,BOB,,,,American,\"Portland, Oregon\",\"May 5, 2015\",\"Details, with a comma.\",,Gray,,{base}/wanted/b\n",
        header = HEADER,
        base = base_url
    );
    assert_eq!(csv, expected);

    let url_list = std::fs::read_to_string(cache_dir.join("urllist.txt"))
        .expect("URL list not cached");
    assert_eq!(
        url_list,
        format!(
            "{base}/wanted/a\n{base}/wanted/missing\n{base}/wanted/b",
            base = base_url
        )
    );
}

#[tokio::test]
async fn test_second_run_uses_cached_list_and_pages() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let work_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = work_dir.path().join("output.csv");
    let cache_dir = work_dir.path().join("cache");

    // Listing and good detail pages are fetched only by the first run
    mount_two_page_listing(&mock_server, 1).await;
    mount_html(&mock_server, "/wanted/a", person_page("ALICE", "Red"), 1).await;
    mount_html(&mock_server, "/wanted/b", person_page("BOB", "Gray"), 1).await;

    // Failures are never cached, so both runs ask again
    Mock::given(method("GET"))
        .and(path("/wanted/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&mock_server)
        .await;

    let config = create_test_config(format!("{}/list/1", base_url), &output, &cache_dir);

    let first = Coordinator::new(config.clone(), false)
        .expect("Failed to create coordinator")
        .run()
        .await
        .expect("First run failed");
    let first_csv = std::fs::read_to_string(&output).expect("Output not written");

    let second = Coordinator::new(config, false)
        .expect("Failed to create coordinator")
        .run()
        .await
        .expect("Second run failed");
    let second_csv = std::fs::read_to_string(&output).expect("Output not written");

    assert_eq!(first.url_source, UrlSource::Harvested);
    assert_eq!(second.url_source, UrlSource::Cached);
    assert_eq!(second.cache.hits, 2);
    assert_eq!(first_csv, second_csv);
}

#[tokio::test]
async fn test_fresh_run_ignores_cached_list() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let work_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = work_dir.path().join("output.csv");
    let cache_dir = work_dir.path().join("cache");

    std::fs::create_dir_all(&cache_dir).unwrap();
    std::fs::write(
        cache_dir.join("urllist.txt"),
        format!("{}/wanted/stale", base_url),
    )
    .unwrap();

    mount_html(
        &mock_server,
        "/list/1",
        format!(r#"<ul><li><a href="{}/wanted/a">A</a></li></ul>"#, base_url),
        1,
    )
    .await;
    mount_html(&mock_server, "/wanted/a", person_page("ALICE", "Red"), 1).await;
    mount_html(&mock_server, "/wanted/stale", person_page("STALE", "None"), 0).await;

    let config = create_test_config(format!("{}/list/1", base_url), &output, &cache_dir);
    let stats = Coordinator::new(config, true)
        .expect("Failed to create coordinator")
        .run()
        .await
        .expect("Run failed");

    assert_eq!(stats.url_source, UrlSource::Harvested);
    assert_eq!(stats.records_extracted, 1);

    let url_list = std::fs::read_to_string(cache_dir.join("urllist.txt")).unwrap();
    assert_eq!(url_list, format!("{}/wanted/a", base_url));
}

#[tokio::test]
async fn test_partial_harvest_is_used_but_not_cached() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let work_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = work_dir.path().join("output.csv");
    let cache_dir = work_dir.path().join("cache");

    // Both runs walk the listing again because nothing was cached
    mount_html(
        &mock_server,
        "/list/1",
        format!(
            r#"<ul><li><a href="{base}/wanted/a">A</a></li></ul>
            <button href="{base}/list/2">View More</button>"#,
            base = base_url
        ),
        2,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/list/2"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&mock_server)
        .await;
    mount_html(&mock_server, "/wanted/a", person_page("ALICE", "Red"), 1).await;

    let config = create_test_config(format!("{}/list/1", base_url), &output, &cache_dir);

    let first = Coordinator::new(config.clone(), false)
        .expect("Failed to create coordinator")
        .run()
        .await
        .expect("First run failed");

    assert_eq!(first.url_source, UrlSource::Harvested);
    assert_eq!(first.urls_total, 1);
    assert_eq!(first.records_extracted, 1);
    assert!(!cache_dir.join("urllist.txt").exists());

    let second = Coordinator::new(config, false)
        .expect("Failed to create coordinator")
        .run()
        .await
        .expect("Second run failed");

    assert_eq!(second.url_source, UrlSource::Harvested);
    assert_eq!(second.cache.hits, 1);
    assert!(!cache_dir.join("urllist.txt").exists());
}

#[tokio::test]
async fn test_all_entries_failing_still_writes_header() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let work_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = work_dir.path().join("output.csv");

    mount_html(
        &mock_server,
        "/list/1",
        format!(
            r#"<ul><li><a href="{base}/wanted/x">X</a></li><li><a href="{base}/wanted/y">Y</a></li></ul>"#,
            base = base_url
        ),
        1,
    )
    .await;

    // Caching disabled
    let config = create_test_config(format!("{}/list/1", base_url), &output, Path::new(""));

    let stats = Coordinator::new(config, false)
        .expect("Failed to create coordinator")
        .run()
        .await
        .expect("Run failed");

    assert_eq!(stats.records_extracted, 0);
    assert_eq!(stats.entries_failed, 2);
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        format!("{}\n", HEADER)
    );
}

#[tokio::test]
async fn test_empty_listing_is_fatal() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let work_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = work_dir.path().join("output.csv");
    let cache_dir = work_dir.path().join("cache");

    mount_html(
        &mock_server,
        "/list/1",
        "<html><body><p>No results</p></body></html>".to_string(),
        1,
    )
    .await;

    let config = create_test_config(format!("{}/list/1", base_url), &output, &cache_dir);
    let result = Coordinator::new(config, false)
        .expect("Failed to create coordinator")
        .run()
        .await;

    assert!(matches!(result, Err(HarvestError::NoEntries)));
    assert!(!output.exists());
    assert!(!cache_dir.join("urllist.txt").exists());
}

#[tokio::test]
async fn test_unreachable_first_page_aborts_run() {
    let mock_server = MockServer::start().await;
    let work_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = work_dir.path().join("output.csv");
    let cache_dir = work_dir.path().join("cache");

    let config = create_test_config(
        format!("{}/list/1", mock_server.uri()),
        &output,
        &cache_dir,
    );
    let result = Coordinator::new(config, false)
        .expect("Failed to create coordinator")
        .run()
        .await;

    assert!(matches!(result, Err(HarvestError::HttpStatus { status: 404, .. })));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_missing_output_path_fails_before_network() {
    let mock_server = MockServer::start().await;
    let work_dir = tempfile::tempdir().expect("Failed to create temp dir");

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(
        format!("{}/list/1", mock_server.uri()),
        Path::new(""),
        work_dir.path(),
    );
    let result = Coordinator::new(config, false);

    assert!(matches!(
        result,
        Err(HarvestError::Config(ConfigError::Validation(_)))
    ));
}

#[tokio::test]
async fn test_custom_columns() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let work_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output = work_dir.path().join("output.csv");

    mount_html(
        &mock_server,
        "/list/1",
        format!(r#"<ul><li><a href="{}/wanted/a">A</a></li></ul>"#, base_url),
        1,
    )
    .await;
    mount_html(&mock_server, "/wanted/a", person_page("ALICE", "Red"), 1).await;

    let mut config = create_test_config(format!("{}/list/1", base_url), &output, Path::new(""));
    config.output.columns = Some(vec!["Source".to_string(), "Name".to_string()]);

    Coordinator::new(config, false)
        .expect("Failed to create coordinator")
        .run()
        .await
        .expect("Run failed");

    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        format!("Source,Name\n{}/wanted/a,ALICE\n", base_url)
    );
}
