// ABOUTME: Integration tests for the urlinfo CLI binary.
// ABOUTME: Tests HTML file extraction, URL lookups against a mock server, and argument errors.

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo::CommandCargoExt;
use httpmock::prelude::*;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn urlinfo_cmd() -> Command {
    Command::cargo_bin("urlinfo").unwrap()
}

#[test]
fn extract_from_html_file() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = temp_dir.path().join("page.html");

    fs::write(
        &html_path,
        r#"<!DOCTYPE html>
<html>
<head>
<title>Test Page</title>
<meta property="og:image" content="../image.jpg">
</head>
<body></body>
</html>"#,
    )
    .unwrap();

    urlinfo_cmd()
        .arg("--html")
        .arg(&html_path)
        .arg("--url")
        .arg("https://example.com/page/")
        .arg("--compact")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""title":"Test Page""#))
        .stdout(predicate::str::contains(
            r#""ogImage":"https://example.com/image.jpg""#,
        ))
        .stdout(predicate::str::contains(
            r#""favicon":"https://example.com/favicon.ico""#,
        ));
}

#[test]
fn html_requires_url() {
    let temp_dir = TempDir::new().unwrap();
    let html_path = temp_dir.path().join("page.html");
    fs::write(&html_path, "<title>x</title>").unwrap();

    urlinfo_cmd()
        .arg("--html")
        .arg(&html_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--url is required"));
}

#[test]
fn no_arguments_fails() {
    urlinfo_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one URL is required"));
}

#[test]
fn lookup_multiple_urls() {
    let server = MockServer::start();

    let mock1 = server.mock(|when, then| {
        when.method(GET).path("/one");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body("<html><head><title>Page One</title></head></html>");
    });
    let mock2 = server.mock(|when, then| {
        when.method(GET).path("/two");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(r#"<html><head><meta property="og:title" content="Page Two"></head></html>"#);
    });

    let output = urlinfo_cmd()
        .arg("--allow-private-networks")
        .arg("--extractor")
        .arg("pattern")
        .arg(server.url("/one"))
        .arg(server.url("/two"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    mock1.assert();
    mock2.assert();

    let parsed: Value = serde_json::from_slice(&output).unwrap();
    let items = parsed.as_array().expect("multiple URLs print an array");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["data"]["title"], "Page One");
    assert_eq!(items[1]["data"]["title"], "Page Two");
}

#[test]
fn private_url_rejected_without_flag() {
    urlinfo_cmd()
        .arg("http://127.0.0.1:1/x")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Invalid URL"))
        .stderr(predicate::str::contains("private/local URLs are not allowed"));
}

#[test]
fn writes_output_file() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/missing");
        then.status(404);
    });

    let temp_dir = TempDir::new().unwrap();
    let out_path = temp_dir.path().join("out.json");

    urlinfo_cmd()
        .arg("--allow-private-networks")
        .arg("-o")
        .arg(&out_path)
        .arg(server.url("/missing"))
        .assert()
        .success();

    let written: Value = serde_json::from_str(&fs::read_to_string(&out_path).unwrap()).unwrap();
    assert_eq!(written["status"], 1);
    assert_eq!(written["data"], serde_json::json!({}));
}
