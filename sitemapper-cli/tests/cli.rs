use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

const CONFIG_ENV: &[&str] = &[
    "STRAPI_API_URL",
    "STRAPI_API_TOKEN",
    "SITE_BASE_URL",
    "LANGUAGES",
    "SITEMAP_OUTPUT_DIR",
    "SITEMAP_GENERATION_MODE",
    "SITEMAP_PAGE_SIZE",
    "SITEMAP_URL_LIMIT",
    "SITEMAP_INDEX_FILE",
    "SITEMAP_PUBLIC_PATH",
    "SITEMAP_SINGLE_GRACE",
    "SITEMAP_CATALOG",
    "STRAPI_TIMEOUT_SECS",
];

fn sitemapper_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("sitemapper"));
    for name in CONFIG_ENV {
        cmd.env_remove(name);
    }
    cmd.env("RUST_LOG", "warn");
    cmd
}

fn run_against_unreachable_cms(out: &Path) -> Command {
    let mut cmd = sitemapper_cmd();
    cmd.args(["run", "--mode", "full"])
        .args(["--api-url", "http://127.0.0.1:9"])
        .args(["--api-token", "secret"])
        .args(["--site-url", "https://example.com"])
        .args(["--languages", "en"])
        .args(["--timeout-secs", "2"])
        .arg("--output-dir")
        .arg(out);
    cmd
}

#[test]
fn missing_configuration_fails_before_any_output() {
    let tmp = TempDir::new().expect("tmp");
    let out = tmp.path().join("out");

    sitemapper_cmd()
        .args(["run", "--output-dir"])
        .arg(&out)
        .assert()
        .failure()
        .stderr(contains("STRAPI_API_URL"))
        .stderr(contains("SITE_BASE_URL"));

    assert!(!out.exists(), "output directory must not be created");
}

#[test]
fn unknown_mode_is_rejected() {
    sitemapper_cmd()
        .args(["run", "--mode", "sometimes"])
        .assert()
        .failure()
        .stderr(contains("unknown mode"));
}

#[test]
fn unreachable_cms_still_writes_heartbeat_and_index() {
    let tmp = TempDir::new().expect("tmp");
    let out = tmp.path().join("out");

    run_against_unreachable_cms(&out)
        .assert()
        .success()
        .stdout(contains("full run"));

    assert!(out.join("single-home-page-en.xml").is_file());
    let index = fs::read_to_string(out.join("sitemap.xml")).expect("index");
    assert!(index.contains("https://example.com/sitemaps/single-home-page-en.xml"));
    assert!(out.join("sitemap_state.json").is_file());
}

#[test]
fn dry_run_creates_nothing() {
    let tmp = TempDir::new().expect("tmp");
    let out = tmp.path().join("out");

    run_against_unreachable_cms(&out)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(contains("[dry-run]"));

    assert!(!out.exists());
}

#[test]
fn status_json_on_empty_directory() {
    let tmp = TempDir::new().expect("tmp");

    sitemapper_cmd()
        .args(["status", "--json", "--output-dir"])
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(contains("\"last_successful_run\": null"))
        .stdout(contains("\"index_present\": false"));
}

#[test]
fn status_table_after_a_run() {
    let tmp = TempDir::new().expect("tmp");
    let out = tmp.path().join("out");
    run_against_unreachable_cms(&out).assert().success();

    sitemapper_cmd()
        .args(["status", "--output-dir"])
        .arg(&out)
        .assert()
        .success()
        .stdout(contains("single-home-page-en.xml"))
        .stdout(contains("Index: "));
}

#[test]
fn builtin_catalog_as_json_and_yaml() {
    sitemapper_cmd()
        .args(["catalog", "--json"])
        .assert()
        .success()
        .stdout(contains("\"api_slug\": \"news-articles\""));

    sitemapper_cmd()
        .args(["catalog", "--yaml"])
        .assert()
        .success()
        .stdout(contains("kinds:"))
        .stdout(contains("path_prefix: news"));
}

#[test]
fn catalog_file_is_validated() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("catalog.yaml");
    fs::write(
        &path,
        "kinds:\n  - api_slug: news\n    type: collection\n    path_prefix: news\n  - api_slug: news\n    type: collection\n    path_prefix: updates\n",
    )
    .expect("write catalog");

    sitemapper_cmd()
        .args(["catalog", "--catalog"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(contains("declared twice"));
}
