//! CLI integration tests
use mockito::Server;
use predicates::prelude::*;

fn cmd() -> assert_cmd::Command {
    assert_cmd::cargo::cargo_bin_cmd!("batcave")
}

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/{}", name)
}

fn fixture(name: &str) -> String {
    std::fs::read_to_string(get_fixture_path(name)).unwrap()
}

#[test]
fn test_cli_help() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("favorites"));
}

#[test]
fn test_cli_requires_subcommand() {
    cmd().assert().failure();
}

#[test]
fn test_cli_resolve_link() {
    cmd()
        .args(["resolve", "https://batcave.biz/6975-invincible-2003.html"])
        .assert()
        .success()
        .stdout(predicate::str::contains("6975-invincible-2003"));
}

#[test]
fn test_cli_resolve_json() {
    let output = cmd()
        .args(["resolve", "batcave.biz/23236-peanuts-2012.html", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["id"], "23236-peanuts-2012");
}

#[test]
fn test_cli_resolve_reader_link_fails() {
    cmd()
        .args(["resolve", "https://batcave.biz/reader/6975/11"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a comic link"));
}

#[test]
fn test_cli_sorts() {
    cmd()
        .arg("sorts")
        .assert()
        .success()
        .stdout(predicate::str::contains("news_read_desc"));
}

#[test]
fn test_cli_invalid_sort() {
    cmd()
        .args(["category", "g_14", "--sort", "popularity"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid sort option"));
}

#[test]
fn test_cli_invalid_format() {
    cmd().args(["sorts", "--format", "yaml"]).assert().failure();
}

#[test]
fn test_cli_favorite_folders_offline() {
    cmd()
        .args(["favorites", "--list-folders"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reading"))
        .stdout(predicate::str::contains("liked"));
}

#[test]
fn test_cli_favorites_need_credentials() {
    cmd()
        .args(["favorites", "--folder", "liked"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--account"));
}

#[test]
fn test_cli_search_against_mock() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", mockito::Matcher::Regex(r"^/search/invincible/page/1/$".to_string()))
        .with_status(200)
        .with_body(fixture("listing.html"))
        .create();

    cmd()
        .args(["search", "invincible", "--base-url", &server.url()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Invincible (2003)"))
        .stdout(predicate::str::contains("5"));
    mock.assert();
}

#[test]
fn test_cli_category_json_against_mock() {
    let mut server = Server::new();
    server
        .mock("GET", "/xfsearch/g/14/page/2/")
        .with_status(200)
        .with_body(fixture("listing.html"))
        .create();

    let output = cmd()
        .args(["category", "g_14", "--page", "2", "--format", "json", "--base-url", &server.url()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["maxPage"], 5);
    assert_eq!(json["items"][0]["id"], "6975-invincible-2003");
}

#[test]
fn test_cli_categories_fallback_on_server_error() {
    let mut server = Server::new();
    server.mock("GET", "/comix/").with_status(503).create();

    cmd()
        .args(["categories", "--base-url", &server.url()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Error code: 503"))
        .stderr(predicate::str::contains("Categories unavailable"));
}

#[test]
fn test_cli_detail_against_mock() {
    let mut server = Server::new();
    server
        .mock("GET", "/6975-invincible-2003.html")
        .with_status(200)
        .with_body(fixture("detail.html"))
        .create();

    cmd()
        .args(["detail", "6975-invincible-2003", "--base-url", &server.url()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Robert Kirkman"))
        .stdout(predicate::str::contains("Issue #144"));
}

#[test]
fn test_cli_transport_error() {
    let mut server = Server::new();
    server.mock("GET", "/1-missing.html").with_status(404).with_body("gone").create();

    cmd()
        .args(["detail", "1-missing", "--base-url", &server.url()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("404"));
}

#[test]
fn test_completions_offer_flags_the_binary_accepts() {
    let dir = std::path::Path::new(env!("BATCAVE_COMPLETIONS_DIR"));
    let bash = std::fs::read_to_string(dir.join("batcave.bash")).unwrap();

    for flag in ["--base-url", "--user-agent", "--list-folders"] {
        assert!(bash.contains(flag), "completion is missing {}", flag);
    }
    for flag in ["--base_url", "--user_agent", "--list_folders"] {
        assert!(!bash.contains(flag), "completion offers {}", flag);
    }

    cmd()
        .args(["favorites", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--list-folders"))
        .stdout(predicate::str::contains("--base-url"))
        .stdout(predicate::str::contains("--user-agent"));
}

#[test]
fn test_cli_verbose() {
    cmd()
        .args(["-v", "sorts"])
        .assert()
        .success()
        .stderr(predicate::str::contains("BatCave"));
}
