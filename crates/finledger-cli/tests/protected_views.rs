//! Protected commands: guard redirects, bearer tokens and expired sessions.


use assert_cmd::cargo::cargo_bin_cmd;
use fixtures::{can_bind_localhost, seed_session, stored_session, temp_home, transaction};
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_protected_command_without_session_points_to_login() {
    let home = temp_home();

    for args in [
        vec!["transactions", "list"],
        vec!["accounts", "list"],
        vec!["categories", "list"],
        vec!["calendar"],
        vec!["stats"],
    ] {
        cargo_bin_cmd!("finledger")
            .env("FINLEDGER_HOME", home.path())
            // Never contacted: the guard stops the command first.
            .env("FINLEDGER_API_URL", "http://127.0.0.1:9")
            .args(&args)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Not logged in"))
            .stderr(predicate::str::contains("finledger login"));
    }
}

#[tokio::test]
async fn test_transactions_list_sends_bearer_and_filters() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    seed_session(home.path(), "tok-123");
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/transactions"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            transaction(1, "2024-03-01", "EXPENSE", 4500, "Coffee beans"),
            transaction(2, "2024-03-02", "INCOME", 300_000, "Salary"),
            transaction(3, "2024-03-03", "EXPENSE", 12_000, "Lunch"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("finledger")
        .env("FINLEDGER_HOME", home.path())
        .env("FINLEDGER_API_URL", server.uri())
        .args(["transactions", "list", "--search", "coffee"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Coffee beans"))
        .stdout(predicate::str::contains("Salary").not());
}

#[tokio::test]
async fn test_stats_shows_totals() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    seed_session(home.path(), "tok-123");
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/transactions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            transaction(1, "2024-03-01", "INCOME", 300_000, "Salary"),
            transaction(2, "2024-03-02", "EXPENSE", 12_000, "Lunch"),
            transaction(3, "2024-03-03", "TRANSFER", 50_000, "To savings"),
        ])))
        .mount(&server)
        .await;

    cargo_bin_cmd!("finledger")
        .env("FINLEDGER_HOME", home.path())
        .env("FINLEDGER_API_URL", server.uri())
        .args(["stats", "--recent", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Income:  300,000 KRW"))
        .stdout(predicate::str::contains("Expense: 12,000 KRW"))
        .stdout(predicate::str::contains("Balance: 288,000 KRW"))
        .stdout(predicate::str::contains("Salary").not());
}

#[tokio::test]
async fn test_calendar_renders_requested_month() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    seed_session(home.path(), "tok-123");
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/transactions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            transaction(1, "2024-03-05", "EXPENSE", 9000, "Lunch"),
        ])))
        .mount(&server)
        .await;

    cargo_bin_cmd!("finledger")
        .env("FINLEDGER_HOME", home.path())
        .env("FINLEDGER_API_URL", server.uri())
        .args(["calendar", "--month", "2024-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-03"))
        .stdout(predicate::str::contains("-9,000 KRW"))
        .stdout(predicate::str::contains("prev: 2024-02  next: 2024-04"));
}

#[tokio::test]
async fn test_unauthorized_response_clears_session() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    seed_session(home.path(), "expired");
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/accounts"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("finledger")
        .env("FINLEDGER_HOME", home.path())
        .env("FINLEDGER_API_URL", server.uri())
        .args(["accounts", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Session expired"));

    assert!(stored_session(home.path()).is_none());

    cargo_bin_cmd!("finledger")
        .env("FINLEDGER_HOME", home.path())
        .env("FINLEDGER_API_URL", server.uri())
        .args(["accounts", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));
}

#[tokio::test]
async fn test_add_transaction_posts_draft() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    seed_session(home.path(), "tok-123");
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/transactions"))
        .and(wiremock::matchers::body_partial_json(json!({
            "transactionDate": "2024-03-05",
            "description": "Lunch",
            "transactionType": "EXPENSE",
            "account": {"id": 1},
            "category": {"id": 2}
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(transaction(42, "2024-03-05", "EXPENSE", 9000, "Lunch")),
        )
        .expect(1)
        .mount(&server)
        .await;

    cargo_bin_cmd!("finledger")
        .env("FINLEDGER_HOME", home.path())
        .env("FINLEDGER_API_URL", server.uri())
        .args([
            "transactions",
            "add",
            "--type",
            "expense",
            "--amount",
            "9000",
            "--description",
            "Lunch",
            "--account",
            "1",
            "--category",
            "2",
            "--date",
            "2024-03-05",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created transaction 42"));
}

#[test]
fn test_transfer_without_target_is_rejected_locally() {
    let home = temp_home();
    seed_session(home.path(), "tok-123");

    cargo_bin_cmd!("finledger")
        .env("FINLEDGER_HOME", home.path())
        .env("FINLEDGER_API_URL", "http://127.0.0.1:9")
        .args([
            "transactions",
            "add",
            "--type",
            "transfer",
            "--amount",
            "100",
            "--description",
            "Move",
            "--account",
            "1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--to-account"));
}
