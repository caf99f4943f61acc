// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use future_ledger::api::{with_fallback, ApiClient, DataSource, FallbackMode, TransactionApi};
use future_ledger::errors::ApiError;
use future_ledger::models::{Transaction, TransactionType};
use rust_decimal::Decimal;
use serde_json::Value;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

struct Recorded {
    request_line: String,
    body: String,
}

/// Answers one connection per canned `(status, body)` and hands back what
/// it received.
fn serve(responses: Vec<(u16, &'static str)>) -> (String, JoinHandle<Vec<Recorded>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}/api", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for (status, body) in responses {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                let line = line.trim_end();
                if line.is_empty() {
                    break;
                }
                if let Some((k, v)) = line.split_once(':') {
                    if k.eq_ignore_ascii_case("content-length") {
                        content_length = v.trim().parse().unwrap();
                    }
                }
            }
            let mut buf = vec![0u8; content_length];
            reader.read_exact(&mut buf).unwrap();

            let mut stream = reader.into_inner();
            let reply = format!(
                "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(reply.as_bytes()).unwrap();
            stream.flush().unwrap();
            seen.push(Recorded {
                request_line: request_line.trim_end().to_string(),
                body: String::from_utf8(buf).unwrap(),
            });
        }
        seen
    });
    (base, handle)
}

#[test]
fn list_sends_query_and_normalizes_amounts() {
    let (base, server) = serve(vec![(
        200,
        r#"{"transactions":[
            {"id":1,"amount":-1200,"category":"食費","date":"2025-04-03T00:00:00.000Z","memo":null},
            {"id":2,"amount":"450000","date":"2025-04-25","type":"income"},
            {"id":3,"amount":800,"category":"交通費","date":"2025-04-07","type":"expense"}
        ]}"#,
    )]);
    let client = ApiClient::new(&base).unwrap();
    let txs = client.list_transactions(Some(2025), Some(4)).unwrap();
    let seen = server.join().unwrap();

    assert_eq!(seen[0].request_line, "GET /api/transactions?year=2025&month=4 HTTP/1.1");
    assert_eq!(txs.len(), 3);
    assert_eq!(txs[0].amount, Decimal::new(1200, 0));
    assert_eq!(txs[0].r#type, TransactionType::Expense);
    assert_eq!(txs[0].memo, "");
    assert_eq!(txs[0].date.to_string(), "2025-04-03");
    assert_eq!(txs[1].category, "");
    assert_eq!(txs[1].r#type, TransactionType::Income);
    assert_eq!(txs[2].r#type, TransactionType::Expense);
}

#[test]
fn list_without_filters_and_missing_key_is_empty() {
    let (base, server) = serve(vec![(200, "{}")]);
    let client = ApiClient::new(&format!("{}/", base)).unwrap();
    assert!(client.list_transactions(None, None).unwrap().is_empty());
    let seen = server.join().unwrap();
    assert_eq!(seen[0].request_line, "GET /api/transactions HTTP/1.1");
}

#[test]
fn create_posts_without_id_and_reads_entity() {
    let (base, server) = serve(vec![(
        201,
        r#"{"transaction":{"id":10,"amount":500,"category":"交通費","date":"2025-04-10","memo":"","type":"expense"}}"#,
    )]);
    let client = ApiClient::new(&base).unwrap();
    let tx = Transaction::new(
        Decimal::new(500, 0),
        "交通費",
        chrono::NaiveDate::from_ymd_opt(2025, 4, 10).unwrap(),
        "",
        TransactionType::Expense,
    )
    .with_id(77);
    let created = client.create_transaction(&tx).unwrap();
    let seen = server.join().unwrap();

    assert_eq!(created.id, Some(10));
    assert_eq!(seen[0].request_line, "POST /api/transactions HTTP/1.1");
    let sent: Value = serde_json::from_str(&seen[0].body).unwrap();
    assert!(sent.get("id").is_none());
    assert_eq!(sent["amount"], serde_json::json!(500.0));
    assert_eq!(sent["type"], "expense");
    assert_eq!(sent["date"], "2025-04-10");
}

#[test]
fn update_without_entity_is_missing_field() {
    let (base, server) = serve(vec![(200, r#"{"ok":true}"#)]);
    let client = ApiClient::new(&base).unwrap();
    let tx = Transaction::new(
        Decimal::new(1, 0),
        "食費",
        chrono::NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
        "",
        TransactionType::Expense,
    );
    let err = client.update_transaction(5, &tx).unwrap_err();
    let seen = server.join().unwrap();
    assert_eq!(seen[0].request_line, "PUT /api/transactions/5 HTTP/1.1");
    assert!(matches!(err, ApiError::MissingField("transaction")));
    assert!(!err.is_unavailable());
}

#[test]
fn error_field_becomes_message() {
    let (base, server) = serve(vec![(400, r#"{"error":"金額は必須です"}"#)]);
    let client = ApiClient::new(&base).unwrap();
    let err = client.delete_transaction(3).unwrap_err();
    server.join().unwrap();
    assert_eq!(err.to_string(), "金額は必須です");
    assert_eq!(err.status(), Some(400));
    assert!(!err.is_unavailable());
}

#[test]
fn bodyless_error_uses_status_message() {
    let (base, server) = serve(vec![(500, "")]);
    let client = ApiClient::new(&base).unwrap();
    let err = client.list_transactions(Some(2025), None).unwrap_err();
    let seen = server.join().unwrap();
    assert_eq!(seen[0].request_line, "GET /api/transactions?year=2025 HTTP/1.1");
    assert_eq!(err.to_string(), "API Error: 500");
    assert!(err.is_unavailable());
}

#[test]
fn empty_delete_response_is_success() {
    let (base, server) = serve(vec![(200, "")]);
    let client = ApiClient::new(&base).unwrap();
    client.delete_transaction(9).unwrap();
    let seen = server.join().unwrap();
    assert_eq!(seen[0].request_line, "DELETE /api/transactions/9 HTTP/1.1");
}

#[test]
fn non_json_success_is_invalid_response() {
    let (base, server) = serve(vec![(200, "<html>maintenance</html>")]);
    let client = ApiClient::new(&base).unwrap();
    let err = client.list_transactions(None, None).unwrap_err();
    server.join().unwrap();
    assert!(matches!(err, ApiError::InvalidResponse));
    assert!(err.is_unavailable());
}

#[test]
fn unreachable_backend_is_transport_error() {
    let port = {
        let l = TcpListener::bind("127.0.0.1:0").unwrap();
        l.local_addr().unwrap().port()
    };
    let client = ApiClient::new(&format!("http://127.0.0.1:{}/api", port)).unwrap();
    let err = client.list_transactions(None, None).unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert!(err.is_unavailable());

    let fetched = with_fallback(Err::<Vec<u8>, _>(err), FallbackMode::MockData, "list", || vec![1])
        .unwrap();
    assert_eq!(fetched.source, DataSource::Fallback);
    assert_eq!(fetched.data, vec![1]);
}

#[test]
fn fallback_only_covers_unavailability() {
    let rejected = ApiError::Http {
        status: 404,
        message: "not found".into(),
    };
    assert!(with_fallback(Err::<u8, _>(rejected), FallbackMode::MockData, "get", || 0).is_err());

    let down = ApiError::Http {
        status: 503,
        message: "down".into(),
    };
    assert!(with_fallback(Err::<u8, _>(down), FallbackMode::Disabled, "get", || 0).is_err());

    let ok = with_fallback(Ok(7u8), FallbackMode::MockData, "get", || 0).unwrap();
    assert!(!ok.is_fallback());
    assert_eq!(ok.data, 7);
}

#[test]
fn goals_and_profile_use_their_keys() {
    let (base, server) = serve(vec![
        (
            200,
            r#"{"savings":[{"id":1,"name":"旅行資金","target_amount":300000,"current_amount":120000,"target_date":"2025-08-01"}]}"#,
        ),
        (
            200,
            r#"{"user":{"id":1,"username":"u","email":"e","name":"n","settings":{"currency":"JPY","savingsGoal":3000000}}}"#,
        ),
        (
            200,
            r#"{"user":{"id":1,"username":"u","email":"e","name":"n","settings":{"currency":"JPY","savingsGoal":5000000}}}"#,
        ),
    ]);
    let client = ApiClient::new(&base).unwrap();

    let goals = client.list_goals().unwrap();
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0].current_amount, Decimal::new(120_000, 0));

    let mut profile = client.get_profile().unwrap();
    assert_eq!(profile.settings.savings_goal, Some(Decimal::new(3_000_000, 0)));
    profile.settings.savings_goal = Some(Decimal::new(5_000_000, 0));
    let saved = client.update_profile(&profile).unwrap();
    assert_eq!(saved.settings.savings_goal, Some(Decimal::new(5_000_000, 0)));

    let seen = server.join().unwrap();
    assert_eq!(seen[0].request_line, "GET /api/savings HTTP/1.1");
    assert_eq!(seen[1].request_line, "GET /api/users HTTP/1.1");
    assert_eq!(seen[2].request_line, "PUT /api/users HTTP/1.1");
    let sent: Value = serde_json::from_str(&seen[2].body).unwrap();
    assert_eq!(sent["settings"]["savingsGoal"], serde_json::json!(5000000.0));
    assert_eq!(sent["settings"]["currency"], "JPY");
}
