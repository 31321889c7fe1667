//! Shared helpers for integration tests.

#![allow(dead_code)]

pub mod socket_guard;

/// Wraps a result payload in a success envelope.
pub fn ok_envelope(result: serde_json::Value) -> serde_json::Value {
    serde_json::json!({"status": 200, "msg": "OK", "result": result})
}

/// Wraps a message in a failure envelope with no result.
pub fn error_envelope(status: i64, msg: &str) -> serde_json::Value {
    serde_json::json!({"status": status, "msg": msg, "result": null})
}

pub fn ticket_json(ticket: &str) -> serde_json::Value {
    serde_json::json!({
        "ticket": ticket,
        "captcha_url": false,
        "captcha_w": false,
        "captcha_h": false,
        "wait_time": 0,
        "valid_until": "2022-01-01 00:00:00"
    })
}

pub fn captcha_ticket_json(ticket: &str) -> serde_json::Value {
    serde_json::json!({
        "ticket": ticket,
        "captcha_url": "https://captcha.example/c/abc.png",
        "captcha_w": 140,
        "captcha_h": "70",
        "wait_time": 0,
        "valid_until": "2022-01-01 00:05:00"
    })
}

pub fn grant_json() -> serde_json::Value {
    serde_json::json!({
        "name": "The quick brown fox.txt",
        "size": 12345,
        "sha1": "2fd4e1c67a2d28fced849ee1bb76e7391b93eb12",
        "content_type": "plain/text",
        "upload_at": "2011-01-26 13:33:37",
        "url": "https://abvzps.example/dl/l/4spxX_-cSO4/The+quick+brown+fox.txt",
        "token": "4spxX_-cSO4"
    })
}

pub fn record_json(id: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "status": 200,
        "name": format!("{id}.mp4"),
        "size": "122",
        "sha1": "2fd4e1c67a2d28fced849ee1bb76e7391b93eb12",
        "content_type": "video/mp4",
        "cstatus": "ok"
    })
}
