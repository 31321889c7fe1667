//! CLI output formatting for command results.
//!
//! Results go to stdout, either as `key: value` lines or one JSON document.

use std::collections::{BTreeMap, HashMap, HashSet};

use anyhow::{Context, Result};
use openload_core::api::SERVER_TIMESTAMP_FORMAT;
use openload_core::{DownloadGrant, FileRecord, Ticket};
use serde::Serialize;

/// Placeholder for values the service did not report.
const ABSENT: &str = "-";

pub(crate) fn ticket_lines(ticket: &Ticket) -> Vec<String> {
    let mut lines = vec![
        format!("ticket: {}", ticket.ticket),
        format!(
            "valid_until: {}",
            ticket.valid_until.format(SERVER_TIMESTAMP_FORMAT)
        ),
        format!("wait_time: {}s", ticket.wait_time().as_secs()),
    ];
    match &ticket.captcha {
        Some(captcha) => {
            let size = match (captcha.width, captcha.height) {
                (Some(width), Some(height)) => format!(" ({width}x{height})"),
                _ => String::new(),
            };
            lines.push(format!("captcha: {}{size}", captcha.url));
        }
        None => lines.push("captcha: none".to_string()),
    }
    lines
}

pub(crate) fn grant_lines(grant: &DownloadGrant) -> Vec<String> {
    vec![
        format!("url: {}", grant.url),
        format!("name: {}", grant.name),
        format!("size: {}", grant.size),
        format!("sha1: {}", grant.sha1),
        format!("content_type: {}", grant.content_type),
        format!(
            "upload_at: {}",
            grant.upload_at.format(SERVER_TIMESTAMP_FORMAT)
        ),
        format!("token: {}", grant.token),
    ]
}

/// One tab-separated row per record, sorted by id.
pub(crate) fn info_lines(records: &HashMap<String, FileRecord>) -> Vec<String> {
    sorted_records(records)
        .values()
        .map(|record| {
            let status = record.status.to_string();
            [
                record.id.as_str(),
                status.as_str(),
                record.name.as_deref().unwrap_or(ABSENT),
                record.size.as_deref().unwrap_or(ABSENT),
                record.content_type.as_deref().unwrap_or(ABSENT),
                record.conversion_status.as_deref().unwrap_or(ABSENT),
            ]
            .join("\t")
        })
        .collect()
}

/// Requested ids the service returned no record for, in request order.
pub(crate) fn missing_ids(requested: &[String], records: &HashMap<String, FileRecord>) -> Vec<String> {
    let mut seen = HashSet::new();
    requested
        .iter()
        .filter(|id| !records.contains_key(id.as_str()) && seen.insert(id.as_str()))
        .cloned()
        .collect()
}

pub(crate) fn info_json(records: &HashMap<String, FileRecord>) -> Result<String> {
    to_json(&sorted_records(records))
}

pub(crate) fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize result as JSON")
}

fn sorted_records(records: &HashMap<String, FileRecord>) -> BTreeMap<&str, &FileRecord> {
    records
        .iter()
        .map(|(key, record)| (key.as_str(), record))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use openload_core::CaptchaChallenge;

    use super::*;

    fn record(id: &str, name: Option<&str>) -> FileRecord {
        FileRecord {
            id: id.to_string(),
            status: 200,
            name: name.map(str::to_string),
            size: Some("122".to_string()),
            sha1: None,
            content_type: Some("video/mp4".to_string()),
            conversion_status: None,
        }
    }

    fn records(ids: &[&str]) -> HashMap<String, FileRecord> {
        ids.iter()
            .map(|id| ((*id).to_string(), record(id, Some("clip.mp4"))))
            .collect()
    }

    #[test]
    fn test_ticket_lines_from_public_fields() {
        let ticket = Ticket {
            ticket: "tkt2".to_string(),
            captcha: Some(CaptchaChallenge {
                url: "https://captcha.example/c/abc.png".to_string(),
                width: Some(140),
                height: Some(70),
            }),
            wait_time_secs: 10,
            valid_until: NaiveDate::from_ymd_opt(2022, 1, 1)
                .unwrap()
                .and_hms_opt(0, 5, 0)
                .unwrap(),
        };
        assert_eq!(
            ticket_lines(&ticket),
            vec![
                "ticket: tkt2",
                "valid_until: 2022-01-01 00:05:00",
                "wait_time: 10s",
                "captcha: https://captcha.example/c/abc.png (140x70)",
            ]
        );
    }

    #[test]
    fn test_info_lines_sorted_by_id() {
        let lines = info_lines(&records(&["ccc", "aaa", "bbb"]));
        let ids: Vec<&str> = lines
            .iter()
            .map(|line| line.split('\t').next().unwrap())
            .collect();
        assert_eq!(ids, vec!["aaa", "bbb", "ccc"]);
    }

    #[test]
    fn test_info_lines_absent_values_use_placeholder() {
        let mut map = HashMap::new();
        map.insert("x".to_string(), record("x", None));
        let lines = info_lines(&map);
        assert_eq!(lines, vec!["x\t200\t-\t122\tvideo/mp4\t-"]);
    }

    #[test]
    fn test_missing_ids_preserves_request_order_and_dedups() {
        let requested: Vec<String> = ["bbb", "aaa", "zzz", "bbb", "yyy"]
            .iter()
            .map(|id| (*id).to_string())
            .collect();
        let missing = missing_ids(&requested, &records(&["aaa"]));
        assert_eq!(missing, vec!["bbb", "zzz", "yyy"]);
    }

    #[test]
    fn test_missing_ids_empty_when_all_returned() {
        let requested = vec!["aaa".to_string()];
        assert!(missing_ids(&requested, &records(&["aaa"])).is_empty());
    }

    #[test]
    fn test_info_json_is_object_keyed_by_id() {
        let json = info_json(&records(&["bbb", "aaa"])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["aaa"]["name"], "clip.mp4");
        assert_eq!(value["bbb"]["status"], 200);
        assert!(json.find("\"aaa\"").unwrap() < json.find("\"bbb\"").unwrap());
    }
}
