//! Batch file metadata lookup (`file/info`).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::wire::{map_or_empty, optional_text};
use super::{ApiClient, ApiError, Credentials, Endpoint, ProtocolError};

/// Status value the service gives a record for an available file.
const RECORD_AVAILABLE: i64 = 200;

/// Metadata for one file id, as reported by the service.
///
/// Text fields are kept as sent; `None` means the service reported no value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// File id.
    pub id: String,
    /// Per-file status (200 when available).
    pub status: i64,
    /// File name.
    pub name: Option<String>,
    /// Size as transmitted; not guaranteed to be numeric.
    pub size: Option<String>,
    /// SHA-1 content hash.
    pub sha1: Option<String>,
    /// MIME type.
    pub content_type: Option<String>,
    /// Conversion status text (`cstatus`).
    pub conversion_status: Option<String>,
}

impl FileRecord {
    /// Whether the service reports the file as available.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status == RECORD_AVAILABLE
    }

    /// Size in bytes, when the transmitted text is a plain integer.
    #[must_use]
    pub fn size_bytes(&self) -> Option<u64> {
        self.size.as_deref().and_then(|size| size.trim().parse().ok())
    }
}

#[derive(Debug, Deserialize)]
struct RecordPayload {
    #[serde(default, deserialize_with = "optional_text")]
    id: Option<String>,
    #[serde(default)]
    status: i64,
    #[serde(default, deserialize_with = "optional_text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    size: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    sha1: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    content_type: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    cstatus: Option<String>,
}

impl RecordPayload {
    fn into_record(self, key: &str) -> FileRecord {
        FileRecord {
            id: self
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| key.to_string()),
            status: self.status,
            name: self.name,
            size: self.size,
            sha1: self.sha1,
            content_type: self.content_type,
            conversion_status: self.cstatus,
        }
    }
}

fn records_from_result(
    result: serde_json::Value,
) -> Result<HashMap<String, FileRecord>, ApiError> {
    let payloads: HashMap<String, RecordPayload> =
        map_or_empty(result).map_err(|source| ProtocolError::MalformedPayload {
            endpoint: Endpoint::Info.path(),
            source,
        })?;
    Ok(payloads
        .into_iter()
        .map(|(key, payload)| {
            let record = payload.into_record(&key);
            (key, record)
        })
        .collect())
}

impl ApiClient {
    /// Fetches metadata for a batch of file ids in one request.
    ///
    /// The result is keyed by the ids the service returned. Ids it omits
    /// (unknown or invalid) are simply absent; that is not an error, and no
    /// placeholder records are created. An empty `file_ids` returns an empty
    /// mapping without contacting the service.
    ///
    /// A malformed record is not skipped: one record that fails to decode
    /// fails the whole batch with [`ProtocolError::MalformedPayload`].
    ///
    /// # Errors
    ///
    /// - [`ApiError::Transport`] if the HTTP exchange fails
    /// - [`ApiError::Remote`] if the service declines the whole request
    /// - [`ApiError::Protocol`] if the body or a record is malformed
    #[instrument(skip_all, fields(ids = file_ids.len(), authenticated = credentials.is_some()))]
    pub async fn fetch_info<S>(
        &self,
        file_ids: &[S],
        credentials: Option<&Credentials>,
    ) -> Result<HashMap<String, FileRecord>, ApiError>
    where
        S: AsRef<str> + Sync,
    {
        if file_ids.is_empty() {
            debug!("No file ids requested; skipping info call");
            return Ok(HashMap::new());
        }

        let joined = file_ids
            .iter()
            .map(|id| id.as_ref())
            .collect::<Vec<&str>>()
            .join(",");
        let mut query = vec![("file", joined.as_str())];
        if let Some(credentials) = credentials {
            query.push(("login", credentials.login()));
            query.push(("key", credentials.key()));
        }
        let url = self.endpoint_url(Endpoint::Info, &query);

        let result: serde_json::Value = self.get_envelope(Endpoint::Info, url).await?;
        let records = records_from_result(result)?;
        debug!(
            requested = file_ids.len(),
            returned = records.len(),
            "File info received"
        );
        Ok(records)
    }
}
