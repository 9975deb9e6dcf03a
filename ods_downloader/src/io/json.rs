use indexmap::IndexMap;
use serde::Serialize;
use snafu::ResultExt;

use crate::io::store::{JsonSnafu, ObjectStore, ObjectUri, StoreError};

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Serialises `value` as JSON and writes it to `uri` with `metadata` attached.
pub async fn write_json<St, T>(
    store: &St,
    uri: &ObjectUri,
    value: &T,
    metadata: &IndexMap<String, String>,
) -> Result<(), StoreError>
where
    St: ObjectStore + ?Sized,
    T: Serialize + ?Sized,
{
    let body = serde_json::to_vec(value).context(JsonSnafu { uri: uri.clone() })?;
    store.put(uri, body, JSON_CONTENT_TYPE, metadata).await
}
