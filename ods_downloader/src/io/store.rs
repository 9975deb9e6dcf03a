use std::{
    fmt,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use snafu::{Backtrace, ResultExt, Snafu};

const SCHEME: &str = "s3://";
const METADATA_SUFFIX: &str = ".metadata.json";

/// Location of one object: `s3://<bucket>/<key>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectUri {
    pub bucket: String,
    pub key: String,
}

impl ObjectUri {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for ObjectUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEME}{}/{}", self.bucket, self.key)
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum StoreError {
    /// No object exists at the URI.
    #[snafu(display("Object not found: {uri}"))]
    NotFound { uri: ObjectUri, backtrace: Backtrace },

    #[snafu(display("Failed to read {uri}: {source}"))]
    Read {
        uri: ObjectUri,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("Failed to write {uri}: {source}"))]
    Write {
        uri: ObjectUri,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    /// A remote object store rejected the request.
    #[snafu(display("Object store request for {uri} failed: {source}"))]
    Backend {
        uri: ObjectUri,
        source: object_store::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("JSON encoding failed for {uri}: {source}"))]
    Json {
        uri: ObjectUri,
        source: serde_json::Error,
        backtrace: Backtrace,
    },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Object storage the job reads its identifier source from and writes its output to.
#[async_trait]
pub trait ObjectStore {
    /// Reads the whole object. A missing object is [`StoreError::NotFound`].
    async fn get(&self, uri: &ObjectUri) -> Result<Vec<u8>, StoreError>;

    /// Writes the object, replacing any existing one.
    ///
    /// `metadata` is attached to the object, not embedded in `body`.
    async fn put(
        &self,
        uri: &ObjectUri,
        body: Vec<u8>,
        content_type: &str,
        metadata: &IndexMap<String, String>,
    ) -> Result<(), StoreError>;
}

/// What [`LocalObjectStore`] keeps beside each object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMetadata {
    pub content_type: String,
    pub metadata: IndexMap<String, String>,
}

/// [`ObjectStore`] on the local filesystem.
///
/// `s3://bucket/key` lives at `<root>/bucket/key`; its metadata at
/// `<root>/bucket/key.metadata.json`.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn object_path(&self, uri: &ObjectUri) -> PathBuf {
        self.root.join(&uri.bucket).join(&uri.key)
    }

    pub fn metadata_path(&self, uri: &ObjectUri) -> PathBuf {
        let mut path = self.object_path(uri).into_os_string();
        path.push(METADATA_SUFFIX);
        PathBuf::from(path)
    }

    /// Reads back what [`ObjectStore::put`] attached to the object.
    pub async fn read_metadata(&self, uri: &ObjectUri) -> Result<ObjectMetadata, StoreError> {
        let bytes = read(&self.metadata_path(uri), uri).await?;
        serde_json::from_slice(&bytes).context(JsonSnafu { uri: uri.clone() })
    }
}

async fn read(path: &Path, uri: &ObjectUri) -> Result<Vec<u8>, StoreError> {
    match tokio::fs::read(path).await {
        Err(err) if err.kind() == ErrorKind::NotFound => NotFoundSnafu { uri: uri.clone() }.fail(),
        other => other.context(ReadSnafu { uri: uri.clone() }),
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn get(&self, uri: &ObjectUri) -> Result<Vec<u8>, StoreError> {
        read(&self.object_path(uri), uri).await
    }

    async fn put(
        &self,
        uri: &ObjectUri,
        body: Vec<u8>,
        content_type: &str,
        metadata: &IndexMap<String, String>,
    ) -> Result<(), StoreError> {
        let path = self.object_path(uri);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context(WriteSnafu { uri: uri.clone() })?;
        }

        let sidecar = serde_json::to_vec_pretty(&ObjectMetadata {
            content_type: content_type.to_string(),
            metadata: metadata.clone(),
        })
        .context(JsonSnafu { uri: uri.clone() })?;

        // Sidecar first: an object is never readable without its metadata.
        let metadata_path = self.metadata_path(uri);
        tokio::fs::write(&metadata_path, sidecar)
            .await
            .context(WriteSnafu { uri: uri.clone() })?;
        if let Err(err) = tokio::fs::write(&path, body).await {
            let _ = tokio::fs::remove_file(&metadata_path).await;
            return Err(err).context(WriteSnafu { uri: uri.clone() });
        }
        Ok(())
    }
}
