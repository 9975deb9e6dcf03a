//! [`ObjectStore`] over S3, or any S3-compatible endpoint.
//!
//! Each bucket gets its own `object_store` client, built on first use and cached for the
//! rest of the run. Credentials and region come from the standard `AWS_*` environment
//! variables.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use async_trait::async_trait;
use indexmap::IndexMap;
use object_store::{
    Attribute, AttributeValue, Attributes, ObjectStore as RemoteStore, PutOptions, PutPayload,
    aws::AmazonS3Builder, path::Path,
};
use snafu::IntoError;

use crate::io::store::{BackendSnafu, NotFoundSnafu, ObjectStore, ObjectUri, StoreError};

type Connector =
    Box<dyn Fn(&str) -> object_store::Result<Arc<dyn RemoteStore>> + Send + Sync + 'static>;

pub struct S3ObjectStore {
    connect: Connector,
    buckets: Mutex<HashMap<String, Arc<dyn RemoteStore>>>,
}

impl S3ObjectStore {
    /// Talks to AWS S3, or to `endpoint_url` when one is given.
    pub fn new(endpoint_url: Option<String>) -> Self {
        Self::with_connector(move |bucket| {
            let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);
            if let Some(endpoint) = &endpoint_url {
                builder = builder.with_endpoint(endpoint.clone()).with_allow_http(true);
            }
            Ok(Arc::new(builder.build()?) as Arc<dyn RemoteStore>)
        })
    }

    /// Uses `connect` to open the store behind each bucket name.
    pub fn with_connector(
        connect: impl Fn(&str) -> object_store::Result<Arc<dyn RemoteStore>> + Send + Sync + 'static,
    ) -> Self {
        Self {
            connect: Box::new(connect),
            buckets: Mutex::new(HashMap::new()),
        }
    }

    fn bucket(&self, uri: &ObjectUri) -> Result<Arc<dyn RemoteStore>, StoreError> {
        let mut buckets = self.buckets.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(store) = buckets.get(&uri.bucket) {
            return Ok(Arc::clone(store));
        }
        let store = (self.connect)(&uri.bucket).map_err(|err| backend_error(uri, err))?;
        buckets.insert(uri.bucket.clone(), Arc::clone(&store));
        Ok(store)
    }
}

fn backend_error(uri: &ObjectUri, err: object_store::Error) -> StoreError {
    match err {
        object_store::Error::NotFound { .. } => NotFoundSnafu { uri: uri.clone() }.build(),
        err => BackendSnafu { uri: uri.clone() }.into_error(err),
    }
}

/// Content type and user metadata as S3 object attributes.
fn put_options(content_type: &str, metadata: &IndexMap<String, String>) -> PutOptions {
    let mut attributes = Attributes::new();
    attributes.insert(
        Attribute::ContentType,
        AttributeValue::from(content_type.to_string()),
    );
    for (key, value) in metadata {
        attributes.insert(
            Attribute::Metadata(key.clone().into()),
            AttributeValue::from(value.clone()),
        );
    }

    let mut options = PutOptions::default();
    options.attributes = attributes;
    options
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get(&self, uri: &ObjectUri) -> Result<Vec<u8>, StoreError> {
        let store = self.bucket(uri)?;
        let result = store
            .get(&Path::from(uri.key.as_str()))
            .await
            .map_err(|err| backend_error(uri, err))?;
        let bytes = result.bytes().await.map_err(|err| backend_error(uri, err))?;
        Ok(bytes.to_vec())
    }

    async fn put(
        &self,
        uri: &ObjectUri,
        body: Vec<u8>,
        content_type: &str,
        metadata: &IndexMap<String, String>,
    ) -> Result<(), StoreError> {
        let store = self.bucket(uri)?;
        store
            .put_opts(
                &Path::from(uri.key.as_str()),
                PutPayload::from(body),
                put_options(content_type, metadata),
            )
            .await
            .map_err(|err| backend_error(uri, err))?;
        Ok(())
    }
}
