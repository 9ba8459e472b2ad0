//! S3 object store.

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;

use jobledger_core::error::{LedgerError, Result};
use jobledger_core::event::Destination;

use super::ObjectStore;

const CONTENT_TYPE_CSV: &str = "text/csv";

pub struct S3Store {
    client: Client,
}

impl S3Store {
    pub fn new(sdk: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(sdk),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    fn name(&self) -> &'static str {
        "s3"
    }

    async fn get(&self, dest: &Destination) -> Result<Option<Bytes>> {
        let res = self
            .client
            .get_object()
            .bucket(&dest.bucket)
            .key(&dest.key)
            .send()
            .await;

        match res {
            Ok(out) => {
                let data = out.body.collect().await.map_err(|e| {
                    LedgerError::Storage(format!("read body s3://{dest}: {e}"))
                })?;
                Ok(Some(data.into_bytes()))
            }
            Err(e) if e.as_service_error().is_some_and(|se| se.is_no_such_key()) => Ok(None),
            Err(e) => Err(LedgerError::Storage(format!(
                "get s3://{dest}: {}",
                DisplayErrorContext(&e)
            ))),
        }
    }

    async fn put(&self, dest: &Destination, body: Bytes) -> Result<()> {
        tracing::info!(bucket = %dest.bucket, key = %dest.key, bytes = body.len(), "uploading ledger");
        self.client
            .put_object()
            .bucket(&dest.bucket)
            .key(&dest.key)
            .content_type(CONTENT_TYPE_CSV)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| {
                LedgerError::Storage(format!("put s3://{dest}: {}", DisplayErrorContext(&e)))
            })?;
        Ok(())
    }
}
