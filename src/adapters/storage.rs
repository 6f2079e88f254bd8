use crate::core::Storage;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// A directory on the local filesystem, e.g. the folder a CI artifact is restored into.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.base_path.join(path);
        let data = tokio::fs::read(full_path).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.base_path.join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // 先寫暫存檔再 rename，中途失敗不會留下半個狀態檔
        let tmp_path = full_path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, data).await?;
        tokio::fs::rename(&tmp_path, &full_path).await?;
        Ok(())
    }
}

#[cfg(feature = "lambda")]
pub use s3::S3Storage;

#[cfg(feature = "lambda")]
mod s3 {
    use crate::core::Storage;
    use crate::utils::error::{MonitorError, Result};
    use aws_sdk_s3::Client as S3Client;

    #[derive(Debug, Clone)]
    pub struct S3Storage {
        client: S3Client,
        bucket: String,
    }

    impl S3Storage {
        pub fn new(client: S3Client, bucket: String) -> Self {
            Self { client, bucket }
        }
    }

    impl Storage for S3Storage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let resp = match self
                .client
                .get_object()
                .bucket(&self.bucket)
                .key(path)
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(err) => {
                    let err = err.into_service_error();
                    if err.is_no_such_key() {
                        return Err(MonitorError::StateNotFound {
                            path: format!("s3://{}/{}", self.bucket, path),
                        });
                    }
                    return Err(MonitorError::StorageError {
                        message: format!("Failed to read from S3: {}", err),
                    });
                }
            };

            let data = resp
                .body
                .collect()
                .await
                .map_err(|e| MonitorError::StorageError {
                    message: format!("Failed to collect S3 data: {}", e),
                })?;

            Ok(data.into_bytes().to_vec())
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.client
                .put_object()
                .bucket(&self.bucket)
                .key(path)
                .content_type("application/json")
                .body(data.to_vec().into())
                .send()
                .await
                .map_err(|e| MonitorError::StorageError {
                    message: format!("Failed to write to S3: {}", e.into_service_error()),
                })?;

            Ok(())
        }
    }
}
