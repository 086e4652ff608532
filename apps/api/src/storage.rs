use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use bytes::Bytes;
use serde::Deserialize;
use tracing::{error, info};

use crate::errors::AppError;

/// Fixed credential filename, expected next to the running binary
/// (resolved against the process working directory).
const CRED_FILE_NAME: &str = "gcs-credentials.json";

/// GCS XML (S3-interoperability) endpoint. Objects uploaded through it are
/// served back from the same host, which is what the public URL relies on.
const GCS_ENDPOINT: &str = "https://storage.googleapis.com";

/// Hard deadline for a single object upload. Exceeding it abandons the
/// request and may leave a partial remote object; there is no cleanup pass.
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(5);

/// HMAC interoperability key pair parsed from the credential file.
#[derive(Debug, Deserialize)]
struct GcsCredentials {
    access_key_id: String,
    secret_access_key: String,
}

/// Client for the resume bucket. Authenticates once at startup; uploads are
/// single-shot puts with no retry.
#[derive(Clone)]
pub struct ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl ObjectStore {
    /// Builds an authenticated client for `bucket`.
    ///
    /// Side effect: sets `GOOGLE_APPLICATION_CREDENTIALS` to the resolved
    /// credential file path for the lifetime of the process.
    pub async fn connect(bucket: &str) -> Result<Self> {
        let wd = std::env::current_dir().context("Failed to resolve working directory")?;
        let cred_path = wd.join(CRED_FILE_NAME);
        std::env::set_var("GOOGLE_APPLICATION_CREDENTIALS", &cred_path);

        let credentials = load_credentials(&cred_path)?;

        let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new("auto"))
            .credentials_provider(Credentials::new(
                &credentials.access_key_id,
                &credentials.secret_access_key,
                None,
                None,
                "intake-static",
            ))
            .endpoint_url(GCS_ENDPOINT)
            .load()
            .await;

        Ok(ObjectStore {
            client: aws_sdk_s3::Client::new(&s3_config),
            bucket: bucket.to_string(),
        })
    }

    /// Uploads `body` under the object key `name` with a public-read ACL and
    /// returns the public URL of the stored object.
    // TODO: change the ACL rules to be anything other than public; look at signed URLs
    pub async fn upload(&self, name: &str, body: Bytes) -> Result<String, AppError> {
        let put = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(name)
            .acl(ObjectCannedAcl::PublicRead)
            .body(ByteStream::from(body))
            .send();

        match tokio::time::timeout(UPLOAD_TIMEOUT, put).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                error!("Upload of {name} failed: {e}");
                return Err(AppError::Storage(format!("upload of {name} failed: {e}")));
            }
            Err(_) => {
                error!("Upload of {name} timed out after {UPLOAD_TIMEOUT:?}");
                return Err(AppError::Storage(format!("upload of {name} timed out")));
            }
        }

        let url = public_url(&self.bucket, name);
        info!("Uploaded {name} to {url}");
        Ok(url)
    }
}

fn load_credentials(path: &Path) -> Result<GcsCredentials> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Credential file '{}' is not readable", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Credential file '{}' is malformed", path.display()))
}

/// Public URL of an uploaded object.
pub fn public_url(bucket: &str, name: &str) -> String {
    format!("{GCS_ENDPOINT}/{bucket}/{name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_url_format() {
        assert_eq!(
            public_url("resume-bucket", "abc123.pdf"),
            "https://storage.googleapis.com/resume-bucket/abc123.pdf"
        );
    }

    #[test]
    fn test_credential_file_parses() {
        let creds: GcsCredentials = serde_json::from_str(
            r#"{"access_key_id": "GOOG1EXAMPLE", "secret_access_key": "secret"}"#,
        )
        .expect("credential JSON must parse");
        assert_eq!(creds.access_key_id, "GOOG1EXAMPLE");
        assert_eq!(creds.secret_access_key, "secret");
    }

    #[test]
    fn test_malformed_credential_file_is_an_error() {
        let result: Result<GcsCredentials, _> = serde_json::from_str(r#"{"access_key_id": 42}"#);
        assert!(result.is_err());
    }
}
