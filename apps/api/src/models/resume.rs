use std::ffi::OsStr;
use std::path::Path;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::storage::ObjectStore;

/// One resume submission. Serialized field names (`userid`, `name`, `email`,
/// `url`) are the document-store schema; the attached file bytes are
/// transient and never persisted.
///
/// `url` stays empty until an upload succeeds. Whether a resume has been
/// uploaded or persisted is driven entirely by caller sequencing; `save` and
/// `update` are independent of `upload` by design.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resume {
    #[serde(rename = "userid")]
    pub user_id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub url: String,
    #[serde(skip)]
    file: Option<Bytes>,
}

impl Resume {
    /// Builds a resume from a fresh submission. The stored object name is a
    /// freshly generated v4 UUID carrying the original filename's extension.
    pub fn from_upload(
        user_id: String,
        email: String,
        file: Bytes,
        original_filename: &str,
    ) -> Resume {
        let name = match Path::new(original_filename)
            .extension()
            .and_then(OsStr::to_str)
        {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };

        Resume {
            user_id,
            name,
            email,
            url: String::new(),
            file: Some(file),
        }
    }

    /// Streams the attached file to the object store under `name` and records
    /// the resulting public URL. Consumes the attached file; errors if the
    /// resume was not built from an upload.
    ///
    /// Persistence is a separate step; a failure after a successful upload
    /// leaves the stored object in place (best effort, no rollback).
    pub async fn upload(&mut self, store: &ObjectStore) -> Result<(), AppError> {
        let file = self
            .file
            .take()
            .ok_or_else(|| AppError::Validation("Resume has no file attached".to_string()))?;

        self.url = store.upload(&self.name, file).await?;
        Ok(())
    }
}

/// Reduced read model of a [`Resume`] for external consumers.
/// Empty fields are omitted from serialized output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeInsight {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,
}

impl From<&Resume> for ResumeInsight {
    fn from(r: &Resume) -> Self {
        ResumeInsight {
            user_id: r.user_id.clone(),
            name: r.name.clone(),
            url: r.url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_resume(original_filename: &str) -> Resume {
        Resume::from_upload(
            "u1".to_string(),
            "u1@example.com".to_string(),
            Bytes::from_static(b"%PDF-1.4"),
            original_filename,
        )
    }

    #[test]
    fn test_from_upload_preserves_extension() {
        let r = make_resume("resume.pdf");
        assert!(r.name.ends_with(".pdf"), "name must keep the extension");
        assert!(r.name.len() > ".pdf".len());
    }

    #[test]
    fn test_from_upload_without_extension() {
        let r = make_resume("resume");
        assert!(!r.name.is_empty());
        assert!(!r.name.contains('.'));
    }

    #[test]
    fn test_generated_names_are_unique() {
        let a = make_resume("a.pdf");
        let b = make_resume("b.pdf");
        assert_ne!(a.name, b.name, "two uploads must never share a name");
    }

    #[test]
    fn test_url_is_empty_until_uploaded() {
        let r = make_resume("resume.docx");
        assert!(r.url.is_empty());
    }

    #[test]
    fn test_resume_serializes_with_document_field_names() {
        let r = make_resume("resume.pdf");
        let doc = mongodb::bson::to_document(&r).expect("resume must serialize to BSON");
        assert!(doc.contains_key("userid"));
        assert!(doc.contains_key("name"));
        assert!(doc.contains_key("email"));
        assert!(doc.contains_key("url"));
        assert!(!doc.contains_key("file"), "file bytes must not be persisted");
    }

    #[test]
    fn test_insight_copies_resume_fields() {
        let mut r = make_resume("resume.pdf");
        r.url = "https://storage.googleapis.com/b/x.pdf".to_string();
        let insight = ResumeInsight::from(&r);
        assert_eq!(insight.user_id, r.user_id);
        assert_eq!(insight.name, r.name);
        assert_eq!(insight.url, r.url);
    }

    #[test]
    fn test_insight_omits_empty_fields() {
        let empty = ResumeInsight {
            user_id: String::new(),
            name: String::new(),
            url: String::new(),
        };
        assert_eq!(serde_json::to_string(&empty).unwrap(), "{}");

        let partial = ResumeInsight {
            user_id: "u1".to_string(),
            name: "abc.pdf".to_string(),
            url: String::new(),
        };
        let json = serde_json::to_string(&partial).unwrap();
        assert!(json.contains("\"user_id\""));
        assert!(json.contains("\"name\""));
        assert!(!json.contains("\"url\""), "empty url must be omitted");
    }
}
