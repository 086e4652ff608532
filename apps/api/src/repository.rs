use futures::stream::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::{Collection, Database};

use crate::errors::AppError;
use crate::models::resume::Resume;

const COLLECTION_NAME: &str = "resumes";

/// Document-store access for resume records.
///
/// Lookups assume one record per user, but `save` performs a plain insert
/// with no uniqueness check: saving the same user twice leaves two documents
/// and the lookups decode whichever matches first.
#[derive(Clone)]
pub struct ResumeRepository {
    collection: Collection<Resume>,
}

impl ResumeRepository {
    pub fn new(database: &Database) -> Self {
        ResumeRepository {
            collection: database.collection(COLLECTION_NAME),
        }
    }

    /// Point lookup by exact user ID.
    pub async fn find_by_user_id(&self, user_id: &str) -> Result<Resume, AppError> {
        self.collection
            .find_one(user_filter(user_id))
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No resume for user {user_id}")))
    }

    /// Point lookup by exact email.
    pub async fn find_by_email(&self, email: &str) -> Result<Resume, AppError> {
        self.collection
            .find_one(email_filter(email))
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No resume for email {email}")))
    }

    /// Inserts a new record. No duplicate check.
    pub async fn save(&self, resume: &Resume) -> Result<(), AppError> {
        self.collection.insert_one(resume).await?;
        Ok(())
    }

    /// Sets `url` and stamps `lastModified` on the record matching the
    /// resume's user ID. Matching zero documents is not an error
    /// (update-if-exists, not an upsert).
    pub async fn update(&self, resume: &Resume) -> Result<(), AppError> {
        self.collection
            .update_one(user_filter(&resume.user_id), update_document(resume))
            .await?;
        Ok(())
    }

    /// Returns every record in the collection. Unbounded.
    pub async fn find_all(&self) -> Result<Vec<Resume>, AppError> {
        let mut cursor = self.collection.find(doc! {}).await?;
        let mut resumes = Vec::new();
        while let Some(resume) = cursor.try_next().await? {
            resumes.push(resume);
        }
        Ok(resumes)
    }
}

fn user_filter(user_id: &str) -> Document {
    doc! { "userid": user_id }
}

fn email_filter(email: &str) -> Document {
    doc! { "email": email }
}

fn update_document(resume: &Resume) -> Document {
    doc! {
        "$set": { "url": &resume.url },
        "$currentDate": { "lastModified": true },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_user_filter_matches_on_exact_id() {
        assert_eq!(user_filter("u1"), doc! { "userid": "u1" });
    }

    #[test]
    fn test_email_filter_matches_on_exact_email() {
        assert_eq!(email_filter("a@b.c"), doc! { "email": "a@b.c" });
    }

    #[test]
    fn test_update_document_sets_url_and_stamps_last_modified() {
        let mut resume = Resume::from_upload(
            "u1".to_string(),
            "u1@example.com".to_string(),
            Bytes::from_static(b"bytes"),
            "resume.pdf",
        );
        resume.url = "http://x/r1".to_string();

        let update = update_document(&resume);
        let set = update.get_document("$set").expect("$set must be present");
        assert_eq!(set.get_str("url").unwrap(), "http://x/r1");
        assert!(
            !set.contains_key("userid") && !set.contains_key("email"),
            "update must only touch url"
        );

        let current_date = update
            .get_document("$currentDate")
            .expect("$currentDate must be present");
        assert!(current_date.get_bool("lastModified").unwrap());
    }
}
