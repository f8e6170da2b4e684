//! Resume object storage on S3 / MinIO.

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::screening::extract::file_extension;

/// Object key for an uploaded resume:
/// `resumes/{job_id}/{candidate_id}_{safe_name}{ext}`.
pub fn resume_key(job_id: Uuid, candidate_id: Uuid, candidate_name: &str, filename: &str) -> String {
    let safe_name: String = candidate_name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let safe_name = if safe_name.is_empty() {
        "resume".to_string()
    } else {
        safe_name
    };
    let ext = file_extension(filename).unwrap_or_default();
    format!("resumes/{job_id}/{candidate_id}_{safe_name}{ext}")
}

pub fn content_type_for(key: &str) -> &'static str {
    match file_extension(key).as_deref() {
        Some(".pdf") => "application/pdf",
        Some(".docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some(".txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// File name offered to recruiters downloading a resume.
pub fn download_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

pub async fn put_resume(s3: &S3Client, bucket: &str, key: &str, data: Bytes) -> Result<(), AppError> {
    let size = data.len();
    s3.put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(data))
        .content_type(content_type_for(key))
        .send()
        .await
        .map_err(|e| AppError::S3(format!("upload of {key} failed: {e}")))?;

    info!("Stored resume s3://{bucket}/{key} ({size} bytes)");
    Ok(())
}

pub async fn get_resume(s3: &S3Client, bucket: &str, key: &str) -> Result<Bytes, AppError> {
    let object = s3
        .get_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| AppError::S3(format!("download of {key} failed: {e}")))?;

    let data = object
        .body
        .collect()
        .await
        .map_err(|e| AppError::S3(format!("reading {key} failed: {e}")))?;
    Ok(data.into_bytes())
}

pub async fn delete_resume(s3: &S3Client, bucket: &str, key: &str) -> Result<(), AppError> {
    s3.delete_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| AppError::S3(format!("delete of {key} failed: {e}")))?;

    info!("Deleted resume s3://{bucket}/{key}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_key_layout() {
        let job_id = Uuid::nil();
        let candidate_id = Uuid::from_u128(1);
        let key = resume_key(job_id, candidate_id, "Jane O'Doe", "CV Final.PDF");
        assert_eq!(
            key,
            format!("resumes/{job_id}/{candidate_id}_Jane_O_Doe.pdf")
        );
    }

    #[test]
    fn test_resume_key_blank_name() {
        let key = resume_key(Uuid::nil(), Uuid::nil(), "  ", "cv.txt");
        assert!(key.ends_with("_resume.txt"));
    }

    #[test]
    fn test_content_type_and_download_name() {
        assert_eq!(content_type_for("resumes/a/b_x.pdf"), "application/pdf");
        assert_eq!(content_type_for("resumes/a/b_x"), "application/octet-stream");
        assert_eq!(download_name("resumes/a/b_x.pdf"), "b_x.pdf");
    }
}
