use crate::core::UploadRejection;
use crate::table::FileKind;

/// Largest accepted request, measured from the declared content length.
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

/// Check upload metadata before anything is read or parsed.
///
/// Checks run in a fixed order: filename present, extension allowed, size
/// within [`MAX_UPLOAD_BYTES`].
pub fn validate_upload(filename: &str, content_length: u64) -> Result<FileKind, UploadRejection> {
    if filename.is_empty() {
        return Err(UploadRejection::EmptyFilename);
    }

    let kind = FileKind::from_filename(filename).ok_or_else(|| {
        UploadRejection::DisallowedExtension(
            filename
                .rsplit_once('.')
                .map(|(_, ext)| ext.to_string())
                .unwrap_or_default(),
        )
    })?;

    check_size(content_length)?;
    Ok(kind)
}

pub fn check_size(content_length: u64) -> Result<(), UploadRejection> {
    if content_length > MAX_UPLOAD_BYTES {
        return Err(UploadRejection::TooLarge {
            size: content_length,
            limit_mb: MAX_UPLOAD_BYTES / (1024 * 1024),
        });
    }
    Ok(())
}
