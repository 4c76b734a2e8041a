//! Campaign image upload endpoint.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use axum::{
    Extension,
    body::Bytes,
    extract::{FromRef, Multipart, State, multipart::MultipartError},
    http::StatusCode,
    response::Response,
};
use time::OffsetDateTime;
use tokio::{fs::OpenOptions, io::AsyncWriteExt};

use crate::{
    AppState, Error, UserID,
    campaign::{CampaignService, SQLiteCampaignStore},
    database_id::CampaignId,
    response::{UploadStatus, error_response, success_response},
};

/// The largest image that may be uploaded, in bytes.
pub const MAX_IMAGE_SIZE: usize = 2 * 1024 * 1024;

/// The request body limit for the upload route, leaving room for the other form fields.
pub const UPLOAD_BODY_LIMIT: usize = MAX_IMAGE_SIZE + 64 * 1024;

const ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

const MAX_WRITE_ATTEMPTS: u32 = 100;

/// The state needed for uploading campaign images.
#[derive(Debug, Clone)]
pub struct ImageUploadState {
    /// Checks ownership and records the uploaded images.
    pub campaign_service: CampaignService<SQLiteCampaignStore>,
    /// Where uploaded images are written to.
    pub image_dir: PathBuf,
}

impl FromRef<AppState> for ImageUploadState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            campaign_service: state.campaign_service.clone(),
            image_dir: state.image_dir.clone(),
        }
    }
}

/// The parsed multipart form of an image upload.
#[derive(Debug)]
struct ImageUploadForm {
    campaign_id: CampaignId,
    is_primary: bool,
    file_name: String,
    contents: Bytes,
}

/// A route handler for uploading an image for a campaign.
///
/// Expects a multipart form with the fields `campaign_id`, `is_primary` (optional, defaults to
/// false) and `file`. The image is written to the image directory as
/// `<user id>-<unix timestamp>-<file name>`, numbered if that name is taken, and is removed again
/// if it cannot be recorded in the database.
pub async fn upload_campaign_image(
    State(state): State<ImageUploadState>,
    Extension(user_id): Extension<UserID>,
    mut multipart: Multipart,
) -> Response {
    let form = match parse_upload_form(&mut multipart).await {
        Ok(form) => form,
        Err(error) => return upload_failed(&error),
    };

    if let Err(error) = check_image(&form.file_name, form.contents.len()) {
        return upload_failed(&error);
    }

    if let Err(error) = state
        .campaign_service
        .validate_ownership(form.campaign_id, user_id)
    {
        return upload_failed(&error);
    }

    let path = match write_image(
        &state.image_dir,
        user_id,
        OffsetDateTime::now_utc(),
        &form.file_name,
        &form.contents,
    )
    .await
    {
        Ok(path) => path,
        Err(error) => return upload_failed(&error),
    };

    let stored_path = path.to_string_lossy();

    match state
        .campaign_service
        .save_campaign_image(form.campaign_id, form.is_primary, &stored_path)
    {
        Ok(image) => {
            tracing::info!(
                "user {user_id} uploaded image {} for campaign {}",
                image.id,
                image.campaign_id
            );

            success_response(
                StatusCode::OK,
                "Campaign image uploaded successfully",
                UploadStatus { is_uploaded: true },
            )
        }
        Err(error) => {
            if let Err(remove_error) = tokio::fs::remove_file(&path).await {
                tracing::error!("could not remove orphaned image {stored_path}: {remove_error}");
            }

            upload_failed(&error)
        }
    }
}

fn upload_failed(error: &Error) -> Response {
    let (status_code, message) = match error {
        Error::MultipartError(_) => (StatusCode::UNPROCESSABLE_ENTITY, "Invalid input"),
        Error::MissingImageFile => (StatusCode::BAD_REQUEST, "No file uploaded"),
        Error::InvalidImageFileType => (
            StatusCode::BAD_REQUEST,
            "Invalid file type. Only JPG, JPEG, and PNG are allowed",
        ),
        Error::ImageTooLarge(_) => (StatusCode::BAD_REQUEST, "File size too large. Maximum 2MB"),
        Error::NotFound => (StatusCode::NOT_FOUND, "Campaign not found"),
        Error::Unauthorized => (
            StatusCode::FORBIDDEN,
            "You are not authorized to upload image for this campaign",
        ),
        Error::FileError(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to save file to server",
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to save image to database",
        ),
    };

    if status_code.is_server_error() {
        tracing::error!("{message}: {error}");
    } else {
        tracing::debug!("rejected image upload: {error}");
    }

    error_response(
        status_code,
        message,
        Some(UploadStatus { is_uploaded: false }),
    )
}

async fn parse_upload_form(multipart: &mut Multipart) -> Result<ImageUploadForm, Error> {
    let mut campaign_id = None;
    let mut is_primary = false;
    let mut file = None;

    while let Some(field) = multipart.next_field().await.map_err(map_multipart_error)? {
        match field.name() {
            Some("campaign_id") => {
                let text = field.text().await.map_err(map_multipart_error)?;
                let id = text.trim().parse::<CampaignId>().map_err(|_| {
                    Error::MultipartError(format!("campaign_id must be an integer, got {text:?}"))
                })?;
                campaign_id = Some(id);
            }
            Some("is_primary") => {
                let text = field.text().await.map_err(map_multipart_error)?;
                is_primary = parse_bool(&text).ok_or_else(|| {
                    Error::MultipartError(format!("is_primary must be a boolean, got {text:?}"))
                })?;
            }
            Some("file") => {
                let file_name = field
                    .file_name()
                    .map(sanitize_file_name)
                    .unwrap_or_default();
                let contents = field.bytes().await.map_err(map_multipart_error)?;
                file = Some((file_name, contents));
            }
            _ => {}
        }
    }

    let campaign_id =
        campaign_id.ok_or_else(|| Error::MultipartError("campaign_id is required".to_owned()))?;

    let (file_name, contents) = match file {
        Some((file_name, contents)) if !file_name.is_empty() => (file_name, contents),
        _ => return Err(Error::MissingImageFile),
    };

    Ok(ImageUploadForm {
        campaign_id,
        is_primary,
        file_name,
        contents,
    })
}

fn map_multipart_error(error: MultipartError) -> Error {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::ImageTooLarge(MAX_IMAGE_SIZE)
    } else {
        Error::MultipartError(error.body_text())
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" => Some(true),
        "false" | "0" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Keep only the last path component of a client supplied file name.
fn sanitize_file_name(file_name: &str) -> String {
    file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_owned()
}

/// Check that `file_name` has an allowed image extension and that `size` is within the limit.
fn check_image(file_name: &str, size: usize) -> Result<(), Error> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase);

    match extension {
        Some(extension) if ALLOWED_EXTENSIONS.contains(&extension.as_str()) => {}
        _ => return Err(Error::InvalidImageFileType),
    }

    if size > MAX_IMAGE_SIZE {
        return Err(Error::ImageTooLarge(MAX_IMAGE_SIZE));
    }

    Ok(())
}

/// The path for the `attempt`-th try at storing `file_name`.
///
/// The first attempt is `<user id>-<unix timestamp>-<file name>`, later attempts insert the
/// attempt number before the file name.
fn image_path(
    image_dir: &Path,
    user_id: UserID,
    uploaded_at: OffsetDateTime,
    file_name: &str,
    attempt: u32,
) -> PathBuf {
    let timestamp = uploaded_at.unix_timestamp();

    match attempt {
        0 => image_dir.join(format!("{user_id}-{timestamp}-{file_name}")),
        n => image_dir.join(format!("{user_id}-{timestamp}-{n}-{file_name}")),
    }
}

/// Write an uploaded image to a new file in `image_dir` and return its path.
///
/// Existing files are never overwritten. If the preferred name is taken, e.g. the same user
/// uploaded a file with the same name within the same second, the next free numbered name is
/// used.
async fn write_image(
    image_dir: &Path,
    user_id: UserID,
    uploaded_at: OffsetDateTime,
    file_name: &str,
    contents: &[u8],
) -> Result<PathBuf, Error> {
    tokio::fs::create_dir_all(image_dir)
        .await
        .map_err(|error| Error::FileError(error.to_string()))?;

    for attempt in 0..MAX_WRITE_ATTEMPTS {
        let path = image_path(image_dir, user_id, uploaded_at, file_name, attempt);

        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(error) if error.kind() == ErrorKind::AlreadyExists => continue,
            Err(error) => return Err(Error::FileError(error.to_string())),
        };

        let written = match file.write_all(contents).await {
            Ok(()) => file.flush().await,
            Err(error) => Err(error),
        };

        if let Err(error) = written {
            if let Err(remove_error) = tokio::fs::remove_file(&path).await {
                tracing::error!(
                    "could not remove partially written image {}: {remove_error}",
                    path.display()
                );
            }
            return Err(Error::FileError(error.to_string()));
        }

        return Ok(path);
    }

    Err(Error::FileError(format!(
        "no free file name for {file_name:?} after {MAX_WRITE_ATTEMPTS} attempts"
    )))
}
