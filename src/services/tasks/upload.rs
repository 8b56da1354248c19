//! 任务与提交的 multipart 表单读取
//!
//! 文本字段收集到 `FormFields`；名为 `file` 的字段边读边写入上传目录，
//! 首个分块校验文件头，累计大小超过 `upload.max_size` 即中止。

use actix_multipart::Multipart;
use actix_web::HttpResponse;
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::{error, warn};
use uuid::Uuid;

use crate::config::UploadConfig;
use crate::errors::CampusFlowError;
use crate::models::tasks::requests::FormFields;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::file_magic::{allowed_extension, validate_magic_bytes};

// 单个文本字段的上限
const MAX_TEXT_FIELD_SIZE: usize = 64 * 1024;

/// 已保存到磁盘的上传文件
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: String,
    pub file_url: String,
    pub size: usize,
}

#[derive(Debug)]
pub enum UploadError {
    MultipleFiles,
    TypeNotAllowed,
    ContentMismatch,
    TooLarge,
    FieldTooLarge(String),
    Malformed(String),
    Io(String),
}

impl UploadError {
    pub fn into_response(self) -> HttpResponse {
        match self {
            UploadError::MultipleFiles => HttpResponse::BadRequest().json(
                ApiResponse::error_empty(ErrorCode::FileUploadFailed, "Only one file can be uploaded"),
            ),
            UploadError::TypeNotAllowed => HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::FileTypeNotAllowed,
                "Only PDF, DOC, DOCX, ZIP and RAR files are allowed",
            )),
            UploadError::ContentMismatch => HttpResponse::BadRequest().json(
                ApiResponse::error_empty(
                    ErrorCode::FileTypeNotAllowed,
                    "File content does not match its extension",
                ),
            ),
            UploadError::TooLarge => HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::FileSizeExceeded,
                "File size exceeds the limit",
            )),
            UploadError::FieldTooLarge(name) => HttpResponse::BadRequest().json(
                ApiResponse::error_empty(ErrorCode::BadRequest, format!("Field {name} is too large")),
            ),
            UploadError::Malformed(msg) => HttpResponse::BadRequest().json(
                ApiResponse::error_empty(ErrorCode::BadRequest, format!("Invalid form data: {msg}")),
            ),
            UploadError::Io(msg) => {
                error!("{}", CampusFlowError::file_operation(msg));
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::FileUploadFailed,
                    "File upload failed",
                ))
            }
        }
    }
}

/// 删除已保存的文件，文件不存在时静默忽略
pub fn remove_stored_file(file_url: &str) {
    if let Err(e) = fs::remove_file(file_url)
        && e.kind() != std::io::ErrorKind::NotFound
    {
        warn!("Failed to remove stored file {}: {}", file_url, e);
    }
}

/// 读取整个表单；出错时清理已写入的文件
pub async fn read_form(
    payload: &mut Multipart,
    config: &UploadConfig,
) -> Result<(FormFields, Option<UploadedFile>), UploadError> {
    let mut fields = FormFields::default();
    let mut uploaded: Option<UploadedFile> = None;

    let result = read_parts(payload, config, &mut fields, &mut uploaded).await;
    match result {
        Ok(()) => Ok((fields, uploaded)),
        Err(e) => {
            if let Some(file) = uploaded {
                remove_stored_file(&file.file_url);
            }
            Err(e)
        }
    }
}

async fn read_parts(
    payload: &mut Multipart,
    config: &UploadConfig,
    fields: &mut FormFields,
    uploaded: &mut Option<UploadedFile>,
) -> Result<(), UploadError> {
    loop {
        let mut field = match payload.try_next().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(UploadError::Malformed(e.to_string())),
        };

        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();
        let filename = content_disposition
            .and_then(|cd| cd.get_filename())
            .map(|s| s.to_string());

        if name == "file" {
            // 浏览器未选文件时会发送空文件名的空字段
            let Some(original_name) = filename.filter(|f| !f.is_empty()) else {
                while field.next().await.is_some() {}
                continue;
            };
            if uploaded.is_some() {
                return Err(UploadError::MultipleFiles);
            }

            let extension = allowed_extension(&original_name, &config.allowed_types)
                .ok_or(UploadError::TypeNotAllowed)?;

            if !Path::new(&config.dir).exists() {
                fs::create_dir_all(&config.dir).map_err(|e| UploadError::Io(e.to_string()))?;
            }

            let stored_name = format!(
                "{}-{}{}",
                chrono::Utc::now().timestamp(),
                Uuid::new_v4(),
                extension
            );
            let file_url = format!("{}/{}", config.dir, stored_name);
            let mut f = File::create(&file_url).map_err(|e| UploadError::Io(e.to_string()))?;
            // 先登记，出错时由调用方统一清理
            *uploaded = Some(UploadedFile {
                original_name,
                file_url: file_url.clone(),
                size: 0,
            });

            let mut total_size: usize = 0;
            let mut first_chunk = true;
            while let Some(chunk) = field.next().await {
                let data = chunk.map_err(|e| UploadError::Malformed(e.to_string()))?;
                if first_chunk {
                    first_chunk = false;
                    if !validate_magic_bytes(&data, &extension) {
                        return Err(UploadError::ContentMismatch);
                    }
                }
                total_size += data.len();
                if total_size > config.max_size {
                    return Err(UploadError::TooLarge);
                }
                f.write_all(&data).map_err(|e| UploadError::Io(e.to_string()))?;
            }

            if total_size == 0 {
                return Err(UploadError::ContentMismatch);
            }
            if let Some(file) = uploaded.as_mut() {
                file.size = total_size;
            }
        } else {
            let mut buf = Vec::new();
            while let Some(chunk) = field.next().await {
                let data = chunk.map_err(|e| UploadError::Malformed(e.to_string()))?;
                if buf.len() + data.len() > MAX_TEXT_FIELD_SIZE {
                    return Err(UploadError::FieldTooLarge(name));
                }
                buf.extend_from_slice(&data);
            }
            fields.insert(name, String::from_utf8_lossy(&buf).into_owned());
        }
    }

    Ok(())
}
