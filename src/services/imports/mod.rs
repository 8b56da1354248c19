pub mod process;
pub mod template;
pub mod workbook;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::StreamExt;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::AppConfig;
use crate::models::imports::responses::{ImportResponse, ImportSummary};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

// 导入文件上限，与普通附件分开
const MAX_WORKBOOK_SIZE: usize = 20 * 1024 * 1024;

pub struct ImportService {
    storage: Option<Arc<dyn Storage>>,
}

impl ImportService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 上传工作簿并导入
    pub async fn upload_excel(
        &self,
        request: &HttpRequest,
        mut payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        let file_bytes = match read_workbook_field(&mut payload).await {
            Ok(bytes) => bytes,
            Err(msg) => {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::FileUploadFailed,
                    msg,
                )));
            }
        };

        if file_bytes.is_empty() {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::FileUploadFailed,
                "No file uploaded",
            )));
        }

        let config = &AppConfig::get().import;
        let parsed = match workbook::parse_workbook(&file_bytes, config.max_rows) {
            Ok(parsed) => parsed,
            Err(e) => {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(e.error_code(), e.message())));
            }
        };

        let storage = self.get_storage(request);
        let storage = storage.as_ref();

        // 课表依赖教师与科目，按顺序处理
        let students = process::import_students(storage, config, &parsed.students).await;
        let teachers = process::import_teachers(storage, config, &parsed.teachers).await;
        let subjects = process::import_subjects(storage, &parsed.subjects).await;
        let timetable = process::import_timetable(storage, &parsed.timetable).await;

        info!(
            "Excel import finished: students {}/{}, teachers {}/{}, subjects {}/{}, timetable {}/{}",
            students.inserted,
            students.total,
            teachers.inserted,
            teachers.total,
            subjects.inserted,
            subjects.total,
            timetable.inserted,
            timetable.total
        );

        Ok(HttpResponse::Ok().json(ApiResponse::success(
            ImportResponse {
                message: "Excel file processed".to_string(),
                summary: ImportSummary {
                    students,
                    teachers,
                    subjects,
                    timetable,
                },
            },
            "Excel file processed",
        )))
    }

    // 下载导入模板
    pub async fn download_template(&self) -> ActixResult<HttpResponse> {
        match template::render_template() {
            Ok(buffer) => Ok(HttpResponse::Ok()
                .content_type("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
                .insert_header((
                    "Content-Disposition",
                    "attachment; filename=\"campusflow_import_template.xlsx\"",
                ))
                .body(buffer)),
            Err(e) => {
                error!("XLSX 生成失败: {}", e);
                Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to generate template",
                )))
            }
        }
    }
}

/// 读取 `excelFile` 字段，其它字段忽略
async fn read_workbook_field(payload: &mut Multipart) -> Result<Vec<u8>, String> {
    let mut file_bytes = Vec::new();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| format!("Invalid form data: {e}"))?;
        let is_workbook = field.name().map(|n| n == "excelFile").unwrap_or(false);

        while let Some(chunk) = field.next().await {
            let data = chunk.map_err(|e| format!("Failed to read upload: {e}"))?;
            if !is_workbook {
                continue;
            }
            if file_bytes.len() + data.len() > MAX_WORKBOOK_SIZE {
                return Err("File size exceeds the limit".to_string());
            }
            file_bytes.extend_from_slice(&data);
        }
    }

    Ok(file_bytes)
}
