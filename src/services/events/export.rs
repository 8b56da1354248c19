//! 报名名单导出：JSON / CSV / XLSX

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use rust_xlsxwriter::{Format, Workbook};
use tracing::error;

use super::EventService;
use crate::models::events::entities::RegistrationStatus;
use crate::models::events::responses::RegistrationView;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::server_error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Xlsx,
}

const HEADERS: [&str; 5] = ["Name", "Roll Number", "Department", "Email", "Registration Date"];

/// 导出行，列顺序与 HEADERS 一致
fn registration_row(r: &RegistrationView) -> [String; 5] {
    [
        r.student_name.clone(),
        r.roll_number.clone(),
        r.department.clone(),
        r.student_email.clone(),
        r.registration.registered_at.format("%Y-%m-%d %H:%M").to_string(),
    ]
}

/// 文件导出只含有效报名，已取消的不出现在名单中
fn active_registrations(
    registrations: &[RegistrationView],
) -> impl Iterator<Item = &RegistrationView> {
    registrations
        .iter()
        .filter(|r| r.registration.status == RegistrationStatus::Registered)
}

pub async fn list_registrations(
    service: &EventService,
    request: &HttpRequest,
    event_id: i64,
    format: ExportFormat,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_event_by_id(event_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::EventNotFound,
                "Event not found",
            )));
        }
        Err(e) => {
            error!("Failed to load event {}: {}", event_id, e);
            return Ok(server_error());
        }
    }

    let registrations = match storage.list_registrations_by_event(event_id).await {
        Ok(registrations) => registrations,
        Err(e) => {
            error!("Failed to list registrations of event {}: {}", event_id, e);
            return Ok(server_error());
        }
    };

    match format {
        ExportFormat::Json => Ok(HttpResponse::Ok().json(ApiResponse::success(
            registrations,
            "Registrations retrieved successfully",
        ))),
        ExportFormat::Csv => export_csv(event_id, &registrations),
        ExportFormat::Xlsx => export_xlsx(event_id, &registrations),
    }
}

fn render_csv(registrations: &[RegistrationView]) -> Result<Vec<u8>, String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(HEADERS).map_err(|e| e.to_string())?;
    for r in active_registrations(registrations) {
        wtr.write_record(registration_row(r))
            .map_err(|e| e.to_string())?;
    }
    wtr.into_inner().map_err(|e| e.to_string())
}

fn render_xlsx(registrations: &[RegistrationView]) -> Result<Vec<u8>, rust_xlsxwriter::XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Registrations")?;

    let header_format = Format::new().set_bold();
    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (row, r) in active_registrations(registrations).enumerate() {
        let row = (row + 1) as u32;
        for (col, value) in registration_row(r).iter().enumerate() {
            worksheet.write_string(row, col as u16, value)?;
        }
    }

    workbook.save_to_buffer()
}

fn export_csv(event_id: i64, registrations: &[RegistrationView]) -> ActixResult<HttpResponse> {
    let data = render_csv(registrations).map_err(|e| {
        error!("CSV 生成失败: {}", e);
        actix_web::error::ErrorInternalServerError(format!("CSV 生成失败: {e}"))
    })?;

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"event-{event_id}-registrations.csv\""),
        ))
        .body(data))
}

fn export_xlsx(event_id: i64, registrations: &[RegistrationView]) -> ActixResult<HttpResponse> {
    let buffer = render_xlsx(registrations).map_err(|e| {
        error!("XLSX 生成失败: {}", e);
        actix_web::error::ErrorInternalServerError(format!("XLSX 生成失败: {e}"))
    })?;

    Ok(HttpResponse::Ok()
        .content_type("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"event-{event_id}-registrations.xlsx\""),
        ))
        .body(buffer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::events::entities::Registration;
    use calamine::{Data, Reader, Xlsx};
    use chrono::TimeZone;
    use std::io::Cursor;

    fn sample() -> RegistrationView {
        RegistrationView {
            registration: Registration {
                id: 1,
                event_id: 3,
                student_id: 9,
                status: RegistrationStatus::Registered,
                registered_at: chrono::Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap(),
            },
            student_name: "Asha Rao".into(),
            student_email: "asha.rao@campusflow.in".into(),
            roll_number: "CS001".into(),
            department: "CSE".into(),
        }
    }

    #[test]
    fn test_csv_columns() {
        let data = render_csv(&[sample()]).unwrap();
        let text = String::from_utf8(data).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Name,Roll Number,Department,Email,Registration Date")
        );
        assert_eq!(
            lines.next(),
            Some("Asha Rao,CS001,CSE,asha.rao@campusflow.in,2026-03-14 09:30")
        );
    }

    #[test]
    fn test_cancelled_registrations_left_out_of_files() {
        let mut cancelled = sample();
        cancelled.registration.id = 2;
        cancelled.registration.status = RegistrationStatus::Cancelled;
        cancelled.student_name = "Vikram Shah".into();
        cancelled.roll_number = "CS042".into();

        let text = String::from_utf8(render_csv(&[cancelled.clone(), sample()]).unwrap()).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("CS001"));
        assert!(!text.contains("CS042"));

        let data = render_xlsx(&[cancelled, sample()]).unwrap();
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(data)).unwrap();
        let range = workbook.worksheet_range("Registrations").unwrap();
        assert_eq!(range.get((1, 1)), Some(&Data::String("CS001".into())));
        assert_eq!(range.get((2, 1)), None);
    }

    #[test]
    fn test_xlsx_readable() {
        let data = render_xlsx(&[sample()]).unwrap();
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(data)).unwrap();
        let range = workbook.worksheet_range("Registrations").unwrap();
        assert_eq!(range.get((0, 0)), Some(&Data::String("Name".into())));
        assert_eq!(range.get((1, 1)), Some(&Data::String("CS001".into())));
    }
}
