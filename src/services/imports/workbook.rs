//! 导入工作簿解析
//!
//! 每个工作表首行为表头，单元格按表头名称取值；全空行忽略。

use calamine::{Data, Reader, Xlsx};
use chrono::{Duration, NaiveDate};
use std::collections::HashMap;
use std::io::Cursor;

use crate::models::ErrorCode;

pub const STUDENTS_SHEET: &str = "Students";
pub const TEACHERS_SHEET: &str = "Teachers";
pub const SUBJECTS_SHEET: &str = "Subjects";
pub const TIMETABLE_SHEET: &str = "Timetable";

pub const REQUIRED_SHEETS: [&str; 4] = [STUDENTS_SHEET, TEACHERS_SHEET, SUBJECTS_SHEET, TIMETABLE_SHEET];

pub const STUDENT_COLUMNS: [&str; 5] = ["Full Name", "Roll Number", "Department", "Class", "Year"];
pub const TEACHER_COLUMNS: [&str; 3] = ["Full Name", "Department", "Employee ID"];
pub const SUBJECT_COLUMNS: [&str; 2] = ["Subject Name", "Subject Code"];
pub const TIMETABLE_COLUMNS: [&str; 7] = [
    "Day",
    "Start Time",
    "End Time",
    "Subject Code",
    "Teacher Email",
    "Class",
    "Department",
];

#[derive(Debug)]
pub enum WorkbookError {
    ParseFailed(String),
    MissingSheets(Vec<String>),
    TooManyRows(usize),
}

impl WorkbookError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::ParseFailed(_) => ErrorCode::ImportFileParseFailed,
            Self::MissingSheets(_) => ErrorCode::ImportFileMissingSheet,
            Self::TooManyRows(_) => ErrorCode::ImportTooManyRows,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::ParseFailed(msg) => format!("Failed to read Excel file: {msg}"),
            Self::MissingSheets(names) => {
                format!("Missing required sheet(s): {}", names.join(", "))
            }
            Self::TooManyRows(max) => format!("Too many rows, at most {max} rows per upload"),
        }
    }
}

/// 一行数据，键为表头名称
#[derive(Debug, Clone, Default)]
pub struct SheetRow {
    pub row_num: usize,
    cells: HashMap<String, String>,
}

impl SheetRow {
    /// 非空单元格
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .get(column)
            .map(|v| v.as_str())
            .filter(|v| !v.is_empty())
    }

    /// 第一个缺失的必填列
    pub fn first_missing<'a>(&self, columns: &[&'a str]) -> Option<&'a str> {
        columns.iter().copied().find(|c| self.get(c).is_none())
    }
}

#[derive(Debug, Default)]
pub struct ParsedWorkbook {
    pub students: Vec<SheetRow>,
    pub teachers: Vec<SheetRow>,
    pub subjects: Vec<SheetRow>,
    pub timetable: Vec<SheetRow>,
}

impl ParsedWorkbook {
    pub fn total_rows(&self) -> usize {
        self.students.len() + self.teachers.len() + self.subjects.len() + self.timetable.len()
    }
}

/// Excel 日期序列值的起点
fn excel_epoch() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1899, 12, 30)
}

/// Excel 日期/时间序列值转文本：纯时间为 `HH:MM`，其余为日期（带时间时附加 `HH:MM`）
pub fn excel_serial_to_string(value: f64) -> String {
    let days = value.trunc() as i64;
    let minutes = (value.fract() * 24.0 * 60.0).round() as i64;
    let (hours, minutes) = ((minutes / 60) % 24, minutes % 60);

    if days == 0 {
        return format!("{hours:02}:{minutes:02}");
    }

    match excel_epoch().and_then(|epoch| epoch.checked_add_signed(Duration::days(days))) {
        Some(date) if hours == 0 && minutes == 0 => date.format("%Y-%m-%d").to_string(),
        Some(date) => format!("{} {hours:02}:{minutes:02}", date.format("%Y-%m-%d")),
        None => value.to_string(),
    }
}

pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => excel_serial_to_string(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(_) | Data::Empty => String::new(),
    }
}

fn read_sheet(workbook: &mut Xlsx<Cursor<&[u8]>>, name: &str) -> Result<Vec<SheetRow>, WorkbookError> {
    let range = workbook
        .worksheet_range(name)
        .map_err(|e| WorkbookError::ParseFailed(format!("{name}: {e}")))?;

    let mut rows_iter = range.rows();
    let Some(header_row) = rows_iter.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header_row.iter().map(cell_to_string).collect();

    let mut rows = Vec::new();
    for (index, row) in rows_iter.enumerate() {
        let cells: HashMap<String, String> = headers
            .iter()
            .zip(row.iter())
            .filter(|(header, _)| !header.is_empty())
            .map(|(header, cell)| (header.clone(), cell_to_string(cell)))
            .collect();

        if cells.values().all(|v| v.is_empty()) {
            continue;
        }
        rows.push(SheetRow {
            row_num: index + 2, // 表头占第 1 行
            cells,
        });
    }
    Ok(rows)
}

/// 解析上传的工作簿，检查必需工作表与总行数
pub fn parse_workbook(data: &[u8], max_rows: usize) -> Result<ParsedWorkbook, WorkbookError> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(data)).map_err(|e| WorkbookError::ParseFailed(e.to_string()))?;

    let sheet_names = workbook.sheet_names();
    let missing: Vec<String> = REQUIRED_SHEETS
        .iter()
        .filter(|required| !sheet_names.iter().any(|s| s.as_str() == **required))
        .map(|s| s.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(WorkbookError::MissingSheets(missing));
    }

    let parsed = ParsedWorkbook {
        students: read_sheet(&mut workbook, STUDENTS_SHEET)?,
        teachers: read_sheet(&mut workbook, TEACHERS_SHEET)?,
        subjects: read_sheet(&mut workbook, SUBJECTS_SHEET)?,
        timetable: read_sheet(&mut workbook, TIMETABLE_SHEET)?,
    };

    if parsed.total_rows() > max_rows {
        return Err(WorkbookError::TooManyRows(max_rows));
    }
    Ok(parsed)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    /// 在内存中生成测试用工作簿
    pub(crate) fn build_workbook(sheets: &[(&str, &[&str], &[&[&str]])]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        for (name, headers, rows) in sheets {
            let sheet = workbook.add_worksheet();
            sheet.set_name(*name).unwrap();
            for (col, header) in headers.iter().enumerate() {
                sheet.write_string(0, col as u16, *header).unwrap();
            }
            for (r, row) in rows.iter().enumerate() {
                for (col, value) in row.iter().enumerate() {
                    sheet.write_string((r + 1) as u32, col as u16, *value).unwrap();
                }
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    pub(crate) fn full_workbook(students: &[&[&str]]) -> Vec<u8> {
        build_workbook(&[
            (STUDENTS_SHEET, STUDENT_COLUMNS.as_slice(), students),
            (TEACHERS_SHEET, TEACHER_COLUMNS.as_slice(), &[]),
            (SUBJECTS_SHEET, SUBJECT_COLUMNS.as_slice(), &[]),
            (TIMETABLE_SHEET, TIMETABLE_COLUMNS.as_slice(), &[]),
        ])
    }

    #[test]
    fn test_missing_sheets_listed() {
        let data = build_workbook(&[
            (STUDENTS_SHEET, STUDENT_COLUMNS.as_slice(), &[]),
            (SUBJECTS_SHEET, SUBJECT_COLUMNS.as_slice(), &[]),
        ]);
        let err = parse_workbook(&data, 100).unwrap_err();
        assert_eq!(err.message(), "Missing required sheet(s): Teachers, Timetable");
    }

    #[test]
    fn test_rows_addressed_by_header() {
        let data = full_workbook(&[
            &["Asha Rao", "CS001", "CSE", "CSE-A", "2"],
            &["", "", "", "", ""],
            &["Vikram Das", "CS002", "CSE", "", "3"],
        ]);
        let parsed = parse_workbook(&data, 100).unwrap();
        assert_eq!(parsed.students.len(), 2);

        let first = &parsed.students[0];
        assert_eq!(first.row_num, 2);
        assert_eq!(first.get("Roll Number"), Some("CS001"));
        assert_eq!(first.first_missing(&STUDENT_COLUMNS), None);

        let second = &parsed.students[1];
        assert_eq!(second.row_num, 4);
        assert_eq!(second.first_missing(&STUDENT_COLUMNS), Some("Class"));
    }

    #[test]
    fn test_row_limit() {
        let data = full_workbook(&[&["A B", "1", "CSE", "X", "1"], &["C D", "2", "CSE", "X", "1"]]);
        assert!(matches!(
            parse_workbook(&data, 1),
            Err(WorkbookError::TooManyRows(1))
        ));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        assert!(matches!(
            parse_workbook(b"not a workbook", 10),
            Err(WorkbookError::ParseFailed(_))
        ));
    }

    #[test]
    fn test_excel_time_cells() {
        assert_eq!(excel_serial_to_string(0.375), "09:00");
        assert_eq!(excel_serial_to_string(0.5625), "13:30");
        assert_eq!(excel_serial_to_string(45000.0), "2023-03-15");
        assert_eq!(cell_to_string(&Data::Float(2.0)), "2");
        assert_eq!(cell_to_string(&Data::String("  CSE ".into())), "CSE");
    }
}
