use rust_xlsxwriter::{Format, Workbook, XlsxError};

use super::workbook::{
    STUDENT_COLUMNS, STUDENTS_SHEET, SUBJECT_COLUMNS, SUBJECTS_SHEET, TEACHER_COLUMNS,
    TEACHERS_SHEET, TIMETABLE_COLUMNS, TIMETABLE_SHEET,
};

/// 四个工作表的表头及一行示例
pub fn render_template() -> Result<Vec<u8>, XlsxError> {
    let sheets: [(&str, Vec<&str>, Vec<&str>); 4] = [
        (
            STUDENTS_SHEET,
            STUDENT_COLUMNS.to_vec(),
            vec!["Asha Rao", "CS001", "CSE", "CSE-A", "2"],
        ),
        (
            TEACHERS_SHEET,
            [TEACHER_COLUMNS.as_slice(), ["Specialization"].as_slice()].concat(),
            vec!["Ravi Kumar", "CSE", "EMP001", "Databases, Networks"],
        ),
        (
            SUBJECTS_SHEET,
            [SUBJECT_COLUMNS.as_slice(), ["Department", "Credits"].as_slice()].concat(),
            vec!["Data Structures", "CS201", "CSE", "4"],
        ),
        (
            TIMETABLE_SHEET,
            TIMETABLE_COLUMNS.to_vec(),
            vec![
                "Monday",
                "09:00",
                "10:00",
                "CS201",
                "ravi.kumar@campusflow.in",
                "CSE-A",
                "CSE",
            ],
        ),
    ];

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    for (name, headers, example) in &sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name)?;
        for (col, header) in headers.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
            worksheet.set_column_width(col as u16, 20)?;
        }
        for (col, value) in example.iter().enumerate() {
            worksheet.write_string(1, col as u16, *value)?;
        }
    }

    workbook.save_to_buffer()
}

#[cfg(test)]
mod tests {
    use super::super::workbook::parse_workbook;
    use super::*;

    #[test]
    fn test_template_parses_as_import() {
        let data = render_template().unwrap();
        let parsed = parse_workbook(&data, 100).unwrap();
        assert_eq!(parsed.students.len(), 1);
        assert_eq!(parsed.teachers[0].get("Employee ID"), Some("EMP001"));
        assert_eq!(parsed.timetable[0].first_missing(&TIMETABLE_COLUMNS), None);
    }
}
