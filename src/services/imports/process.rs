//! 各工作表的逐行导入
//!
//! 逐条插入，失败的行计入 skipped 并记录原因，不中断整个工作表。

use std::collections::HashSet;
use tracing::{error, warn};

use super::workbook::{
    SUBJECT_COLUMNS, STUDENT_COLUMNS, SheetRow, TEACHER_COLUMNS, TIMETABLE_COLUMNS,
};
use crate::config::ImportConfig;
use crate::errors::Result;
use crate::models::imports::responses::{Credential, SheetSummary};
use crate::models::subjects::requests::{NewSubject, NewTimetableEntry};
use crate::models::users::requests::{NewStudent, NewTeacher};
use crate::services::tasks::payload::split_list;
use crate::storage::Storage;
use crate::utils::credentials::generate_email;
use crate::utils::password::hash_password_blocking;
use crate::utils::validate::{normalize_time_of_day, normalize_weekday};

/// 单行处理结果：插入（附带凭据）或跳过（附带原因）
enum RowOutcome {
    Inserted(Option<Credential>),
    Skipped(String),
}

fn record(summary: &mut SheetSummary, row: &SheetRow, outcome: Result<RowOutcome>) {
    match outcome {
        Ok(RowOutcome::Inserted(credential)) => summary.record_inserted(credential),
        Ok(RowOutcome::Skipped(reason)) => {
            summary.record_skipped(format!("Row {}: {reason}", row.row_num))
        }
        Err(e) if e.is_conflict() => {
            summary.record_skipped(format!("Row {}: duplicate record", row.row_num))
        }
        Err(e) => {
            error!("Import row {} failed: {}", row.row_num, e);
            summary.record_skipped(format!("Row {}: {}", row.row_num, e.message()));
        }
    }
}

fn missing(column: &str) -> RowOutcome {
    RowOutcome::Skipped(format!("missing {column}"))
}

pub async fn import_students(
    storage: &dyn Storage,
    config: &ImportConfig,
    rows: &[SheetRow],
) -> SheetSummary {
    let mut summary = SheetSummary::with_credentials();
    let mut seen_emails = HashSet::new();
    let mut seen_rolls = HashSet::new();

    for row in rows {
        let outcome = import_student(storage, config, row, &mut seen_emails, &mut seen_rolls).await;
        record(&mut summary, row, outcome);
    }
    summary
}

async fn import_student(
    storage: &dyn Storage,
    config: &ImportConfig,
    row: &SheetRow,
    seen_emails: &mut HashSet<String>,
    seen_rolls: &mut HashSet<String>,
) -> Result<RowOutcome> {
    if let Some(column) = row.first_missing(&STUDENT_COLUMNS) {
        return Ok(missing(column));
    }
    let name = row.get("Full Name").unwrap_or_default();
    let roll_number = row.get("Roll Number").unwrap_or_default();
    let department = row.get("Department").unwrap_or_default();
    let class_name = row.get("Class").unwrap_or_default();

    let Ok(year) = row.get("Year").unwrap_or_default().parse::<i32>() else {
        return Ok(RowOutcome::Skipped("Year must be an integer".to_string()));
    };
    let Some(email) = generate_email(name, &config.email_domain) else {
        return Ok(RowOutcome::Skipped("cannot generate email from name".to_string()));
    };

    // 只登记成功插入的行，被跳过的行不占用邮箱或学号
    if seen_emails.contains(&email) || storage.get_student_by_email(&email).await?.is_some() {
        return Ok(RowOutcome::Skipped(format!("email {email} already exists")));
    }
    if seen_rolls.contains(roll_number)
        || storage.get_student_by_roll_number(roll_number).await?.is_some()
    {
        return Ok(RowOutcome::Skipped(format!(
            "roll number {roll_number} already exists"
        )));
    }

    let (class, _) = storage.find_or_create_class(class_name, department).await?;
    if class.department != department {
        warn!(
            "Class {} belongs to {}, student row {} lists {}",
            class.name, class.department, row.row_num, department
        );
    }

    let password_hash = hash_password_blocking(config.default_password.clone()).await?;
    storage
        .create_student(NewStudent {
            name: name.to_string(),
            email: email.clone(),
            password_hash,
            roll_number: roll_number.to_string(),
            department: department.to_string(),
            class_id: Some(class.id),
            year: Some(year),
        })
        .await?;
    seen_emails.insert(email.clone());
    seen_rolls.insert(roll_number.to_string());

    Ok(RowOutcome::Inserted(Some(Credential {
        name: name.to_string(),
        email,
        password: config.default_password.clone(),
    })))
}

pub async fn import_teachers(
    storage: &dyn Storage,
    config: &ImportConfig,
    rows: &[SheetRow],
) -> SheetSummary {
    let mut summary = SheetSummary::with_credentials();
    let mut seen_emails = HashSet::new();
    let mut seen_ids = HashSet::new();

    for row in rows {
        let outcome = import_teacher(storage, config, row, &mut seen_emails, &mut seen_ids).await;
        record(&mut summary, row, outcome);
    }
    summary
}

async fn import_teacher(
    storage: &dyn Storage,
    config: &ImportConfig,
    row: &SheetRow,
    seen_emails: &mut HashSet<String>,
    seen_ids: &mut HashSet<String>,
) -> Result<RowOutcome> {
    if let Some(column) = row.first_missing(&TEACHER_COLUMNS) {
        return Ok(missing(column));
    }
    let name = row.get("Full Name").unwrap_or_default();
    let department = row.get("Department").unwrap_or_default();
    let employee_id = row.get("Employee ID").unwrap_or_default();

    let Some(email) = generate_email(name, &config.email_domain) else {
        return Ok(RowOutcome::Skipped("cannot generate email from name".to_string()));
    };

    if seen_emails.contains(&email) || storage.get_teacher_by_email(&email).await?.is_some() {
        return Ok(RowOutcome::Skipped(format!("email {email} already exists")));
    }
    if seen_ids.contains(employee_id)
        || storage
            .get_teacher_by_employee_id(employee_id)
            .await?
            .is_some()
    {
        return Ok(RowOutcome::Skipped(format!(
            "employee ID {employee_id} already exists"
        )));
    }

    let password_hash = hash_password_blocking(config.default_password.clone()).await?;
    storage
        .create_teacher(NewTeacher {
            name: name.to_string(),
            email: email.clone(),
            password_hash,
            department: department.to_string(),
            employee_id: employee_id.to_string(),
            specialization: row.get("Specialization").map(split_list).unwrap_or_default(),
        })
        .await?;
    seen_emails.insert(email.clone());
    seen_ids.insert(employee_id.to_string());

    Ok(RowOutcome::Inserted(Some(Credential {
        name: name.to_string(),
        email,
        password: config.default_password.clone(),
    })))
}

pub async fn import_subjects(storage: &dyn Storage, rows: &[SheetRow]) -> SheetSummary {
    let mut summary = SheetSummary::default();
    let mut seen = HashSet::new();

    for row in rows {
        let outcome = import_subject(storage, row, &mut seen).await;
        record(&mut summary, row, outcome);
    }
    summary
}

async fn import_subject(
    storage: &dyn Storage,
    row: &SheetRow,
    seen: &mut HashSet<String>,
) -> Result<RowOutcome> {
    if let Some(column) = row.first_missing(&SUBJECT_COLUMNS) {
        return Ok(missing(column));
    }
    let name = row.get("Subject Name").unwrap_or_default();
    let code = row.get("Subject Code").unwrap_or_default();

    let credits = match row.get("Credits") {
        Some(raw) => match raw.parse::<i32>() {
            Ok(c) => Some(c),
            Err(_) => return Ok(RowOutcome::Skipped("Credits must be an integer".to_string())),
        },
        None => None,
    };

    // 名称与代码共用一个去重集合，加前缀区分
    let (name_key, code_key) = (format!("name:{name}"), format!("code:{code}"));
    if seen.contains(&name_key) || seen.contains(&code_key) {
        return Ok(RowOutcome::Skipped(format!("subject {code} already listed")));
    }
    if storage.get_subject_by_code(code).await?.is_some()
        || storage.get_subject_by_name(name).await?.is_some()
    {
        return Ok(RowOutcome::Skipped(format!("subject {code} already exists")));
    }

    storage
        .create_subject(NewSubject {
            name: name.to_string(),
            code: code.to_string(),
            department: row.get("Department").map(str::to_string),
            credits,
        })
        .await?;
    seen.insert(name_key);
    seen.insert(code_key);
    Ok(RowOutcome::Inserted(None))
}

pub async fn import_timetable(storage: &dyn Storage, rows: &[SheetRow]) -> SheetSummary {
    let mut summary = SheetSummary::default();
    for row in rows {
        let outcome = import_timetable_row(storage, row).await;
        record(&mut summary, row, outcome);
    }
    summary
}

async fn import_timetable_row(storage: &dyn Storage, row: &SheetRow) -> Result<RowOutcome> {
    if let Some(column) = row.first_missing(&TIMETABLE_COLUMNS) {
        return Ok(missing(column));
    }

    let Some(day) = normalize_weekday(row.get("Day").unwrap_or_default()) else {
        return Ok(RowOutcome::Skipped("invalid Day".to_string()));
    };
    let (Some(start_time), Some(end_time)) = (
        normalize_time_of_day(row.get("Start Time").unwrap_or_default()),
        normalize_time_of_day(row.get("End Time").unwrap_or_default()),
    ) else {
        return Ok(RowOutcome::Skipped("time must be HH:MM".to_string()));
    };
    if start_time >= end_time {
        return Ok(RowOutcome::Skipped(
            "Start Time must be before End Time".to_string(),
        ));
    }

    let code = row.get("Subject Code").unwrap_or_default();
    let Some(subject) = storage.get_subject_by_code(code).await? else {
        return Ok(RowOutcome::Skipped(format!("subject {code} not found")));
    };
    let teacher_email = row.get("Teacher Email").unwrap_or_default().to_lowercase();
    let Some(teacher) = storage.get_teacher_by_email(&teacher_email).await? else {
        return Ok(RowOutcome::Skipped(format!(
            "teacher {teacher_email} not found"
        )));
    };

    storage
        .create_timetable_entry(NewTimetableEntry {
            day: day.to_string(),
            start_time,
            end_time,
            subject_id: subject.id,
            teacher_id: teacher.id,
            class_name: row.get("Class").unwrap_or_default().to_string(),
            department: row.get("Department").unwrap_or_default().to_string(),
        })
        .await?;
    Ok(RowOutcome::Inserted(None))
}

#[cfg(test)]
mod tests {
    use super::super::workbook::{
        SUBJECTS_SHEET, STUDENTS_SHEET, TEACHERS_SHEET, TIMETABLE_SHEET, parse_workbook,
        tests::build_workbook,
    };
    use super::*;
    use crate::storage::sea_orm_storage::memory_storage;

    fn import_config() -> ImportConfig {
        ImportConfig {
            email_domain: "campusflow.in".into(),
            default_password: "Welcome123!".into(),
            max_rows: 100,
        }
    }

    #[tokio::test]
    async fn test_students_skip_duplicates_and_bad_years() {
        let storage = memory_storage().await;
        let data = build_workbook(&[
            (
                STUDENTS_SHEET,
                STUDENT_COLUMNS.as_slice(),
                &[
                    &["Asha Rao", "CS001", "CSE", "CSE-A", "2"],
                    &["Asha Rao", "CS002", "CSE", "CSE-A", "2"],
                    &["Vikram Das", "CS001", "CSE", "CSE-A", "2"],
                    &["Meera Iyer", "CS003", "CSE", "CSE-B", "two"],
                    &["Kiran Shah", "CS004", "CSE", "", "1"],
                ],
            ),
            (TEACHERS_SHEET, TEACHER_COLUMNS.as_slice(), &[]),
            (SUBJECTS_SHEET, SUBJECT_COLUMNS.as_slice(), &[]),
            (TIMETABLE_SHEET, TIMETABLE_COLUMNS.as_slice(), &[]),
        ]);
        let parsed = parse_workbook(&data, 100).unwrap();

        let summary = import_students(&storage, &import_config(), &parsed.students).await;
        assert_eq!(summary.total, 5);
        assert_eq!(summary.inserted, 1);
        assert_eq!(summary.skipped, 4);
        assert_eq!(summary.total, summary.inserted + summary.skipped);

        let credentials = summary.credentials.unwrap();
        assert_eq!(credentials.len(), 1);
        assert_eq!(credentials[0].email, "asha.rao@campusflow.in");
        assert_eq!(credentials[0].password, "Welcome123!");

        let student = storage
            .get_student_by_email("asha.rao@campusflow.in")
            .await
            .unwrap()
            .unwrap();
        let class = storage.get_class_by_name("CSE-A").await.unwrap().unwrap();
        assert_eq!(student.class_id, Some(class.id));
        assert_eq!(student.year, Some(2));
    }

    #[tokio::test]
    async fn test_skipped_row_does_not_reserve_email() {
        let storage = memory_storage().await;
        let data = build_workbook(&[
            (
                STUDENTS_SHEET,
                STUDENT_COLUMNS.as_slice(),
                &[
                    &["Vikram Das", "CS001", "CSE", "CSE-A", "1"],
                    &["Asha Rao", "CS001", "CSE", "CSE-A", "1"],
                    &["Asha Rao", "CS009", "CSE", "CSE-A", "1"],
                ],
            ),
            (
                TEACHERS_SHEET,
                TEACHER_COLUMNS.as_slice(),
                &[
                    &["Ravi Kumar", "CSE", "EMP01"],
                    &["Neha Sen", "CSE", "EMP01"],
                    &["Neha Sen", "CSE", "EMP02"],
                ],
            ),
            (
                SUBJECTS_SHEET,
                SUBJECT_COLUMNS.as_slice(),
                &[
                    &["Data Structures", "CS201"],
                    &["Algorithms", "CS201"],
                    &["Algorithms", "CS202"],
                ],
            ),
            (TIMETABLE_SHEET, TIMETABLE_COLUMNS.as_slice(), &[]),
        ]);
        let parsed = parse_workbook(&data, 100).unwrap();
        let config = import_config();

        let students = import_students(&storage, &config, &parsed.students).await;
        assert_eq!((students.inserted, students.skipped), (2, 1));
        assert_eq!(
            students.errors,
            vec!["Row 3: roll number CS001 already exists".to_string()]
        );
        let asha = storage
            .get_student_by_email("asha.rao@campusflow.in")
            .await
            .unwrap()
            .expect("later valid row inserted");
        assert_eq!(asha.roll_number, "CS009");

        let teachers = import_teachers(&storage, &config, &parsed.teachers).await;
        assert_eq!((teachers.inserted, teachers.skipped), (2, 1));
        let neha = storage
            .get_teacher_by_email("neha.sen@campusflow.in")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(neha.employee_id, "EMP02");

        let subjects = import_subjects(&storage, &parsed.subjects).await;
        assert_eq!((subjects.inserted, subjects.skipped), (2, 1));
        assert!(storage.get_subject_by_code("CS202").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_timetable_resolves_subject_and_teacher() {
        let storage = memory_storage().await;
        let data = build_workbook(&[
            (STUDENTS_SHEET, STUDENT_COLUMNS.as_slice(), &[]),
            (
                TEACHERS_SHEET,
                TEACHER_COLUMNS.as_slice(),
                &[&["Ravi Kumar", "CSE", "EMP01"], &["Ravi Kumar", "CSE", "EMP02"]],
            ),
            (
                SUBJECTS_SHEET,
                SUBJECT_COLUMNS.as_slice(),
                &[&["Data Structures", "CS201"], &["Algorithms", "CS201"]],
            ),
            (
                TIMETABLE_SHEET,
                TIMETABLE_COLUMNS.as_slice(),
                &[
                    &["mon", "9:00", "10:00", "CS201", "ravi.kumar@campusflow.in", "CSE-A", "CSE"],
                    &["Tuesday", "9:00", "10:00", "MA101", "ravi.kumar@campusflow.in", "CSE-A", "CSE"],
                    &["Funday", "9:00", "10:00", "CS201", "ravi.kumar@campusflow.in", "CSE-A", "CSE"],
                ],
            ),
        ]);
        let parsed = parse_workbook(&data, 100).unwrap();
        let config = import_config();

        let teachers = import_teachers(&storage, &config, &parsed.teachers).await;
        assert_eq!((teachers.inserted, teachers.skipped), (1, 1));

        let subjects = import_subjects(&storage, &parsed.subjects).await;
        assert_eq!((subjects.inserted, subjects.skipped), (1, 1));
        assert!(subjects.credentials.is_none());

        let timetable = import_timetable(&storage, &parsed.timetable).await;
        assert_eq!(timetable.total, 3);
        assert_eq!(timetable.inserted, 1);
        assert!(timetable.errors.iter().any(|e| e.contains("MA101")));

        let entries = storage.list_timetable(Default::default()).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entry.day, "Monday");
        assert_eq!(entries[0].entry.start_time, "09:00");
    }
}
