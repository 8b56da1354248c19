//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod accounts;
mod classes;
mod events;
mod subjects;
mod tasks;

use crate::config::AppConfig;
use crate::errors::{CampusFlowError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

/// 数据库错误转换，唯一约束冲突单独归类
pub(crate) fn db_error(context: &str, e: DbErr) -> CampusFlowError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            CampusFlowError::conflict(format!("{context}: {detail}"))
        }
        _ => CampusFlowError::database_operation(format!("{context}: {e}")),
    }
}

impl SeaOrmStorage {
    /// 按全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(
            &config.database.url,
            config.database.pool_size,
            config.database.timeout,
        )
        .await
    }

    /// 连接数据库并执行迁移
    pub async fn connect(url: &str, pool_size: u32, timeout: u64) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, pool_size, timeout).await?
        } else {
            Self::connect_generic(&db_url, pool_size, timeout).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| CampusFlowError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url.contains(":memory:");

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| CampusFlowError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        // 内存库每个连接互相独立，只能使用单连接且不能回收
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            SqlitePoolOptions::new()
                .max_connections(pool_size)
                .min_connections(1)
                .idle_timeout(Duration::from_secs(300))
        };

        let pool = pool_options
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout))
            .connect_with(opt)
            .await
            .map_err(|e| CampusFlowError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(timeout))
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false);

        Database::connect(opt)
            .await
            .map_err(|e| CampusFlowError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(CampusFlowError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    classes::{
        entities::Class,
        requests::ClassListParams,
        responses::{ClassListResponse, DepartmentCounts},
    },
    events::{
        entities::{Event, Registration, RegistrationStatus},
        requests::{EventListParams, EventUpdate, NewEvent},
        responses::{EventListResponse, RegistrationView},
    },
    subjects::{
        entities::{Subject, TimetableEntry},
        requests::{NewSubject, NewTimetableEntry, TimetableQuery},
        responses::TimetableEntryView,
    },
    tasks::{
        entities::{Task, TaskSubmission},
        requests::{NewTask, SubmissionUpsert},
        responses::SubmissionView,
    },
    users::{
        entities::{Account, Admin, Student, Teacher, UserRole},
        requests::{NewAdmin, NewStudent, NewTeacher, StudentListParams, TeacherListParams},
        responses::{StudentListResponse, TeacherListResponse},
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 账号模块
    async fn get_account_by_email(&self, role: UserRole, email: &str) -> Result<Option<Account>> {
        self.get_account_by_email_impl(role, email).await
    }

    async fn get_account_by_id(&self, role: UserRole, id: i64) -> Result<Option<Account>> {
        self.get_account_by_id_impl(role, id).await
    }

    async fn create_admin(&self, admin: NewAdmin) -> Result<Admin> {
        self.create_admin_impl(admin).await
    }

    async fn get_admin_by_id(&self, id: i64) -> Result<Option<Admin>> {
        self.get_admin_by_id_impl(id).await
    }

    async fn get_admin_by_email(&self, email: &str) -> Result<Option<Admin>> {
        self.get_admin_by_email_impl(email).await
    }

    async fn count_admins(&self) -> Result<u64> {
        self.count_admins_impl().await
    }

    async fn update_admin_last_login(&self, id: i64) -> Result<bool> {
        self.update_admin_last_login_impl(id).await
    }

    async fn create_teacher(&self, teacher: NewTeacher) -> Result<Teacher> {
        self.create_teacher_impl(teacher).await
    }

    async fn get_teacher_by_id(&self, id: i64) -> Result<Option<Teacher>> {
        self.get_teacher_by_id_impl(id).await
    }

    async fn get_teacher_by_email(&self, email: &str) -> Result<Option<Teacher>> {
        self.get_teacher_by_email_impl(email).await
    }

    async fn get_teacher_by_employee_id(&self, employee_id: &str) -> Result<Option<Teacher>> {
        self.get_teacher_by_employee_id_impl(employee_id).await
    }

    async fn list_teachers_with_pagination(
        &self,
        query: TeacherListParams,
    ) -> Result<TeacherListResponse> {
        self.list_teachers_with_pagination_impl(query).await
    }

    async fn list_teachers_by_department(&self, department: &str) -> Result<Vec<Teacher>> {
        self.list_teachers_by_department_impl(department).await
    }

    async fn create_student(&self, student: NewStudent) -> Result<Student> {
        self.create_student_impl(student).await
    }

    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>> {
        self.get_student_by_id_impl(id).await
    }

    async fn get_student_by_email(&self, email: &str) -> Result<Option<Student>> {
        self.get_student_by_email_impl(email).await
    }

    async fn get_student_by_roll_number(&self, roll_number: &str) -> Result<Option<Student>> {
        self.get_student_by_roll_number_impl(roll_number).await
    }

    async fn list_students_with_pagination(
        &self,
        query: StudentListParams,
    ) -> Result<StudentListResponse> {
        self.list_students_with_pagination_impl(query).await
    }

    async fn list_students_by_class(&self, class_id: i64) -> Result<Vec<Student>> {
        self.list_students_by_class_impl(class_id).await
    }

    async fn list_students_by_department(&self, department: &str) -> Result<Vec<Student>> {
        self.list_students_by_department_impl(department).await
    }

    async fn list_student_departments(&self) -> Result<Vec<String>> {
        self.list_student_departments_impl().await
    }

    async fn set_students_class(&self, student_ids: &[i64], class_id: i64) -> Result<u64> {
        self.set_students_class_impl(student_ids, class_id).await
    }

    // 班级模块
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        self.get_class_by_id_impl(class_id).await
    }

    async fn get_class_by_name(&self, name: &str) -> Result<Option<Class>> {
        self.get_class_by_name_impl(name).await
    }

    async fn list_classes_by_ids(&self, class_ids: &[i64]) -> Result<Vec<Class>> {
        self.list_classes_by_ids_impl(class_ids).await
    }

    async fn list_classes_by_department(&self, department: &str) -> Result<Vec<Class>> {
        self.list_classes_by_department_impl(department).await
    }

    async fn find_or_create_class(&self, name: &str, department: &str) -> Result<(Class, bool)> {
        self.find_or_create_class_impl(name, department).await
    }

    async fn list_classes_with_pagination(
        &self,
        query: ClassListParams,
    ) -> Result<ClassListResponse> {
        self.list_classes_with_pagination_impl(query).await
    }

    async fn set_class_teacher(&self, class_id: i64, teacher_id: i64) -> Result<Option<Class>> {
        self.set_class_teacher_impl(class_id, teacher_id).await
    }

    async fn add_teacher_class(&self, teacher_id: i64, class_id: i64) -> Result<bool> {
        self.add_teacher_class_impl(teacher_id, class_id).await
    }

    async fn list_teacher_class_ids(&self, teacher_id: i64) -> Result<Vec<i64>> {
        self.list_teacher_class_ids_impl(teacher_id).await
    }

    async fn count_department(&self, department: &str) -> Result<DepartmentCounts> {
        self.count_department_impl(department).await
    }

    // 科目与课表模块
    async fn create_subject(&self, subject: NewSubject) -> Result<Subject> {
        self.create_subject_impl(subject).await
    }

    async fn get_subject_by_code(&self, code: &str) -> Result<Option<Subject>> {
        self.get_subject_by_code_impl(code).await
    }

    async fn get_subject_by_name(&self, name: &str) -> Result<Option<Subject>> {
        self.get_subject_by_name_impl(name).await
    }

    async fn list_subjects(&self) -> Result<Vec<Subject>> {
        self.list_subjects_impl().await
    }

    async fn create_timetable_entry(&self, entry: NewTimetableEntry) -> Result<TimetableEntry> {
        self.create_timetable_entry_impl(entry).await
    }

    async fn list_timetable(&self, query: TimetableQuery) -> Result<Vec<TimetableEntryView>> {
        self.list_timetable_impl(query).await
    }

    // 任务模块
    async fn create_task(&self, task: NewTask) -> Result<Task> {
        self.create_task_impl(task).await
    }

    async fn get_task_by_id(&self, task_id: i64) -> Result<Option<Task>> {
        self.get_task_by_id_impl(task_id).await
    }

    async fn list_tasks_by_teacher(&self, teacher_id: i64) -> Result<Vec<Task>> {
        self.list_tasks_by_teacher_impl(teacher_id).await
    }

    async fn list_tasks_by_class(&self, class_id: i64) -> Result<Vec<Task>> {
        self.list_tasks_by_class_impl(class_id).await
    }

    async fn delete_task(&self, task_id: i64) -> Result<bool> {
        self.delete_task_impl(task_id).await
    }

    async fn upsert_submission(
        &self,
        submission: SubmissionUpsert,
    ) -> Result<(TaskSubmission, Option<TaskSubmission>)> {
        self.upsert_submission_impl(submission).await
    }

    async fn get_submission(
        &self,
        task_id: i64,
        student_id: i64,
    ) -> Result<Option<TaskSubmission>> {
        self.get_submission_impl(task_id, student_id).await
    }

    async fn list_submissions_by_task(&self, task_id: i64) -> Result<Vec<SubmissionView>> {
        self.list_submissions_by_task_impl(task_id).await
    }

    async fn list_submissions_by_student(
        &self,
        student_id: i64,
        task_ids: &[i64],
    ) -> Result<Vec<TaskSubmission>> {
        self.list_submissions_by_student_impl(student_id, task_ids)
            .await
    }

    // 活动模块
    async fn create_event(&self, event: NewEvent) -> Result<Event> {
        self.create_event_impl(event).await
    }

    async fn get_event_by_id(&self, event_id: i64) -> Result<Option<Event>> {
        self.get_event_by_id_impl(event_id).await
    }

    async fn list_events_with_pagination(
        &self,
        query: EventListParams,
    ) -> Result<EventListResponse> {
        self.list_events_with_pagination_impl(query).await
    }

    async fn list_upcoming_events(
        &self,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<Vec<Event>> {
        self.list_upcoming_events_impl(now).await
    }

    async fn update_event(&self, event_id: i64, update: EventUpdate) -> Result<Option<Event>> {
        self.update_event_impl(event_id, update).await
    }

    async fn delete_event(&self, event_id: i64) -> Result<bool> {
        self.delete_event_impl(event_id).await
    }

    async fn get_registration(
        &self,
        event_id: i64,
        student_id: i64,
    ) -> Result<Option<Registration>> {
        self.get_registration_impl(event_id, student_id).await
    }

    async fn create_registration(&self, event_id: i64, student_id: i64) -> Result<Registration> {
        self.create_registration_impl(event_id, student_id).await
    }

    async fn set_registration_status(
        &self,
        registration_id: i64,
        status: RegistrationStatus,
    ) -> Result<Option<Registration>> {
        self.set_registration_status_impl(registration_id, status)
            .await
    }

    async fn list_registrations_by_event(&self, event_id: i64) -> Result<Vec<RegistrationView>> {
        self.list_registrations_by_event_impl(event_id).await
    }

    async fn list_registered_event_ids(&self, student_id: i64) -> Result<Vec<i64>> {
        self.list_registered_event_ids_impl(student_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("campusflow.db").unwrap(),
            "sqlite://campusflow.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url(":memory:").unwrap(),
            "sqlite::memory:"
        );
        assert!(SeaOrmStorage::build_database_url("postgres://u:p@localhost/cf").is_ok());
        assert!(SeaOrmStorage::build_database_url("mongodb://localhost").is_err());
    }
}

/// 测试辅助：内存 SQLite 存储
#[cfg(test)]
pub(crate) async fn memory_storage() -> SeaOrmStorage {
    SeaOrmStorage::connect("sqlite::memory:", 1, 5)
        .await
        .expect("in-memory storage")
}
