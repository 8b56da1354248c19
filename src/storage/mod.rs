use std::sync::Arc;

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 账号方法
    // 按角色和邮箱查找账号
    async fn get_account_by_email(&self, role: UserRole, email: &str) -> Result<Option<Account>>;
    // 按角色和 ID 查找账号
    async fn get_account_by_id(&self, role: UserRole, id: i64) -> Result<Option<Account>>;

    // 管理员
    async fn create_admin(&self, admin: NewAdmin) -> Result<Admin>;
    async fn get_admin_by_id(&self, id: i64) -> Result<Option<Admin>>;
    async fn get_admin_by_email(&self, email: &str) -> Result<Option<Admin>>;
    async fn count_admins(&self) -> Result<u64>;
    async fn update_admin_last_login(&self, id: i64) -> Result<bool>;

    // 教师
    async fn create_teacher(&self, teacher: NewTeacher) -> Result<Teacher>;
    async fn get_teacher_by_id(&self, id: i64) -> Result<Option<Teacher>>;
    async fn get_teacher_by_email(&self, email: &str) -> Result<Option<Teacher>>;
    async fn get_teacher_by_employee_id(&self, employee_id: &str) -> Result<Option<Teacher>>;
    async fn list_teachers_with_pagination(
        &self,
        query: TeacherListParams,
    ) -> Result<TeacherListResponse>;
    async fn list_teachers_by_department(&self, department: &str) -> Result<Vec<Teacher>>;

    // 学生
    async fn create_student(&self, student: NewStudent) -> Result<Student>;
    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>>;
    async fn get_student_by_email(&self, email: &str) -> Result<Option<Student>>;
    async fn get_student_by_roll_number(&self, roll_number: &str) -> Result<Option<Student>>;
    async fn list_students_with_pagination(
        &self,
        query: StudentListParams,
    ) -> Result<StudentListResponse>;
    // 按 ID 升序
    async fn list_students_by_class(&self, class_id: i64) -> Result<Vec<Student>>;
    // 按 ID 升序
    async fn list_students_by_department(&self, department: &str) -> Result<Vec<Student>>;
    // 去重并排序的学生院系
    async fn list_student_departments(&self) -> Result<Vec<String>>;
    // 批量设置学生班级，返回受影响行数
    async fn set_students_class(&self, student_ids: &[i64], class_id: i64) -> Result<u64>;

    /// 班级方法
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    async fn get_class_by_name(&self, name: &str) -> Result<Option<Class>>;
    async fn list_classes_by_ids(&self, class_ids: &[i64]) -> Result<Vec<Class>>;
    async fn list_classes_by_department(&self, department: &str) -> Result<Vec<Class>>;
    // 按名称查找班级，不存在则创建；返回 (班级, 是否新建)
    async fn find_or_create_class(&self, name: &str, department: &str) -> Result<(Class, bool)>;
    async fn list_classes_with_pagination(
        &self,
        query: ClassListParams,
    ) -> Result<ClassListResponse>;
    // 设置班级负责教师
    async fn set_class_teacher(&self, class_id: i64, teacher_id: i64) -> Result<Option<Class>>;
    // 添加教师-班级关联，已存在时返回 false
    async fn add_teacher_class(&self, teacher_id: i64, class_id: i64) -> Result<bool>;
    async fn list_teacher_class_ids(&self, teacher_id: i64) -> Result<Vec<i64>>;
    async fn count_department(&self, department: &str) -> Result<DepartmentCounts>;

    /// 科目与课表方法
    async fn create_subject(&self, subject: NewSubject) -> Result<Subject>;
    async fn get_subject_by_code(&self, code: &str) -> Result<Option<Subject>>;
    async fn get_subject_by_name(&self, name: &str) -> Result<Option<Subject>>;
    async fn list_subjects(&self) -> Result<Vec<Subject>>;
    async fn create_timetable_entry(&self, entry: NewTimetableEntry) -> Result<TimetableEntry>;
    async fn list_timetable(&self, query: TimetableQuery) -> Result<Vec<TimetableEntryView>>;

    /// 任务方法
    async fn create_task(&self, task: NewTask) -> Result<Task>;
    async fn get_task_by_id(&self, task_id: i64) -> Result<Option<Task>>;
    // 按创建时间倒序
    async fn list_tasks_by_teacher(&self, teacher_id: i64) -> Result<Vec<Task>>;
    // 按截止时间升序
    async fn list_tasks_by_class(&self, class_id: i64) -> Result<Vec<Task>>;
    // 删除任务及其提交
    async fn delete_task(&self, task_id: i64) -> Result<bool>;

    /// 提交方法
    // 写入或覆盖提交，返回 (新记录, 旧记录)
    async fn upsert_submission(
        &self,
        submission: SubmissionUpsert,
    ) -> Result<(TaskSubmission, Option<TaskSubmission>)>;
    async fn get_submission(&self, task_id: i64, student_id: i64)
    -> Result<Option<TaskSubmission>>;
    async fn list_submissions_by_task(&self, task_id: i64) -> Result<Vec<SubmissionView>>;
    async fn list_submissions_by_student(
        &self,
        student_id: i64,
        task_ids: &[i64],
    ) -> Result<Vec<TaskSubmission>>;

    /// 活动方法
    async fn create_event(&self, event: NewEvent) -> Result<Event>;
    async fn get_event_by_id(&self, event_id: i64) -> Result<Option<Event>>;
    async fn list_events_with_pagination(&self, query: EventListParams)
    -> Result<EventListResponse>;
    // 截止时间晚于 now 且状态为 upcoming，按截止时间升序
    async fn list_upcoming_events(&self, now: chrono::DateTime<chrono::Utc>) -> Result<Vec<Event>>;
    async fn update_event(&self, event_id: i64, update: EventUpdate) -> Result<Option<Event>>;
    // 删除活动及其报名
    async fn delete_event(&self, event_id: i64) -> Result<bool>;

    /// 报名方法
    async fn get_registration(&self, event_id: i64, student_id: i64)
    -> Result<Option<Registration>>;
    async fn create_registration(&self, event_id: i64, student_id: i64) -> Result<Registration>;
    async fn set_registration_status(
        &self,
        registration_id: i64,
        status: RegistrationStatus,
    ) -> Result<Option<Registration>>;
    // 按报名时间倒序
    async fn list_registrations_by_event(&self, event_id: i64) -> Result<Vec<RegistrationView>>;
    // 学生当前有效报名的活动 ID
    async fn list_registered_event_ids(&self, student_id: i64) -> Result<Vec<i64>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
