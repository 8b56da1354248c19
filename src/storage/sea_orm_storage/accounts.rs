use super::{SeaOrmStorage, db_error};
use crate::entity::{admins, students, teachers};
use crate::errors::Result;
use crate::models::{
    PaginatedResponse, PaginationInfo,
    users::{
        entities::{Account, Admin, Student, Teacher, UserRole},
        requests::{NewAdmin, NewStudent, NewTeacher, StudentListParams, TeacherListParams},
        responses::{StudentListResponse, TeacherListResponse},
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 按角色和邮箱查找账号
    pub async fn get_account_by_email_impl(
        &self,
        role: UserRole,
        email: &str,
    ) -> Result<Option<Account>> {
        Ok(match role {
            UserRole::Admin => self.get_admin_by_email_impl(email).await?.map(Account::Admin),
            UserRole::Teacher => self
                .get_teacher_by_email_impl(email)
                .await?
                .map(Account::Teacher),
            UserRole::Student => self
                .get_student_by_email_impl(email)
                .await?
                .map(Account::Student),
        })
    }

    /// 按角色和 ID 查找账号
    pub async fn get_account_by_id_impl(&self, role: UserRole, id: i64) -> Result<Option<Account>> {
        Ok(match role {
            UserRole::Admin => self.get_admin_by_id_impl(id).await?.map(Account::Admin),
            UserRole::Teacher => self.get_teacher_by_id_impl(id).await?.map(Account::Teacher),
            UserRole::Student => self.get_student_by_id_impl(id).await?.map(Account::Student),
        })
    }

    // ---------- 管理员 ----------

    pub async fn create_admin_impl(&self, req: NewAdmin) -> Result<Admin> {
        let model = admins::ActiveModel {
            name: Set(req.name),
            email: Set(req.email),
            department: Set(req.department),
            password_hash: Set(req.password_hash),
            last_login: Set(None),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| db_error("创建管理员失败", e))?;

        Ok(result.into_admin())
    }

    pub async fn get_admin_by_id_impl(&self, id: i64) -> Result<Option<Admin>> {
        let result = admins::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| db_error("查询管理员失败", e))?;

        Ok(result.map(|m| m.into_admin()))
    }

    pub async fn get_admin_by_email_impl(&self, email: &str) -> Result<Option<Admin>> {
        let result = admins::Entity::find()
            .filter(admins::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| db_error("查询管理员失败", e))?;

        Ok(result.map(|m| m.into_admin()))
    }

    pub async fn count_admins_impl(&self) -> Result<u64> {
        admins::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| db_error("统计管理员数量失败", e))
    }

    /// 更新管理员最后登录时间
    pub async fn update_admin_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = admins::Entity::update_many()
            .col_expr(admins::Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(admins::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| db_error("更新最后登录时间失败", e))?;

        Ok(result.rows_affected > 0)
    }

    // ---------- 教师 ----------

    pub async fn create_teacher_impl(&self, req: NewTeacher) -> Result<Teacher> {
        let specialization = serde_json::to_string(&req.specialization)?;

        let model = teachers::ActiveModel {
            name: Set(req.name),
            email: Set(req.email),
            password_hash: Set(req.password_hash),
            department: Set(req.department),
            employee_id: Set(req.employee_id),
            specialization: Set(Some(specialization)),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| db_error("创建教师失败", e))?;

        Ok(result.into_teacher())
    }

    pub async fn get_teacher_by_id_impl(&self, id: i64) -> Result<Option<Teacher>> {
        let result = teachers::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| db_error("查询教师失败", e))?;

        Ok(result.map(|m| m.into_teacher()))
    }

    pub async fn get_teacher_by_email_impl(&self, email: &str) -> Result<Option<Teacher>> {
        let result = teachers::Entity::find()
            .filter(teachers::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| db_error("查询教师失败", e))?;

        Ok(result.map(|m| m.into_teacher()))
    }

    pub async fn get_teacher_by_employee_id_impl(
        &self,
        employee_id: &str,
    ) -> Result<Option<Teacher>> {
        let result = teachers::Entity::find()
            .filter(teachers::Column::EmployeeId.eq(employee_id))
            .one(&self.db)
            .await
            .map_err(|e| db_error("查询教师失败", e))?;

        Ok(result.map(|m| m.into_teacher()))
    }

    /// 分页列出教师
    pub async fn list_teachers_with_pagination_impl(
        &self,
        query: TeacherListParams,
    ) -> Result<TeacherListResponse> {
        let (page, size) = query.pagination.normalized();

        let mut select = teachers::Entity::find();

        if let Some(ref department) = query.department {
            select = select.filter(teachers::Column::Department.eq(department.as_str()));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(teachers::Column::Name.contains(&escaped))
                    .add(teachers::Column::Email.contains(&escaped))
                    .add(teachers::Column::EmployeeId.contains(&escaped)),
            );
        }

        let paginator = select
            .order_by_asc(teachers::Column::Name)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| db_error("查询教师总数失败", e))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| db_error("查询教师列表失败", e))?;

        Ok(PaginatedResponse {
            items: items.into_iter().map(|m| m.into_teacher()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn list_teachers_by_department_impl(&self, department: &str) -> Result<Vec<Teacher>> {
        let result = teachers::Entity::find()
            .filter(teachers::Column::Department.eq(department))
            .order_by_asc(teachers::Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| db_error("查询院系教师失败", e))?;

        Ok(result.into_iter().map(|m| m.into_teacher()).collect())
    }

    // ---------- 学生 ----------

    pub async fn create_student_impl(&self, req: NewStudent) -> Result<Student> {
        let model = students::ActiveModel {
            name: Set(req.name),
            email: Set(req.email),
            password_hash: Set(req.password_hash),
            roll_number: Set(req.roll_number),
            department: Set(req.department),
            class_id: Set(req.class_id),
            year: Set(req.year),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| db_error("创建学生失败", e))?;

        Ok(result.into_student())
    }

    pub async fn get_student_by_id_impl(&self, id: i64) -> Result<Option<Student>> {
        let result = students::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| db_error("查询学生失败", e))?;

        Ok(result.map(|m| m.into_student()))
    }

    pub async fn get_student_by_email_impl(&self, email: &str) -> Result<Option<Student>> {
        let result = students::Entity::find()
            .filter(students::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| db_error("查询学生失败", e))?;

        Ok(result.map(|m| m.into_student()))
    }

    pub async fn get_student_by_roll_number_impl(
        &self,
        roll_number: &str,
    ) -> Result<Option<Student>> {
        let result = students::Entity::find()
            .filter(students::Column::RollNumber.eq(roll_number))
            .one(&self.db)
            .await
            .map_err(|e| db_error("查询学生失败", e))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 分页列出学生
    pub async fn list_students_with_pagination_impl(
        &self,
        query: StudentListParams,
    ) -> Result<StudentListResponse> {
        let (page, size) = query.pagination.normalized();

        let mut select = students::Entity::find();

        if let Some(ref department) = query.department {
            select = select.filter(students::Column::Department.eq(department.as_str()));
        }

        if let Some(class_id) = query.class_id {
            select = select.filter(students::Column::ClassId.eq(class_id));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(students::Column::Name.contains(&escaped))
                    .add(students::Column::Email.contains(&escaped))
                    .add(students::Column::RollNumber.contains(&escaped)),
            );
        }

        let paginator = select
            .order_by_asc(students::Column::RollNumber)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| db_error("查询学生总数失败", e))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| db_error("查询学生列表失败", e))?;

        Ok(PaginatedResponse {
            items: items.into_iter().map(|m| m.into_student()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn list_students_by_class_impl(&self, class_id: i64) -> Result<Vec<Student>> {
        let result = students::Entity::find()
            .filter(students::Column::ClassId.eq(class_id))
            .order_by_asc(students::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| db_error("查询班级学生失败", e))?;

        Ok(result.into_iter().map(|m| m.into_student()).collect())
    }

    pub async fn list_students_by_department_impl(&self, department: &str) -> Result<Vec<Student>> {
        let result = students::Entity::find()
            .filter(students::Column::Department.eq(department))
            .order_by_asc(students::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| db_error("查询院系学生失败", e))?;

        Ok(result.into_iter().map(|m| m.into_student()).collect())
    }

    /// 学生院系（去重、升序）
    pub async fn list_student_departments_impl(&self) -> Result<Vec<String>> {
        students::Entity::find()
            .select_only()
            .column(students::Column::Department)
            .distinct()
            .order_by_asc(students::Column::Department)
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(|e| db_error("查询院系列表失败", e))
    }

    pub async fn set_students_class_impl(&self, student_ids: &[i64], class_id: i64) -> Result<u64> {
        if student_ids.is_empty() {
            return Ok(0);
        }

        let result = students::Entity::update_many()
            .col_expr(
                students::Column::ClassId,
                sea_orm::sea_query::Expr::value(class_id),
            )
            .filter(students::Column::Id.is_in(student_ids.iter().copied()))
            .exec(&self.db)
            .await
            .map_err(|e| db_error("更新学生班级失败", e))?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::super::memory_storage;
    use super::*;

    fn new_student(name: &str, roll: &str, department: &str) -> NewStudent {
        NewStudent {
            name: name.into(),
            email: format!("{}@campusflow.in", roll.to_lowercase()),
            password_hash: "hash".into(),
            roll_number: roll.into(),
            department: department.into(),
            class_id: None,
            year: Some(1),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let storage = memory_storage().await;
        let admin = NewAdmin {
            name: "Root".into(),
            email: "root@campusflow.in".into(),
            department: "Administration".into(),
            password_hash: "hash".into(),
        };
        storage.create_admin_impl(admin.clone()).await.unwrap();
        let err = storage.create_admin_impl(admin).await.unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(storage.count_admins_impl().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_departments_are_distinct_and_sorted() {
        let storage = memory_storage().await;
        for (name, roll, dept) in [
            ("A", "ME1", "ME"),
            ("B", "CS1", "CSE"),
            ("C", "CS2", "CSE"),
        ] {
            storage
                .create_student_impl(new_student(name, roll, dept))
                .await
                .unwrap();
        }
        assert_eq!(
            storage.list_student_departments_impl().await.unwrap(),
            vec!["CSE".to_string(), "ME".to_string()]
        );
    }

    #[tokio::test]
    async fn test_account_lookup_by_role() {
        let storage = memory_storage().await;
        let student = storage
            .create_student_impl(new_student("Asha", "CS9", "CSE"))
            .await
            .unwrap();

        let found = storage
            .get_account_by_email_impl(UserRole::Student, &student.email)
            .await
            .unwrap();
        assert!(matches!(found, Some(Account::Student(ref s)) if s.id == student.id));

        let wrong_role = storage
            .get_account_by_email_impl(UserRole::Teacher, &student.email)
            .await
            .unwrap();
        assert!(wrong_role.is_none());
    }
}
