use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 用户角色（登录身份）
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum UserRole {
    Admin,   // 管理员
    Teacher, // 教师
    Student, // 学生
}

impl UserRole {
    pub const ADMIN: &'static str = "admin";
    pub const TEACHER: &'static str = "teacher";
    pub const STUDENT: &'static str = "student";

    pub fn admin_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin]
    }
    pub fn teacher_roles() -> &'static [&'static UserRole] {
        &[&Self::Teacher]
    }
    pub fn student_roles() -> &'static [&'static UserRole] {
        &[&Self::Student]
    }
    pub fn staff_roles() -> &'static [&'static UserRole] {
        &[&Self::Teacher, &Self::Admin]
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<UserRole>().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "{}", UserRole::ADMIN),
            UserRole::Teacher => write!(f, "{}", UserRole::TEACHER),
            UserRole::Student => write!(f, "{}", UserRole::STUDENT),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UserRole::ADMIN => Ok(UserRole::Admin),
            UserRole::TEACHER => Ok(UserRole::Teacher),
            UserRole::STUDENT => Ok(UserRole::Student),
            _ => Err(format!(
                "Invalid user role: '{s}'. Supported roles: admin, teacher, student"
            )),
        }
    }
}

/// 已认证的请求主体，由 RequireJWT 写入请求扩展
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct AuthUser {
    pub id: i64,
    pub role: UserRole,
    pub name: String,
    pub email: String,
    pub department: Option<String>,
}

// 管理员
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct Admin {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub department: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: String,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 教师
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct Teacher {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub password_hash: String,
    pub department: String,
    pub employee_id: String,
    pub specialization: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 学生
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub password_hash: String,
    pub roll_number: String,
    pub department: String,
    pub class_id: Option<i64>,
    pub year: Option<i32>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&Admin> for AuthUser {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.id,
            role: UserRole::Admin,
            name: admin.name.clone(),
            email: admin.email.clone(),
            department: Some(admin.department.clone()),
        }
    }
}

impl From<&Teacher> for AuthUser {
    fn from(teacher: &Teacher) -> Self {
        Self {
            id: teacher.id,
            role: UserRole::Teacher,
            name: teacher.name.clone(),
            email: teacher.email.clone(),
            department: Some(teacher.department.clone()),
        }
    }
}

impl From<&Student> for AuthUser {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id,
            role: UserRole::Student,
            name: student.name.clone(),
            email: student.email.clone(),
            department: Some(student.department.clone()),
        }
    }
}

/// 任一角色的账号记录
#[derive(Debug, Clone)]
pub enum Account {
    Admin(Admin),
    Teacher(Teacher),
    Student(Student),
}

impl Account {
    pub fn id(&self) -> i64 {
        match self {
            Account::Admin(a) => a.id,
            Account::Teacher(t) => t.id,
            Account::Student(s) => s.id,
        }
    }

    pub fn role(&self) -> UserRole {
        match self {
            Account::Admin(_) => UserRole::Admin,
            Account::Teacher(_) => UserRole::Teacher,
            Account::Student(_) => UserRole::Student,
        }
    }

    pub fn password_hash(&self) -> &str {
        match self {
            Account::Admin(a) => &a.password_hash,
            Account::Teacher(t) => &t.password_hash,
            Account::Student(s) => &s.password_hash,
        }
    }

    pub fn to_auth_user(&self) -> AuthUser {
        match self {
            Account::Admin(a) => a.into(),
            Account::Teacher(t) => t.into(),
            Account::Student(s) => s.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_and_display() {
        assert_eq!("student".parse::<UserRole>().unwrap(), UserRole::Student);
        assert_eq!(UserRole::Teacher.to_string(), "teacher");
        assert!("user".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_deserialize_rejects_unknown() {
        assert!(serde_json::from_str::<UserRole>(r#""admin""#).is_ok());
        assert!(serde_json::from_str::<UserRole>(r#""principal""#).is_err());
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let student = Student {
            id: 1,
            name: "Asha Rao".into(),
            email: "asha.rao@campusflow.in".into(),
            password_hash: "secret".into(),
            roll_number: "CS001".into(),
            department: "CSE".into(),
            class_id: None,
            year: Some(2),
            created_at: chrono::Utc::now(),
        };
        let json = serde_json::to_value(&student).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["rollNumber"], "CS001");
    }
}
