use serde::Deserialize;
use ts_rs::TS;

// 通用登录请求，按 role 选择账号表
//
// 字段全部可选，缺失由服务层统一返回 400。
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

// 固定角色的登录请求（/api/admin/login、/api/teachers/login）
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct RoleLoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

// 管理员注册请求
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct AdminSignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub password: Option<String>,
}

/// 去除首尾空白后非空的字段值
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
