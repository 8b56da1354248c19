//! CampusFlow - 校园管理平台后端服务
//!
//! 基于 Actix Web 构建，面向管理员、教师与学生三类角色，
//! 提供班级分配、任务提交、活动报名、课表查询与 Excel 批量导入。
//!
//! 请求自上而下经过 `routes` -> `middlewares`（JWT、角色、限流）-> `services`
//! -> `storage`，响应统一包装为 `models::ApiResponse`。
//!
//! - `storage` 以 `Storage` trait 隔离 SeaORM，测试使用内存 SQLite
//! - `cache` 保存按令牌解析出的登录主体
//! - `runtime` 负责启动（迁移、默认管理员、缓存）与停机

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
