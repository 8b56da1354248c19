//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。
//! 存储层与基础设施返回 `Result<T>`，由服务层映射为 HTTP 响应。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_campusflow_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum CampusFlowError {
            $($variant(String),)*
        }

        impl CampusFlowError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(CampusFlowError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(CampusFlowError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(CampusFlowError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl CampusFlowError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        CampusFlowError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_campusflow_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    DatabaseConfig("E002", "Database Configuration Error"),
    DatabaseConnection("E003", "Database Connection Error"),
    DatabaseOperation("E004", "Database Operation Error"),
    FileOperation("E005", "File Operation Error"),
    Validation("E006", "Validation Error"),
    Serialization("E007", "Serialization Error"),
    DateParse("E008", "Date Parse Error"),
    Conflict("E009", "Resource Conflict"),
}

impl CampusFlowError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl CampusFlowError {
    /// 唯一约束冲突
    pub fn is_conflict(&self) -> bool {
        matches!(self, CampusFlowError::Conflict(_))
    }
}

impl fmt::Display for CampusFlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CampusFlowError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for CampusFlowError {
    fn from(err: sea_orm::DbErr) -> Self {
        CampusFlowError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for CampusFlowError {
    fn from(err: std::io::Error) -> Self {
        CampusFlowError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for CampusFlowError {
    fn from(err: serde_json::Error) -> Self {
        CampusFlowError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for CampusFlowError {
    fn from(err: chrono::ParseError) -> Self {
        CampusFlowError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CampusFlowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(CampusFlowError::cache_connection("test").code(), "E001");
        assert_eq!(CampusFlowError::database_config("test").code(), "E002");
        assert_eq!(CampusFlowError::validation("test").code(), "E006");
        assert_eq!(CampusFlowError::conflict("test").code(), "E009");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            CampusFlowError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(
            CampusFlowError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = CampusFlowError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_is_conflict() {
        assert!(CampusFlowError::conflict("dup").is_conflict());
        assert!(!CampusFlowError::database_operation("x").is_conflict());
    }

    #[test]
    fn test_date_parse_conversion() {
        let err: CampusFlowError = chrono::NaiveDate::parse_from_str("2025-13-40", "%Y-%m-%d")
            .unwrap_err()
            .into();
        assert_eq!(err.code(), "E008");
    }

    #[test]
    fn test_format_simple() {
        let err = CampusFlowError::validation("Invalid URL");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid URL"));
    }
}
