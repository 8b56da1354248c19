//! 路径参数的安全提取器
//!
//! 非法 ID 直接以统一响应结构返回 400，不进入处理函数。

use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::{Error, FromRequest, HttpRequest, HttpResponse};
use std::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn bad_path_param(message: String) -> Error {
    InternalError::from_response(
        message.clone(),
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message)),
    )
    .into()
}

/// 从路径中解析正整数 ID
fn parse_positive_id(req: &HttpRequest, name: &str) -> Result<i64, Error> {
    let raw = req
        .match_info()
        .get(name)
        .ok_or_else(|| bad_path_param(format!("Missing path parameter: {name}")))?;

    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(bad_path_param(format!("Invalid {name}: {raw}"))),
    }
}

macro_rules! define_safe_id_extractor {
    ($(#[$meta:meta])* $name:ident, $param:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                ready(parse_positive_id(req, $param).map($name))
            }
        }
    };
}

define_safe_id_extractor!(
    /// `{id}`
    SafeIDI64,
    "id"
);
define_safe_id_extractor!(SafeTaskIdI64, "task_id");
define_safe_id_extractor!(SafeClassIdI64, "class_id");

/// `{task_id}/{student_id}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafeSubmissionKey {
    pub task_id: i64,
    pub student_id: i64,
}

impl FromRequest for SafeSubmissionKey {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let key = parse_positive_id(req, "task_id").and_then(|task_id| {
            parse_positive_id(req, "student_id").map(|student_id| SafeSubmissionKey {
                task_id,
                student_id,
            })
        });
        ready(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[tokio::test]
    async fn test_valid_id() {
        let req = TestRequest::default().param("id", "42").to_http_request();
        let id = SafeIDI64::extract(&req).await.unwrap();
        assert_eq!(id, SafeIDI64(42));
    }

    #[tokio::test]
    async fn test_rejects_non_numeric_and_non_positive() {
        for raw in ["abc", "0", "-3", "1.5"] {
            let req = TestRequest::default().param("task_id", raw).to_http_request();
            assert!(SafeTaskIdI64::extract(&req).await.is_err(), "{raw}");
        }
    }

    #[tokio::test]
    async fn test_submission_key() {
        let req = TestRequest::default()
            .param("task_id", "7")
            .param("student_id", "9")
            .to_http_request();
        let key = SafeSubmissionKey::extract(&req).await.unwrap();
        assert_eq!((key.task_id, key.student_id), (7, 9));

        let missing = TestRequest::default().param("task_id", "7").to_http_request();
        assert!(SafeSubmissionKey::extract(&missing).await.is_err());
    }
}
