/// 业务错误码
///
/// HTTP 状态码表示结果类别，`code` 给出具体原因。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用 1xxx
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 认证 2xxx
    AuthFailed = 2000,
    InvalidCredentials = 2001,
    InvalidRole = 2002,
    UserAlreadyExists = 2100,
    UserNotFound = 2101,
    UserCreationFailed = 2102,

    // 班级与花名册 3xxx
    ClassNotFound = 3000,
    ClassAlreadyAssigned = 3001,
    TeacherNotFound = 3100,
    StudentNotFound = 3101,
    StudentClassMissing = 3102,
    DepartmentRequired = 3200,

    // 导入与文件 4xxx
    ImportFileParseFailed = 4000,
    ImportFileMissingSheet = 4001,
    ImportTooManyRows = 4003,
    FileUploadFailed = 4100,
    FileTypeNotAllowed = 4101,
    FileSizeExceeded = 4102,
    FileNotFound = 4103,

    // 任务 5xxx
    TaskNotFound = 5000,
    TaskTypeInvalid = 5001,
    TaskPermissionDenied = 5002,
    SubmissionNotFound = 5003,
    SubmissionInvalid = 5004,

    // 活动 6xxx
    EventNotFound = 6000,
    EventRegistrationClosed = 6001,
    EventAlreadyRegistered = 6002,
    RegistrationNotFound = 6003,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_grouped() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::Unauthorized as i32, 1001);
        assert_eq!(ErrorCode::InvalidCredentials as i32 / 1000, 2);
        assert_eq!(ErrorCode::EventAlreadyRegistered as i32 / 1000, 6);
    }
}
