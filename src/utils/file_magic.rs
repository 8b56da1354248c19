//! 上传文件的类型校验
//!
//! 任务附件只接受 pdf/doc/docx/zip/rar，批量导入只接受 xlsx；
//! 扩展名与文件头都要对得上。

const OLE_HEADER: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
const ZIP_HEADER: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// 验证文件头的魔术字节是否与扩展名（含点号，如 ".pdf"）匹配
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    if data.is_empty() {
        return false;
    }

    match extension.to_lowercase().as_str() {
        ".pdf" => data.starts_with(b"%PDF"),
        // 旧版 Office 复合文档
        ".doc" | ".xls" => data.starts_with(&OLE_HEADER),
        // OOXML 本质是 zip 包
        ".docx" | ".xlsx" | ".zip" => data.starts_with(&ZIP_HEADER),
        // RAR 4.x 与 5.x 共用前缀
        ".rar" => data.starts_with(b"Rar!\x1A\x07"),
        _ => false,
    }
}

/// 取出小写扩展名（含点号），并检查是否在允许列表中
///
/// 允许列表中的条目可以带或不带点号。
pub fn allowed_extension(filename: &str, allowed: &[String]) -> Option<String> {
    let ext = std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())?
        .to_lowercase();

    allowed
        .iter()
        .any(|a| a.trim_start_matches('.').eq_ignore_ascii_case(&ext))
        .then(|| format!(".{ext}"))
}

/// 按扩展名推断下载时的 Content-Type
pub fn content_type_for(extension: &str) -> &'static str {
    match extension.trim_start_matches('.').to_lowercase().as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "zip" => "application/zip",
        "rar" => "application/vnd.rar",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_magic() {
        let pdf_header = b"%PDF-1.7";
        assert!(validate_magic_bytes(pdf_header, ".pdf"));
        assert!(validate_magic_bytes(pdf_header, ".PDF"));
        assert!(!validate_magic_bytes(pdf_header, ".docx"));
    }

    #[test]
    fn test_office_magic() {
        let zip = [0x50, 0x4B, 0x03, 0x04, 0x14, 0x00];
        assert!(validate_magic_bytes(&zip, ".docx"));
        assert!(validate_magic_bytes(&zip, ".xlsx"));
        assert!(validate_magic_bytes(&zip, ".zip"));
        assert!(!validate_magic_bytes(&zip, ".doc"));
        assert!(validate_magic_bytes(&OLE_HEADER, ".doc"));
    }

    #[test]
    fn test_rar_magic() {
        assert!(validate_magic_bytes(b"Rar!\x1A\x07\x01\x00", ".rar"));
        assert!(!validate_magic_bytes(b"Rar?", ".rar"));
    }

    #[test]
    fn test_empty_or_unknown() {
        assert!(!validate_magic_bytes(&[], ".pdf"));
        assert!(!validate_magic_bytes(b"#!/bin/sh", ".sh"));
    }

    #[test]
    fn test_allowed_extension() {
        let allowed = vec!["pdf".to_string(), ".docx".to_string()];
        assert_eq!(allowed_extension("Report.PDF", &allowed).as_deref(), Some(".pdf"));
        assert_eq!(allowed_extension("notes.docx", &allowed).as_deref(), Some(".docx"));
        assert!(allowed_extension("script.exe", &allowed).is_none());
        assert!(allowed_extension("no_extension", &allowed).is_none());
    }

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for(".pdf"), "application/pdf");
        assert_eq!(content_type_for("bin"), "application/octet-stream");
    }
}
