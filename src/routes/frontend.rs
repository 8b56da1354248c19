//! 前端静态页面路由
//!
//! 使用 rust-embed 嵌入 `frontend/dist/` 中的页面与资源：
//! - 仪表盘路径映射到对应 HTML 页面
//! - 未知路径回退到登录页
//! - `frontend-custom/` 目录中的同名文件优先（开发用）

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use rust_embed::Embed;
use std::path::Path;

/// 嵌入前端静态资源
/// 编译时从 frontend/dist/ 目录读取文件
#[derive(Embed)]
#[folder = "frontend/dist/"]
struct FrontendAssets;

const LOGIN_PAGE: &str = "login.html";

/// 路由路径到页面文件的映射
fn page_for_route(path: &str) -> Option<&'static str> {
    match path.trim_matches('/') {
        "" | "login" => Some(LOGIN_PAGE),
        "studentDashboard" => Some("studentDashboard.html"),
        "teacherDashboard" => Some("teacherDashboard.html"),
        "adminDashboard" => Some("adminDashboard.html"),
        _ => None,
    }
}

/// 获取文件的 MIME 类型
fn get_mime_type(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("");

    match ext {
        "html" => "text/html; charset=utf-8",
        "js" | "mjs" => "application/javascript; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "json" => "application/json; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "webp" => "image/webp",
        "txt" => "text/plain; charset=utf-8",
        "map" => "application/json",
        _ => "application/octet-stream",
    }
}

/// 静态资源可长期缓存，HTML 页面不缓存
fn should_cache(path: &str) -> bool {
    let ext = Path::new(path)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("");

    matches!(
        ext,
        "js" | "css" | "woff" | "woff2" | "ttf" | "png" | "jpg" | "jpeg" | "gif" | "svg" | "webp"
    )
}

/// 尝试从自定义目录读取文件（开发用）
fn try_custom_file(path: &str) -> Option<Vec<u8>> {
    // 拒绝目录穿越
    if path.split('/').any(|segment| segment == "..") {
        return None;
    }
    std::fs::read(format!("./frontend-custom/{path}")).ok()
}

/// 获取文件内容（优先自定义目录，然后嵌入资源）
fn get_file(path: &str) -> Option<Vec<u8>> {
    try_custom_file(path).or_else(|| FrontendAssets::get(path).map(|f| f.data.to_vec()))
}

/// 解析请求对应的文件：页面映射、静态资源，最后回退到登录页
fn resolve(path: &str) -> Option<(Vec<u8>, String)> {
    if let Some(page) = page_for_route(path) {
        return get_file(page).map(|data| (data, page.to_string()));
    }
    if let Some(data) = get_file(path) {
        return Some((data, path.to_string()));
    }
    get_file(LOGIN_PAGE).map(|data| (data, LOGIN_PAGE.to_string()))
}

/// 前端资源请求处理
pub async fn serve_frontend(req: HttpRequest) -> ActixResult<HttpResponse> {
    let path = req.match_info().query("tail").trim_start_matches('/');

    match resolve(path) {
        Some((data, file_path)) => {
            let mut response = HttpResponse::Ok();
            response.content_type(get_mime_type(&file_path));

            if should_cache(&file_path) {
                response.insert_header(("Cache-Control", "public, max-age=31536000, immutable"));
            } else {
                response.insert_header(("Cache-Control", "no-cache, no-store, must-revalidate"));
            }

            Ok(response.body(data))
        }
        None => Ok(HttpResponse::NotFound()
            .content_type("text/html; charset=utf-8")
            .body(
                r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>CampusFlow</title>
</head>
<body>
    <h1>Frontend Not Found</h1>
    <p>The frontend pages have not been embedded.</p>
</body>
</html>"#,
            )),
    }
}

/// 配置前端路由
pub fn configure_frontend_routes(cfg: &mut web::ServiceConfig) {
    // 所有非 API 路由都交给前端处理
    cfg.route("/{tail:.*}", web::get().to(serve_frontend));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_mapping() {
        assert_eq!(page_for_route(""), Some("login.html"));
        assert_eq!(page_for_route("/login"), Some("login.html"));
        assert_eq!(page_for_route("adminDashboard"), Some("adminDashboard.html"));
        assert_eq!(page_for_route("studentDashboard/"), Some("studentDashboard.html"));
        assert_eq!(page_for_route("css/app.css"), None);
    }

    #[test]
    fn test_unknown_path_falls_back_to_login() {
        let (_, file) = resolve("no/such/page").expect("login page is always embedded");
        assert_eq!(file, "login.html");
    }

    #[test]
    fn test_get_mime_type() {
        assert_eq!(get_mime_type("login.html"), "text/html; charset=utf-8");
        assert_eq!(get_mime_type("app.js"), "application/javascript; charset=utf-8");
        assert_eq!(get_mime_type("unknown.xyz"), "application/octet-stream");
    }

    #[test]
    fn test_should_cache() {
        assert!(should_cache("app.js"));
        assert!(should_cache("logo.png"));
        assert!(!should_cache("adminDashboard.html"));
    }

    #[test]
    fn test_custom_dir_rejects_traversal() {
        assert!(try_custom_file("../Cargo.toml").is_none());
    }
}
