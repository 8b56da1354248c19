use std::env;
use std::fs;
use std::path::Path;

const PAGES: [(&str, &str); 4] = [
    ("login.html", "Login"),
    ("studentDashboard.html", "Student Dashboard"),
    ("teacherDashboard.html", "Teacher Dashboard"),
    ("adminDashboard.html", "Admin Dashboard"),
];

fn main() {
    println!("cargo:rerun-if-changed=frontend/dist");

    // 获取项目根目录
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let dist_path = Path::new(&manifest_dir).join("frontend/dist");

    fs::create_dir_all(&dist_path).expect("Failed to create dist directory");

    // 缺失的页面写入占位内容，保证 rust-embed 与登录页回退可用
    for (file, title) in PAGES {
        let page = dist_path.join(file);
        if !page.exists() {
            eprintln!("Warning: frontend/dist/{file} not found, writing placeholder");
            fs::write(&page, placeholder_page(title)).expect("Failed to write placeholder page");
        }
    }
}

fn placeholder_page(title: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>CampusFlow - {title}</title>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            max-width: 600px;
            margin: 100px auto;
            padding: 20px;
            text-align: center;
        }}
        .warning {{
            background: #fff3cd;
            border: 1px solid #ffeaa7;
            padding: 20px;
            border-radius: 8px;
        }}
    </style>
</head>
<body>
    <h1>CampusFlow</h1>
    <div class="warning">
        <h2>{title}</h2>
        <p>The frontend has not been built. Place the pages in <code>frontend/dist/</code>.</p>
    </div>
</body>
</html>"#
    )
}
