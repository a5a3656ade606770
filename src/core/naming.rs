use chrono::{DateTime, Local};

pub const DATE_TOKEN: &str = "{{date}}";
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// 產生輸出檔名，`{{date}}` 以 `yyyy-MM-dd HH:mm` 取代
pub fn render_file_name(pattern: &str, now: DateTime<Local>) -> String {
    let date = now.format(DATE_FORMAT).to_string();
    let name = pattern.replace(DATE_TOKEN, &date);
    if name.trim().is_empty() {
        return format!("Generated slides {}", date);
    }
    name.trim().to_string()
}
