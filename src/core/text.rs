use crate::deck::{TextBody, ZERO_WIDTH_SPACE};

/// 依標題順序以資料列的值取代所有 `{{header}}`，`skip` 為真的欄位保留給圖片處理
pub fn replace_tokens(
    text: &mut TextBody,
    values: &[(String, String)],
    skip: impl Fn(&str) -> bool,
) -> usize {
    let mut replaced = 0;
    for (field, value) in values {
        if skip(field.as_str()) {
            continue;
        }
        let token = crate::domain::model::placeholder_token(field);
        replaced += text.replace_all(&token, value);
    }
    replaced
}

/// 移除所有 `token`，保留周圍文字的樣式。
///
/// 移除後若只剩空白，補一個零寬空白，避免文字框自動縮放塌陷。
/// 已經有零寬空白時不會再補，重複呼叫結果相同。
pub fn strip_token(text: &mut TextBody, token: &str) {
    text.replace_all(token, "");
    if text.is_blank() && !text.plain_text().contains(ZERO_WIDTH_SPACE) {
        text.append(&ZERO_WIDTH_SPACE.to_string());
    }
}
