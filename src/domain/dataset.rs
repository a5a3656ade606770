use crate::utils::error::{DeckError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

pub const DEFAULT_SELECTION_COLUMN: &str = "selected";

/// 已篩選過的資料集：標題不含勾選欄，列順序與原表相同
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    pub total_rows: usize,
    pub selected_rows: usize,
}

impl Dataset {
    /// 直接以已篩選的列建立資料集（每列長度必須等於標題數）
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        check_headers(&headers)?;
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != headers.len())
        {
            return Err(DeckError::data(format!(
                "Row {} has {} cells but there are {} headers",
                i + 1,
                row.len(),
                headers.len()
            )));
        }

        let count = rows.len();
        Ok(Self {
            headers,
            rows,
            total_rows: count,
            selected_rows: count,
        })
    }

    /// 從整張工作表的值建立資料集。
    ///
    /// 第 1 列為標題；勾選欄以標題名稱辨識並移除；標題空白的欄位略過。
    /// `start_row` 是 1-based 的資料起始列。
    pub fn from_sheet(values: Vec<Vec<Value>>, start_row: usize, selection_column: &str) -> Result<Self> {
        let mut sheet_rows = values.into_iter();
        let header_row = sheet_rows
            .next()
            .ok_or_else(|| DeckError::data("Sheet is empty, no header row found"))?;

        let header_texts: Vec<String> = header_row.iter().map(|v| cell_text(v).trim().to_string()).collect();
        let marker_col = header_texts
            .iter()
            .position(|h| h.eq_ignore_ascii_case(selection_column))
            .ok_or_else(|| {
                DeckError::data(format!(
                    "Selection column '{}' not found in header row",
                    selection_column
                ))
            })?;

        // (原始欄位位置, 標題)
        let columns: Vec<(usize, String)> = header_texts
            .into_iter()
            .enumerate()
            .filter(|(i, h)| *i != marker_col && !h.is_empty())
            .collect();
        let headers: Vec<String> = columns.iter().map(|(_, h)| h.clone()).collect();
        check_headers(&headers)?;

        let mut total_rows = 0;
        let mut rows = Vec::new();
        for row in sheet_rows.skip(start_row.saturating_sub(2)) {
            total_rows += 1;
            if !is_selected(row.get(marker_col)) {
                continue;
            }
            let cells = columns
                .iter()
                .map(|(col, _)| row.get(*col).cloned().unwrap_or(Value::Null))
                .collect();
            rows.push(cells);
        }

        tracing::debug!(
            "📋 Sheet parsed: {} headers, {} of {} rows selected",
            headers.len(),
            rows.len(),
            total_rows
        );

        Ok(Self {
            selected_rows: rows.len(),
            headers,
            rows,
            total_rows,
        })
    }

    /// 欄位名稱與文字值，依標題順序排列
    pub fn row_values(&self, row: &[Value]) -> Vec<(String, String)> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), row.get(i).map(cell_text).unwrap_or_default()))
            .collect()
    }
}

/// 在 `row_values` 的結果中查詢欄位，找不到時為空字串
pub fn field_value<'a>(values: &'a [(String, String)], field: &str) -> &'a str {
    values
        .iter()
        .find(|(header, _)| header == field)
        .map(|(_, value)| value.as_str())
        .unwrap_or_default()
}

fn check_headers(headers: &[String]) -> Result<()> {
    if headers.is_empty() {
        return Err(DeckError::data("No usable headers found"));
    }
    let mut seen = HashSet::new();
    for header in headers {
        if header.trim().is_empty() {
            return Err(DeckError::data("Header names cannot be blank"));
        }
        if !seen.insert(header.as_str()) {
            return Err(DeckError::data(format!("Duplicate header '{}'", header)));
        }
    }
    Ok(())
}

fn is_selected(marker: Option<&Value>) -> bool {
    match marker {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => matches!(
            s.trim().to_lowercase().as_str(),
            "true" | "1" | "yes" | "x" | "✓"
        ),
        _ => false,
    }
}

pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn is_empty_row(row: &[Value]) -> bool {
    row.iter().all(|cell| cell_text(cell).trim().is_empty())
}
