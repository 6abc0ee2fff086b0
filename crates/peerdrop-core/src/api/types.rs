//! peer API 消息格式
//!
//! peer 的错误响应有两种形态：`{"success": false, "error": "..."}`，
//! 或者 Flask 风格的 `{"error": "..."}` 加 4xx/5xx 状态码（不带
//! `success` 字段）。所有响应类型对缺失字段都宽容处理，缺失的
//! `success` 按 false 解析。

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `/api/share` 响应
#[derive(Debug, Clone, Deserialize)]
pub struct ShareResponse {
    #[serde(default)]
    pub success: bool,
    /// 服务端分配的文件 ID，可能是数字也可能是字符串，原样保留
    #[serde(default)]
    pub file_id: Option<Value>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ShareResponse {
    /// 用于显示的文件 ID 文本（数字和字符串都按原样显示）
    pub fn file_id_text(&self) -> String {
        match &self.file_id {
            Some(Value::String(s)) => s.clone(),
            Some(v) => v.to_string(),
            None => String::new(),
        }
    }

    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or("unknown error")
    }
}

/// `/api/download` 请求体
#[derive(Debug, Clone, Serialize)]
pub struct DownloadRequest {
    /// 解析后的文件 ID；非数字输入序列化为 `null`，见 [`parse_file_id`]
    pub file_id: Value,
    pub output_path: String,
}

impl DownloadRequest {
    pub fn new(raw_file_id: &str, output_path: &str) -> Self {
        Self {
            file_id: parse_file_id(raw_file_id),
            output_path: output_path.to_string(),
        }
    }
}

/// `/api/download` 响应
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    /// peer 成功时附带的提示文本（"Download started"），仅供日志
    #[serde(default)]
    pub message: Option<String>,
}

impl DownloadResponse {
    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or("unknown error")
    }
}

/// 按 `parseInt` 前缀语义解析用户输入的文件 ID。
///
/// 取可选符号后最长的十进制数字前缀；没有数字前缀时返回
/// `Value::Null`——这正是旧版页面 `JSON.stringify({file_id: NaN})`
/// 放到线上的值，非数字输入不在客户端拒绝。
pub fn parse_file_id(raw: &str) -> Value {
    let s = raw.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let prefix = &digits[..end];
    if prefix.is_empty() {
        return Value::Null;
    }

    match prefix.parse::<i64>() {
        Ok(n) => Value::from(if negative { -n } else { n }),
        // 超出 i64 范围的输入同样落到 null
        Err(_) => Value::Null,
    }
}
