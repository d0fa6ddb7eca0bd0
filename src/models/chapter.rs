use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 챕터에 첨부된 학습 자료 파일
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub filename: String,
    pub file_type: String,
    pub file_url: String,
    pub file_public_url: String,
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// Gradly API의 챕터 엔티티
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub subject_id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub materials: Vec<Material>,
    /// None = 아직 내용이 없는 챕터 (빈 문자열로 취급)
    #[serde(default)]
    pub markdown_content: Option<String>,
    #[serde(default)]
    pub current_progress: f64,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub completion_date: Option<DateTime<Utc>>,
}

impl Chapter {
    /// 에디터에 로딩할 마크다운 내용
    pub fn content(&self) -> &str {
        self.markdown_content.as_deref().unwrap_or("")
    }
}

/// Gradly API 응답 공통 형식: `{ "status": "success", "message": "...", "data": ... }`
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}
