//! # 콘텐츠 저장소 (Content Store)
//!
//! 현재 열린 문서의 `content`(편집 중인 내용)와
//! `last_persisted_content`(마지막으로 저장에 성공한 내용)를 보관합니다.
//!
//! ## 불변 조건
//! - `content`는 로컬 편집(`set_content`)과 `load`로만 바뀝니다.
//! - `last_persisted_content`는 저장 성공(`mark_persisted`)과 `load`로만 바뀝니다.
//! - 문서가 열린 뒤 외부 입력이 `content`를 덮어쓰지 않습니다. (저장 안 된 편집 보호)

use crate::error::SessionError;

/// 편집 중인 문서 한 개
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub title: String,
    content: String,
    last_persisted_content: String,
}

impl Document {
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn last_persisted_content(&self) -> &str {
        &self.last_persisted_content
    }

    /// 값 비교로 판단합니다. 편집 후 되돌리면(undo) 다시 깨끗한 상태가 됩니다.
    pub fn is_dirty(&self) -> bool {
        self.content != self.last_persisted_content
    }
}

#[derive(Debug, Default)]
pub struct ContentStore {
    document: Option<Document>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 문서를 로딩합니다. 두 필드 모두 저장된 내용으로 초기화됩니다.
    ///
    /// 이전에 열려 있던 문서는 버려집니다.
    pub fn load(&mut self, id: impl Into<String>, title: impl Into<String>, persisted: &str) {
        self.document = Some(Document {
            id: id.into(),
            title: title.into(),
            content: persisted.to_string(),
            last_persisted_content: persisted.to_string(),
        });
    }

    /// 문서를 닫고 마지막 상태를 돌려줍니다.
    pub fn unload(&mut self) -> Option<Document> {
        self.document.take()
    }

    /// 편집 내용을 반영합니다. 내용 형식은 검사하지 않습니다.
    pub fn set_content(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        let document = self.document.as_mut().ok_or(SessionError::NotOpen)?;
        document.content = text.into();
        Ok(())
    }

    /// 현재 내용 뒤에 텍스트를 덧붙입니다.
    pub fn append(&mut self, text: &str) -> Result<(), SessionError> {
        let document = self.document.as_mut().ok_or(SessionError::NotOpen)?;
        document.content.push_str(text);
        Ok(())
    }

    /// 저장 성공을 기록합니다.
    ///
    /// 다른 문서의 결과라면 아무것도 바꾸지 않고 `false`를 반환합니다.
    pub fn mark_persisted(&mut self, document_id: &str, text: impl Into<String>) -> bool {
        match self.document {
            Some(ref mut document) if document.id == document_id => {
                document.last_persisted_content = text.into();
                true
            }
            _ => false,
        }
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// 열린 문서가 없으면 빈 문자열
    pub fn content(&self) -> &str {
        self.document.as_ref().map(Document::content).unwrap_or("")
    }

    pub fn is_dirty(&self) -> bool {
        self.document.as_ref().is_some_and(Document::is_dirty)
    }
}
