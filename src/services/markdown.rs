//! # 마크다운 텍스트 통계 서비스
//!
//! 에디터 상태 표시줄에 보여줄 텍스트 통계 유틸리티 함수들을 제공합니다.
//! 마크다운 문법은 해석하지 않습니다: 이 계층에서 내용은 불투명한 텍스트입니다.
//!
//! 이 모듈의 함수들:
//! - `count_words()`: 텍스트의 단어 수 계산
//! - `count_chars()`: 텍스트의 문자 수 계산
//! - `excerpt()`: 미리보기용 앞부분 추출

/// 텍스트의 단어 수를 계산합니다.
///
/// 공백(스페이스, 탭, 줄바꿈)으로 분리하여 단어를 셉니다.
/// `#`, `-` 같은 마크다운 기호도 공백으로 떨어져 있으면 한 단어로 셉니다.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// 텍스트의 문자 수를 계산합니다.
///
/// 유니코드 문자 단위로 셉니다 (한글 1자 = 1문자).
/// `.len()`은 바이트 수를 반환하므로 한글 등에는 부적합합니다.
pub fn count_chars(text: &str) -> usize {
    text.chars().count()
}

/// 텍스트의 앞부분 `max_chars`자를 잘라 미리보기로 반환합니다.
///
/// 문자(char) 경계에서 자르므로 멀티바이트 문자에서도 패닉하지 않습니다.
pub fn excerpt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
