//! Common Types Module
//!
//! 애플리케이션 전반에서 사용되는 공통 타입 및 입력 파싱 헬퍼

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{LibraryError, LibraryResult};

/// 날짜 입출력 포맷 (고정)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 메시지 응답 (`{"message": ...}`)
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            id: None,
        }
    }

    pub fn created(message: impl Into<String>, id: i64) -> Self {
        Self {
            message: message.into(),
            id: Some(id),
        }
    }
}

/// 부분 업데이트용 필드
///
/// JSON에서 세 가지 상태를 구분:
/// - 키 없음 → `Patch::Absent` (변경 안 함)
/// - `null` → `Patch::Null` (값 제거)
/// - 값 → `Patch::Value`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        }
    }
}

/// `#[serde(default)]`와 함께 사용 → 키가 있으면 Null/Value, 없으면 Absent
impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}

/// `YYYY-MM-DD` 문자열을 달력 날짜로 파싱
pub fn parse_date(value: &str) -> LibraryResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| LibraryError::invalid("Invalid date format, expected YYYY-MM-DD"))
}

/// 옵션 날짜 파싱 (None은 그대로 통과)
pub fn parse_optional_date(value: Option<&str>) -> LibraryResult<Option<NaiveDate>> {
    value.map(parse_date).transpose()
}

/// 필수 텍스트 필드 검증 (공백만 있는 값도 거부)
pub fn require_text(field: &str, value: Option<String>) -> LibraryResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(LibraryError::invalid(format!("{} is required", field))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct PatchHolder {
        #[serde(default)]
        field: Patch<String>,
    }

    #[test]
    fn test_parse_date_valid() {
        let date = parse_date("2023-01-15").unwrap();
        assert_eq!(date.format(DATE_FORMAT).to_string(), "2023-01-15");
    }

    #[test]
    fn test_parse_date_invalid() {
        assert!(matches!(parse_date("2023-13-40"), Err(LibraryError::InvalidInput(_))));
        assert!(parse_date("15/01/2023").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("title", Some(" Dune ".into())).unwrap(), "Dune");
        assert!(require_text("title", Some("   ".into())).is_err());
        assert!(require_text("title", None).is_err());
    }

    #[test]
    fn test_patch_distinguishes_absent_and_null() {
        let absent: PatchHolder = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.field, Patch::Absent);

        let null: PatchHolder = serde_json::from_str(r#"{"field": null}"#).unwrap();
        assert_eq!(null.field, Patch::Null);

        let value: PatchHolder = serde_json::from_str(r#"{"field": "x"}"#).unwrap();
        assert_eq!(value.field, Patch::Value("x".to_string()));
    }
}
