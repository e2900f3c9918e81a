/// Failure modes of a menu query.
///
/// Every variant renders as a single line starting with `Error: ` so callers
/// (and the LLM reading the tool output) can tell it apart from a report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MenuError {
    /// Upstream fetch or decode failure, message passed through as-is
    #[error("Error: {0}")]
    Adapter(String),

    #[error("Error: 식단 데이터가 비어 있어 최신 날짜를 확인할 수 없습니다.")]
    NoDataAvailable,

    #[error("Error: 잘못된 날짜 형식으로 요청되었습니다: '{0}'. YYYY-MM-DD 형식이 필요합니다.")]
    InvalidDateFormat(String),

    #[error("Error: 해당 날짜({0})의 식단 데이터가 없습니다.")]
    DateNotFound(String),

    #[error("Error: 데이터 구조 오류. {date}의 데이터가 식단 목록 형태가 아닙니다 ({reason}).")]
    MalformedFeed { date: String, reason: String },

    #[error("Error: {date}에 {floor}의 메뉴 정보가 없습니다.")]
    NoMatchingEntries { date: String, floor: String },
}

impl MenuError {
    /// Soft outcomes are answers, not faults: the day exists but the
    /// floor filter left nothing to show.
    pub fn is_soft(&self) -> bool {
        matches!(self, MenuError::NoMatchingEntries { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_errors_are_prefixed() {
        let errors = vec![
            MenuError::Adapter("connection refused".to_string()),
            MenuError::NoDataAvailable,
            MenuError::InvalidDateFormat("tomorrow".to_string()),
            MenuError::DateNotFound("2025-10-24".to_string()),
            MenuError::MalformedFeed {
                date: "2025-10-23".to_string(),
                reason: "expected a list".to_string(),
            },
            MenuError::NoMatchingEntries {
                date: "2025-10-23".to_string(),
                floor: "30F".to_string(),
            },
        ];
        for e in errors {
            assert!(e.to_string().starts_with("Error: "), "{}", e);
        }
    }

    #[test]
    fn test_adapter_message_passes_through() {
        let e = MenuError::Adapter("HTTP 503 from upstream".to_string());
        assert!(e.to_string().contains("HTTP 503 from upstream"));
    }

    #[test]
    fn test_only_no_matching_entries_is_soft() {
        assert!(MenuError::NoMatchingEntries {
            date: "2025-10-23".to_string(),
            floor: "30F".to_string(),
        }
        .is_soft());
        assert!(!MenuError::DateNotFound("2025-10-24".to_string()).is_soft());
        assert!(!MenuError::NoDataAvailable.is_soft());
    }
}
