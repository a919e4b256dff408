//! Log query construction
//!
//! Turns the raw query form into the parameters of `GET /api/dlogs/view`.

use chrono::Local;
use url::form_urlencoded;

/// Limit used when the form's limit is missing or not a positive integer
pub const DEFAULT_LIMIT: u32 = 1000;

pub const SELECT_SERVICE: &str = "Select a service";

/// Raw contents of the query form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryForm {
    pub service: String,
    pub date: String,
    pub pattern: String,
    pub limit: String,
}

/// A validated log query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    pub service: String,
    /// Day to search, `YYYY-MM-DD`
    pub date: String,
    pub pattern: Option<String>,
    pub limit: u32,
}

impl LogQuery {
    /// Build a query from the form, filling an empty date with `today`
    pub fn from_form(form: &QueryForm, today: &str) -> Result<Self, String> {
        if form.service.is_empty() {
            return Err(SELECT_SERVICE.to_string());
        }

        let date = if form.date.is_empty() {
            today.to_string()
        } else {
            form.date.clone()
        };
        let pattern = form.pattern.trim();

        Ok(Self {
            service: form.service.clone(),
            date,
            pattern: (!pattern.is_empty()).then(|| pattern.to_string()),
            limit: parse_limit(&form.limit),
        })
    }

    /// URL-encoded parameters: service, date, limit and pattern when present
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        serializer
            .append_pair("service", &self.service)
            .append_pair("date", &self.date)
            .append_pair("limit", &self.limit.to_string());
        if let Some(pattern) = &self.pattern {
            serializer.append_pair("pattern", pattern);
        }
        serializer.finish()
    }
}

/// Parse the limit field like an integer prefix
///
/// Leading whitespace and a sign are accepted and parsing stops at the first
/// non-digit, so `"50 lines"` is 50. Empty, non-numeric and values below 1
/// fall back to [`DEFAULT_LIMIT`]; values past `u32::MAX` saturate.
pub fn parse_limit(input: &str) -> u32 {
    let s = input.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];

    if digits.is_empty() || negative {
        return DEFAULT_LIMIT;
    }

    match digits.parse::<u64>() {
        Ok(0) => DEFAULT_LIMIT,
        Ok(n) => u32::try_from(n).unwrap_or(u32::MAX),
        Err(_) => u32::MAX,
    }
}

/// Today's local date as `YYYY-MM-DD`
pub fn today_iso() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(service: &str, pattern: &str) -> QueryForm {
        QueryForm {
            service: service.to_string(),
            date: "2026-10-19".to_string(),
            pattern: pattern.to_string(),
            limit: "50".to_string(),
        }
    }

    #[test]
    fn test_parse_limit_fallbacks() {
        for input in ["0", "-5", "", "abc", "   ", "-0", "+"] {
            assert_eq!(parse_limit(input), DEFAULT_LIMIT, "input {input:?}");
        }
    }

    #[test]
    fn test_parse_limit_values() {
        assert_eq!(parse_limit("50"), 50);
        assert_eq!(parse_limit("  7"), 7);
        assert_eq!(parse_limit("+12"), 12);
        assert_eq!(parse_limit("25 lines"), 25);
        assert_eq!(parse_limit("1e3"), 1);
        assert_eq!(parse_limit("99999999999999999999999"), u32::MAX);
    }

    #[test]
    fn test_query_without_pattern() {
        let query = LogQuery::from_form(&form("api", ""), "2026-01-01").unwrap();
        let qs = query.to_query_string();

        assert_eq!(qs, "service=api&date=2026-10-19&limit=50");
        assert!(!qs.contains("pattern"));
    }

    #[test]
    fn test_query_with_pattern() {
        let query = LogQuery::from_form(&form("api", " ERROR "), "2026-01-01").unwrap();
        assert_eq!(
            query.to_query_string(),
            "service=api&date=2026-10-19&limit=50&pattern=ERROR"
        );

        let query = LogQuery::from_form(&form("api", "user id=7"), "2026-01-01").unwrap();
        assert!(query.to_query_string().ends_with("&pattern=user+id%3D7"));
    }

    #[test]
    fn test_empty_date_defaults_to_today() {
        let mut raw = form("api", "");
        raw.date.clear();
        raw.limit = "abc".to_string();

        let query = LogQuery::from_form(&raw, "2026-01-01").unwrap();
        assert_eq!(query.date, "2026-01-01");
        assert_eq!(query.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn test_service_required() {
        assert_eq!(
            LogQuery::from_form(&form("", "ERROR"), "2026-01-01").unwrap_err(),
            SELECT_SERVICE
        );
    }

    #[test]
    fn test_today_iso_shape() {
        let today = today_iso();
        assert_eq!(today.len(), 10);
        assert!(chrono::NaiveDate::parse_from_str(&today, "%Y-%m-%d").is_ok());
    }
}
