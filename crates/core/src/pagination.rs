//! Page / limit / sort resolution for list endpoints.
//!
//! Raw query-string values are coerced rather than rejected: a missing or
//! unparseable page becomes 1, a limit outside `[1, MAX_LIMIT]` is clamped.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::sort::{SortField, SortSpec};

/// Page used when the client sends none.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when the client sends none.
pub const DEFAULT_LIMIT: i64 = 10;

/// Largest page size a client may request.
pub const MAX_LIMIT: i64 = 100;

/// Raw `?page=&limit=&sort=` values as they arrive on the query string.
///
/// Kept as strings so that garbage input can be coerced to defaults instead
/// of failing deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
}

/// A bounded page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Coerce raw page/limit values into bounds.
    pub fn resolve(page: Option<&str>, limit: Option<&str>) -> Self {
        let page = parse_number(page).unwrap_or(DEFAULT_PAGE).max(1);
        let limit = clamp_limit(parse_number(limit), DEFAULT_LIMIT, MAX_LIMIT);
        Self { page, limit }
    }

    /// Row offset of the first item on this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Clamp a user-provided limit to `[1, max]`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

fn parse_number(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
}

/// The `pagination` block carried by every list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    /// `ceil(total / limit)`.
    pub pages: i64,
}

impl Pagination {
    pub fn new(request: PageRequest, total: i64) -> Self {
        let total = total.max(0);
        let pages = if total == 0 {
            0
        } else {
            (total + request.limit - 1) / request.limit
        };
        Self {
            page: request.page,
            limit: request.limit,
            total,
            pages,
        }
    }
}

/// Everything a repository needs to run one list query.
#[derive(Debug, Clone)]
pub struct ListQuery<F, S> {
    pub page: PageRequest,
    pub sort: SortSpec<S>,
    pub filter: F,
}

impl<F, S: SortField> ListQuery<F, S> {
    /// Resolve raw query values plus an already-parsed filter.
    pub fn resolve(query: &PageQuery, filter: F) -> Self {
        Self {
            page: PageRequest::resolve(query.page.as_deref(), query.limit.as_deref()),
            sort: SortSpec::resolve(query.sort.as_deref()),
            filter,
        }
    }
}

/// One page of results plus its pagination block.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: i64) -> Self {
        Self {
            items,
            pagination: Pagination::new(request, total),
        }
    }

    /// Transform every item, keeping the pagination block.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

/// Turn an optional free-text search into an `ILIKE` pattern.
///
/// Blank input yields `None` so the filter imposes no constraint. `%`, `_`
/// and `\` are escaped so they match literally.
pub fn search_pattern(q: Option<&str>) -> Option<String> {
    let q = q?.trim();
    if q.is_empty() {
        return None;
    }
    let escaped = q
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    Some(format!("%{escaped}%"))
}

/// Normalize an optional equality filter: blank strings impose no constraint.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// `deserialize_with` helper for typed query filters: a blank value such as
/// `?featured=` imposes no constraint, anything else must parse as `T`.
pub fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match non_blank(raw.as_deref()) {
        None => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_absent() {
        let req = PageRequest::resolve(None, None);
        assert_eq!(req, PageRequest { page: 1, limit: 10 });
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn page_is_coerced_to_at_least_one() {
        assert_eq!(PageRequest::resolve(Some("0"), None).page, 1);
        assert_eq!(PageRequest::resolve(Some("-4"), None).page, 1);
        assert_eq!(PageRequest::resolve(Some("abc"), None).page, 1);
        assert_eq!(PageRequest::resolve(Some("3"), None).page, 3);
    }

    #[test]
    fn limit_is_clamped_not_rejected() {
        assert_eq!(PageRequest::resolve(None, Some("0")).limit, 1);
        assert_eq!(PageRequest::resolve(None, Some("1000")).limit, 100);
        assert_eq!(PageRequest::resolve(None, Some("-7")).limit, 1);
        assert_eq!(PageRequest::resolve(None, Some("lots")).limit, 10);
        assert_eq!(PageRequest::resolve(None, Some(" 25 ")).limit, 25);
    }

    #[test]
    fn offset_does_not_overflow() {
        let req = PageRequest::resolve(Some("9223372036854775807"), Some("100"));
        assert_eq!(req.offset(), i64::MAX);
    }

    #[test]
    fn pages_is_ceiling_of_total_over_limit() {
        let req = PageRequest { page: 2, limit: 5 };
        let p = Pagination::new(req, 12);
        assert_eq!(
            p,
            Pagination {
                page: 2,
                limit: 5,
                total: 12,
                pages: 3
            }
        );
        assert_eq!(Pagination::new(req, 10).pages, 2);
        assert_eq!(Pagination::new(req, 1).pages, 1);
        assert_eq!(Pagination::new(req, 0).pages, 0);
    }

    #[test]
    fn search_pattern_escapes_wildcards() {
        assert_eq!(search_pattern(Some("50%_off")), Some("%50\\%\\_off%".into()));
        assert_eq!(search_pattern(Some("  rust ")), Some("%rust%".into()));
        assert_eq!(search_pattern(Some("   ")), None);
        assert_eq!(search_pattern(None), None);
    }

    #[derive(Debug, Deserialize)]
    struct FlagFilter {
        #[serde(default, deserialize_with = "blank_as_none")]
        featured: Option<bool>,
        #[serde(default, deserialize_with = "blank_as_none")]
        min_rating: Option<i32>,
    }

    fn flags(value: serde_json::Value) -> Result<FlagFilter, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn blank_typed_filters_are_absent() {
        let f = flags(serde_json::json!({"featured": "", "min_rating": "  "})).unwrap();
        assert_eq!(f.featured, None);
        assert_eq!(f.min_rating, None);

        let f = flags(serde_json::json!({})).unwrap();
        assert_eq!(f.featured, None);

        let f = flags(serde_json::json!({"featured": "true", "min_rating": "4"})).unwrap();
        assert_eq!(f.featured, Some(true));
        assert_eq!(f.min_rating, Some(4));

        assert!(flags(serde_json::json!({"featured": "maybe"})).is_err());
    }

    #[test]
    fn non_blank_drops_empty_values() {
        assert_eq!(non_blank(Some(" web ")), Some("web"));
        assert_eq!(non_blank(Some("")), None);
        assert_eq!(non_blank(None), None);
    }
}
