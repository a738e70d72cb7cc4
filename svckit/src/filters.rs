//! Booking list filters and their query-string form.
//!
//! Every list field uses the comma-joined convention (`status=1,2`) in
//! ascending code order. `encode` is canonical: defaults and empty values are
//! omitted, so `encode(decode(q)) == q` for any `q` produced by `encode`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::form_urlencoded;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

const PARAM_SEARCH: &str = "search";
const PARAM_STATUS: &str = "status";
const PARAM_SERVICE_TYPE: &str = "serviceType";
const PARAM_URGENCY: &str = "urgency";
const PARAM_DATE_FROM: &str = "dateFrom";
const PARAM_DATE_TO: &str = "dateTo";
const PARAM_PAGE: &str = "page";
const PARAM_PAGE_SIZE: &str = "pageSize";
const PARAM_SORT_BY: &str = "sortBy";
const PARAM_SORT_ORDER: &str = "sortOrder";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingFilters {
    pub search: Option<String>,
    pub status: BTreeSet<u16>,
    pub service_type: BTreeSet<u16>,
    pub urgency: BTreeSet<u16>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub page: u32,
    pub page_size: u32,
}

impl Default for BookingFilters {
    fn default() -> Self {
        Self {
            search: None,
            status: BTreeSet::new(),
            service_type: BTreeSet::new(),
            urgency: BTreeSet::new(),
            date_from: None,
            date_to: None,
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub by: String,
    pub order: SortOrder,
}

impl Sort {
    pub fn newest_first() -> Self {
        Self {
            by: "createdAt".to_string(),
            order: SortOrder::Desc,
        }
    }
}

impl BookingFilters {
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            page_size,
            ..Self::default()
        }
    }

    pub fn is_filtered(&self) -> bool {
        non_empty(&self.search).is_some()
            || !self.status.is_empty()
            || !self.service_type.is_empty()
            || !self.urgency.is_empty()
            || non_empty(&self.date_from).is_some()
            || non_empty(&self.date_to).is_some()
    }

    /// Drop every filter but keep the page size; back to page 1.
    pub fn clear(&mut self) {
        *self = Self::with_page_size(self.page_size);
    }

    pub fn set_search(&mut self, search: &str) {
        self.search = if search.trim().is_empty() {
            None
        } else {
            Some(search.to_string())
        };
        self.page = DEFAULT_PAGE;
    }

    pub fn toggle_status(&mut self, code: u16) {
        toggle(&mut self.status, code);
        self.page = DEFAULT_PAGE;
    }

    pub fn toggle_service_type(&mut self, code: u16) {
        toggle(&mut self.service_type, code);
        self.page = DEFAULT_PAGE;
    }

    pub fn toggle_urgency(&mut self, code: u16) {
        toggle(&mut self.urgency, code);
        self.page = DEFAULT_PAGE;
    }

    pub fn set_date_range(&mut self, from: Option<String>, to: Option<String>) {
        self.date_from = from;
        self.date_to = to;
        self.page = DEFAULT_PAGE;
    }

    /// Canonical parameter list: populated filters only, paging only when
    /// it differs from the defaults.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = self.filter_pairs();
        if self.page != DEFAULT_PAGE {
            pairs.push((PARAM_PAGE, self.page.to_string()));
        }
        if self.page_size != DEFAULT_PAGE_SIZE {
            pairs.push((PARAM_PAGE_SIZE, self.page_size.to_string()));
        }
        pairs
    }

    /// Parameters sent to the listing endpoint: paging is always explicit so
    /// the server never has to guess its own defaults.
    pub fn request_pairs(&self, sort: Option<&Sort>) -> Vec<(&'static str, String)> {
        let mut pairs = self.filter_pairs();
        pairs.push((PARAM_PAGE, self.page.to_string()));
        pairs.push((PARAM_PAGE_SIZE, self.page_size.to_string()));
        if let Some(sort) = sort {
            pairs.push((PARAM_SORT_BY, sort.by.clone()));
            pairs.push((PARAM_SORT_ORDER, sort.order.as_str().to_string()));
        }
        pairs
    }

    fn filter_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(search) = non_empty(&self.search) {
            pairs.push((PARAM_SEARCH, search.to_string()));
        }
        for (name, codes) in [
            (PARAM_STATUS, &self.status),
            (PARAM_SERVICE_TYPE, &self.service_type),
            (PARAM_URGENCY, &self.urgency),
        ] {
            if !codes.is_empty() {
                pairs.push((name, join_codes(codes)));
            }
        }
        if let Some(from) = non_empty(&self.date_from) {
            pairs.push((PARAM_DATE_FROM, from.to_string()));
        }
        if let Some(to) = non_empty(&self.date_to) {
            pairs.push((PARAM_DATE_TO, to.to_string()));
        }

        pairs
    }

    /// Encode into an `application/x-www-form-urlencoded` query string
    /// (without the leading `?`).
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query_pairs())
            .finish()
    }

    /// Best-effort decode of a query string. Malformed list tokens are
    /// skipped one by one; paging falls back to its defaults.
    pub fn decode(query: &str) -> Self {
        Self::decode_with_page_size(query, DEFAULT_PAGE_SIZE)
    }

    /// Like [`decode`](Self::decode), but a missing or malformed page size
    /// falls back to `page_size`.
    pub fn decode_with_page_size(query: &str, page_size: u32) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self::parse_pairs(form_urlencoded::parse(query.as_bytes()), page_size)
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Self::parse_pairs(pairs, DEFAULT_PAGE_SIZE)
    }

    fn parse_pairs<I, K, V>(pairs: I, default_page_size: u32) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut filters = Self::with_page_size(default_page_size);

        for (key, value) in pairs {
            let value = value.as_ref();
            match key.as_ref() {
                PARAM_SEARCH => filters.search = some_if_non_empty(value),
                // Repeated list parameters are merged into the same set.
                PARAM_STATUS => parse_codes(PARAM_STATUS, value, &mut filters.status),
                PARAM_SERVICE_TYPE => {
                    parse_codes(PARAM_SERVICE_TYPE, value, &mut filters.service_type)
                }
                PARAM_URGENCY => parse_codes(PARAM_URGENCY, value, &mut filters.urgency),
                PARAM_DATE_FROM => filters.date_from = some_if_non_empty(value),
                PARAM_DATE_TO => filters.date_to = some_if_non_empty(value),
                PARAM_PAGE => filters.page = parse_positive(value).unwrap_or(DEFAULT_PAGE),
                PARAM_PAGE_SIZE => {
                    filters.page_size = parse_positive(value).unwrap_or(default_page_size)
                }
                _ => {}
            }
        }

        filters
    }
}

fn toggle(set: &mut BTreeSet<u16>, code: u16) {
    if !set.remove(&code) {
        set.insert(code);
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn some_if_non_empty(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn join_codes(codes: &BTreeSet<u16>) -> String {
    codes
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_codes(param: &str, value: &str, into: &mut BTreeSet<u16>) {
    for token in value.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match token.parse::<u16>() {
            Ok(code) => {
                into.insert(code);
            }
            Err(_) => debug!(param, token, "Skipping malformed filter code"),
        }
    }
}

fn parse_positive(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|v| *v > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(values: &[u16]) -> BTreeSet<u16> {
        values.iter().copied().collect()
    }

    #[test]
    fn test_encode_omits_unset_fields() {
        let filters = BookingFilters {
            status: codes(&[2, 1]),
            ..BookingFilters::default()
        };

        let query = filters.encode();
        assert_eq!(query, "status=1%2C2");
        assert!(!query.contains("dateFrom"));
        assert!(!query.contains("dateTo"));
        assert!(!query.contains("page"));
    }

    #[test]
    fn test_encode_all_fields_in_fixed_order() {
        let filters = BookingFilters {
            search: Some("john doe".to_string()),
            status: codes(&[3]),
            service_type: codes(&[1, 5]),
            urgency: codes(&[3, 2]),
            date_from: Some("2025-01-01".to_string()),
            date_to: Some("2025-01-31".to_string()),
            page: 2,
            page_size: 25,
        };

        assert_eq!(
            filters.encode(),
            "search=john+doe&status=3&serviceType=1%2C5&urgency=2%2C3\
             &dateFrom=2025-01-01&dateTo=2025-01-31&page=2&pageSize=25"
        );
    }

    #[test]
    fn test_blank_scalars_are_not_emitted() {
        let filters = BookingFilters {
            search: Some("   ".to_string()),
            date_from: Some(String::new()),
            ..BookingFilters::default()
        };
        assert_eq!(filters.encode(), "");
        assert!(!filters.is_filtered());
    }

    #[test]
    fn test_decode_skips_malformed_tokens() {
        let filters = BookingFilters::decode("status=2,abc,4");
        assert_eq!(filters.status, codes(&[2, 4]));
    }

    #[test]
    fn test_decode_defaults_paging() {
        let filters = BookingFilters::decode("?urgency=3");
        assert_eq!(filters.page, 1);
        assert_eq!(filters.page_size, DEFAULT_PAGE_SIZE);

        let filters = BookingFilters::decode("page=0&pageSize=-5");
        assert_eq!(filters.page, 1);
        assert_eq!(filters.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_decode_with_configured_page_size() {
        let filters = BookingFilters::decode_with_page_size("status=2", 25);
        assert_eq!((filters.page, filters.page_size), (1, 25));

        let filters = BookingFilters::decode_with_page_size("pageSize=abc", 25);
        assert_eq!(filters.page_size, 25);

        let filters = BookingFilters::decode_with_page_size("pageSize=10", 25);
        assert_eq!(filters.page_size, 10);
    }

    #[test]
    fn test_decode_merges_repeated_params() {
        let filters = BookingFilters::decode("status=1&status=2&serviceType=3,%204&status=");
        assert_eq!(filters.status, codes(&[1, 2]));
        assert_eq!(filters.service_type, codes(&[3, 4]));
    }

    #[test]
    fn test_decode_passes_dates_through() {
        let filters = BookingFilters::decode("dateFrom=not-a-date&dateTo=2025-02-01&unknown=1");
        assert_eq!(filters.date_from.as_deref(), Some("not-a-date"));
        assert_eq!(filters.date_to.as_deref(), Some("2025-02-01"));
    }

    #[test]
    fn test_round_trip_reproduces_filters() {
        let filters = BookingFilters {
            search: Some("GLOHORIZON-2025&co".to_string()),
            status: codes(&[1, 2, 10]),
            service_type: codes(&[4]),
            urgency: codes(&[1, 3]),
            date_from: Some("2025-01-01".to_string()),
            date_to: None,
            page: 3,
            page_size: 20,
        };

        let decoded = BookingFilters::decode(&filters.encode());
        assert_eq!(decoded, filters);
    }

    #[test]
    fn test_encode_is_stable_on_canonical_input() {
        let query = "search=x&status=1%2C2&urgency=3&page=4";
        let once = BookingFilters::decode(query).encode();
        assert_eq!(once, query);
        assert_eq!(BookingFilters::decode(&once).encode(), once);
    }

    #[test]
    fn test_request_pairs_always_carry_paging() {
        let filters = BookingFilters {
            status: codes(&[1, 2]),
            ..BookingFilters::default()
        };

        let pairs = filters.request_pairs(Some(&Sort::newest_first()));
        assert_eq!(
            pairs,
            vec![
                ("status", "1,2".to_string()),
                ("page", "1".to_string()),
                ("pageSize", "10".to_string()),
                ("sortBy", "createdAt".to_string()),
                ("sortOrder", "desc".to_string()),
            ]
        );
    }

    #[test]
    fn test_filter_changes_reset_page() {
        let mut filters = BookingFilters {
            page: 4,
            ..BookingFilters::default()
        };

        filters.toggle_status(2);
        assert_eq!(filters.page, 1);
        assert!(filters.status.contains(&2));

        filters.page = 3;
        filters.toggle_status(2);
        assert_eq!(filters.page, 1);
        assert!(filters.status.is_empty());

        filters.page = 2;
        filters.set_search("visa");
        assert_eq!(filters.page, 1);

        filters.page_size = 25;
        filters.clear();
        assert_eq!(filters, BookingFilters::with_page_size(25));
    }
}
