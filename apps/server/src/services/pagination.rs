//! Page envelope for list responses

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub page: u32,
    pub total_pages: u64,
    /// Human-readable range of the items shown, e.g. `"11–20 de 25"`.
    pub current_view: String,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    /// Build the envelope for an already-fetched page. `limit` must be > 0.
    pub fn build(page: u32, limit: u32, total: u64, items: Vec<T>) -> Self {
        debug_assert!(limit > 0, "page limit must be > 0");
        let limit = u64::from(limit.max(1));
        let offset = limit * u64::from(page.saturating_sub(1));

        let total_pages = if total >= limit {
            total.div_ceil(limit)
        } else {
            1
        };

        let first = offset + 1;
        let last = (offset + limit).min(total);
        let current_view = if first > last {
            format!("0–0 de {total}")
        } else {
            format!("{first}–{last} de {total}")
        };

        Self {
            page,
            total_pages,
            current_view,
            items,
        }
    }
}
