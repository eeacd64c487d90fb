use serde::Serialize;

/// Comments shown per pagination page.
pub const PAGE_SIZE: u64 = 30;

pub const DEFAULT_PAGE_PATH: &str = "/";

/// Parse a `pageNumber` query value.
///
/// Reads the leading run of digits (so `"2abc"` is 2). Anything without
/// digits, negative, or zero falls back to 1; overflow saturates.
pub fn parse_page_number(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else {
        return 1;
    };

    let s = raw.trim_start();
    let s = s.strip_prefix('+').unwrap_or(s);
    let digits_len = s.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return 1;
    }

    let parsed = s[..digits_len].parse::<u32>().unwrap_or(u32::MAX);
    parsed.max(1)
}

/// A pagination window for one page path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    page_number: u32,
}

impl Window {
    pub fn new(page_number: u32) -> Self {
        Window {
            page_number: page_number.max(1),
        }
    }

    /// 1-based page number.
    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page_number.saturating_sub(1)) * PAGE_SIZE
    }

    pub fn limit(&self) -> u64 {
        PAGE_SIZE
    }

    /// Metadata for this window given the total row count.
    ///
    /// Windows past the last page are not clamped.
    pub fn describe(&self, total: u64) -> Pagination {
        let total_pages = total.div_ceil(PAGE_SIZE);
        let current = u64::from(self.page_number);

        Pagination {
            current_page: self.page_number,
            total_pages,
            total_comments: total,
            has_next: current < total_pages,
            has_previous: current > 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u64,
    pub total_comments: u64,
    pub has_next: bool,
    pub has_previous: bool,
}
