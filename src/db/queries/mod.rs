pub mod orders;
pub mod perfumes;
pub mod users;

use serde::Deserialize;

use crate::error::AppError;

pub const DEFAULT_PER_PAGE: u64 = 20;
pub const MAX_PER_PAGE: u64 = 100;
/// Keeps `page * per_page` well inside a signed 64-bit SQL offset.
pub const MAX_PAGE: u64 = 1_000_000;

/// 1-based page request, clamped to sane bounds.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageRequest {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl PageRequest {
    pub fn new(page: u64, per_page: u64) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
        }
    }

    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> u64 {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE)
    }

    /// Zero-based index handed to the paginator.
    pub fn page_index(&self) -> Result<u64, AppError> {
        let page = self.page();
        if page > MAX_PAGE {
            return Err(AppError::field(
                "page",
                &format!("Page must not exceed {MAX_PAGE}"),
            ));
        }
        Ok(page - 1)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PER_PAGE)
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
        }
    }
}
