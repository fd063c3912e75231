use serde::Serialize;
use utoipa::ToSchema;

pub const DEFAULT_PER_PAGE: u32 = 50;
pub const MAX_PER_PAGE: u32 = 200;

pub(crate) fn default_page() -> u32 {
    1
}

pub(crate) fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

pub(crate) fn check_page(page: u32, per_page: u32) -> Result<(), String> {
    if page < 1 {
        return Err("page must be >= 1".to_string());
    }
    if per_page < 1 || per_page > MAX_PER_PAGE {
        return Err(format!("per_page must be between 1 and {}", MAX_PER_PAGE));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageMeta {
    pub page: u32,
    pub per_page: u32,
    pub total_items: i64,
    pub total_pages: u32,
}

impl PageMeta {
    pub fn new(page: u32, per_page: u32, total_items: i64) -> Self {
        let per_page_i64 = i64::from(per_page.max(1));
        let total_pages = (total_items.max(0) + per_page_i64 - 1) / per_page_i64;
        Self {
            page,
            per_page,
            total_items,
            total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: PageMeta,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, page: u32, per_page: u32, total_items: i64) -> Self {
        Self {
            data,
            pagination: PageMeta::new(page, per_page, total_items),
        }
    }
}
