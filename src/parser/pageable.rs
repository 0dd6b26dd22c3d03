use serde::Serialize;

pub const DEFAULT_PAGE_NUMBER: u32 = 0;
pub const DEFAULT_PAGE_SIZE: u32 = 5;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Requested page of a search; a size of 0 disables paging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pageable {
    pub number: u32,
    pub size: u32,
}

impl Default for Pageable {
    fn default() -> Self {
        Self {
            number: DEFAULT_PAGE_NUMBER,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pageable {
    /// Parse the `page` and `size` query parameters, falling back to defaults
    pub fn from_params(number: Option<&str>, size: Option<&str>) -> Self {
        let number = number
            .and_then(|n| n.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_PAGE_NUMBER);
        let size = size
            .and_then(|s| s.trim().parse::<u32>().ok())
            .filter(|s| *s <= MAX_PAGE_SIZE)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        Self { number, size }
    }

    pub fn is_unpaged(&self) -> bool {
        self.size == 0
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.number) * u64::from(self.size)
    }
}

/// Records of one page together with the number of all matching records
#[derive(Debug, Clone)]
pub struct Slice<T> {
    pub content: Vec<T>,
    pub total_elements: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub size: u32,
    pub number: u32,
    pub total_elements: i64,
    pub total_pages: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: PageInfo,
}

impl<T> Page<T> {
    pub fn from_slice(slice: Slice<T>, pageable: &Pageable) -> Self {
        let total_pages = if pageable.is_unpaged() {
            1
        } else {
            let size = i64::from(pageable.size);
            (slice.total_elements + size - 1) / size
        };
        Self {
            content: slice.content,
            page: PageInfo {
                size: pageable.size,
                number: pageable.number,
                total_elements: slice.total_elements,
                total_pages,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pageable_defaults() {
        assert_eq!(Pageable::from_params(None, None), Pageable::default());
        assert_eq!(
            Pageable::from_params(Some("abc"), Some("-1")),
            Pageable::default()
        );
    }

    #[test]
    fn test_pageable_size_limits() {
        assert_eq!(Pageable::from_params(Some("2"), Some("10")).offset(), 20);
        assert_eq!(
            Pageable::from_params(None, Some("101")).size,
            DEFAULT_PAGE_SIZE
        );
        assert!(Pageable::from_params(None, Some("0")).is_unpaged());
    }

    #[test]
    fn test_page_from_slice() {
        let slice = Slice {
            content: vec![1, 2, 3, 4, 5],
            total_elements: 11,
        };
        let page = Page::from_slice(slice, &Pageable { number: 0, size: 5 });
        assert_eq!(page.page.total_pages, 3);
        assert_eq!(page.page.total_elements, 11);

        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["page"]["totalElements"], 11);
        assert_eq!(value["content"].as_array().unwrap().len(), 5);
    }
}
