use serde::{Deserialize, Serialize};

/// Pagination data computed by the layout engine while it places a node.
///
/// Only known after layout, which is why documents that display it need a
/// second generation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub page_number: usize,
    pub total_pages: usize,
    pub sub_page_number: usize,
    pub sub_page_total_pages: usize,
}

impl PaginationInfo {
    pub fn new(page_number: usize, total_pages: usize) -> Self {
        Self {
            page_number,
            total_pages,
            sub_page_number: 0,
            sub_page_total_pages: 0,
        }
    }

    pub fn with_sub_page(mut self, sub_page_number: usize, sub_page_total_pages: usize) -> Self {
        self.sub_page_number = sub_page_number;
        self.sub_page_total_pages = sub_page_total_pages;
        self
    }

    /// Folds an update reported by the engine into component-local state.
    ///
    /// Engines may report `total_pages == 0` while the count is still unknown;
    /// the previously observed total is kept in that case.
    pub fn refresh(&mut self, update: &PaginationInfo) {
        self.page_number = update.page_number;
        if update.total_pages != 0 {
            self.total_pages = update.total_pages;
        }
        self.sub_page_number = update.sub_page_number;
        self.sub_page_total_pages = update.sub_page_total_pages;
    }
}
