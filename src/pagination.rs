//! This modules defines the common functionality for paging data.

use maud::{Markup, html};
use serde::Deserialize;

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The maximum rows to display per page when not specified in a request.
    pub default_page_size: u64,
    /// The maximum number of pages to show in the pagination indicator.
    pub max_pages: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 20,
            max_pages: 5,
        }
    }
}

/// Query parameters that select a page of a table.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// The page number to display. Starts from 1.
    pub page: Option<u64>,
    /// The maximum number of rows to display per page.
    pub per_page: Option<u64>,
}

/// The page, page size and page count to use for a table with `row_count` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub per_page: u64,
    pub page_count: u64,
}

impl PageWindow {
    /// Resolve `query` against `config`, clamping the page number to the
    /// available pages.
    pub fn new(query: &PageQuery, config: &PaginationConfig, row_count: u64) -> Self {
        let per_page = query
            .per_page
            .unwrap_or(config.default_page_size)
            .max(1);
        let page_count = row_count.div_ceil(per_page).max(1);
        let page = query
            .page
            .unwrap_or(config.default_page)
            .clamp(1, page_count);

        Self {
            page,
            per_page,
            page_count,
        }
    }

    /// The number of rows to skip to reach this page.
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.per_page
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum PaginationIndicator {
    Page(u64),
    CurrPage(u64),
    Ellipsis,
    NextButton(u64),
    BackButton(u64),
}

pub fn create_pagination_indicators(
    curr_page: u64,
    page_count: u64,
    max_pages: u64,
) -> Vec<PaginationIndicator> {
    let map_page = |page| {
        if page == curr_page {
            PaginationIndicator::CurrPage(page)
        } else {
            PaginationIndicator::Page(page)
        }
    };

    let mut indicators: Vec<PaginationIndicator> = if page_count <= max_pages {
        (1..=page_count).map(map_page).collect()
    } else if curr_page <= (max_pages / 2) {
        (1..=max_pages).map(map_page).collect()
    } else if curr_page > (page_count - max_pages / 2) {
        ((page_count - max_pages + 1)..=page_count)
            .map(map_page)
            .collect()
    } else {
        ((curr_page - max_pages / 2)..=(curr_page + max_pages / 2))
            .map(map_page)
            .collect()
    };

    if page_count > max_pages {
        if curr_page > (max_pages / 2) + 1 {
            indicators.insert(0, PaginationIndicator::Page(1));
            indicators.insert(1, PaginationIndicator::Ellipsis);
        }

        if curr_page < (page_count - max_pages / 2) {
            indicators.push(PaginationIndicator::Ellipsis);
            indicators.push(PaginationIndicator::Page(page_count));
        }
    }

    if curr_page > 1 {
        indicators.insert(0, PaginationIndicator::BackButton(curr_page - 1));
    }

    if curr_page < page_count {
        indicators.push(PaginationIndicator::NextButton(curr_page + 1));
    }

    indicators
}

/// Render the page links for `indicators`.
///
/// `page_url` builds the link for a page number.
pub fn pagination_view(indicators: &[PaginationIndicator], page_url: impl Fn(u64) -> String) -> Markup {
    let link_style = "block px-3 py-2 rounded-sm text-blue-600 hover:underline";

    html! {
        nav class="pagination flex justify-center"
        {
            ul class="pagination flex items-center gap-1 p-0 m-0"
            {
                @for indicator in indicators {
                    li {
                        @match indicator {
                            PaginationIndicator::Page(page) => {
                                a href=(page_url(*page)) class=(link_style) { (page) }
                            }
                            PaginationIndicator::CurrPage(page) => {
                                span
                                    aria-current="page"
                                    class="block px-3 py-2 rounded-sm font-bold text-black dark:text-white"
                                { (page) }
                            }
                            PaginationIndicator::Ellipsis => {
                                span class="block px-3 py-2 text-gray-500" { "..." }
                            }
                            PaginationIndicator::BackButton(page) => {
                                a href=(page_url(*page)) role="button" class=(link_style) { "Anterior" }
                            }
                            PaginationIndicator::NextButton(page) => {
                                a href=(page_url(*page)) role="button" class=(link_style) { "Próxima" }
                            }
                        }
                    }
                }
            }
        }
    }
}
