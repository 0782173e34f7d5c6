use crate::error::ConfigError;

use indexmap::IndexMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub type Record = IndexMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    #[default]
    Five,
    Ten,
    TwentyFive,
    Fifty,
}

impl PageSize {
    pub const ALL: [PageSize; 4] = [
        PageSize::Five,
        PageSize::Ten,
        PageSize::TwentyFive,
        PageSize::Fifty,
    ];

    pub fn get(&self) -> usize {
        match self {
            PageSize::Five => 5,
            PageSize::Ten => 10,
            PageSize::TwentyFive => 25,
            PageSize::Fifty => 50,
        }
    }
}

impl TryFrom<usize> for PageSize {
    type Error = ConfigError;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        PageSize::ALL
            .into_iter()
            .find(|p| p.get() == n)
            .ok_or_else(|| ConfigError::InvalidPageSize(n.to_string()))
    }
}

impl FromStr for PageSize {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n = s
            .trim()
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidPageSize(s.to_string()))?;
        PageSize::try_from(n)
    }
}

impl Display for PageSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    rows: Vec<Record>,
    columns: Vec<String>,
    page_size: PageSize,
    // 1-based, always within 1..=total_pages()
    current_page: usize,
    selected: Option<usize>,
}

impl ResultSet {
    pub fn new(rows: Vec<Record>) -> Self {
        let columns = rows
            .first()
            .map(|r| r.keys().cloned().collect())
            .unwrap_or_default();
        Self {
            rows,
            columns,
            page_size: PageSize::default(),
            current_page: 1,
            selected: None,
        }
    }

    pub fn with_page_size(mut self, size: PageSize) -> Self {
        self.set_page_size(size);
        self
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.rows.len().div_ceil(self.page_size.get()).max(1)
    }

    pub fn set_page_size(&mut self, size: PageSize) {
        self.page_size = size;
        self.current_page = self.current_page.clamp(1, self.total_pages());
    }

    pub fn next(&mut self) -> bool {
        if self.current_page < self.total_pages() {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    pub fn previous(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    pub fn current_page_rows(&self) -> &[Record] {
        let (start, end) = self.page_bounds();
        &self.rows[start..end]
    }

    pub fn select(&mut self, index: usize) -> Option<&Record> {
        let (start, end) = self.page_bounds();
        let absolute = start + index;
        if absolute >= end {
            return None;
        }
        self.selected = Some(absolute);
        self.rows.get(absolute)
    }

    pub fn selected(&self) -> Option<&Record> {
        self.selected.and_then(|i| self.rows.get(i))
    }

    fn page_bounds(&self) -> (usize, usize) {
        let size = self.page_size.get();
        let start = ((self.current_page - 1) * size).min(self.rows.len());
        let end = (start + size).min(self.rows.len());
        (start, end)
    }
}
