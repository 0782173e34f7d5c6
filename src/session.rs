use crate::error::RequestError;
use crate::executor::RequestExecutor;
use crate::request::RequestConfig;
use crate::result_set::{PageSize, Record, ResultSet};

use tracing::info;

/// State owned by one user of the form: what to send and what came back.
///
/// `send` holds `&mut self` across the network call, so a session can
/// never have two requests in flight.
#[derive(Debug, Clone, Default)]
pub struct Session {
    config: RequestConfig,
    results: Option<ResultSet>,
    page_size: PageSize,
}

impl Session {
    pub fn new(config: RequestConfig) -> Self {
        Self {
            config,
            results: None,
            page_size: PageSize::default(),
        }
    }

    pub fn config(&self) -> &RequestConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut RequestConfig {
        &mut self.config
    }

    pub fn results(&self) -> Option<&ResultSet> {
        self.results.as_ref()
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Executes the current request. On success the previous results are
    /// replaced; on failure they are kept as they were.
    pub async fn send(&mut self, executor: &RequestExecutor) -> Result<&ResultSet, RequestError> {
        let fetched = executor.execute(&self.config).await?;
        info!(rows = fetched.len(), "replacing result set");
        let results = self.results.insert(fetched.with_page_size(self.page_size));
        Ok(&*results)
    }

    pub fn set_page_size(&mut self, size: PageSize) {
        self.page_size = size;
        if let Some(results) = self.results.as_mut() {
            results.set_page_size(size);
        }
    }

    pub fn next_page(&mut self) -> bool {
        self.results.as_mut().is_some_and(ResultSet::next)
    }

    pub fn previous_page(&mut self) -> bool {
        self.results.as_mut().is_some_and(ResultSet::previous)
    }

    pub fn select_row(&mut self, index: usize) -> Option<&Record> {
        self.results.as_mut().and_then(|r| r.select(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_without_results_is_a_no_op() {
        let mut session = Session::default();
        assert!(!session.next_page());
        assert!(!session.previous_page());
        assert!(session.select_row(0).is_none());
        session.set_page_size(PageSize::Ten);
        assert_eq!(session.page_size(), PageSize::Ten);
        assert!(session.results().is_none());
    }
}
