//! Application state and the transitions a refresh or a selection applies to it.
use crate::core::config::BaseCurrencyConfig;
use crate::core::currency::{CurrencyRecord, CurrencySource, with_base_currency};
use crate::core::ratio::calculate_result;
use crate::core::selection::{SelectionState, Side};
use anyhow::{Result, anyhow};
use chrono::{DateTime, Local};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Message shown whenever a refresh yields no data.
pub const FETCH_FAILED_MESSAGE: &str = "server is not responding";

/// What a single refresh did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// First successful refresh; default selections were applied.
    Initialized { count: usize },
    /// Later successful refresh; the list was replaced, selection kept.
    Updated { count: usize },
    /// Nothing usable came back. `initialized` tells whether an earlier
    /// refresh had already populated the state.
    Failed { initialized: bool },
}

/// Everything the converter knows between refreshes.
#[derive(Debug, Clone)]
pub struct AppState {
    base: BaseCurrencyConfig,
    currencies: Option<Arc<[CurrencyRecord]>>,
    selection: SelectionState,
    result: Option<String>,
    fetch_error: Option<String>,
    ratio_error: Option<String>,
    last_updated: Option<DateTime<Local>>,
}

impl AppState {
    pub fn new(base: BaseCurrencyConfig) -> Self {
        Self {
            base,
            currencies: None,
            selection: SelectionState::default(),
            result: None,
            fetch_error: None,
            ratio_error: None,
            last_updated: None,
        }
    }

    /// Applies the result of one fetch.
    ///
    /// An error and an empty list are treated alike. Before the first
    /// success nothing else happens; after it, the previous list and
    /// selection stay in place.
    pub fn apply_refresh(&mut self, fetched: Result<Vec<CurrencyRecord>>) -> RefreshOutcome {
        let records = match fetched {
            Ok(records) if !records.is_empty() => records,
            Ok(_) => {
                warn!("Currency source returned an empty list");
                return self.fail();
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch currencies");
                return self.fail();
            }
        };

        self.fetch_error = None;
        let first_time = !self.is_initialized();
        let list: Arc<[CurrencyRecord]> = with_base_currency(&self.base, records).into();
        let count = list.len();
        self.currencies = Some(Arc::clone(&list));
        self.last_updated = Some(Local::now());

        if first_time {
            self.init_selection(&list);
            info!(count, "Currency list initialized");
            RefreshOutcome::Initialized { count }
        } else {
            info!(count, "Currency list updated");
            RefreshOutcome::Updated { count }
        }
    }

    fn fail(&mut self) -> RefreshOutcome {
        self.fetch_error = Some(FETCH_FAILED_MESSAGE.to_string());
        RefreshOutcome::Failed {
            initialized: self.is_initialized(),
        }
    }

    fn init_selection(&mut self, list: &[CurrencyRecord]) {
        // A fetched list is never empty, so the base is followed by at least one record.
        let right = list.get(1).unwrap_or(&list[0]);
        for (side, record) in [(Side::Left, &list[0]), (Side::Right, right)] {
            if let Err(e) = self.selection.select(side, record) {
                warn!(error = %e, %side, "Could not apply default selection");
            }
        }
        self.recompute();
    }

    /// Puts `record` into a slot and recomputes the ratio.
    pub fn select(&mut self, side: Side, record: &CurrencyRecord) -> Result<()> {
        self.selection.select(side, record)?;
        self.recompute();
        Ok(())
    }

    /// Resolves `index` against the list currently held and selects it.
    pub fn select_index(&mut self, side: Side, index: usize) -> Result<()> {
        let record = self
            .currencies
            .as_ref()
            .ok_or_else(|| anyhow!("No currencies loaded yet"))?
            .get(index)
            .cloned()
            .ok_or_else(|| anyhow!("No currency at index {}", index))?;
        self.select(side, &record)
    }

    pub fn swap(&mut self) {
        self.selection.swap();
        self.recompute();
    }

    fn recompute(&mut self) {
        match calculate_result(self.selection.left.ratio, self.selection.right.ratio) {
            Ok(result) => {
                debug!(%result, "Recomputed conversion ratio");
                self.result = Some(result);
                self.ratio_error = None;
            }
            Err(e) => {
                warn!(error = %e, "Could not compute conversion ratio");
                self.result = None;
                self.ratio_error = Some(e.to_string());
            }
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.currencies.is_some()
    }

    pub fn currencies(&self) -> &[CurrencyRecord] {
        self.currencies.as_deref().unwrap_or(&[])
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    /// Text for the info label. A fetch failure outranks a ratio error.
    pub fn info(&self) -> Option<&str> {
        self.fetch_error
            .as_deref()
            .or(self.ratio_error.as_deref())
    }

    pub fn last_updated(&self) -> Option<DateTime<Local>> {
        self.last_updated
    }
}

/// Fetches from `source` and applies whatever came back to `state`.
pub async fn refresh(state: &mut AppState, source: &dyn CurrencySource) -> RefreshOutcome {
    let fetched = source.fetch_currencies().await;
    state.apply_refresh(fetched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Source that hands out queued responses, one per fetch.
    struct ScriptedSource {
        responses: Mutex<Vec<Result<Vec<CurrencyRecord>>>>,
    }

    impl ScriptedSource {
        fn new(mut responses: Vec<Result<Vec<CurrencyRecord>>>) -> Self {
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
            }
        }
    }

    #[async_trait]
    impl CurrencySource for ScriptedSource {
        async fn fetch_currencies(&self) -> Result<Vec<CurrencyRecord>> {
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(anyhow!("no more responses")))
        }
    }

    fn sample() -> Vec<CurrencyRecord> {
        vec![
            CurrencyRecord::new("US Dollar", "USD", "0.5"),
            CurrencyRecord::new("Euro", "EUR", "0.25"),
        ]
    }

    fn new_state() -> AppState {
        AppState::new(BaseCurrencyConfig::default())
    }

    #[test]
    fn test_first_success_initializes_defaults() {
        let mut state = new_state();

        let outcome = state.apply_refresh(Ok(sample()));

        assert_eq!(outcome, RefreshOutcome::Initialized { count: 3 });
        assert_eq!(state.currencies()[0].char_code, "RUB");
        assert_eq!(state.selection().left.ratio, 1.0);
        assert_eq!(state.selection().left.label, "Российский рубль (RUB)");
        assert_eq!(state.selection().right.ratio, 0.5);
        assert_eq!(state.selection().right.label, "US Dollar (USD)");
        assert_eq!(state.result(), Some("0.5000"));
        assert!(state.info().is_none());
        assert!(state.last_updated().is_some());
    }

    #[test]
    fn test_first_empty_fetch_keeps_defaults() {
        let mut state = new_state();

        let outcome = state.apply_refresh(Ok(vec![]));

        assert_eq!(outcome, RefreshOutcome::Failed { initialized: false });
        assert_eq!(state.info(), Some(FETCH_FAILED_MESSAGE));
        assert_eq!(state.selection(), &SelectionState::default());
        assert!(state.currencies().is_empty());
        assert!(state.result().is_none());
    }

    #[test]
    fn test_success_after_failure_initializes() {
        let mut state = new_state();

        state.apply_refresh(Err(anyhow!("connection refused")));
        let outcome = state.apply_refresh(Ok(sample()));

        assert_eq!(outcome, RefreshOutcome::Initialized { count: 3 });
        assert!(state.info().is_none());
        assert_eq!(state.result(), Some("0.5000"));
    }

    #[test]
    fn test_failure_after_success_keeps_state() {
        let mut state = new_state();
        state.apply_refresh(Ok(sample()));
        state.select_index(Side::Left, 2).unwrap();
        let before = state.selection().clone();

        let outcome = state.apply_refresh(Err(anyhow!("timeout")));

        assert_eq!(outcome, RefreshOutcome::Failed { initialized: true });
        assert_eq!(state.info(), Some(FETCH_FAILED_MESSAGE));
        assert_eq!(state.currencies().len(), 3);
        assert_eq!(state.selection(), &before);
        assert_eq!(state.result(), Some("2.0000"));
    }

    #[test]
    fn test_later_success_replaces_list_but_keeps_selection() {
        let mut state = new_state();
        state.apply_refresh(Ok(sample()));
        state.select_index(Side::Right, 2).unwrap();

        let outcome = state.apply_refresh(Ok(vec![CurrencyRecord::new("Yen", "JPY", "1.6")]));

        assert_eq!(outcome, RefreshOutcome::Updated { count: 2 });
        assert_eq!(state.currencies()[1].char_code, "JPY");
        assert_eq!(state.selection().right.label, "Euro (EUR)");
        assert_eq!(state.selection().right.ratio, 0.25);
    }

    #[test]
    fn test_select_base_currency() {
        let mut state = new_state();
        state.apply_refresh(Ok(sample()));
        state.select_index(Side::Right, 2).unwrap();

        state.select_index(Side::Right, 0).unwrap();

        assert_eq!(state.selection().right.ratio, 1.0);
        assert_eq!(state.selection().right.label, "Российский рубль (RUB)");
        assert_eq!(state.result(), Some("1.0000"));
    }

    #[test]
    fn test_select_index_out_of_bounds() {
        let mut state = new_state();
        assert!(state.select_index(Side::Left, 0).is_err());

        state.apply_refresh(Ok(sample()));
        let err = state.select_index(Side::Left, 3).unwrap_err();
        assert!(err.to_string().contains("No currency at index 3"));
    }

    #[test]
    fn test_zero_ratio_record_is_never_selected() {
        let mut state = new_state();
        state.apply_refresh(Ok(vec![CurrencyRecord::new("Void", "VOI", "0")]));

        // The default right pick is rejected and keeps its default ratio.
        assert_eq!(state.selection().right, SelectionState::default().right);
        assert_eq!(state.result(), Some("1.0000"));

        let err = state.select_index(Side::Left, 1).unwrap_err();
        assert!(err.to_string().contains("must be positive"));
        assert_eq!(state.selection().left.ratio, 1.0);
        assert!(state.info().is_none());
    }

    #[tokio::test]
    async fn test_refresh_sequence() {
        let source = ScriptedSource::new(vec![
            Err(anyhow!("connection refused")),
            Ok(sample()),
            Ok(vec![]),
        ]);
        let mut state = new_state();

        assert_eq!(
            refresh(&mut state, &source).await,
            RefreshOutcome::Failed { initialized: false }
        );
        assert_eq!(
            refresh(&mut state, &source).await,
            RefreshOutcome::Initialized { count: 3 }
        );
        assert_eq!(
            refresh(&mut state, &source).await,
            RefreshOutcome::Failed { initialized: true }
        );
        assert_eq!(state.result(), Some("0.5000"));
    }
}
