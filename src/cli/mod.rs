pub mod convert;
pub mod list;
pub mod setup;
pub mod ui;
pub mod view;
pub mod watch;

use crate::core::config::BaseCurrencyConfig;
use crate::core::currency::CurrencySource;
use crate::core::refresh::{AppState, FETCH_FAILED_MESSAGE};
use anyhow::{Context, Result, bail};

/// Fetches the list once for the one-shot commands. Unlike the watch loop,
/// a failed fetch is an error here.
pub async fn load_state(
    source: &dyn CurrencySource,
    base: BaseCurrencyConfig,
) -> Result<AppState> {
    let pb = ui::new_spinner("Fetching currency rates...");
    let fetched = source.fetch_currencies().await;
    pb.finish_and_clear();

    let records = fetched.context(FETCH_FAILED_MESSAGE)?;
    if records.is_empty() {
        bail!("{}: empty currency list", FETCH_FAILED_MESSAGE);
    }

    let mut state = AppState::new(base);
    state.apply_refresh(Ok(records));
    Ok(state)
}
