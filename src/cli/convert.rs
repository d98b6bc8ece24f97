use super::{load_state, view::View};
use crate::core::config::BaseCurrencyConfig;
use crate::core::currency::{CurrencySource, find_by_code};
use crate::core::refresh::AppState;
use crate::core::selection::Side;
use anyhow::{Context, Result, anyhow};

/// Selects `left` and `right` by char code and returns the rendered view.
pub fn convert(state: &mut AppState, left: &str, right: &str) -> Result<View> {
    for (side, code) in [(Side::Left, left), (Side::Right, right)] {
        let record = find_by_code(state.currencies(), code)
            .cloned()
            .ok_or_else(|| anyhow!("Unknown currency code: {}", code))?;
        state
            .select(side, &record)
            .with_context(|| format!("Cannot use {code} on the {side} side"))?;
    }
    Ok(View::render(state))
}

pub async fn run(
    source: &dyn CurrencySource,
    base: BaseCurrencyConfig,
    left: &str,
    right: &str,
) -> Result<()> {
    let mut state = load_state(source, base).await?;
    let view = convert(&mut state, left, right)?;
    print!("{view}");
    Ok(())
}
