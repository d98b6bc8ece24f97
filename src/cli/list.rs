use super::{load_state, ui, view::View};
use crate::core::config::BaseCurrencyConfig;
use crate::core::currency::CurrencySource;
use crate::core::selection::Side;
use anyhow::Result;

/// Prints every currency the source knows about, home currency first.
pub async fn run(source: &dyn CurrencySource, base: BaseCurrencyConfig) -> Result<()> {
    let state = load_state(source, base).await?;
    let view = View::render(&state);

    println!(
        "\n{}",
        ui::style_text("Currencies", ui::StyleType::Title)
    );
    println!("{}", view.list_table(Side::Left));
    if let Some(updated_at) = &view.updated_at {
        println!(
            "{}",
            ui::style_text(&format!("Rates updated at {updated_at}"), ui::StyleType::Subtle)
        );
    }
    Ok(())
}
