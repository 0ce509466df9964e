use super::ui;
use crate::core::{CurrencyCatalog, ExchangeRateProvider};
use crate::service::ConversionService;
use anyhow::{Result, bail};
use comfy_table::Cell;

impl CurrencyCatalog {
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![ui::header_cell("Code"), ui::header_cell("Currency")]);

        for entry in self.entries() {
            table.add_row(vec![Cell::new(&entry.code), Cell::new(&entry.name)]);
        }

        format!(
            "{}\n{}",
            table,
            ui::style_text(
                &format!("{} supported currencies", self.len()),
                ui::StyleType::Subtle
            )
        )
    }
}

pub async fn run<P: ExchangeRateProvider>(service: &ConversionService<P>) -> Result<()> {
    let pb = ui::new_spinner("Fetching supported currencies...");
    let catalog = service.fetch_catalog().await;
    pb.finish_and_clear();

    if catalog.is_empty() {
        bail!(
            "Could not fetch the currency list. Please check your API key and internet connection."
        );
    }

    println!("{}", catalog.display_as_table());
    Ok(())
}
