use super::ui;
use crate::core::{CurrencyCode, ExchangeRateProvider, RateTable, ServiceError};
use crate::service::ConversionService;
use anyhow::Result;
use comfy_table::Cell;

impl RateTable {
    /// Renders the table, optionally restricted to `only`. Codes in `only`
    /// that the provider did not return are an error.
    pub fn display_as_table(&self, only: &[CurrencyCode]) -> Result<String, ServiceError> {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Currency"),
            ui::header_cell(&format!("Rate (1 {})", self.base)),
        ]);

        if only.is_empty() {
            for (code, rate) in &self.rates {
                table.add_row(vec![Cell::new(code), ui::rate_cell(*rate)]);
            }
        } else {
            for code in only {
                let rate = self
                    .rate_for(code)
                    .ok_or_else(|| ServiceError::UnknownCurrency(code.clone()))?;
                table.add_row(vec![Cell::new(code), ui::rate_cell(rate)]);
            }
        }

        Ok(format!(
            "Rates for {}\n\n{}",
            ui::style_text(self.base.as_str(), ui::StyleType::Title),
            table
        ))
    }
}

pub async fn run_table<P: ExchangeRateProvider>(
    service: &ConversionService<P>,
    base: &str,
    only: &[String],
) -> Result<()> {
    let base = CurrencyCode::parse(base)?;
    let only = only
        .iter()
        .map(|c| CurrencyCode::parse(c))
        .collect::<Result<Vec<_>, _>>()?;

    let pb = ui::new_spinner("Fetching exchange rates...");
    let table = service.fetch_rate_table(&base).await;
    pb.finish_and_clear();

    println!("{}", table?.display_as_table(&only)?);
    Ok(())
}

pub async fn run_pair<P: ExchangeRateProvider>(
    service: &ConversionService<P>,
    base: &str,
    target: &str,
) -> Result<()> {
    let base = CurrencyCode::parse(base)?;
    let target = CurrencyCode::parse(target)?;

    let pb = ui::new_spinner("Fetching exchange rate...");
    let rate = service.fetch_rate(&base, &target).await;
    pb.finish_and_clear();

    let line = format!("1 {base} = {:.4} {target}", rate?);
    println!("{}", ui::style_text(&line, ui::StyleType::Result));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn code(s: &str) -> CurrencyCode {
        CurrencyCode::parse(s).unwrap()
    }

    fn table() -> RateTable {
        RateTable {
            base: code("USD"),
            rates: BTreeMap::from([(code("EUR"), 0.9213), (code("INR"), 83.1234)]),
        }
    }

    #[test]
    fn test_display_all_rates() {
        let output = console::strip_ansi_codes(&table().display_as_table(&[]).unwrap()).to_string();
        assert!(output.contains("Rates for USD"));
        assert!(output.contains("Rate (1 USD)"));
        assert!(output.contains("EUR"));
        assert!(output.contains("0.9213"));
        assert!(output.contains("83.1234"));
    }

    #[test]
    fn test_display_filtered_rates() {
        let output = console::strip_ansi_codes(&table().display_as_table(&[code("INR")]).unwrap())
            .to_string();
        assert!(output.contains("83.1234"));
        assert!(!output.contains("EUR"));
    }

    #[test]
    fn test_display_unknown_filter_code() {
        let result = table().display_as_table(&[code("JPY")]);
        assert_eq!(result.unwrap_err(), ServiceError::UnknownCurrency(code("JPY")));
    }
}
