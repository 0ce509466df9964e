use super::ui;
use crate::core::config::DefaultsConfig;
use crate::core::{ConversionResult, ExchangeRateProvider};
use crate::service::ConversionService;
use anyhow::{Context, Result};
use std::io::{BufRead, Write};

/// Values given on the command line. Anything missing is asked for.
#[derive(Debug, Default, Clone)]
pub struct ConvertArgs {
    pub base: Option<String>,
    pub target: Option<String>,
    pub amount: Option<String>,
}

/// Line based prompt; an empty answer selects the example shown.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn ask(&mut self, question: &str, default: &str) -> Result<String> {
        write!(self.output, "{question} (e.g., {default}): ")?;
        self.output.flush()?;

        let mut line = String::new();
        self.input
            .read_line(&mut line)
            .context("Failed to read from terminal")?;

        let answer = line.trim();
        if answer.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(answer.to_string())
        }
    }
}

/// Fills in missing arguments by prompting, in base, target, amount order.
pub fn resolve_inputs<R: BufRead, W: Write>(
    args: ConvertArgs,
    defaults: &DefaultsConfig,
    prompter: &mut Prompter<R, W>,
) -> Result<(String, String, String)> {
    let base = match args.base {
        Some(b) => b,
        None => prompter.ask(
            "Enter the three-letter code for the base currency",
            defaults.base.as_str(),
        )?,
    };
    let target = match args.target {
        Some(t) => t,
        None => prompter.ask(
            "Enter the three-letter code for the target currency",
            defaults.target.as_str(),
        )?,
    };
    let amount = match args.amount {
        Some(a) => a,
        None => prompter.ask("Enter the amount to convert", &defaults.amount.to_string())?,
    };
    Ok((base, target, amount))
}

pub fn display_result(result: &ConversionResult) -> String {
    format!(
        "\n{}\n{}",
        ui::style_text("✅ Converted Amount:", ui::StyleType::Title),
        ui::style_text(&result.to_string(), ui::StyleType::Result)
    )
}

pub async fn run<P, R, W>(
    service: &ConversionService<P>,
    args: ConvertArgs,
    defaults: &DefaultsConfig,
    input: R,
    mut output: W,
) -> Result<()>
where
    P: ExchangeRateProvider,
    R: BufRead,
    W: Write,
{
    let (base, target, amount) = {
        let mut prompter = Prompter::new(input, &mut output);
        resolve_inputs(args, defaults, &mut prompter)?
    };

    let pb = ui::new_spinner("Fetching exchange rate...");
    let result = service.convert_input(&base, &target, &amount).await;
    pb.finish_and_clear();

    let result = result?;
    writeln!(output, "{}", display_result(&result))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::RateSource;
    use crate::providers::ExchangeRateApiProvider;
    use std::io::Cursor;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const KEY: &str = "test-key";

    async fn latest_usd_server(expected_calls: u64) -> MockServer {
        let mock_server = MockServer::start().await;
        let body = r#"{
            "result": "success",
            "base_code": "USD",
            "conversion_rates": {"USD": 1, "EUR": 0.92, "INR": 83.12}
        }"#;

        Mock::given(method("GET"))
            .and(path(format!("/{KEY}/latest/USD")))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(expected_calls)
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn service_for(server: &MockServer) -> ConversionService<ExchangeRateApiProvider> {
        let provider =
            ExchangeRateApiProvider::new(&server.uri(), KEY, Duration::from_secs(5)).unwrap();
        ConversionService::new(provider, RateSource::Latest)
    }

    async fn run_with_answers(
        service: &ConversionService<ExchangeRateApiProvider>,
        args: ConvertArgs,
        answers: &str,
    ) -> (Result<()>, String) {
        let mut out = Vec::new();
        let result = run(
            service,
            args,
            &DefaultsConfig::default(),
            Cursor::new(answers.to_string()),
            &mut out,
        )
        .await;
        let transcript = console::strip_ansi_codes(&String::from_utf8(out).unwrap()).to_string();
        (result, transcript)
    }

    fn prompt_with(answers: &str, args: ConvertArgs) -> (Result<(String, String, String)>, String) {
        let mut out = Vec::new();
        let result = {
            let mut prompter = Prompter::new(Cursor::new(answers.to_string()), &mut out);
            resolve_inputs(args, &DefaultsConfig::default(), &mut prompter)
        };
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_prompts_for_everything_missing() {
        let (result, transcript) = prompt_with("eur\ngbp\n12.5\n", ConvertArgs::default());
        let (base, target, amount) = result.unwrap();
        assert_eq!(base, "eur");
        assert_eq!(target, "gbp");
        assert_eq!(amount, "12.5");
        assert!(transcript.contains(
            "Enter the three-letter code for the base currency (e.g., USD): "
        ));
        assert!(transcript.contains(
            "Enter the three-letter code for the target currency (e.g., INR): "
        ));
        assert!(transcript.contains("Enter the amount to convert (e.g., 1): "));
    }

    #[test]
    fn test_empty_answers_use_defaults() {
        let (result, _) = prompt_with("\n\n\n", ConvertArgs::default());
        assert_eq!(
            result.unwrap(),
            ("USD".to_string(), "INR".to_string(), "1".to_string())
        );
    }

    #[test]
    fn test_closed_input_uses_defaults() {
        let (result, _) = prompt_with("", ConvertArgs::default());
        assert_eq!(
            result.unwrap(),
            ("USD".to_string(), "INR".to_string(), "1".to_string())
        );
    }

    #[test]
    fn test_given_arguments_are_not_prompted() {
        let args = ConvertArgs {
            base: Some("JPY".to_string()),
            target: None,
            amount: Some("1000".to_string()),
        };
        let (result, transcript) = prompt_with("CHF\n", args);
        assert_eq!(
            result.unwrap(),
            ("JPY".to_string(), "CHF".to_string(), "1000".to_string())
        );
        assert!(!transcript.contains("base currency"));
        assert!(transcript.contains("target currency"));
        assert!(!transcript.contains("amount"));
    }

    #[tokio::test]
    async fn test_run_prints_converted_amount() {
        let server = latest_usd_server(1).await;
        let service = service_for(&server);

        let (result, transcript) =
            run_with_answers(&service, ConvertArgs::default(), "usd\ninr\n100\n").await;
        assert!(result.is_ok(), "Conversion failed with: {:?}", result.err());
        assert!(transcript.contains("✅ Converted Amount:"));
        assert!(transcript.trim_end().ends_with("100 USD = 8312.00 INR"));
    }

    #[tokio::test]
    async fn test_run_with_empty_answers_uses_defaults() {
        let server = latest_usd_server(1).await;
        let service = service_for(&server);

        let (result, transcript) =
            run_with_answers(&service, ConvertArgs::default(), "\n\n\n").await;
        assert!(result.is_ok(), "Conversion failed with: {:?}", result.err());
        assert!(transcript.trim_end().ends_with("1 USD = 83.12 INR"));
    }

    #[tokio::test]
    async fn test_run_with_invalid_amount_prints_no_result() {
        let server = latest_usd_server(0).await;
        let service = service_for(&server);
        let args = ConvertArgs {
            base: Some("USD".to_string()),
            target: Some("EUR".to_string()),
            amount: Some("abc".to_string()),
        };

        let (result, transcript) = run_with_answers(&service, args, "").await;
        assert!(result.is_err());
        assert!(!transcript.contains("Converted Amount"));
    }

    #[test]
    fn test_display_result_line() {
        let result = ConversionResult {
            amount: 100.0,
            base: "USD".parse().unwrap(),
            target: "INR".parse().unwrap(),
            converted_amount: 8312.456,
        };
        let text = console::strip_ansi_codes(&display_result(&result)).to_string();
        assert!(text.contains("Converted Amount:"));
        assert!(text.ends_with("100 USD = 8312.46 INR"));
    }
}
