/// Command handlers behind the CLI
use std::io::IsTerminal;
use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use dialoguer::Input;
use tracing::{debug, info};

use ledgerline_api::{start_http_server, AppState};
use ledgerline_common::Error;
use ledgerline_core::entry::{find, for_product};
use ledgerline_core::{ArgSpec, EntryPoint, Product, Settings};
use ledgerline_ethereum::run;

type Ask = fn(&ArgSpec) -> ledgerline_common::Result<Option<String>>;

/// Options shared by every invocation command
pub struct InvokeOptions {
    pub decimals: Option<u32>,
    pub json: bool,
    pub no_prompt: bool,
}

/// Print the entry-point table, optionally for one product
pub fn list(product: Option<Product>) {
    let products: Vec<Product> = match product {
        Some(product) => vec![product],
        None => Product::ALL.to_vec(),
    };

    for product in products {
        println!("{}", product);
        for entry in for_product(product) {
            let args: Vec<String> = entry.args.iter().map(|a| format!("<{}>", a.name)).collect();
            let mode = if entry.requires_signer { "write" } else { "read" };
            println!(
                "  {:<18} {:<5} {:<32} {}",
                entry.command,
                mode,
                args.join(" "),
                entry.about
            );
        }
    }
}

/// Resolve an entry point, fill its arguments and run it against the node
pub async fn invoke(
    config: Option<&Path>,
    product: Product,
    command: &str,
    given: Vec<String>,
    options: InvokeOptions,
) -> Result<()> {
    let entry = find(product, command).ok_or_else(|| {
        Error::validation(format!(
            "unknown {} command '{}'; run `ledgerline list {}`",
            product, command, product
        ))
    })?;

    let interactive = !options.no_prompt && std::io::stdin().is_terminal();
    let raw = collect_arguments(entry, given, interactive.then_some(prompt as Ask))?;

    let settings = Settings::load(config)?;
    debug!(entry = %entry.qualified_name(), "invoking");
    let outcome = run(&settings, entry, &raw, options.decimals).await?;

    if options.json {
        let json = serde_json::to_string_pretty(&outcome.to_json())
            .context("failed to serialize result")?;
        println!("{}", json);
    } else {
        println!("{}", outcome.display());
    }
    Ok(())
}

/// Run the form API until the process is stopped
pub async fn serve(config: Option<&Path>, host: &str, port: u16, decimals: Option<u32>) -> Result<()> {
    let settings = Settings::load(config)?;
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| Error::config(format!("Invalid server address {}:{}: {}", host, port, e)))?;

    info!(%addr, "starting form API");
    start_http_server(addr, AppState::new(settings, decimals)).await?;
    Ok(())
}

/// Line up positional values with the entry's arguments. Missing ones are
/// asked for when `ask` is given; blank answers stay missing.
pub fn collect_arguments<F>(
    entry: &EntryPoint,
    given: Vec<String>,
    ask: Option<F>,
) -> ledgerline_common::Result<Vec<Option<String>>>
where
    F: Fn(&ArgSpec) -> ledgerline_common::Result<Option<String>>,
{
    let mut raw: Vec<Option<String>> = given.into_iter().map(Some).collect();
    if let Some(ask) = ask {
        for spec in entry.args.iter().skip(raw.len()) {
            raw.push(ask(spec)?);
        }
    }
    Ok(raw)
}

fn prompt(spec: &ArgSpec) -> ledgerline_common::Result<Option<String>> {
    let value: String = Input::new()
        .with_prompt(format!("{} ({})", spec.prompt, spec.kind.hint()))
        .allow_empty(true)
        .interact_text()
        .map_err(|e| Error::Io(format!("failed to read {}: {}", spec.name, e)))?;

    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_without_prompting_keeps_given_values() {
        let entry = find(Product::Token, "transfer").unwrap();
        let raw = collect_arguments(entry, vec!["0xabc".to_string()], None::<Ask>).unwrap();
        assert_eq!(raw, vec![Some("0xabc".to_string())]);

        let err = entry.prepare(&raw, 18).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_collect_prompts_only_for_missing_arguments() {
        let entry = find(Product::Deposit, "get-deposit").unwrap();
        let asked = std::cell::RefCell::new(Vec::new());
        let ask = |spec: &ArgSpec| -> ledgerline_common::Result<Option<String>> {
            asked.borrow_mut().push(spec.name);
            Ok(Some("3".to_string()))
        };

        let raw = collect_arguments(entry, vec!["0xowner".to_string()], Some(ask)).unwrap();
        assert_eq!(raw, vec![Some("0xowner".to_string()), Some("3".to_string())]);
        assert_eq!(*asked.borrow(), vec!["index"]);
    }

    #[test]
    fn test_blank_answer_stays_missing() {
        let entry = find(Product::CreditCard, "freeze-card").unwrap();
        let raw = collect_arguments(entry, vec![], Some(|_: &ArgSpec| Ok(None))).unwrap();
        assert_eq!(raw, vec![None]);
        assert!(matches!(entry.prepare(&raw, 18), Err(Error::Validation(_))));
    }
}
