use clap::Parser;
use colored::*;
use std::process;

use agent2mcp::cli::Args;
use agent2mcp::config::Config;
use agent2mcp::error::Result;
use agent2mcp::mcp::{response, McpSseClient};

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let config = Config::from_env_and_args(&args);

    init_tracing(config.verbose);

    if let Err(e) = run_demo(&args, &config).await {
        eprintln!("{} {}", "Error:".red(), e);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "agent2mcp=debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_demo(args: &Args, config: &Config) -> Result<()> {
    println!("{}", format!("Connecting to {}", config.base_url).dimmed());

    let mut client = McpSseClient::new(config)?;
    let session_id = client.initialize().await?;
    println!("{} {}", "Session initialized:".green(), session_id);

    if !args.skip_discovery {
        match client.list_tools().await {
            Ok(tools) => {
                println!("{}", format!("Server exposes {} tools", tools.len()).dimmed());
                if config.verbose {
                    for tool in &tools {
                        println!(
                            "  - {} {}",
                            tool.name.cyan(),
                            tool.description.as_deref().unwrap_or("").dimmed()
                        );
                    }
                }
            }
            Err(e) => {
                eprintln!(
                    "{}",
                    format!("Tool discovery failed, continuing without it: {}", e).yellow()
                );
            }
        }
    }

    if let Some(invoice_id) = &args.invoice {
        let invoice = client.get_invoice(invoice_id).await?;
        print_tool_response("getInvoice", &invoice);
        return Ok(());
    }

    let invoices = client.list_invoices().await?;
    print_tool_response("listInvoices", &invoices);

    let (start_date, end_date) = Config::current_year_range();
    let total = client.total_invoice_amount(&start_date, &end_date).await?;
    print_tool_response("totalInvoiceAmount", &total);

    Ok(())
}

fn print_tool_response(name: &str, payload: &serde_json::Value) {
    if let Some((code, message)) = response::extract_error(payload) {
        eprintln!(
            "{}",
            format!("{} failed with JSON-RPC error {}: {}", name, code, message).red()
        );
        return;
    }

    match response::extract_text(payload) {
        Ok(Some(text)) => {
            println!("{}", format!("--- {} ---", name).bold());
            println!("{}", text);
        }
        Ok(None) => {
            println!("{}", format!("{} returned no text content", name).yellow());
        }
        Err(e) => {
            eprintln!("{}", format!("{} response was not a tool result: {}", name, e).red());
        }
    }
}
