use anyhow::{Context, Result, bail};
use chrono::Datelike;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vatbook_core::{CompanyInfo, Direction, Period, Quarter, VatBox, normalize_month};
use vatbook_finance::{
    PayableSummary, aggregate, calculate_vat, declare, default_rate, explain, validate_vat,
};
use vatbook_ingest::{InvoiceBook, load_register_file};

mod config;
mod output;
mod state;

use output::{now_local, print_json};

#[derive(Parser, Debug)]
#[command(name = "vatbook", version, about = "VAT classification and Dutch return reports")]
struct Cli {
    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Invoice book to read and update (default: ~/.vatbook/book.json)
    #[arg(long, global = true)]
    book: Option<PathBuf>,

    /// Company name printed in report headers
    #[arg(long, global = true)]
    company_name: Option<String>,

    /// Company VAT number printed in report headers
    #[arg(long, global = true)]
    vat_number: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Book register exports (JSON or CSV) into the invoice book
    Ingest {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Category report for a month, quarter, or year
    Report {
        #[command(subcommand)]
        command: ReportCommand,
    },

    /// Five-section Dutch VAT return for one quarter
    Declaration {
        #[arg(long)]
        year: Option<i32>,
        /// 1-4 or Q1-Q4 (default: current quarter)
        #[arg(long)]
        quarter: Option<String>,
    },

    /// Year-level VAT position from invoice tax totals
    Payable {
        #[arg(long)]
        year: Option<i32>,
    },

    /// Classify one line into a return category
    Classify {
        /// Category label as written on the invoice (may be empty)
        #[arg(default_value = "")]
        label: String,
        /// sale or purchase
        #[arg(long = "type", default_value = "sale")]
        direction: String,
        #[arg(long, default_value = "0")]
        rate: String,
        /// ISO country code of the counterparty
        #[arg(long, default_value = "")]
        country: String,
        /// Also print the matching rule
        #[arg(long)]
        explain: bool,
    },

    /// VAT on an amount, optionally checked against an extracted value
    Calc {
        #[arg(allow_negative_numbers = true)]
        amount: Decimal,
        #[arg(long, conflicts_with = "category")]
        rate: Option<Decimal>,
        /// Use the default rate of a return category (e.g. 1b)
        #[arg(long)]
        category: Option<String>,
        /// VAT amount read from the invoice
        #[arg(long, allow_negative_numbers = true)]
        extracted: Option<Decimal>,
    },

    /// Inspect or reset the invoice book
    Book {
        #[command(subcommand)]
        command: BookCommand,
    },

    /// Manage ~/.vatbook/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ReportCommand {
    Monthly {
        #[arg(long)]
        year: Option<i32>,
        /// 1-12 or a month name (default: current month)
        #[arg(long)]
        month: Option<String>,
    },
    Quarterly {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        quarter: Option<String>,
    },
    Yearly {
        #[arg(long)]
        year: Option<i32>,
    },
}

#[derive(Subcommand, Debug)]
enum BookCommand {
    /// Invoice counts per year
    Summary,
    /// Remove every booked invoice
    Clear,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a config template if none exists
    Init,
}

#[derive(Serialize)]
struct YearCount {
    year: Option<i32>,
    invoices: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;
    init_logging(cli.verbose, &cfg.logging.filter);

    let company = cfg.company_info(cli.company_name.clone(), cli.vat_number.clone(), config::process_env);
    let book_path = match &cli.book {
        Some(p) => p.clone(),
        None => state::default_book_path()?,
    };

    match cli.command {
        Command::Ingest { files } => {
            let mut book = state::read_book(&book_path)?;
            let mut records = Vec::new();
            for file in &files {
                let parsed = load_register_file(file).with_context(|| format!("loading {}", file.display()))?;
                info!(file = %file.display(), records = parsed.len(), "loaded register");
                records.extend(parsed);
            }
            let outcome = book.ingest(records);
            state::write_book(&book_path, &book)?;
            eprintln!("{}", outcome.message());
            print_json(&outcome)?;
        }

        Command::Report { command } => {
            let book = state::read_book(&book_path)?;
            let period = match command {
                ReportCommand::Monthly { year, month } => {
                    let month = match month {
                        Some(m) => match normalize_month(&m) {
                            Some(m) => m,
                            None => bail!("invalid month: {m} (use 1-12 or a month name)"),
                        },
                        None => now_local().month(),
                    };
                    Period::month(year_or_current(year), month)
                }
                ReportCommand::Quarterly { year, quarter } => {
                    Period::quarter(year_or_current(year), quarter_or_current(quarter)?)
                }
                ReportCommand::Yearly { year } => Period::year(year_or_current(year)),
            };
            print_report(&book, &period, &company)?;
        }

        Command::Declaration { year, quarter } => {
            let book = state::read_book(&book_path)?;
            let period = Period::quarter(year_or_current(year), quarter_or_current(quarter)?);
            let decl = declare(book.invoices(Some(period.year_value())), &period, &company);
            print_json(&decl)?;
        }

        Command::Payable { year } => {
            let book = state::read_book(&book_path)?;
            let year = year_or_current(year);
            print_json(PayableSummary::from_invoices(year, book.invoices(Some(year))))?;
        }

        Command::Classify { label, direction, rate, country, explain: show_rule } => {
            let Some(dir) = Direction::parse(&direction) else {
                bail!("invalid --type: {direction} (use sale or purchase)");
            };
            let found = explain(&label, Some(dir), vatbook_core::parse_percent(&rate), &country);
            if show_rule {
                println!("{} ({}) via rule {}", found.code, found.code.display_name(), found.rule);
            } else {
                println!("{}", found.code);
            }
        }

        Command::Calc { amount, rate, category, extracted } => {
            let rate = match (rate, category) {
                (Some(r), _) => r,
                (None, Some(c)) => match VatBox::from_code(&c) {
                    Some(code) => default_rate(code),
                    None => bail!("unknown category code: {c}"),
                },
                (None, None) => bail!("pass --rate or --category"),
            };
            let calc = calculate_vat(amount, rate);
            println!("VAT {rate}% on {amount}: {} (total {})", calc.vat_amount, calc.total_with_vat);
            if let Some(extracted) = extracted {
                let check = validate_vat(extracted, amount, rate);
                let verdict = if check.is_valid { "ok" } else { "MISMATCH" };
                println!("extracted {extracted}: difference {} [{verdict}]", check.difference);
            }
        }

        Command::Book { command } => match command {
            BookCommand::Summary => {
                let book = state::read_book(&book_path)?;
                let counts: Vec<YearCount> = book
                    .years()
                    .map(|year| YearCount { year, invoices: book.invoices(year).len() })
                    .collect();
                print_json(serde_json::json!({ "book": book_path, "years": counts }))?;
            }
            BookCommand::Clear => {
                let mut book = state::read_book(&book_path)?;
                let removed = book.len();
                book.clear();
                state::write_book(&book_path, &book)?;
                println!("Removed {removed} invoices from {}", book_path.display());
            }
        },

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
        },
    }

    Ok(())
}

/// RUST_LOG wins, then `-v`, then the config file filter.
fn init_logging(verbose: u8, configured: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::try_new(configured).unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn year_or_current(year: Option<i32>) -> i32 {
    year.unwrap_or_else(|| now_local().year())
}

fn quarter_or_current(quarter: Option<String>) -> Result<Quarter> {
    match quarter {
        Some(q) => Quarter::parse(&q).with_context(|| format!("invalid quarter: {q} (use 1-4 or Q1-Q4)")),
        None => Quarter::of_month(now_local().month()).context("current month out of range"),
    }
}

fn print_report(book: &InvoiceBook, period: &Period, company: &CompanyInfo) -> Result<()> {
    let report = aggregate(book.invoices(Some(period.year_value())), period, company);
    if report.coverage.invoices_in_period == 0 {
        eprintln!("No invoices in {}", period.reporting_label());
    }
    print_json(&report)
}
