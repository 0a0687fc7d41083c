//! # fiscal-report CLI
//!
//! Usage:
//!   fiscal-report render input.json -o report.pdf
//!   cat input.json | fiscal-report render - --variant nfse
//!   fiscal-report example > input.json

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use fiscal_report::{
    layout_info, parse_request, render_to_file, CompanyGroup, DocumentLine, ReportConfig,
    ReportError, ReportRequest, ReportStamp, ReportVariant, Result,
};

#[derive(Parser)]
#[command(name = "fiscal-report")]
#[command(version, about = "Paginated PDF reports for fiscal document listings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a report request (JSON) to PDF
    Render {
        /// Input JSON file, or "-" for stdin
        input: String,

        /// Output PDF path
        #[arg(short, long, default_value = "report.pdf")]
        output: PathBuf,

        /// Report variant (nfe or nfse); overrides the config file
        #[arg(long)]
        variant: Option<ReportVariant>,

        /// TOML file with layout overrides
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Repeat the table header when a company continues on a new page
        #[arg(long)]
        repeat_header: bool,

        /// Generation time printed in the header (default: now)
        #[arg(long, value_name = "YYYY-MM-DDTHH:MM")]
        generated_at: Option<String>,

        /// Print layout metadata as JSON instead of writing a PDF
        #[arg(long)]
        layout_json: bool,
    },

    /// Print a sample report request
    Example {
        /// Variant the sample is meant for
        #[arg(long, default_value_t = ReportVariant::Nfe)]
        variant: ReportVariant,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            input,
            output,
            variant,
            config,
            repeat_header,
            generated_at,
            layout_json,
        } => cmd_render(
            &input,
            &output,
            variant,
            config.as_deref(),
            repeat_header,
            generated_at.as_deref(),
            layout_json,
        ),
        Commands::Example { variant } => cmd_example(variant),
    }
}

fn cmd_render(
    input: &str,
    output: &Path,
    variant: Option<ReportVariant>,
    config: Option<&Path>,
    repeat_header: bool,
    generated_at: Option<&str>,
    layout_json: bool,
) -> Result<()> {
    let mut report_config = match config {
        Some(path) => ReportConfig::load(path)?,
        None => ReportConfig::default(),
    };
    if let Some(variant) = variant {
        report_config.variant = variant;
    }
    if repeat_header {
        report_config.repeat_header_on_break = Some(true);
    }
    let layout = report_config.into_layout()?;

    let request = parse_request(&read_input(input)?)?;
    let stamp = match generated_at {
        Some(raw) => parse_stamp(raw)?,
        None => ReportStamp::now(),
    };

    if layout_json {
        let info = layout_info(&request, &layout, &stamp);
        let json = serde_json::to_string_pretty(&info)
            .map_err(|e| ReportError::Render(e.to_string()))?;
        println!("{json}");
        return Ok(());
    }

    let path = render_to_file(&request, &layout, &stamp, output)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| ReportError::io("<stdin>", e))?;
        Ok(buf)
    } else {
        fs::read_to_string(input).map_err(|e| ReportError::io(input, e))
    }
}

fn parse_stamp(raw: &str) -> Result<ReportStamp> {
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(ReportStamp::new)
        .ok_or_else(|| ReportError::Config(format!("invalid --generated-at '{raw}'")))
}

fn cmd_example(variant: ReportVariant) -> Result<()> {
    let request = example_request(variant);
    let json =
        serde_json::to_string_pretty(&request).map_err(|e| ReportError::Render(e.to_string()))?;
    println!("{json}");
    Ok(())
}

fn example_request(variant: ReportVariant) -> ReportRequest {
    let supplier = match variant {
        ReportVariant::Nfe => "Distribuidora de Alimentos Bom Preço Ltda",
        ReportVariant::Nfse => "Consultoria e Assessoria Contábil Horizonte S/S Ltda",
    };
    let documents = vec![
        DocumentLine {
            number: "000101".to_string(),
            issue_date: "2024-01-05".to_string(),
            supplier_name: supplier.to_string(),
            supplier_tax_id: "11222333000181".to_string(),
            amount: Decimal::new(15000, 2),
        },
        DocumentLine {
            number: "000102".to_string(),
            issue_date: "2024-01-19".to_string(),
            supplier_name: "Papelaria Central".to_string(),
            supplier_tax_id: "44555666000107".to_string(),
            amount: Decimal::new(20000, 2),
        },
    ];
    ReportRequest {
        period_start: "2024-01-01".to_string(),
        period_end: "2024-01-31".to_string(),
        companies: vec![CompanyGroup {
            name: "Empresa Exemplo Ltda".to_string(),
            tax_id: Some("12345678000190".to_string()),
            documents,
            total: Decimal::new(35000, 2),
        }],
        total_general: Some(Decimal::new(35000, 2)),
    }
}
