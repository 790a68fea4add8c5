//! CEE Impact CLI
//!
//! Loads a CEE case export, enriches it, prints the KPI summary, and
//! optionally writes the enriched table (CSV) and the projection series
//! (JSON) for the presentation layer.

use anyhow::Context;
use cee_impact::{
    load_records,
    projection::DEFAULT_HORIZON_YEARS,
    EnrichConfig, ProjectionConfig, ReportRunner,
};
use clap::Parser;
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cee_impact", about = "CEE record enrichment and savings projection")]
struct Cli {
    /// Input CEE export (CSV)
    input: PathBuf,

    /// Real-efficiency rate applied to converted savings, in (0, 1]
    #[arg(long, default_value_t = 0.45)]
    efficiency: f64,

    /// Projection horizon in years beyond the current year (10-40)
    #[arg(long, default_value_t = DEFAULT_HORIZON_YEARS)]
    horizon: u32,

    /// Write the enriched table to this CSV path
    #[arg(long)]
    enriched_out: Option<PathBuf>,

    /// Write the projection series to this JSON path
    #[arg(long)]
    projection_out: Option<PathBuf>,

    /// Print the hypothesis set as JSON and exit
    #[arg(long)]
    hypotheses: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let runner = ReportRunner::new();

    if cli.hypotheses {
        println!("{}", runner.hypotheses().to_json_pretty()?);
        return Ok(());
    }

    let records = load_records(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    log::info!("loaded {} records from {}", records.len(), cli.input.display());

    let enrich_config = EnrichConfig::new(cli.efficiency)?;
    let projection_config = ProjectionConfig::new(cli.horizon)?;

    let (enriched, series) = runner.run(&records, enrich_config, projection_config);
    let summary = runner.summarize(&enriched);

    println!("CEE Impact v{}", env!("CARGO_PKG_VERSION"));
    println!("==========================\n");
    println!("Cases processed:        {}", summary.case_count);
    println!("Distinct operations:    {}", summary.distinct_operations);
    println!("Volume CEE:             {:.1} GWh cumac", summary.total_gwh_cumac);
    println!(
        "Real savings:           {:.1} GWh/yr (efficiency {:.0}%)",
        summary.total_gwh_real_annual,
        cli.efficiency * 100.0
    );
    println!("CO2 avoided:            {:.0} t/yr", summary.total_co2_tonnes_annual);
    println!(
        "Household equivalents:  {:.0} (≈ {})",
        summary.total_household_equivalents, summary.reference_city
    );
    println!("Subsidies paid:         {:.1} k€", summary.total_subsidies_eur / 1000.0);
    println!(
        "Avoided costs:          {:.1} k€/yr",
        summary.total_avoided_cost_eur_annual / 1000.0
    );
    println!(
        "Cars removed (equiv.):  {:.0}",
        summary.cars_removed_equivalent
    );

    if series.is_empty() {
        println!("\nNo deposit years in the table; projection skipped.");
    } else {
        let first = series.totals.first().expect("non-empty series");
        let last = series.totals.last().expect("non-empty series");
        println!(
            "\nProjection {}-{}: {:.1} GWh/yr peak active flow",
            first.year,
            last.year,
            series
                .totals
                .iter()
                .map(|t| t.savings_gwh)
                .fold(0.0_f64, f64::max)
        );
    }

    if let Some(path) = &cli.enriched_out {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("creating {}", path.display()))?;
        for record in &enriched {
            writer.serialize(record)?;
        }
        writer.flush()?;
        println!("\nEnriched table written to: {}", path.display());
    }

    if let Some(path) = &cli.projection_out {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(file, &series)?;
        println!("Projection series written to: {}", path.display());
    }

    Ok(())
}
