use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::Table;
use pcr_catalog::{
    Assumptions, Calculation, Session, DEFAULT_CO2E_AVOIDED_KG_PER_KG_PCR,
    MTCO2E_PER_VEHICLE_MILE,
};

#[derive(ValueEnum, Debug, Clone, Default)]
pub enum CalcFormat {
    #[default]
    Table,
    Json,
}

impl std::fmt::Display for CalcFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CalcFormat::Table => write!(f, "table"),
            CalcFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Args, Debug, Clone)]
#[command(about = "Compute PCR mass and CO2e avoided for a purchased part")]
pub struct CalcArgs {
    /// Catalog spreadsheet (.xlsx/.xls) or delimited file (.csv/.tsv/.txt)
    #[arg(short = 'F', long = "file", value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub file: PathBuf,

    /// Vendor part number
    #[arg(value_name = "PART")]
    pub part: String,

    /// Units purchased
    #[arg(value_name = "UNITS")]
    pub units: u64,

    /// kg CO2e avoided per kg PCR vs virgin resin
    #[arg(long = "factor", value_name = "KG_PER_KG", default_value_t = DEFAULT_CO2E_AVOIDED_KG_PER_KG_PCR)]
    pub factor: f64,

    /// Override the catalog's PCR content percent for this calculation
    #[arg(long = "pcr-override", value_name = "PERCENT")]
    pub pcr_override: Option<f64>,

    /// Output format
    #[arg(short, long, default_value_t = CalcFormat::Table)]
    pub format: CalcFormat,
}

pub fn execute(args: CalcArgs) -> Result<()> {
    let part = args.part.trim().to_string();
    if part.is_empty() || args.units == 0 {
        anyhow::bail!("enter a vendor part number and a non-zero unit count to calculate");
    }

    let assumptions = Assumptions::new(args.factor, MTCO2E_PER_VEHICLE_MILE)?;
    let session = Session::new(args.file, assumptions);
    let calc = session.evaluate(&part, args.units, args.pcr_override)?;

    let mut writer = io::stdout().lock();
    match args.format {
        CalcFormat::Json => writeln!(writer, "{}", serde_json::to_string_pretty(&calc)?)?,
        CalcFormat::Table => write_calc_table(&part, args.units, &calc, writer)?,
    }
    Ok(())
}

fn write_calc_table<W: Write>(
    part: &str,
    units: u64,
    calc: &Calculation,
    mut writer: W,
) -> io::Result<()> {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Metric", "Value"]);

    let mut row = |metric: &str, value: String| {
        table.add_row(vec![metric.to_string(), value]);
    };
    row("Part", part.to_string());
    row("Units purchased", units.to_string());
    row("Plastic used (lbs)", format!("{:.2}", calc.total_lbs));
    row("PCR used (lbs)", format!("{:.2}", calc.pcr_lbs));
    row(
        "Effective PCR content (%)",
        format!("{:.1}", calc.effective_pcr_percent),
    );
    if let Some(impact) = &calc.impact {
        row("PCR used (kg)", format!("{:.2}", impact.pcr_kg));
        row("CO2e avoided (kg)", format!("{:.2}", impact.avoided_kg));
        row(
            "CO2e avoided (metric tons)",
            format!("{:.3}", impact.avoided_metric_tons),
        );
        row(
            "Equivalent passenger-vehicle miles",
            format!("{:.0}", impact.miles_equivalent),
        );
    }

    writeln!(writer, "{table}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcr_catalog::{compute, CalcInput, CatalogRecord};

    #[test]
    fn test_calc_table_rows() {
        let record = CatalogRecord {
            part_number: "3001".to_string(),
            unit_weight_g: Some(50.0),
            pcr_percent: Some(30.0),
            ..Default::default()
        };
        let input = CalcInput {
            units_purchased: 1000,
            avoidance_factor: Some(1.70),
            ..Default::default()
        };
        let calc = compute(&record, &input).unwrap();

        let mut out = Vec::new();
        write_calc_table("3001", 1000, &calc, &mut out).unwrap();
        let rendered = String::from_utf8(out).unwrap();

        assert!(rendered.contains("Plastic used (lbs)"));
        assert!(rendered.contains("110.23"));
        assert!(rendered.contains("33.07"));
        assert!(rendered.contains("CO2e avoided (kg)"));
        assert!(rendered.contains("25.50"));
        assert!(rendered.contains("CO2e avoided (metric tons)"));
    }
}
