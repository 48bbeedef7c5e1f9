use crate::core::regions::RegionTable;
use crate::domain::model::EstimateResult;
use crate::utils::error::Result;
use crate::utils::format::{format_amount, format_rounded, format_years};
use serde::Serialize;
use std::fmt;
use std::io::Write;

/// 文字版結果，對應網站上的五張卡片
pub struct EstimateReport<'a>(pub &'a EstimateResult);

impl fmt::Display for EstimateReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        writeln!(
            f,
            "Region: {} ({} panels)",
            result.region_name, result.panel_count
        )?;
        if result.snapped {
            writeln!(
                f,
                "* Using nearest reference value: {} panels",
                result.breakpoint
            )?;
        }
        writeln!(f, "Estimated total cost:        {} €", format_amount(result.total_cost))?;
        writeln!(
            f,
            "Estimated yearly production: {} kWh",
            format_rounded(result.yearly_production_kwh)
        )?;
        writeln!(
            f,
            "Estimated yearly savings:    {} €",
            format_rounded(result.yearly_savings)
        )?;
        writeln!(
            f,
            "Payback period:              {} to {} years",
            format_years(result.payback_min),
            format_years(result.payback_max)
        )?;
        writeln!(
            f,
            "Yearly environmental impact: {} kg CO₂ reduction",
            format_rounded(result.co2_reduction_kg)
        )
    }
}

pub struct RegionsReport<'a>(pub &'a RegionTable);

impl fmt::Display for RegionsReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, profile) in self.0.iter() {
            writeln!(
                f,
                "{} ({}): {} €/panel, {} sun hours/day",
                profile.name,
                key,
                format_amount(profile.average_cost_per_panel),
                profile.average_sun_hours
            )?;
            for (breakpoint, range) in &profile.roi_ranges {
                writeln!(
                    f,
                    "  {:>3} panels: {} to {} years",
                    breakpoint,
                    format_years(range.min),
                    format_years(range.max)
                )?;
            }
        }
        Ok(())
    }
}

pub fn render_estimate(result: &EstimateResult) -> String {
    EstimateReport(result).to_string()
}

pub fn render_regions(regions: &RegionTable) -> String {
    RegionsReport(regions).to_string()
}

#[derive(Debug, Serialize)]
struct ScheduleRow<'a> {
    region: &'a str,
    panel_count: i64,
    breakpoint: u32,
    total_cost: f64,
    yearly_production_kwh: f64,
    yearly_savings: f64,
    payback_min: f64,
    payback_max: f64,
    co2_reduction_kg: f64,
}

impl<'a> From<&'a EstimateResult> for ScheduleRow<'a> {
    fn from(r: &'a EstimateResult) -> Self {
        Self {
            region: &r.region_key,
            panel_count: r.panel_count,
            breakpoint: r.breakpoint,
            total_cost: r.total_cost,
            yearly_production_kwh: r.yearly_production_kwh,
            yearly_savings: r.yearly_savings,
            payback_min: r.payback_min,
            payback_max: r.payback_max,
            co2_reduction_kg: r.co2_reduction_kg,
        }
    }
}

pub fn write_schedule_csv<W: Write>(writer: W, rows: &[EstimateResult]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(ScheduleRow::from(row))?;
    }
    csv_writer.flush()?;
    Ok(())
}
