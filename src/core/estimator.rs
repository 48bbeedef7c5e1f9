use crate::core::regions::RegionTable;
use crate::domain::model::{Assumptions, EstimateRequest, EstimateResult, RegionProfile};
use crate::utils::error::{Result, SolarError};

/// 最接近的斷點；距離相同時取較小者 (由小到大掃描，嚴格 `<`)
pub fn closest_breakpoint<I>(breakpoints: I, panel_count: i64) -> Option<u32>
where
    I: IntoIterator<Item = u32>,
{
    breakpoints.into_iter().reduce(|best, candidate| {
        if i64::from(candidate).abs_diff(panel_count) < i64::from(best).abs_diff(panel_count) {
            candidate
        } else {
            best
        }
    })
}

/// Computes the savings estimate for `panel_count` panels in one region.
///
/// The profile is only read; the derived per-panel production is returned
/// in the result instead of being stored anywhere.
pub fn estimate(
    region_key: &str,
    profile: &RegionProfile,
    panel_count: i64,
    assumptions: &Assumptions,
) -> Result<EstimateResult> {
    if panel_count <= 0 {
        return Err(SolarError::invalid_input(
            "panel_count",
            panel_count,
            "must be a positive number of panels",
        ));
    }
    let panels = panel_count as f64;

    let breakpoint = closest_breakpoint(profile.breakpoints(), panel_count).ok_or_else(|| {
        SolarError::ConfigValidationError {
            field: format!("regions.{}.roi_ranges", region_key),
            message: "Region defines no breakpoints".to_string(),
        }
    })?;
    let roi = profile.roi_ranges[&breakpoint];

    let total_cost = profile.average_cost_per_panel * panels;
    let average_roi_years = roi.average();
    let yearly_savings = total_cost / average_roi_years;
    let yearly_production_kwh = yearly_savings / assumptions.price_per_kwh;
    let production_per_panel_kwh = yearly_production_kwh / panels;
    let co2_reduction_kg = yearly_production_kwh * assumptions.co2_kg_per_kwh;

    tracing::debug!(
        region = region_key,
        panel_count,
        breakpoint,
        total_cost,
        yearly_savings,
        "estimate computed"
    );

    Ok(EstimateResult {
        region_key: region_key.to_string(),
        region_name: profile.name.clone(),
        panel_count,
        breakpoint,
        snapped: i64::from(breakpoint) != panel_count,
        total_cost,
        yearly_production_kwh,
        yearly_savings,
        payback_min: roi.min,
        payback_max: roi.max,
        average_roi_years,
        production_per_panel_kwh,
        co2_reduction_kg,
    })
}

/// Estimator bound to a region table and a set of assumptions.
#[derive(Debug, Clone)]
pub struct Estimator<'a> {
    regions: &'a RegionTable,
    assumptions: Assumptions,
}

impl<'a> Estimator<'a> {
    pub fn new(regions: &'a RegionTable, assumptions: Assumptions) -> Self {
        Self {
            regions,
            assumptions,
        }
    }

    pub fn regions(&self) -> &'a RegionTable {
        self.regions
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    pub fn estimate(&self, request: &EstimateRequest) -> Result<EstimateResult> {
        let profile = self.regions.get(&request.region_key)?;
        estimate(
            &request.region_key,
            profile,
            request.panel_count,
            &self.assumptions,
        )
    }

    /// 對一段面板數區間逐一估算 (含頭尾)
    pub fn schedule(&self, region_key: &str, from: i64, to: i64) -> Result<Vec<EstimateResult>> {
        if from > to {
            return Err(SolarError::invalid_input(
                "panel_count",
                format!("{}..{}", from, to),
                "range start must not exceed range end",
            ));
        }
        let profile = self.regions.get(region_key)?;
        (from..=to)
            .map(|count| estimate(region_key, profile, count, &self.assumptions))
            .collect()
    }
}

impl Estimator<'static> {
    pub fn builtin() -> Self {
        Self::new(RegionTable::builtin(), Assumptions::default())
    }
}
