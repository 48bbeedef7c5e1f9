use crate::domain::model::{RegionProfile, RoiRange};
use crate::utils::error::{Result, SolarError};
use crate::utils::validation::{
    validate_non_empty_string, validate_non_negative_amount, validate_positive_amount,
};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Immutable set of region profiles keyed by region identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionTable {
    profiles: BTreeMap<String, RegionProfile>,
}

static BUILTIN: LazyLock<RegionTable> = LazyLock::new(RegionTable::builtin_profiles);

impl RegionTable {
    /// 建立前先檢查每個區域的不變量，之後不再提供可變存取
    pub fn new(profiles: BTreeMap<String, RegionProfile>) -> Result<Self> {
        if profiles.is_empty() {
            return Err(SolarError::ConfigValidationError {
                field: "regions".to_string(),
                message: "At least one region must be defined".to_string(),
            });
        }

        for (key, profile) in &profiles {
            validate_profile(key, profile)?;
        }

        Ok(Self { profiles })
    }

    /// Process-wide default table (Bruxelles, Flandre, Wallonie).
    pub fn builtin() -> &'static RegionTable {
        &BUILTIN
    }

    pub fn get(&self, key: &str) -> Result<&RegionProfile> {
        self.profiles.get(key).ok_or_else(|| SolarError::UnknownRegion {
            key: key.to_string(),
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.profiles.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RegionProfile)> {
        self.profiles.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    fn builtin_profiles() -> RegionTable {
        let mut profiles = BTreeMap::new();
        profiles.insert(
            "bruxelles".to_string(),
            profile(
                "Bruxelles",
                3.8,
                350.0,
                1200.0,
                [(6.0, 8.0), (4.0, 6.0), (3.0, 5.0), (2.0, 4.0), (1.0, 3.0)],
            ),
        );
        profiles.insert(
            "flandre".to_string(),
            profile(
                "Flandre",
                3.9,
                340.0,
                1250.0,
                [(7.0, 9.0), (5.0, 7.0), (4.0, 6.0), (3.0, 5.0), (2.0, 4.0)],
            ),
        );
        profiles.insert(
            "wallonie".to_string(),
            profile(
                "Wallonie",
                3.7,
                360.0,
                1150.0,
                [(7.0, 9.0), (5.0, 7.0), (4.0, 6.0), (3.0, 5.0), (2.0, 4.0)],
            ),
        );
        RegionTable { profiles }
    }
}

const STANDARD_BREAKPOINTS: [u32; 5] = [3, 6, 9, 12, 16];

fn profile(
    name: &str,
    sun_hours: f64,
    cost_per_panel: f64,
    production_per_panel: f64,
    ranges: [(f64, f64); 5],
) -> RegionProfile {
    RegionProfile {
        name: name.to_string(),
        average_sun_hours: sun_hours,
        average_cost_per_panel: cost_per_panel,
        average_production_per_panel: production_per_panel,
        roi_ranges: STANDARD_BREAKPOINTS
            .iter()
            .zip(ranges)
            .map(|(&bp, (min, max))| (bp, RoiRange { min, max }))
            .collect(),
    }
}

pub fn validate_profile(key: &str, profile: &RegionProfile) -> Result<()> {
    validate_non_empty_string("regions", key)?;
    validate_non_empty_string(&format!("regions.{}.name", key), &profile.name)?;
    validate_positive_amount(
        &format!("regions.{}.average_cost_per_panel", key),
        profile.average_cost_per_panel,
    )?;
    validate_non_negative_amount(
        &format!("regions.{}.average_sun_hours", key),
        profile.average_sun_hours,
    )?;
    validate_non_negative_amount(
        &format!("regions.{}.average_production_per_panel", key),
        profile.average_production_per_panel,
    )?;

    if profile.roi_ranges.is_empty() {
        return Err(SolarError::ConfigValidationError {
            field: format!("regions.{}.roi_ranges", key),
            message: "At least one breakpoint is required".to_string(),
        });
    }

    for (breakpoint, range) in &profile.roi_ranges {
        let field = format!("regions.{}.roi_ranges.{}", key, breakpoint);
        if *breakpoint == 0 {
            return Err(SolarError::InvalidConfigValueError {
                field,
                value: breakpoint.to_string(),
                reason: "Breakpoints must be positive panel counts".to_string(),
            });
        }
        validate_positive_amount(&format!("{}.min", field), range.min)?;
        validate_positive_amount(&format!("{}.max", field), range.max)?;
        if range.min > range.max {
            return Err(SolarError::InvalidConfigValueError {
                field,
                value: format!("{}..{}", range.min, range.max),
                reason: "min must not exceed max".to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_has_three_regions() {
        let table = RegionTable::builtin();
        let keys: Vec<&str> = table.keys().collect();
        assert_eq!(keys, vec!["bruxelles", "flandre", "wallonie"]);
    }

    #[test]
    fn test_builtin_table_satisfies_invariants() {
        for (key, profile) in RegionTable::builtin().iter() {
            validate_profile(key, profile).unwrap();
            let breakpoints: Vec<u32> = profile.breakpoints().collect();
            assert_eq!(breakpoints, vec![3, 6, 9, 12, 16]);
        }
    }

    #[test]
    fn test_bruxelles_profile() {
        let bxl = RegionTable::builtin().get("bruxelles").unwrap();
        assert_eq!(bxl.name, "Bruxelles");
        assert_eq!(bxl.average_cost_per_panel, 350.0);
        assert_eq!(bxl.roi_ranges[&9], RoiRange { min: 3.0, max: 5.0 });
    }

    #[test]
    fn test_unknown_region() {
        let err = RegionTable::builtin().get("unknown").unwrap_err();
        assert!(matches!(err, SolarError::UnknownRegion { ref key } if key == "unknown"));
    }

    #[test]
    fn test_new_rejects_inverted_range() {
        let mut bad = RegionTable::builtin().get("flandre").unwrap().clone();
        bad.roi_ranges.insert(6, RoiRange { min: 8.0, max: 5.0 });
        let mut profiles = BTreeMap::new();
        profiles.insert("flandre".to_string(), bad);
        assert!(RegionTable::new(profiles).is_err());
    }

    #[test]
    fn test_new_rejects_free_panels_and_empty_tables() {
        let mut bad = RegionTable::builtin().get("wallonie").unwrap().clone();
        bad.average_cost_per_panel = 0.0;
        let mut profiles = BTreeMap::new();
        profiles.insert("wallonie".to_string(), bad);
        assert!(RegionTable::new(profiles).is_err());
        assert!(RegionTable::new(BTreeMap::new()).is_err());
    }

    #[test]
    fn test_new_rejects_non_finite_descriptive_figures() {
        let base = RegionTable::builtin().get("bruxelles").unwrap().clone();
        for (sun_hours, production) in [(f64::NAN, 1050.0), (3.0, f64::INFINITY), (-1.0, 1050.0)] {
            let bad = RegionProfile {
                average_sun_hours: sun_hours,
                average_production_per_panel: production,
                ..base.clone()
            };
            let err = validate_profile("bruxelles", &bad).unwrap_err();
            assert!(
                matches!(err, SolarError::InvalidConfigValueError { .. }),
                "{sun_hours} {production}"
            );
        }
    }
}
