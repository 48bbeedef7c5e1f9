use crate::core::forms::{Envelope, DEFAULT_MAIL_FROM, DEFAULT_MAIL_TO};
use crate::core::regions::RegionTable;
use crate::core::ConfigProvider;
use crate::domain::model::{Assumptions, RegionProfile, RoiRange};
use crate::utils::error::{Result, SolarError};
use crate::utils::validation::{validate_non_empty_string, validate_positive_amount, Validate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// TOML 檔的原始結構；每個區塊都可省略
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub assumptions: Option<Assumptions>,
    pub mail: Option<MailConfig>,
    pub regions: Option<BTreeMap<String, RegionConfig>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionConfig {
    pub name: String,
    pub average_sun_hours: f64,
    pub average_cost_per_panel: f64,
    pub average_production_per_panel: f64,
    /// TOML 的 key 一律是字串，載入時再轉成面板數
    pub roi_ranges: BTreeMap<String, RoiRange>,
}

impl RegionConfig {
    fn into_profile(self, key: &str) -> Result<RegionProfile> {
        let mut roi_ranges = BTreeMap::new();
        for (breakpoint, range) in self.roi_ranges {
            let panels: u32 = breakpoint.trim().parse().map_err(|_| {
                SolarError::InvalidConfigValueError {
                    field: format!("regions.{}.roi_ranges", key),
                    value: breakpoint.clone(),
                    reason: "Breakpoint must be a whole number of panels".to_string(),
                }
            })?;
            roi_ranges.insert(panels, range);
        }

        Ok(RegionProfile {
            name: self.name,
            average_sun_hours: self.average_sun_hours,
            average_cost_per_panel: self.average_cost_per_panel,
            average_production_per_panel: self.average_production_per_panel,
            roi_ranges,
        })
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SolarError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SolarError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MAIL_TO})，未設定的保留原字串
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SolarError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 轉成已驗證的站台設定；沒有 `[regions]` 時沿用內建表
    pub fn into_site_config(self) -> Result<SiteConfig> {
        let regions = match self.regions {
            Some(raw) => {
                let mut profiles = BTreeMap::new();
                for (key, region) in raw {
                    let profile = region.into_profile(&key)?;
                    profiles.insert(key, profile);
                }
                RegionTable::new(profiles)?
            }
            None => RegionTable::builtin().clone(),
        };

        let mail = self.mail.unwrap_or(MailConfig { from: None, to: None });
        let envelope = Envelope::new(
            mail.from.unwrap_or_else(|| DEFAULT_MAIL_FROM.to_string()),
            mail.to.unwrap_or_else(|| DEFAULT_MAIL_TO.to_string()),
        );

        let config = SiteConfig {
            regions,
            assumptions: self.assumptions.unwrap_or_default(),
            envelope,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Resolved, validated configuration shared by the CLI and the lambda.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub regions: RegionTable,
    pub assumptions: Assumptions,
    pub envelope: Envelope,
}

impl SiteConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        TomlConfig::from_file(path)?.into_site_config()
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        TomlConfig::from_toml_str(content)?.into_site_config()
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            regions: RegionTable::builtin().clone(),
            assumptions: Assumptions::default(),
            envelope: Envelope::default(),
        }
    }
}

impl ConfigProvider for SiteConfig {
    fn regions(&self) -> &RegionTable {
        &self.regions
    }

    fn assumptions(&self) -> Assumptions {
        self.assumptions
    }

    fn mail_from(&self) -> &str {
        &self.envelope.from
    }

    fn mail_to(&self) -> &str {
        &self.envelope.to
    }
}

impl Validate for SiteConfig {
    fn validate(&self) -> Result<()> {
        validate_positive_amount("assumptions.price_per_kwh", self.assumptions.price_per_kwh)?;
        validate_positive_amount("assumptions.co2_kg_per_kwh", self.assumptions.co2_kg_per_kwh)?;
        validate_non_empty_string("mail.from", &self.envelope.from)?;
        validate_non_empty_string("mail.to", &self.envelope.to)?;
        let addresses = [
            ("mail.from", &self.envelope.from),
            ("mail.to", &self.envelope.to),
        ];
        for (field, value) in addresses {
            if value.contains("${") {
                return Err(SolarError::InvalidConfigValueError {
                    field: field.to_string(),
                    value: value.clone(),
                    reason: "Environment variable is not set".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_builtin_table() {
        let config = SiteConfig::from_toml_str("").unwrap();
        assert_eq!(config.regions().len(), 3);
        assert_eq!(config.assumptions(), Assumptions::default());
        assert_eq!(config.mail_to(), DEFAULT_MAIL_TO);
    }

    #[test]
    fn test_parse_regions_and_assumptions() {
        let toml_content = r#"
[assumptions]
price_per_kwh = 0.3

[regions.liege]
name = "Liège"
average_sun_hours = 3.6
average_cost_per_panel = 365
average_production_per_panel = 1100

[regions.liege.roi_ranges]
4 = { min = 7, max = 9 }
10 = { min = 4.5, max = 6 }
"#;

        let config = SiteConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.regions().len(), 1);
        assert_eq!(config.assumptions().price_per_kwh, 0.3);
        assert_eq!(config.assumptions().co2_kg_per_kwh, Assumptions::CO2_KG_PER_KWH);

        let liege = config.regions().get("liege").unwrap();
        let breakpoints: Vec<u32> = liege.breakpoints().collect();
        assert_eq!(breakpoints, vec![4, 10]);
        assert_eq!(liege.roi_ranges[&10], RoiRange { min: 4.5, max: 6.0 });
    }

    #[test]
    fn test_invalid_breakpoint_key() {
        let toml_content = r#"
[regions.x]
name = "X"
average_sun_hours = 3.0
average_cost_per_panel = 300
average_production_per_panel = 1000

[regions.x.roi_ranges]
many = { min = 1, max = 2 }
"#;
        assert!(SiteConfig::from_toml_str(toml_content).is_err());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let toml_content = r#"
[regions.x]
name = "X"
average_sun_hours = 3.0
average_cost_per_panel = 300
average_production_per_panel = 1000

[regions.x.roi_ranges]
6 = { min = 9, max = 2 }
"#;
        assert!(SiteConfig::from_toml_str(toml_content).is_err());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SOLAR_TEST_MAIL_TO", "devis@example.be");

        let toml_content = r#"
[mail]
to = "${SOLAR_TEST_MAIL_TO}"
"#;

        let config = SiteConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.mail_to(), "devis@example.be");
        assert_eq!(config.mail_from(), DEFAULT_MAIL_FROM);

        std::env::remove_var("SOLAR_TEST_MAIL_TO");
    }

    #[test]
    fn test_unset_env_var_fails_validation() {
        let toml_content = r#"
[mail]
to = "${SOLAR_TEST_SURELY_UNSET_VAR}"
"#;
        assert!(SiteConfig::from_toml_str(toml_content).is_err());
    }

    #[test]
    fn test_unset_env_var_in_sender_fails_validation() {
        let toml_content = r#"
[mail]
from = "cv services <${SOLAR_TEST_SURELY_UNSET_SENDER}>"
"#;
        let err = SiteConfig::from_toml_str(toml_content).unwrap_err();
        assert!(
            matches!(err, SolarError::InvalidConfigValueError { ref field, .. } if field == "mail.from")
        );
    }

    #[test]
    fn test_non_positive_price_rejected() {
        let toml_content = r#"
[assumptions]
price_per_kwh = 0
"#;
        assert!(SiteConfig::from_toml_str(toml_content).is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[mail]\nfrom = \"site <noreply@example.be>\"\n")
            .unwrap();

        let config = SiteConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.mail_from(), "site <noreply@example.be>");
    }
}
