use crate::utils::error::SolarError;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Payback period in years for one breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoiRange {
    pub min: f64,
    pub max: f64,
}

impl RoiRange {
    pub fn average(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

/// Static per-region constants. Read-only once the table is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionProfile {
    pub name: String,
    pub average_sun_hours: f64,
    pub average_cost_per_panel: f64,
    pub average_production_per_panel: f64,
    /// 面板數斷點 -> 回本年數範圍 (BTreeMap 保證由小到大掃描)
    pub roi_ranges: BTreeMap<u32, RoiRange>,
}

impl RegionProfile {
    pub fn breakpoints(&self) -> impl Iterator<Item = u32> + '_ {
        self.roi_ranges.keys().copied()
    }
}

/// 單價與排放係數，預設 €0.25/kWh、0.3 kg CO₂/kWh
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assumptions {
    #[serde(default = "Assumptions::default_price_per_kwh")]
    pub price_per_kwh: f64,
    #[serde(default = "Assumptions::default_co2_kg_per_kwh")]
    pub co2_kg_per_kwh: f64,
}

impl Assumptions {
    pub const PRICE_PER_KWH: f64 = 0.25;
    pub const CO2_KG_PER_KWH: f64 = 0.3;

    fn default_price_per_kwh() -> f64 {
        Self::PRICE_PER_KWH
    }

    fn default_co2_kg_per_kwh() -> f64 {
        Self::CO2_KG_PER_KWH
    }
}

impl Default for Assumptions {
    fn default() -> Self {
        Self {
            price_per_kwh: Self::PRICE_PER_KWH,
            co2_kg_per_kwh: Self::CO2_KG_PER_KWH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateRequest {
    pub region_key: String,
    pub panel_count: i64,
}

impl EstimateRequest {
    pub fn new(region_key: impl Into<String>, panel_count: i64) -> Self {
        Self {
            region_key: region_key.into(),
            panel_count,
        }
    }
}

/// JSON 入口的估算請求；面板數先收成任意 JSON 值再轉整數
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatePayload {
    #[serde(default)]
    pub region_key: String,
    #[serde(default)]
    pub panel_count: serde_json::Value,
}

impl TryFrom<EstimatePayload> for EstimateRequest {
    type Error = SolarError;

    fn try_from(payload: EstimatePayload) -> std::result::Result<Self, Self::Error> {
        let reject = |reason: &str| {
            SolarError::invalid_input("panel_count", &payload.panel_count, reason)
        };

        let number = match &payload.panel_count {
            serde_json::Value::Number(number) => number,
            _ => return Err(reject("must be a number")),
        };

        let panel_count = if let Some(count) = number.as_i64() {
            count
        } else if number.is_u64() {
            return Err(reject("is out of range"));
        } else {
            // 9.0 視為整數，9.5 拒絕
            match number.as_f64() {
                Some(value) if value.fract() == 0.0 && value.abs() < i64::MAX as f64 => {
                    value as i64
                }
                Some(value) if value.fract() == 0.0 => return Err(reject("is out of range")),
                _ => return Err(reject("must be a whole number of panels")),
            }
        };

        Ok(EstimateRequest::new(payload.region_key, panel_count))
    }
}

/// Figures derived for one request. Values are unrounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateResult {
    pub region_key: String,
    pub region_name: String,
    pub panel_count: i64,
    pub breakpoint: u32,
    pub snapped: bool,
    pub total_cost: f64,
    pub yearly_production_kwh: f64,
    pub yearly_savings: f64,
    pub payback_min: f64,
    pub payback_max: f64,
    pub average_roi_years: f64,
    pub production_per_panel_kwh: f64,
    pub co2_reduction_kg: f64,
}

/// 缺欄位或 `null` 都當成空字串，交給 validate() 回 400
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppointmentForm {
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub prenom: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub phone: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    Contact,
    Appointment,
}

impl FormKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormKind::Contact => "contact",
            FormKind::Appointment => "appointment",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub kind: FormKind,
    pub from: String,
    pub to: String,
    pub reply_to: String,
    pub subject: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormResponse {
    pub status: u16,
    pub message: String,
}

impl FormResponse {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: &str) -> EstimatePayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_integer_payload_converts() {
        let request =
            EstimateRequest::try_from(payload(r#"{"region_key":"bruxelles","panel_count":9}"#))
                .unwrap();
        assert_eq!(request, EstimateRequest::new("bruxelles", 9));

        let request =
            EstimateRequest::try_from(payload(r#"{"region_key":"flandre","panel_count":12.0}"#))
                .unwrap();
        assert_eq!(request.panel_count, 12);
    }

    #[test]
    fn test_fractional_or_missing_count_is_invalid_input() {
        for json in [
            r#"{"region_key":"bruxelles","panel_count":9.5}"#,
            r#"{"region_key":"bruxelles","panel_count":"9"}"#,
            r#"{"region_key":"bruxelles"}"#,
            r#"{"region_key":"bruxelles","panel_count":18446744073709551615}"#,
        ] {
            let err = EstimateRequest::try_from(payload(json)).unwrap_err();
            assert!(matches!(err, SolarError::InvalidInput { .. }), "{json}");
        }
    }

    #[test]
    fn test_null_form_fields_become_empty() {
        let form: ContactForm =
            serde_json::from_str(r#"{"name":null,"email":"a@b.c","message":"hi"}"#).unwrap();
        assert_eq!(form.name, "");
        assert_eq!(form.email, "a@b.c");

        let form: AppointmentForm = serde_json::from_str(r#"{"prenom":null}"#).unwrap();
        assert_eq!(form, AppointmentForm::default());
    }
}
