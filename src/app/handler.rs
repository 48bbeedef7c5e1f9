use crate::core::estimator::Estimator;
use crate::core::form_service::{unavailable_response, FormService};
use crate::domain::model::{
    AppointmentForm, ContactForm, EstimatePayload, EstimateRequest, EstimateResult, FormKind,
    FormResponse,
};
use crate::domain::ports::{ConfigProvider, Mailer};
use crate::utils::error::{Result, SolarError};
use serde::{Deserialize, Serialize};

/// 單一入口的事件，依 `action` 欄位分派
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Request {
    Estimate(EstimatePayload),
    Contact(ContactForm),
    Appointment(AppointmentForm),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate: Option<EstimateResult>,
}

impl Response {
    fn status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            estimate: None,
        }
    }

    /// 輸入錯誤回 400，其餘錯誤回 500
    pub fn from_estimate(outcome: Result<EstimateResult>) -> Self {
        match outcome {
            Ok(result) => Self {
                status: 200,
                message: "ok".to_string(),
                estimate: Some(result),
            },
            Err(e @ (SolarError::InvalidInput { .. } | SolarError::UnknownRegion { .. })) => {
                tracing::warn!("⚠️ Estimate rejected: {}", e);
                Self::status(400, e.user_friendly_message())
            }
            Err(e) => {
                tracing::error!("❌ Estimate failed: {}", e);
                Self::status(500, "Estimate unavailable")
            }
        }
    }
}

impl From<FormResponse> for Response {
    fn from(r: FormResponse) -> Self {
        Self::status(r.status, r.message)
    }
}

/// Routes decoded events to the estimator or the form service.
///
/// `forms` is `None` when no delivery channel is configured; form actions then
/// answer with the usual 500 failure message.
pub struct RequestHandler<C: ConfigProvider, M: Mailer> {
    config: C,
    forms: Option<FormService<M>>,
}

impl<C: ConfigProvider, M: Mailer> RequestHandler<C, M> {
    pub fn new(config: C, forms: Option<FormService<M>>) -> Self {
        Self { config, forms }
    }

    pub fn forms(&self) -> Option<&FormService<M>> {
        self.forms.as_ref()
    }

    pub fn estimate(&self, payload: EstimatePayload) -> Response {
        let estimator = Estimator::new(self.config.regions(), self.config.assumptions());
        Response::from_estimate(
            EstimateRequest::try_from(payload).and_then(|request| estimator.estimate(&request)),
        )
    }

    pub async fn handle(&self, request: Request) -> Response {
        let response = match request {
            Request::Estimate(payload) => self.estimate(payload),
            Request::Contact(form) => match &self.forms {
                Some(service) => service.submit_contact(&form).await.into(),
                None => unavailable(FormKind::Contact),
            },
            Request::Appointment(form) => match &self.forms {
                Some(service) => service.submit_appointment(&form).await.into(),
                None => unavailable(FormKind::Appointment),
            },
        };

        tracing::info!("Handled request with status {}", response.status);
        response
    }

    /// 原始 JSON 事件；無法辨識的事件或 action 回 400
    pub async fn handle_value(&self, event: serde_json::Value) -> Response {
        match serde_json::from_value::<Request>(event) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                tracing::warn!("⚠️ Unrecognised event: {}", e);
                Response::status(400, "Unrecognised request")
            }
        }
    }
}

fn unavailable(kind: FormKind) -> Response {
    tracing::error!("❌ No delivery channel configured for {} form", kind.as_str());
    unavailable_response(kind).into()
}
