use crate::core::forms::Envelope;
use crate::domain::model::{AppointmentForm, ContactForm, EmailMessage, FormKind, FormResponse};
use crate::domain::ports::Mailer;
use serde::de::DeserializeOwned;

const ALL_FIELDS_REQUIRED: &str = "All fields are required";

fn success_message(kind: FormKind) -> &'static str {
    match kind {
        FormKind::Contact => "Email sent successfully!",
        FormKind::Appointment => "Appointment request sent successfully!",
    }
}

fn failure_message(kind: FormKind) -> &'static str {
    match kind {
        FormKind::Contact => "Failed to send email",
        FormKind::Appointment => "Failed to send appointment request",
    }
}

/// 寄送管道不可用時的回應，與寄送失敗相同
pub fn unavailable_response(kind: FormKind) -> FormResponse {
    FormResponse::new(500, failure_message(kind))
}

/// 表單送出處理：驗證 -> 組信 -> 交給 Mailer，失敗不重試
pub struct FormService<M: Mailer> {
    mailer: M,
    envelope: Envelope,
}

impl<M: Mailer> FormService<M> {
    pub fn new(mailer: M, envelope: Envelope) -> Self {
        Self { mailer, envelope }
    }

    pub fn mailer(&self) -> &M {
        &self.mailer
    }

    pub async fn submit_contact(&self, form: &ContactForm) -> FormResponse {
        if let Err(e) = form.validate() {
            tracing::warn!("⚠️ Contact form rejected: {}", e);
            return FormResponse::new(400, ALL_FIELDS_REQUIRED);
        }
        self.deliver(form.compose(&self.envelope)).await
    }

    pub async fn submit_appointment(&self, form: &AppointmentForm) -> FormResponse {
        if let Err(e) = form.validate() {
            tracing::warn!("⚠️ Appointment form rejected: {}", e);
            return FormResponse::new(400, ALL_FIELDS_REQUIRED);
        }
        self.deliver(form.compose(&self.envelope)).await
    }

    pub async fn submit_contact_json(&self, body: &str) -> FormResponse {
        match parse_body::<ContactForm>(body, FormKind::Contact) {
            Ok(form) => self.submit_contact(&form).await,
            Err(response) => response,
        }
    }

    pub async fn submit_appointment_json(&self, body: &str) -> FormResponse {
        match parse_body::<AppointmentForm>(body, FormKind::Appointment) {
            Ok(form) => self.submit_appointment(&form).await,
            Err(response) => response,
        }
    }

    async fn deliver(&self, message: EmailMessage) -> FormResponse {
        let kind = message.kind;
        match self.mailer.send(&message).await {
            Ok(()) => {
                tracing::info!("📨 {} form delivered to {}", kind.as_str(), message.to);
                FormResponse::new(200, success_message(kind))
            }
            Err(e) => {
                tracing::error!("❌ Email sending error: {}", e);
                FormResponse::new(500, failure_message(kind))
            }
        }
    }
}

// 無法解析的 body 與寄送失敗同樣回 500
fn parse_body<T: DeserializeOwned>(
    body: &str,
    kind: FormKind,
) -> std::result::Result<T, FormResponse> {
    serde_json::from_str(body).map_err(|e| {
        tracing::error!("❌ Could not parse {} payload: {}", kind.as_str(), e);
        FormResponse::new(500, failure_message(kind))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::{Result, SolarError};
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct RecordingMailer {
        sent: Arc<Mutex<Vec<EmailMessage>>>,
        fail: bool,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, message: &EmailMessage) -> Result<()> {
            if self.fail {
                return Err(SolarError::DeliveryError {
                    message: "provider unavailable".to_string(),
                });
            }
            self.sent.lock().await.push(message.clone());
            Ok(())
        }
    }

    fn service(fail: bool) -> FormService<RecordingMailer> {
        let mailer = RecordingMailer {
            fail,
            ..Default::default()
        };
        FormService::new(mailer, Envelope::default())
    }

    #[tokio::test]
    async fn test_contact_success() {
        let service = service(false);
        let response = service
            .submit_contact_json(r#"{"name":"Alex","email":"alex@example.be","message":"Hi"}"#)
            .await;

        assert_eq!(response, FormResponse::new(200, "Email sent successfully!"));
        let sent = service.mailer().sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].reply_to, "alex@example.be");
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let service = service(false);
        let response = service
            .submit_appointment_json(r#"{"name":"Dupont","email":"sam@example.be"}"#)
            .await;

        assert_eq!(response.status, 400);
        assert_eq!(response.message, "All fields are required");
        assert!(service.mailer().sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_mailer_failure_is_server_error() {
        let service = service(true);
        let form = AppointmentForm {
            name: "Dupont".to_string(),
            prenom: "Sam".to_string(),
            email: "sam@example.be".to_string(),
            phone: "0470000000".to_string(),
            address: "Rue Haute 1".to_string(),
        };
        let response = service.submit_appointment(&form).await;
        assert_eq!(
            response,
            FormResponse::new(500, "Failed to send appointment request")
        );
    }

    #[tokio::test]
    async fn test_null_fields_are_bad_request() {
        let service = service(false);
        let response = service
            .submit_contact_json(r#"{"name":null,"email":"alex@example.be","message":"Hi"}"#)
            .await;
        assert_eq!(response, FormResponse::new(400, "All fields are required"));

        let response = service
            .submit_appointment_json(
                r#"{"name":"Dupont","prenom":"Sam","email":"sam@example.be","phone":null,"address":"Rue Haute 1"}"#,
            )
            .await;
        assert_eq!(response, FormResponse::new(400, "All fields are required"));
        assert!(service.mailer().sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_json_is_server_error() {
        let response = service(false).submit_contact_json("{not json").await;
        assert_eq!(response, FormResponse::new(500, "Failed to send email"));
        assert!(!response.is_success());
    }
}
