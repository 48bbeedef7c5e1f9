use crate::domain::model::{AppointmentForm, ContactForm, EmailMessage, FormKind};
use crate::utils::error::{Result, SolarError};

pub const DEFAULT_MAIL_FROM: &str = "cv services Contact <onboarding@resend.dev>";
pub const DEFAULT_MAIL_TO: &str = "info@cvservices.be";

/// Sender and recipient shared by every outgoing form message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub from: String,
    pub to: String,
}

impl Envelope {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new(DEFAULT_MAIL_FROM, DEFAULT_MAIL_TO)
    }
}

fn require_all(fields: &[(&str, &str)]) -> Result<()> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SolarError::ValidationError {
            message: format!("Missing required fields: {}", missing.join(", ")),
        })
    }
}

impl ContactForm {
    pub fn validate(&self) -> Result<()> {
        require_all(&[
            ("name", self.name.as_str()),
            ("email", self.email.as_str()),
            ("message", self.message.as_str()),
        ])
    }

    pub fn compose(&self, envelope: &Envelope) -> EmailMessage {
        let header = format!("cv services Contact ({}, {})", self.name, self.email);
        EmailMessage {
            kind: FormKind::Contact,
            from: envelope.from.clone(),
            to: envelope.to.clone(),
            reply_to: self.email.clone(),
            subject: header.clone(),
            text: format!(
                "{}\nMESSAGE UNDERNEATH THIS LINE\n-------------------------------------\n\n{}",
                header, self.message
            ),
            html: None,
        }
    }
}

impl AppointmentForm {
    pub fn validate(&self) -> Result<()> {
        require_all(&[
            ("name", self.name.as_str()),
            ("prenom", self.prenom.as_str()),
            ("email", self.email.as_str()),
            ("phone", self.phone.as_str()),
            ("address", self.address.as_str()),
        ])
    }

    fn labelled_fields(&self) -> [(&'static str, &str); 5] {
        [
            ("Name", self.name.as_str()),
            ("Prenom", self.prenom.as_str()),
            ("Email", self.email.as_str()),
            ("Phone", self.phone.as_str()),
            ("Address", self.address.as_str()),
        ]
    }

    pub fn compose(&self, envelope: &Envelope) -> EmailMessage {
        let fields = self.labelled_fields();

        let mut text = String::from("cv services Appointment Request\n\n");
        for (label, value) in &fields {
            text.push_str(&format!("{}: {}\n", label, value));
        }

        let mut html = String::from("<h2>cv services Appointment Request</h2>\n");
        for (label, value) in &fields {
            html.push_str(&format!(
                "<p><strong>{}:</strong> {}</p>\n",
                label,
                escape_html(value)
            ));
        }

        EmailMessage {
            kind: FormKind::Appointment,
            from: envelope.from.clone(),
            to: envelope.to.clone(),
            reply_to: self.email.clone(),
            subject: format!("cv services Appointment Request ({})", self.name),
            text,
            html: Some(html),
        }
    }
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
