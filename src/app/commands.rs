use crate::adapters::mailer::{LogMailer, OutboxMailer};
use crate::adapters::storage::LocalStorage;
use crate::app::report::{render_estimate, render_regions, write_schedule_csv};
use crate::config::cli::{Command, DeliveryArgs, OutputFormat};
use crate::config::toml_config::SiteConfig;
use crate::core::estimator::Estimator;
use crate::core::form_service::FormService;
use crate::core::ConfigProvider;
use crate::domain::model::{AppointmentForm, ContactForm, EstimateRequest, FormResponse};
use crate::utils::error::Result;

/// 執行結果：要輸出的文字，以及表單指令的回應
#[derive(Debug)]
pub enum CommandOutput {
    Text(String),
    Form(FormResponse),
    Written(String),
}

pub async fn run(command: &Command, site: &SiteConfig) -> Result<CommandOutput> {
    let estimator = Estimator::new(site.regions(), site.assumptions());

    match command {
        Command::Estimate {
            region,
            panels,
            format,
        } => {
            let result = estimator.estimate(&EstimateRequest::new(region.as_str(), *panels))?;
            let text = match format {
                OutputFormat::Text => render_estimate(&result),
                OutputFormat::Json => serde_json::to_string_pretty(&result)?,
            };
            Ok(CommandOutput::Text(text))
        }
        Command::Regions { format } => {
            let text = match format {
                OutputFormat::Text => render_regions(site.regions()),
                OutputFormat::Json => {
                    let profiles: std::collections::BTreeMap<_, _> = site.regions().iter().collect();
                    serde_json::to_string_pretty(&profiles)?
                }
            };
            Ok(CommandOutput::Text(text))
        }
        Command::Schedule {
            region,
            from,
            to,
            output,
        } => {
            let rows = estimator.schedule(region, *from, *to)?;
            tracing::debug!("Computed {} schedule rows for {}", rows.len(), region);
            match output {
                Some(path) => {
                    let file = std::fs::File::create(path)?;
                    write_schedule_csv(file, &rows)?;
                    Ok(CommandOutput::Written(path.clone()))
                }
                None => {
                    let mut buffer = Vec::new();
                    write_schedule_csv(&mut buffer, &rows)?;
                    Ok(CommandOutput::Text(String::from_utf8_lossy(&buffer).into_owned()))
                }
            }
        }
        Command::Contact {
            name,
            email,
            message,
            delivery,
        } => {
            let form = ContactForm {
                name: name.clone(),
                email: email.clone(),
                message: message.clone(),
            };
            let response = if delivery.dry_run {
                FormService::new(LogMailer, site.envelope().clone())
                    .submit_contact(&form)
                    .await
            } else {
                outbox_service(delivery, site).submit_contact(&form).await
            };
            Ok(CommandOutput::Form(response))
        }
        Command::Appointment {
            name,
            prenom,
            email,
            phone,
            address,
            delivery,
        } => {
            let form = AppointmentForm {
                name: name.clone(),
                prenom: prenom.clone(),
                email: email.clone(),
                phone: phone.clone(),
                address: address.clone(),
            };
            let response = if delivery.dry_run {
                FormService::new(LogMailer, site.envelope().clone())
                    .submit_appointment(&form)
                    .await
            } else {
                outbox_service(delivery, site)
                    .submit_appointment(&form)
                    .await
            };
            Ok(CommandOutput::Form(response))
        }
    }
}

fn outbox_service(
    delivery: &DeliveryArgs,
    site: &SiteConfig,
) -> FormService<OutboxMailer<LocalStorage>> {
    let storage = LocalStorage::new(delivery.outbox.as_str());
    FormService::new(OutboxMailer::new(storage), site.envelope().clone())
}
