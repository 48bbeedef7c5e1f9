use anyhow::Result;
use solar_estimator::adapters::mailer::{OutboxEntry, OUTBOX_DIR};
use solar_estimator::core::forms::Envelope;
use solar_estimator::domain::model::FormKind;
use solar_estimator::{FormService, LocalStorage, OutboxMailer};
use tempfile::TempDir;

fn outbox_entries(dir: &std::path::Path) -> Result<Vec<OutboxEntry>> {
    let mut paths: Vec<_> = std::fs::read_dir(dir.join(OUTBOX_DIR))?
        .map(|e| e.map(|e| e.path()))
        .collect::<std::io::Result<_>>()?;
    paths.sort();

    let mut entries = Vec::new();
    for path in paths {
        entries.push(serde_json::from_slice(&std::fs::read(path)?)?);
    }
    Ok(entries)
}

#[tokio::test]
async fn test_contact_and_appointment_are_queued() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mailer = OutboxMailer::new(LocalStorage::new(temp_dir.path()));
    let service = FormService::new(mailer, Envelope::new("site <noreply@example.be>", "devis@example.be"));

    let contact = service
        .submit_contact_json(r#"{"name":"Alex","email":"alex@example.be","message":"Bonjour"}"#)
        .await;
    assert_eq!(contact.status, 200);
    assert_eq!(contact.message, "Email sent successfully!");

    let appointment = service
        .submit_appointment_json(
            r#"{"name":"Dupont","prenom":"Sam","email":"sam@example.be","phone":"0470","address":"Rue Haute 1"}"#,
        )
        .await;
    assert_eq!(appointment.status, 200);
    assert_eq!(appointment.message, "Appointment request sent successfully!");

    let entries = outbox_entries(temp_dir.path())?;
    assert_eq!(entries.len(), 2);

    let kinds: Vec<FormKind> = entries.iter().map(|e| e.message.kind).collect();
    assert!(kinds.contains(&FormKind::Contact));
    assert!(kinds.contains(&FormKind::Appointment));
    for entry in &entries {
        assert_eq!(entry.message.to, "devis@example.be");
        assert_eq!(entry.message.from, "site <noreply@example.be>");
    }
    Ok(())
}

#[tokio::test]
async fn test_rejected_forms_are_not_queued() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let service = FormService::new(
        OutboxMailer::new(LocalStorage::new(temp_dir.path())),
        Envelope::default(),
    );

    let response = service
        .submit_contact_json(r#"{"name":"Alex","email":"","message":"Bonjour"}"#)
        .await;
    assert_eq!(response.status, 400);
    assert_eq!(response.message, "All fields are required");
    assert!(!temp_dir.path().join(OUTBOX_DIR).exists());
    Ok(())
}

#[tokio::test]
async fn test_unwritable_outbox_reports_failure() -> Result<()> {
    let temp_dir = TempDir::new()?;
    // 以檔案佔住 outbox 路徑，建立目錄必定失敗
    let blocker = temp_dir.path().join("blocked");
    std::fs::write(&blocker, b"")?;

    let service = FormService::new(
        OutboxMailer::new(LocalStorage::new(&blocker)),
        Envelope::default(),
    );
    let response = service
        .submit_appointment_json(
            r#"{"name":"Dupont","prenom":"Sam","email":"sam@example.be","phone":"0470","address":"Rue Haute 1"}"#,
        )
        .await;

    assert_eq!(response.status, 500);
    assert_eq!(response.message, "Failed to send appointment request");
    Ok(())
}
