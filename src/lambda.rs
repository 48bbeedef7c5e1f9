#[cfg(feature = "lambda")]
use aws_config::BehaviorVersion;
#[cfg(feature = "lambda")]
use aws_sdk_s3::config::Region;
#[cfg(feature = "lambda")]
use aws_sdk_s3::Client as S3Client;
#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use solar_estimator::app::handler::{RequestHandler, Response};
#[cfg(feature = "lambda")]
use solar_estimator::config::lambda::{LambdaConfig, S3Storage};
#[cfg(feature = "lambda")]
use solar_estimator::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use solar_estimator::{FormService, OutboxMailer, SiteConfig};

#[cfg(feature = "lambda")]
type Handler = RequestHandler<SiteConfig, OutboxMailer<S3Storage>>;

#[cfg(feature = "lambda")]
async fn function_handler(
    handler: &Handler,
    event: LambdaEvent<serde_json::Value>,
) -> Result<Response, Error> {
    Ok(handler.handle_value(event.payload).await)
}

#[cfg(feature = "lambda")]
fn build_handler(config: &LambdaConfig, s3_client: &S3Client) -> Handler {
    let forms = match &config.outbox_bucket {
        Some(bucket) => {
            let storage = S3Storage::new(
                s3_client.clone(),
                bucket.clone(),
                config.outbox_prefix.clone(),
            );
            Some(FormService::new(
                OutboxMailer::new(storage),
                config.envelope().clone(),
            ))
        }
        None => {
            tracing::warn!("OUTBOX_BUCKET not set, form submissions will fail");
            None
        }
    };
    RequestHandler::new(config.site.clone(), forms)
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    let config = LambdaConfig::from_env()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;
    config
        .validate()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;
    if config.uses_default_recipients() {
        tracing::warn!("MAIL_FROM/MAIL_TO not set, using default recipients");
    }

    let aws = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let s3_config = aws_sdk_s3::config::Builder::from(&aws)
        .region(Region::new(config.s3_region.clone()))
        .build();
    let s3_client = S3Client::from_conf(s3_config);

    let handler = build_handler(&config, &s3_client);
    let handler = &handler;
    run(service_fn(move |event: LambdaEvent<serde_json::Value>| async move {
        function_handler(handler, event).await
    }))
    .await
}
