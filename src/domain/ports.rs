use crate::core::regions::RegionTable;
use crate::domain::model::{Assumptions, EmailMessage};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn regions(&self) -> &RegionTable;
    fn assumptions(&self) -> Assumptions;
    fn mail_from(&self) -> &str;
    fn mail_to(&self) -> &str;
}

/// 寄送管道。實際的郵件服務商不在本 crate 內。
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<()>;
}
