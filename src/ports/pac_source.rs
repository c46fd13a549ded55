use crate::domain::Result;
use async_trait::async_trait;

/// Port for fetching a PAC script
#[async_trait]
pub trait PacSourcePort: Send + Sync {
    /// Where the script comes from, for logging
    fn location(&self) -> &str;

    /// Fetch the script text
    async fn fetch(&self) -> Result<String>;
}
