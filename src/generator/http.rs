use crate::model::{Method, Script, Step};
use crate::{ForgeError, Result};

pub struct HttpGenerator;

impl HttpGenerator {
    /// Build a one-step GET script for a bare URL
    pub fn generate(raw_url: &str) -> Result<Script> {
        let raw_url = raw_url.trim();
        let parsed =
            url::Url::parse(raw_url).map_err(|_| ForgeError::InvalidUrl(raw_url.to_string()))?;

        if !matches!(parsed.scheme(), "http" | "https") || !parsed.has_host() {
            return Err(ForgeError::InvalidUrl(raw_url.to_string()));
        }

        let step = Step::new(Method::Get.as_str(), raw_url);
        Ok(Script::new(vec![step]).with_id(uuid::Uuid::new_v4().to_string()))
    }
}
