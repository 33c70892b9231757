//! Access details returned alongside gated content

use serde::Serialize;

use crate::infrastructure::gate::AccessGrant;

/// Subscription details for the watermark and renewal banner
#[derive(Debug, Clone, Serialize)]
pub struct AccessInfo {
    pub key_mask: String,
    pub days_remaining: i64,
    pub expiring_soon: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl From<&AccessGrant> for AccessInfo {
    fn from(grant: &AccessGrant) -> Self {
        Self {
            key_mask: grant.key_mask().to_string(),
            days_remaining: grant.days_remaining(),
            expiring_soon: grant.expiring_soon(),
            warning: grant.warning.clone(),
        }
    }
}
