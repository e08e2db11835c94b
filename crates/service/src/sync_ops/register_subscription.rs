use chrono::{DateTime, Duration, Utc};
use url::Url;

use common::graph::CreateSubscription;
use common::prelude::{Subscription, SubscriptionRequest};

use crate::config::ConfigError;
use crate::ServiceState;

use super::error::SyncError;

/// Graph caps drive subscriptions just under 30 days.
pub const DEFAULT_EXPIRATION_DAYS: i64 = 29;

const EXPIRATION_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

#[derive(Debug, Clone)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct SubscriptionOptions {
    /// Public url Graph delivers notifications to (defaults to WEBHOOK_URL)
    #[cfg_attr(feature = "clap", arg(long))]
    pub notification_url: Option<Url>,
    /// Days until the subscription expires
    #[cfg_attr(feature = "clap", arg(long, default_value_t = DEFAULT_EXPIRATION_DAYS))]
    pub expiration_days: i64,
}

impl Default for SubscriptionOptions {
    fn default() -> Self {
        Self {
            notification_url: None,
            expiration_days: DEFAULT_EXPIRATION_DAYS,
        }
    }
}

pub fn expiration_timestamp(now: DateTime<Utc>, days: i64) -> String {
    (now + Duration::days(days)).format(EXPIRATION_FORMAT).to_string()
}

pub fn subscription_request(
    drive_id: &str,
    notification_url: &Url,
    client_state: &str,
    expiration: String,
) -> SubscriptionRequest {
    SubscriptionRequest {
        change_type: "updated".to_string(),
        notification_url: notification_url.to_string(),
        resource: format!("drives/{}/root", drive_id),
        expiration_date_time: expiration,
        client_state: client_state.to_string(),
    }
}

/// Subscribe the configured document library's root to `updated`
/// notifications. Only a 201 from Graph counts as success.
pub async fn register_subscription(
    state: &ServiceState,
    options: &SubscriptionOptions,
) -> Result<Subscription, SyncError> {
    if !(1..=DEFAULT_EXPIRATION_DAYS).contains(&options.expiration_days) {
        return Err(SyncError::InvalidExpiration(options.expiration_days));
    }

    let config = state.config();
    let notification_url = options
        .notification_url
        .as_ref()
        .or(config.webhook_url.as_ref())
        .ok_or(ConfigError::Missing("WEBHOOK_URL"))?;
    let client_state = config.client_state()?;
    let credentials = config.credentials()?;
    let locator = config.site_locator()?;

    let token = state.identity().fetch_token(&credentials).await?;
    let drive = state
        .graph()
        .resolve_drive(&token, &locator, config.library_match)
        .await?;

    tracing::info!(drive_id = %drive.id, %notification_url, "registering webhook");
    let request = subscription_request(
        &drive.id,
        notification_url,
        client_state,
        expiration_timestamp(Utc::now(), options.expiration_days),
    );
    let subscription = state
        .graph()
        .call(&token, CreateSubscription(request))
        .await?;

    tracing::info!(
        subscription_id = %subscription.id,
        expires = ?subscription.expiration_date_time,
        "webhook registered"
    );
    Ok(subscription)
}
