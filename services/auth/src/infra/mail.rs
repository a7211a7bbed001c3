use std::time::Duration;

use anyhow::Context as _;
use reqwest::Client;

use crate::domain::repository::Mailer;
use crate::domain::types::TemplatedEmail;
use crate::error::AuthServiceError;

const RELAY_TIMEOUT: Duration = Duration::from_secs(10);

/// Hands templated mail to an HTTP relay as a JSON POST.
///
/// Any non-2xx answer counts as a failed delivery.
#[derive(Clone)]
pub struct HttpMailer {
    client: Client,
    endpoint: String,
}

impl HttpMailer {
    pub fn new(endpoint: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(RELAY_TIMEOUT)
            .build()
            .context("build mail relay client")?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

impl Mailer for HttpMailer {
    async fn send(&self, email: &TemplatedEmail) -> Result<(), AuthServiceError> {
        self.client
            .post(&self.endpoint)
            .json(email)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .with_context(|| format!("deliver {:?} mail", email.template))
            .map_err(AuthServiceError::Delivery)?;
        Ok(())
    }
}
