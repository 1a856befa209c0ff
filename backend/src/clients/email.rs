//! Outbound email via the Mailgun messages API

use crate::clients::ApiResponseError;
use crate::config::EmailConfig;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Mailgun email client
///
/// Clone is cheap: reqwest's client is internally reference-counted.
#[derive(Clone)]
pub struct EmailClient {
    http: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    domain: Option<String>,
    from_name: String,
}

impl EmailClient {
    pub fn new(config: &EmailConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            http,
            api_url: config.api_url.clone(),
            api_key: config.mailgun_api_key.clone(),
            domain: config.mailgun_domain.clone(),
            from_name: config.from_name.clone(),
        }
    }

    /// Send a plain-text email
    ///
    /// A no-op (with a warning) when Mailgun credentials are not
    /// configured, so unconfigured environments still register users.
    pub async fn send_simple_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), ApiResponseError> {
        let (Some(api_key), Some(domain)) = (&self.api_key, &self.domain) else {
            warn!("Email not configured; skipping send to '{}'", to.get(..3).unwrap_or(to));
            return Ok(());
        };

        debug!(
            "Sending email to '{}' with subject '{}'",
            to.get(..3).unwrap_or(to),
            subject.get(..20).unwrap_or(subject)
        );

        let response = self
            .http
            .post(format!("{}/{}/messages", self.api_url, domain))
            .basic_auth("api", Some(api_key))
            .form(&[
                ("from", format!("{} <mailgun@{}>", self.from_name, domain)),
                ("to", to.to_string()),
                ("subject", subject.to_string()),
                ("text", body.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiResponseError::Status(response.status()));
        }

        info!("Email sent to '{}'", to.get(..3).unwrap_or(to));
        Ok(())
    }

    /// Send the post-registration email with the confirmation link
    pub async fn send_registration_email(
        &self,
        email: &str,
        confirmation_url: &str,
    ) -> Result<(), ApiResponseError> {
        self.send_simple_email(
            email,
            "Successfully signed up",
            &format!(
                "Hi {}! You have successfully signed up to the Social-Media REST API. \
                 Please confirm your email by clicking on the following link: {}",
                email, confirmation_url
            ),
        )
        .await
    }
}
