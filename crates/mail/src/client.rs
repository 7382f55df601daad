use serde::Serialize;

use crate::error::MailError;

/// Maximum body length logged by the fallback mailer.
pub const MAX_LOGGED_BODY_LEN: usize = 500;

#[derive(Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

enum Transport {
    /// Real sends over an HTTP mail API.
    Api { client: reqwest::Client, api_key: String, api_url: String },
    /// Unconfigured environments: log the message instead of sending it.
    LogOnly,
}

/// HTML mail sender, constructed once at process start and passed to
/// whatever needs to send — never a process-wide lazy global.
///
/// Sends are best-effort by contract: callers spawn them off the request
/// path and log failures rather than propagating them.
pub struct Mailer {
    transport: Transport,
    from: String,
}

impl std::fmt::Debug for Mailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let transport = match &self.transport {
            Transport::Api { api_url, .. } => format!("Api {{ api_key: \"***\", api_url: {api_url:?} }}"),
            Transport::LogOnly => "LogOnly".to_owned(),
        };
        f.debug_struct("Mailer").field("transport", &transport).field("from", &self.from).finish()
    }
}

impl Mailer {
    /// Build from `WEMANAGE_MAIL_API_KEY`, `WEMANAGE_MAIL_API_URL` and
    /// `WEMANAGE_MAIL_FROM`. Without an API key the log-only mailer is
    /// returned, so unconfigured environments keep working.
    pub fn from_env() -> Result<Self, MailError> {
        let from = std::env::var("WEMANAGE_MAIL_FROM")
            .unwrap_or_else(|_| "WeManageAll <hello@wemanageall.app>".to_owned());
        let Ok(api_key) = std::env::var("WEMANAGE_MAIL_API_KEY") else {
            tracing::info!("WEMANAGE_MAIL_API_KEY not set, mail falls back to logging");
            return Ok(Self::log_only(from));
        };
        let api_url = std::env::var("WEMANAGE_MAIL_API_URL")
            .unwrap_or_else(|_| "https://api.resend.com/emails".to_owned());
        Self::new(api_key, api_url, from)
    }

    /// Real API mailer.
    pub fn new(api_key: String, api_url: String, from: String) -> Result<Self, MailError> {
        let api_url = api_url.trim_end_matches('/').to_owned();
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| MailError::ClientInit(e.to_string()))?;
        Ok(Self { transport: Transport::Api { client, api_key, api_url }, from })
    }

    /// Mailer that only logs. Used when configuration is absent and by tests.
    pub fn log_only(from: String) -> Self {
        Self { transport: Transport::LogOnly, from }
    }

    /// Whether real sends are configured.
    pub fn is_configured(&self) -> bool {
        matches!(self.transport, Transport::Api { .. })
    }

    /// Send one HTML email.
    ///
    /// # Errors
    /// Returns an error if the HTTP request fails or the API answers with a
    /// non-success status. The log-only transport never fails.
    pub async fn send_html(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError> {
        match &self.transport {
            Transport::Api { client, api_key, api_url } => {
                let request = SendRequest { from: &self.from, to, subject, html };
                let response = client
                    .post(api_url)
                    .header("Authorization", format!("Bearer {api_key}"))
                    .json(&request)
                    .send()
                    .await?;
                let status = response.status();
                if !status.is_success() {
                    let body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "could not read error body".to_owned());
                    return Err(MailError::HttpStatus { code: status.as_u16(), body });
                }
                tracing::info!(to, subject, "email sent");
                Ok(())
            },
            Transport::LogOnly => {
                tracing::info!(
                    to,
                    subject,
                    body = truncate(html, MAX_LOGGED_BODY_LEN),
                    "mail unconfigured, logging instead of sending"
                );
                Ok(())
            },
        }
    }
}

/// Truncates a string to the given maximum length at a char boundary.
#[must_use]
pub fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end = end.saturating_sub(1);
        }
        s.get(..end).unwrap_or("")
    }
}
