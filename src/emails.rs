use lettre::{
    message::{header::ContentType, MultiPart},
    Message,
};
use thiserror::Error;

use crate::{app::App, pipeline::locale::UrlOptions};

#[derive(Error, Debug)]
pub enum EmailError {
    #[error("Invalid recipient address: {0}")]
    InvalidRecipient(#[from] lettre::address::AddressError),
    #[error("Failed to build email: {0}")]
    BuilderError(#[from] lettre::error::Error),
    #[error("Failed to send email: {0}")]
    TransportError(#[from] lettre::transport::smtp::Error),
    #[error("Mailer error: {0}")]
    MailerError(String),
}

impl From<Box<dyn std::error::Error + Send + Sync>> for EmailError {
    fn from(error: Box<dyn std::error::Error + Send + Sync>) -> Self {
        EmailError::MailerError(error.to_string())
    }
}

/// Absolute link for an email body, built from the request that triggered
/// the email. Emails always link back to the host and locale the visitor
/// was on; there is no process-wide URL configuration to keep in sync.
#[must_use]
pub fn email_link(url_options: &UrlOptions, path: &str) -> String {
    url_options.absolute_url(path)
}

pub async fn send_html_email(
    app: &App,
    recipient: &str,
    subject: &str,
    body: String,
) -> Result<(), EmailError> {
    let email = Message::builder()
        .from(app.config.email.sender())
        .to(recipient.parse()?)
        .subject(subject)
        .header(ContentType::TEXT_HTML)
        .body(body)?;

    app.mailer
        .send(email)
        .await
        .map_err(|e| EmailError::MailerError(e.to_string()))?;

    Ok(())
}

/// Sends a multipart email with both plain text and HTML versions.
///
/// This is the preferred method for sending emails as it provides better
/// accessibility and compatibility. Email clients will automatically choose
/// the best format for the user.
pub async fn send_multipart_email(
    app: &App,
    recipient: &str,
    subject: &str,
    text_body: String,
    html_body: String,
) -> Result<(), EmailError> {
    let email = Message::builder()
        .from(app.config.email.sender())
        .to(recipient.parse()?)
        .subject(subject)
        .multipart(
            MultiPart::alternative()
                .singlepart(
                    lettre::message::SinglePart::builder()
                        .header(ContentType::TEXT_PLAIN)
                        .body(text_body),
                )
                .singlepart(
                    lettre::message::SinglePart::builder()
                        .header(ContentType::TEXT_HTML)
                        .body(html_body),
                ),
        )?;

    app.mailer
        .send(email)
        .await
        .map_err(|e| EmailError::MailerError(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_link_uses_request_scope() {
        let options = UrlOptions {
            scheme: "https".to_string(),
            host: "demo.example.com".to_string(),
            locale: "fr".to_string(),
        };

        assert_eq!(
            email_link(&options, "lessons/intro"),
            "https://demo.example.com/fr/lessons/intro"
        );
    }
}
