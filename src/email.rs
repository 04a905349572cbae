//! Outbound transactional email. One HTTP call per message, no retries; a
//! failed send surfaces to the caller and never blocks other work.

use crate::errors::LodgeError;
use crate::settings::Email as EmailCfg;
use serde_json::json;

/// Escape user-supplied text before interpolating it into an HTML body.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Clone)]
pub struct EmailClient {
    http: reqwest::Client,
    cfg: EmailCfg,
}

impl EmailClient {
    pub fn new(cfg: EmailCfg) -> Self {
        Self {
            http: reqwest::Client::new(),
            cfg,
        }
    }

    /// Deliver one message through the transactional email API. When sending
    /// is disabled (dev/test), the message is logged and dropped.
    pub async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), LodgeError> {
        if !self.cfg.enabled {
            tracing::info!(%to, %subject, "Email sending disabled; skipping delivery");
            return Ok(());
        }

        let response = self
            .http
            .post(&self.cfg.api_url)
            .bearer_auth(&self.cfg.api_key)
            .json(&json!({
                "from": self.cfg.from,
                "to": to,
                "subject": subject,
                "html": html,
            }))
            .send()
            .await?;

        response.error_for_status()?;
        Ok(())
    }
}

/// Line item for a restock request email.
pub struct RestockItem {
    pub name: String,
    pub current_quantity: i64,
    pub reorder_quantity: i64,
    pub supplier: Option<String>,
}

/// Line item for the warranty expiration digest.
pub struct DigestEntry {
    pub product_name: String,
    pub expiration_date: String,
    pub property_name: Option<String>,
}

pub fn invitation_body(role: &str, invited_by: Option<&str>, accept_url: &str) -> String {
    let inviter = invited_by
        .map(|name| format!("{} has invited you", escape_html(name)))
        .unwrap_or_else(|| "You have been invited".to_string());
    format!(
        "<p>{inviter} to join Lodgebook as <strong>{role}</strong>.</p>\
         <p><a href=\"{url}\">Accept the invitation</a></p>\
         <p>This invitation expires in 7 days.</p>",
        inviter = inviter,
        role = escape_html(role),
        url = escape_html(accept_url),
    )
}

pub fn restock_body(items: &[RestockItem]) -> String {
    let mut rows = String::new();
    for item in items {
        rows.push_str(&format!(
            "<li>{name}: {current} on hand, reorder {reorder}{supplier}</li>",
            name = escape_html(&item.name),
            current = item.current_quantity,
            reorder = item.reorder_quantity,
            supplier = item
                .supplier
                .as_deref()
                .map(|s| format!(" from {}", escape_html(s)))
                .unwrap_or_default(),
        ));
    }
    format!("<p>The following items need restocking:</p><ul>{rows}</ul>")
}

pub fn digest_body(entries: &[DigestEntry]) -> String {
    let mut rows = String::new();
    for entry in entries {
        rows.push_str(&format!(
            "<li>{name}{property} expires {date}</li>",
            name = escape_html(&entry.product_name),
            property = entry
                .property_name
                .as_deref()
                .map(|p| format!(" ({})", escape_html(p)))
                .unwrap_or_default(),
            date = escape_html(&entry.expiration_date),
        ));
    }
    format!(
        "<p>Warranties expiring within the next 30 days:</p><ul>{rows}</ul>"
    )
}
