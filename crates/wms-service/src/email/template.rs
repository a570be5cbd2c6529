//! Ticket email templates.
//!
//! Every ticket event shares one HTML layout; only the subject, heading and
//! lead message change. Each message also carries a plain-text alternative.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use wms_core::config::email::EmailConfig;
use wms_core::traits::mailer::EmailMessage;
use wms_entity::ticket::{Ticket, TicketPriority, TicketStatus};

/// The ticket event an email announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketEmailKind {
    /// The request was received.
    Created,
    /// Status or details changed.
    Updated,
    /// A technician was assigned.
    Assigned,
    /// Work is finished.
    Resolved,
    /// The ticket was closed.
    Closed,
}

impl TicketEmailKind {
    /// The template matching a ticket's current status.
    pub fn for_status(status: TicketStatus) -> Self {
        match status {
            TicketStatus::New | TicketStatus::Received => Self::Created,
            TicketStatus::InProgress => Self::Updated,
            TicketStatus::Resolved => Self::Resolved,
            TicketStatus::Closed => Self::Closed,
        }
    }

    fn subject(&self, ticket_number: &str) -> String {
        match self {
            Self::Created => format!("Warranty request #{ticket_number} has been received"),
            Self::Updated => format!("Update on warranty request #{ticket_number}"),
            Self::Assigned => {
                format!("A technician has been assigned to request #{ticket_number}")
            }
            Self::Resolved => format!("Warranty request #{ticket_number} has been completed"),
            Self::Closed => format!("Warranty request #{ticket_number} has been closed"),
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Self::Created => "Warranty request received",
            Self::Updated => "Request status updated",
            Self::Assigned => "Technician assigned",
            Self::Resolved => "Request completed",
            Self::Closed => "Request closed",
        }
    }

    fn message(&self, technician: Option<&str>) -> String {
        match self {
            Self::Created => "We have received your warranty request and will get back to you as soon as possible.".to_string(),
            Self::Updated => "The status of your warranty request has changed. The current details are shown above.".to_string(),
            Self::Assigned => match technician {
                Some(name) => format!("Technician {name} has been assigned to handle your request."),
                None => "A technician has been assigned to handle your request.".to_string(),
            },
            Self::Resolved => "Your warranty request has been completed. Thank you for trusting our service.".to_string(),
            Self::Closed => "Your warranty request has been closed. Please contact us if you have any questions.".to_string(),
        }
    }
}

fn status_color(status: TicketStatus) -> &'static str {
    match status {
        TicketStatus::New => "#805ad5",
        TicketStatus::Received => "#3182ce",
        TicketStatus::InProgress => "#d69e2e",
        TicketStatus::Resolved => "#38a169",
        TicketStatus::Closed => "#718096",
    }
}

/// The ticket facts shown in an email.
#[derive(Debug, Clone)]
pub struct TicketEmail {
    /// Ticket number.
    pub ticket_number: String,
    /// Customer greeting name.
    pub customer_name: String,
    /// Current status.
    pub status: TicketStatus,
    /// Priority.
    pub priority: TicketPriority,
    /// Reported problem.
    pub issue_description: String,
    /// Affected unit.
    pub serial_number: Option<String>,
    /// Product of the affected unit.
    pub product_name: Option<String>,
    /// Assigned technician.
    pub technician_name: Option<String>,
    /// When the ticket was opened.
    pub created_at: DateTime<Utc>,
    /// When the ticket was resolved.
    pub resolved_at: Option<DateTime<Utc>>,
}

impl TicketEmail {
    /// Take the facts of a ticket; unit and technician are added separately.
    pub fn from_ticket(ticket: &Ticket) -> Self {
        Self {
            ticket_number: ticket.ticket_number.clone(),
            customer_name: ticket.customer_name.clone(),
            status: ticket.status,
            priority: ticket.priority,
            issue_description: ticket.issue_description.clone(),
            serial_number: None,
            product_name: None,
            technician_name: None,
            created_at: ticket.created_at,
            resolved_at: ticket.resolved_at,
        }
    }

    /// Attach the affected unit.
    pub fn with_unit(mut self, serial_number: Option<String>, product_name: Option<String>) -> Self {
        self.serial_number = serial_number;
        self.product_name = product_name;
        self
    }

    /// Attach the assigned technician.
    pub fn with_technician(mut self, name: Option<String>) -> Self {
        self.technician_name = name;
        self
    }
}

/// Renders ticket emails with the company's branding and contacts.
#[derive(Debug, Clone)]
pub struct EmailTemplates {
    company_name: String,
    support_email: String,
    support_hotline: String,
}

impl EmailTemplates {
    /// Create templates from the email configuration.
    pub fn new(config: &EmailConfig) -> Self {
        Self {
            company_name: config.company_name.clone(),
            support_email: config.support_email.clone(),
            support_hotline: config.support_hotline.clone(),
        }
    }

    /// Render a ticket email addressed to `to`.
    pub fn render(&self, kind: TicketEmailKind, ticket: &TicketEmail, to: &str) -> EmailMessage {
        EmailMessage {
            to: to.to_string(),
            subject: kind.subject(&ticket.ticket_number),
            html: self.render_html(kind, ticket),
            text: self.render_text(kind, ticket),
        }
    }

    fn rows(ticket: &TicketEmail) -> Vec<(&'static str, String)> {
        let mut rows = vec![
            ("Ticket number", format!("#{}", ticket.ticket_number)),
            ("Status", ticket.status.label().to_string()),
            ("Priority", ticket.priority.to_string()),
        ];
        if let Some(product) = &ticket.product_name {
            rows.push(("Product", product.clone()));
        }
        if let Some(serial) = &ticket.serial_number {
            rows.push(("Serial number", serial.clone()));
        }
        rows.push(("Issue", ticket.issue_description.clone()));
        rows.push((
            "Opened",
            ticket.created_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        ));
        if let Some(technician) = &ticket.technician_name {
            rows.push(("Technician", technician.clone()));
        }
        if let Some(resolved_at) = ticket.resolved_at {
            rows.push(("Completed", resolved_at.format("%Y-%m-%d %H:%M UTC").to_string()));
        }
        rows
    }

    fn render_html(&self, kind: TicketEmailKind, ticket: &TicketEmail) -> String {
        let mut details = String::new();
        for (label, value) in Self::rows(ticket) {
            let _ = write!(
                details,
                "<tr><td style=\"color:#4a5568;padding:8px 0;\">{}</td>\
                 <td style=\"color:#2d3748;font-weight:600;padding:8px 0;\">{}</td></tr>",
                label,
                escape_html(&value)
            );
        }

        format!(
            "<!DOCTYPE html>\
<html><head><meta charset=\"utf-8\"><title>{company} - Warranty notice</title></head>\
<body style=\"font-family:Arial,sans-serif;background:#f7fafc;margin:0;padding:20px;\">\
<div style=\"max-width:600px;margin:0 auto;background:#ffffff;border-radius:8px;overflow:hidden;\">\
<div style=\"background:#21808D;color:#ffffff;padding:24px;\"><h1 style=\"margin:0;font-size:22px;\">{title}</h1></div>\
<div style=\"padding:24px;\">\
<p>Dear {customer},</p>\
<p><span style=\"background:{color};color:#ffffff;padding:4px 10px;border-radius:12px;\">{status}</span></p>\
<table style=\"width:100%;border-collapse:collapse;\">{details}</table>\
<div style=\"border-left:4px solid #21808D;background:#f0fff4;padding:16px;margin:20px 0;\">{message}</div>\
<div style=\"background:#f7fafc;padding:16px;text-align:center;\">\
<strong>Need help?</strong><br>Hotline: {hotline}<br>Email: {support}</div>\
</div>\
<div style=\"background:#2d3748;color:#a0aec0;text-align:center;padding:16px;font-size:12px;\">\
{company}. This email was sent automatically, please do not reply.</div>\
</div></body></html>",
            company = escape_html(&self.company_name),
            title = kind.title(),
            customer = escape_html(&ticket.customer_name),
            color = status_color(ticket.status),
            status = ticket.status.label(),
            details = details,
            message = escape_html(&kind.message(ticket.technician_name.as_deref())),
            hotline = escape_html(&self.support_hotline),
            support = escape_html(&self.support_email),
        )
    }

    fn render_text(&self, kind: TicketEmailKind, ticket: &TicketEmail) -> String {
        let mut text = format!("{}\n\nDear {},\n\n", kind.title(), ticket.customer_name);
        for (label, value) in Self::rows(ticket) {
            let _ = writeln!(text, "{label}: {value}");
        }
        let _ = write!(
            text,
            "\n{}\n\nNeed help? Hotline: {} | Email: {}\n{}\n",
            kind.message(ticket.technician_name.as_deref()),
            self.support_hotline,
            self.support_email,
            self.company_name
        );
        text
    }
}

/// Escape text for inclusion in HTML element content or attribute values.
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

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TicketEmail {
        TicketEmail {
            ticket_number: "TK-20240601-AB12C".into(),
            customer_name: "Jane <Doe>".into(),
            status: TicketStatus::Resolved,
            priority: TicketPriority::High,
            issue_description: "Screen flickers & resets".into(),
            serial_number: Some("SN-001".into()),
            product_name: Some("Panel X".into()),
            technician_name: Some("Tom Tech".into()),
            created_at: Utc::now(),
            resolved_at: Some(Utc::now()),
        }
    }

    fn templates() -> EmailTemplates {
        EmailTemplates::new(&EmailConfig::default())
    }

    #[test]
    fn subject_names_ticket_number() {
        let msg = templates().render(TicketEmailKind::Resolved, &sample(), "jane@example.com");
        assert_eq!(msg.to, "jane@example.com");
        assert_eq!(
            msg.subject,
            "Warranty request #TK-20240601-AB12C has been completed"
        );
    }

    #[test]
    fn html_escapes_customer_values() {
        let msg = templates().render(TicketEmailKind::Closed, &sample(), "jane@example.com");
        assert!(msg.html.contains("Jane &lt;Doe&gt;"));
        assert!(msg.html.contains("Screen flickers &amp; resets"));
        assert!(!msg.html.contains("Jane <Doe>"));
    }

    #[test]
    fn text_alternative_is_unescaped_and_complete() {
        let msg = templates().render(TicketEmailKind::Resolved, &sample(), "jane@example.com");
        assert!(msg.text.contains("Dear Jane <Doe>"));
        assert!(msg.text.contains("Serial number: SN-001"));
        assert!(msg.text.contains("Technician: Tom Tech"));
        assert!(msg.text.contains("support@example.com"));
    }

    #[test]
    fn assigned_message_names_technician() {
        let msg = templates().render(TicketEmailKind::Assigned, &sample(), "jane@example.com");
        assert!(msg.text.contains("Technician Tom Tech has been assigned"));
    }

    #[test]
    fn template_follows_status() {
        assert_eq!(
            TicketEmailKind::for_status(TicketStatus::Closed),
            TicketEmailKind::Closed
        );
        assert_eq!(
            TicketEmailKind::for_status(TicketStatus::Resolved),
            TicketEmailKind::Resolved
        );
    }

    #[test]
    fn escape_handles_quotes() {
        assert_eq!(escape_html(r#"a"b'c"#), "a&quot;b&#39;c");
    }
}
