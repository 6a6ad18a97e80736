//! Email bodies for contact and inquiry notifications

use crate::models::{Actor, ContactSubmission, Inquiry};
use crate::notifications::EmailMessage;

/// Escape user-supplied text for inclusion in HTML
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

fn html_page(heading: &str, body: &str, brand: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="UTF-8"></head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h2 style="color: #2c3e50; border-bottom: 2px solid #3498db; padding-bottom: 10px;">{}</h2>
    {}
    <p style="margin-top: 30px; font-size: 13px; color: #666;">{}</p>
</body>
</html>"#,
        escape(heading),
        body,
        escape(brand)
    )
}

fn message_block(message: &str) -> String {
    format!(
        r#"<div style="background-color: #f8f9fa; padding: 15px; border-left: 4px solid #3498db;">{}</div>"#,
        escape(message).replace('\n', "<br>")
    )
}

pub fn contact_admin(submission: &ContactSubmission, admin_email: &str, brand: &str) -> EmailMessage {
    let phone = submission.phone.as_deref().unwrap_or("Not provided");
    let property = submission
        .property_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "General inquiry".to_string());
    let received = submission.created_at.format("%Y-%m-%d %H:%M:%S UTC");

    let text = format!(
        "New contact form submission\n\nName: {}\nEmail: {}\nPhone: {}\nProperty: {}\nReceived: {}\n\nMessage:\n{}\n",
        submission.name, submission.email, phone, property, received, submission.message
    );

    let html = html_page(
        "New Contact Form Submission",
        &format!(
            "<p><strong>Name:</strong> {}<br><strong>Email:</strong> {}<br><strong>Phone:</strong> {}<br><strong>Property:</strong> {}<br><strong>Received:</strong> {}</p>\n    <h3>Message:</h3>\n    {}",
            escape(&submission.name),
            escape(&submission.email),
            escape(phone),
            escape(&property),
            received,
            message_block(&submission.message)
        ),
        brand,
    );

    EmailMessage {
        to: admin_email.to_string(),
        subject: format!("New Contact Form Submission from {}", submission.name),
        text,
        html,
    }
}

pub fn contact_confirmation(submission: &ContactSubmission, brand: &str) -> EmailMessage {
    let text = format!(
        "Dear {},\n\nThank you for reaching out to {}. We have received your message and our team will get back to you within 24 hours.\n\nYour message:\n{}\n\nBest regards,\nThe {} Team\n",
        submission.name, brand, submission.message, brand
    );

    let html = html_page(
        "Thank You for Contacting Us!",
        &format!(
            "<p>Dear {},</p>\n    <p>Thank you for reaching out to {}. We have received your message and our team will get back to you within 24 hours.</p>\n    <h3>Your Message:</h3>\n    {}\n    <p>Best regards,<br>The {} Team</p>",
            escape(&submission.name),
            escape(brand),
            message_block(&submission.message),
            escape(brand)
        ),
        brand,
    );

    EmailMessage {
        to: submission.email.clone(),
        subject: format!("Thank you for contacting {}", brand),
        text,
        html,
    }
}

pub fn inquiry_admin(
    inquiry: &Inquiry,
    property_title: &str,
    user: &Actor,
    admin_email: &str,
    brand: &str,
) -> EmailMessage {
    let text = format!(
        "New property inquiry\n\nProperty: {} ({})\nFrom: {} <{}>\nPreferred contact: {}\n\nMessage:\n{}\n",
        property_title, inquiry.property_id, user.name, user.email, inquiry.contact_method, inquiry.message
    );

    let html = html_page(
        "New Property Inquiry",
        &format!(
            "<p><strong>Property:</strong> {} ({})<br><strong>From:</strong> {} &lt;{}&gt;<br><strong>Preferred contact:</strong> {}</p>\n    <h3>Inquiry Message:</h3>\n    {}",
            escape(property_title),
            inquiry.property_id,
            escape(&user.name),
            escape(&user.email),
            inquiry.contact_method,
            message_block(&inquiry.message)
        ),
        brand,
    );

    EmailMessage {
        to: admin_email.to_string(),
        subject: format!("New Property Inquiry: {}", property_title),
        text,
        html,
    }
}

pub fn inquiry_confirmation(
    inquiry: &Inquiry,
    property_title: &str,
    user: &Actor,
    brand: &str,
) -> EmailMessage {
    let text = format!(
        "Thank you for your interest in {}.\n\nYour message:\n{}\n\nOur property specialist will contact you shortly to discuss this property.\n\nBest regards,\nThe {} Team\n",
        property_title, inquiry.message, brand
    );

    let html = html_page(
        "Your Property Inquiry",
        &format!(
            "<p>Thank you for your interest in <strong>{}</strong>!</p>\n    <h3>Your Message:</h3>\n    {}\n    <p>Our property specialist will contact you shortly to discuss this property.</p>\n    <p>Best regards,<br>The {} Team</p>",
            escape(property_title),
            message_block(&inquiry.message),
            escape(brand)
        ),
        brand,
    );

    EmailMessage {
        to: user.email.clone(),
        subject: format!("Your inquiry about {} - {}", property_title, brand),
        text,
        html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContactForm, ContactMethod, NewInquiry, UserRole};
    use uuid::Uuid;

    fn submission(message: &str) -> ContactSubmission {
        ContactSubmission::new(ContactForm {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: None,
            message: message.to_string(),
            property_id: None,
        })
    }

    #[test]
    fn test_contact_admin_addresses_admin() {
        let email = contact_admin(&submission("Hi"), "admin@example.com", "ROR Stay");
        assert_eq!(email.to, "admin@example.com");
        assert_eq!(email.subject, "New Contact Form Submission from Jane Doe");
        assert!(email.text.contains("Phone: Not provided"));
        assert!(email.text.contains("General inquiry"));
    }

    #[test]
    fn test_user_text_is_escaped_in_html() {
        let email = contact_confirmation(&submission("<script>alert(1)</script>"), "ROR Stay");
        assert_eq!(email.to, "jane@example.com");
        assert!(!email.html.contains("<script>"));
        assert!(email.html.contains("&lt;script&gt;"));
        // plain text keeps the original
        assert!(email.text.contains("<script>"));
    }

    #[test]
    fn test_inquiry_templates() {
        let user = Actor::new("u1", "buyer@example.com", "Buyer", UserRole::User);
        let inquiry = Inquiry::new(
            NewInquiry {
                property_id: Uuid::new_v4(),
                message: "Still available?".to_string(),
                contact_method: ContactMethod::Phone,
            },
            &user.id,
        );

        let admin = inquiry_admin(&inquiry, "Sunny Loft", &user, "admin@example.com", "ROR Stay");
        assert_eq!(admin.subject, "New Property Inquiry: Sunny Loft");
        assert!(admin.text.contains("Preferred contact: phone"));

        let confirmation = inquiry_confirmation(&inquiry, "Sunny Loft", &user, "ROR Stay");
        assert_eq!(confirmation.to, "buyer@example.com");
        assert_eq!(confirmation.subject, "Your inquiry about Sunny Loft - ROR Stay");
    }
}
