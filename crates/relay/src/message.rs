//! Rendering of relayed contact messages.

use chrono::Datelike;
use teckel_core::contact::ContactInquiry;
use teckel_core::types::Timestamp;

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

/// HTML body listing every field of the inquiry.
pub fn render_html(inquiry: &ContactInquiry, business_name: &str, now: Timestamp) -> String {
    let message = escape_html(&inquiry.message).replace('\n', "<br>");
    format!(
        r#"<div style="font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: auto; border: 1px solid #ddd; border-radius: 8px; padding: 20px; background-color: #f9f9f9;">
  <h2 style="color: #007BFF; text-align: center;">New Contact Request</h2>
  <p><strong>Name:</strong> {name}</p>
  <p><strong>Email:</strong> {email}</p>
  <p><strong>Phone:</strong> {phone}</p>
  <p><strong>Subject:</strong> {subject}</p>
  <p><strong>Message:</strong></p>
  <p style="background-color: #f1f1f1; padding: 10px; border-radius: 5px;">{message}</p>
  <footer style="text-align: center; margin-top: 20px; font-size: 0.9em; color: #666;">
    <p>Thank you for reaching out!</p>
    <p>&copy; {year} {business}</p>
  </footer>
</div>"#,
        name = escape_html(&inquiry.name),
        email = escape_html(&inquiry.email),
        phone = escape_html(&inquiry.phone),
        subject = escape_html(&inquiry.subject),
        year = now.year(),
        business = escape_html(business_name),
    )
}

/// Plain-text alternative of [`render_html`].
pub fn render_text(inquiry: &ContactInquiry, business_name: &str, now: Timestamp) -> String {
    format!(
        "New Contact Request\n\n\
         Name: {}\n\
         Email: {}\n\
         Phone: {}\n\
         Subject: {}\n\n\
         Message:\n{}\n\n\
         --\n\
         (c) {} {}\n",
        inquiry.name,
        inquiry.email,
        inquiry.phone,
        inquiry.subject,
        inquiry.message,
        now.year(),
        business_name,
    )
}
