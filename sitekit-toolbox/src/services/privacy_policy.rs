//! Privacy policy text generation.

use std::fmt::Write;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::{ToolboxError, ToolboxResult};
use crate::types::{PrivacyPolicyRequest, PrivacyPolicyResult};
use crate::utils::urls;

pub const MISSING_FIELDS: &str = "All basic fields (Website Name, URL, Contact Email) are required.";
pub const INVALID_WEBSITE_URL: &str = "Invalid Website URL format.";
pub const INVALID_CONTACT_EMAIL: &str = "Invalid Contact Email format.";

#[allow(clippy::expect_used)]
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

#[allow(clippy::expect_used)]
static WEBSITE_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^(?:http|ftp)s?://",
        r"(?:(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+(?:[A-Z]{2,6}\.?|[A-Z0-9-]{2,}\.?)|",
        r"localhost|",
        r"\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})",
        r"(?::\d+)?",
        r"(?:/?|[/?]\S+)$",
    ))
    .expect("valid website url regex")
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Scheme-less input is checked as if it were `http://`.
pub fn is_valid_website_url(url: &str) -> bool {
    WEBSITE_URL_RE.is_match(&urls::normalize(url))
}

/// Check every field and report all problems at once.
pub fn validate(input: &PrivacyPolicyRequest) -> Result<(), Vec<String>> {
    let name = input.website_name.trim();
    let url = input.website_url.trim();
    let email = input.contact_email.trim();

    let mut errors = Vec::new();
    if name.is_empty() || url.is_empty() || email.is_empty() {
        errors.push(MISSING_FIELDS.to_string());
    }
    if !is_valid_website_url(url) {
        errors.push(INVALID_WEBSITE_URL.to_string());
    }
    if !is_valid_email(email) {
        errors.push(INVALID_CONTACT_EMAIL.to_string());
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Validate `input` and render the policy dated `date`.
pub fn generate(input: &PrivacyPolicyRequest, date: NaiveDate) -> ToolboxResult<PrivacyPolicyResult> {
    validate(input).map_err(|errors| ToolboxError::ValidationError(errors.join(" ")))?;
    Ok(PrivacyPolicyResult {
        policy_html: render(input, date),
        website_name: input.website_name.trim().to_string(),
        contact_email: input.contact_email.trim().to_string(),
    })
}

/// Render sections 1 to 9. User text is escaped before insertion.
pub fn render(input: &PrivacyPolicyRequest, date: NaiveDate) -> String {
    let name = escape_html(input.website_name.trim());
    let url = escape_html(input.website_url.trim());
    let email = escape_html(input.contact_email.trim());
    let mut html = String::new();

    // Writing into a String cannot fail.
    let _ = write!(
        html,
        r#"<div style="text-align: left;"><strong>Last Updated: {}</strong></div>"#,
        date.format("%B %d, %Y")
    );
    let _ = write!(
        html,
        r#"<p>This Privacy Policy explains how we collect, use, and protect your information when you visit <strong>{name}</strong> (<a href="{url}" target="_blank">{url}</a>). By using this website, you agree to the terms outlined below.</p>"#
    );
    html.push_str("<p><strong>This policy may be updated or changed at any time without prior notice. Please check this page periodically for updates.</strong></p>");

    html.push_str("<h3>1. Information We Collect</h3><ul>");
    html.push_str("<li><strong>Non-Personal Information:</strong> such as browser type, IP address, pages visited, and time spent on the site. This is collected through cookies and analytics tools.</li>");
    if input.collects_emails {
        html.push_str("<li><strong>Personal Information:</strong> such as your name and email address when you contact us, subscribe to a newsletter, or register for services.</li>");
    } else {
        html.push_str("<li><strong>Personal Information:</strong> such as your name and email address if you voluntarily provide it (e.g., through a contact form).</li>");
    }
    html.push_str("</ul>");

    html.push_str("<h3>2. How We Use Your Information</h3><ul>");
    html.push_str("<li>To operate, maintain, and improve our website.</li>");
    html.push_str("<li>To personalize user experience.</li>");
    html.push_str("<li>To respond to messages or inquiries.</li>");
    if input.collects_emails {
        html.push_str("<li>To send emails (only if you opt-in for newsletters or respond to inquiries).</li>");
    }
    html.push_str("<li>To analyze traffic and prevent abuse.</li></ul>");

    html.push_str("<h3>3. Log Files</h3>");
    let _ = write!(html, "<p>{name} uses standard log files. These include information such as:</p>");
    html.push_str("<ul>");
    for item in [
        "IP address",
        "Browser type",
        "Internet Service Provider (ISP)",
        "Date and time stamp",
        "Referring/exit pages",
        "Number of clicks",
    ] {
        let _ = write!(html, "<li>{item}</li>");
    }
    html.push_str("</ul>");
    html.push_str("<p>This data is used for analytics and server management and is not linked to any personally identifiable information.</p>");

    if input.uses_adsense {
        html.push_str("<h3>4. Google AdSense and Cookies</h3>");
        html.push_str("<p>We use Google AdSense to serve ads.</p><ul>");
        html.push_str("<li>Google uses cookies to serve personalized ads based on your visits to this and other websites.</li>");
        html.push_str(r#"<li>You can opt out of personalized advertising by visiting <a href="https://www.google.com/settings/ads" target="_blank">Google Ads Settings</a>.</li>"#);
        html.push_str(r#"<li>More info: <a href="https://policies.google.com/technologies/ads" target="_blank">How Google uses data</a>.</li>"#);
        html.push_str("</ul>");
    }

    html.push_str("<h3>5. Cookies and Tracking</h3><p>We use cookies to:</p><ul>");
    html.push_str("<li>Improve site performance.</li>");
    html.push_str("<li>Understand user behavior.</li>");
    let _ = write!(
        html,
        "<li>Serve relevant content and ads{}.</li>",
        if input.uses_adsense { " (if applicable)" } else { "" }
    );
    html.push_str("</ul><p>You can disable cookies in your browser settings, but some parts of the site may not function properly.</p>");

    html.push_str("<h3>6. Third-Party Privacy Policies</h3>");
    html.push_str("<p>This policy does not apply to other websites or advertisers that we link to. We recommend reviewing the privacy policies of those sites separately.</p>");
    if input.uses_ga {
        html.push_str("<h4>Google Analytics</h4>");
        html.push_str(r#"<p>We use Google Analytics to understand how visitors engage with our site. Google Analytics collects information anonymously. It reports website trends without identifying individual visitors. You can opt-out of Google Analytics without affecting how you visit our site – for more information on opting out of being tracked by Google Analytics across all websites you use, visit this Google page: <a href="https://tools.google.com/dlpage/gaoptout" target="_blank">https://tools.google.com/dlpage/gaoptout</a>.</p>"#);
    }

    html.push_str("<h3>7. Children\u{2019}s Information</h3>");
    let _ = write!(
        html,
        "<p>We do not knowingly collect personal information from children under the age of 13. If you believe your child has provided such information, please contact us at {email} and we will promptly delete it.</p>"
    );

    html.push_str("<h3>8. Changes to This Privacy Policy</h3>");
    html.push_str("<p>We may update our Privacy Policy from time to time. We will notify you of any changes by posting the new Privacy Policy on this page. You are advised to review this Privacy Policy periodically for any changes. Changes to this Privacy Policy are effective when they are posted on this page.</p>");

    html.push_str("<h3>9. Contact Us</h3>");
    html.push_str("<p>If you have any questions about this Privacy Policy, you can contact us:</p><ul>");
    let _ = write!(
        html,
        r#"<li>By email: <a href="mailto:{email}">{email}</a></li>"#
    );
    html.push_str("</ul>");

    html
}
