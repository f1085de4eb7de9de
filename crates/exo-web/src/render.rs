//! HTML pages.
//!
//! Pages are assembled with `format!`; anything that came from the request
//! goes through [`escape_html`] first.

use std::fmt::Write as _;

use exo_model::Feature;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

impl MessageKind {
    fn css_class(self) -> &'static str {
        match self {
            MessageKind::Success => "success",
            MessageKind::Error => "error",
        }
    }
}

/// Status banner shown above the forms after a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl StatusMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n\
         <nav><a href=\"/\">Predict</a> | <a href=\"/home\">Dashboard</a> | \
         <form method=\"post\" action=\"/logout\" style=\"display:inline\">\
         <button type=\"submit\">Log out</button></form></nav>\n\
         {body}\n</body>\n</html>\n",
        title = escape_html(title),
    )
}

/// Main prediction page with the single-candidate and batch forms.
pub fn index_page(message: Option<&StatusMessage>) -> String {
    let mut body = String::from("<h1>Exoplanet Candidate Classifier</h1>\n");
    if let Some(message) = message {
        let _ = writeln!(
            body,
            "<div class=\"message {}\">{}</div>",
            message.kind.css_class(),
            escape_html(&message.text)
        );
    }
    body.push_str("<h2>Single candidate</h2>\n<form method=\"post\" action=\"/single\">\n");
    for feature in Feature::ALL {
        let _ = writeln!(
            body,
            "<label>{label} <input type=\"text\" name=\"{name}\"></label><br>",
            label = escape_html(feature.label()),
            name = feature.column_name()
        );
    }
    body.push_str("<button type=\"submit\">Predict</button>\n</form>\n");
    body.push_str(
        "<h2>Batch upload</h2>\n\
         <form method=\"post\" action=\"/upload\" enctype=\"multipart/form-data\">\n\
         <input type=\"file\" name=\"file\" accept=\".csv\">\n\
         <button type=\"submit\">Upload</button>\n</form>\n",
    );
    layout("Exoplanet Classifier", &body)
}

pub fn home_page() -> String {
    layout(
        "Dashboard",
        "<h1>Dashboard</h1>\n<p>Nothing to show yet. Use the prediction page to classify candidates.</p>",
    )
}
