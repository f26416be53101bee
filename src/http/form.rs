//! Submission form page.
//!
//! Rendered with `maud`; every spliced value (visitor name, short names,
//! long URIs) is HTML-escaped by the template.

use maud::{html, Markup, DOCTYPE};

use crate::http::cookie::Greeting;
use crate::registry::Bookmark;

impl Greeting {
    /// Greeting line as plain text.
    pub fn message(&self) -> String {
        match self {
            Greeting::Known(name) => format!("Hey there, {}", name),
            Greeting::Unsure => "I'm not sure who you are!".to_string(),
            Greeting::Stranger => "I don't know you yet!".to_string(),
        }
    }
}

/// Build the page markup: form, then one `name : uri` line per entry and the greeting.
pub fn form_page(greeting: &Greeting, entries: &[Bookmark]) -> Markup {
    html! {
        (DOCTYPE)
        title { "Bookmark Server" }
        form method="POST" {
            p {
                label {
                    "What's your name again? "
                    input type="text" name="yourname";
                }
            }
            p {
                label {
                    "Long URI: "
                    input name="longuri";
                }
                br;
                label {
                    "Short name: "
                    input name="shortname";
                }
                br;
                button type="submit" { "Save it!" }
            }
        }
        p { "URIs I know about:" }
        pre {
            "\n"
            @for entry in entries {
                (entry.short_name) " : " (entry.long_uri) "\n"
            }
            (greeting.message()) "\n"
        }
    }
}

/// Render the full form page to a string.
pub fn render_form(greeting: &Greeting, entries: &[Bookmark]) -> String {
    form_page(greeting, entries).into_string()
}
