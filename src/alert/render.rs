use std::fmt::Write;

use crate::alert::classify::Classification;
use crate::model::department::DepartmentTally;

/// Values substituted into the mail template for one department.
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub dept_name: String,
    pub tally: DepartmentTally,
    /// Violating users as (email, classification).
    pub details: Vec<(String, Classification)>,
}

impl ReportContext {
    fn value_of(&self, token: &str) -> Option<String> {
        let value = match token {
            "DEPT_NAME" => escape_html(&self.dept_name),
            "NOT_CHECK_IN" => self.tally.not_check_in.to_string(),
            "NOT_CHECK_OUT" => self.tally.not_check_out.to_string(),
            "CHECK_IN_LATE" => self.tally.check_in_late.to_string(),
            "CHECK_OUT_SOON" => self.tally.check_out_early.to_string(),
            "NOT_ENOUGH_WORK" => self.tally.not_enough_work.to_string(),
            "WORKED" => self.tally.worked.to_string(),
            "TOTAL" => self.tally.total.to_string(),
            "DETAILS" => self.details_html(),
            _ => return None,
        };
        Some(value)
    }

    fn details_html(&self) -> String {
        if self.details.is_empty() {
            return String::new();
        }

        let mut html = String::from("<ul>");
        for (email, classification) in &self.details {
            let _ = write!(html, "<li>{}: {classification}</li>", escape_html(email));
        }
        html.push_str("</ul>");
        html
    }
}

/// Single pass over the template. A token is `$` followed by the longest run
/// of `A-Z` and `_`; it is replaced only when it names a known value, so
/// `$TOTAL_HOURS` or `$UNKNOWN` stay as written and substituted values are
/// never scanned again.
pub fn render(template: &str, context: &ReportContext) -> String {
    let mut body = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(dollar) = rest.find('$') {
        body.push_str(&rest[..dollar]);
        let after = &rest[dollar + 1..];
        let len = after
            .find(|c: char| !(c.is_ascii_uppercase() || c == '_'))
            .unwrap_or(after.len());
        let token = &after[..len];

        match context.value_of(token) {
            Some(value) => body.push_str(&value),
            None => {
                body.push('$');
                body.push_str(token);
            }
        }
        rest = &after[len..];
    }

    body.push_str(rest);
    body
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
