use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use tracing::warn;

use crate::domain::dataset::Row;
use crate::domain::query::{QuerySpec, SearchMode};

/// AND/OR/NOT tokens surrounded by whitespace, matched case-insensitively.
static BOOLEAN_OPERATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s+(?:AND|OR|NOT)\s+").expect("static pattern"));

/// Free-text matcher prepared once per query execution.
pub(super) struct TextMatcher {
    query: String,
    mode: SearchMode,
    case_sensitive: bool,
    regex: Option<Regex>,
    terms: Vec<String>,
}

impl TextMatcher {
    pub(super) fn new(spec: &QuerySpec) -> Self {
        let query = if spec.case_sensitive {
            spec.text.clone()
        } else {
            spec.text.to_lowercase()
        };

        let regex = if spec.mode == SearchMode::Regex {
            match RegexBuilder::new(&spec.text)
                .case_insensitive(!spec.case_sensitive)
                .build()
            {
                Ok(re) => Some(re),
                Err(err) => {
                    // fail closed: rows simply fail the stage, the query
                    // as a whole still returns a result set
                    warn!(pattern = %spec.text, error = %err, "Invalid search pattern");
                    None
                }
            }
        } else {
            None
        };

        // OR-of-terms: the operator tokens split the query and are
        // themselves discarded. Not true boolean logic.
        let terms = if spec.mode == SearchMode::Boolean {
            BOOLEAN_OPERATORS
                .split(&query)
                .map(|term| term.trim().to_string())
                .filter(|term| !term.is_empty())
                .collect()
        } else {
            Vec::new()
        };

        Self {
            query,
            mode: spec.mode,
            case_sensitive: spec.case_sensitive,
            regex,
            terms,
        }
    }

    pub(super) fn matches(&self, row: &Row) -> bool {
        let haystack = row_haystack(row);

        if self.mode == SearchMode::Regex {
            return self
                .regex
                .as_ref()
                .map_or(false, |re| re.is_match(&haystack));
        }

        let text = if self.case_sensitive {
            haystack
        } else {
            haystack.to_lowercase()
        };

        match self.mode {
            SearchMode::Contains => text.contains(&self.query),
            SearchMode::Exact => text == self.query,
            SearchMode::StartsWith => text.starts_with(&self.query),
            SearchMode::EndsWith => text.ends_with(&self.query),
            SearchMode::Boolean => self.terms.iter().any(|term| text.contains(term.as_str())),
            SearchMode::Regex => false,
        }
    }
}

/// All cell values of a row, space-joined in column order.
pub(super) fn row_haystack(row: &Row) -> String {
    row.values()
        .map(|value| value.render())
        .collect::<Vec<_>>()
        .join(" ")
}
