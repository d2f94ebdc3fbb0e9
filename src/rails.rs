use serde::Serialize;
use tracing::debug;

/// Case-insensitive blocked-term check. Absent text never blocks.
pub fn is_blocked(text: Option<&str>, terms: &[String]) -> bool {
    first_match(text, terms).is_some()
}

fn first_match(text: Option<&str>, terms: &[String]) -> Option<String> {
    let lowercase = text?.to_lowercase();
    terms
        .iter()
        .find(|term| lowercase.contains(term.to_lowercase().as_str()))
        .cloned()
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RailKind {
    Input,
    Output,
}

impl RailKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RailKind::Input => "input",
            RailKind::Output => "output",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RailVerdict {
    pub blocked: bool,
    pub matched_term: Option<String>,
}

impl RailVerdict {
    pub fn pass() -> Self {
        Self {
            blocked: false,
            matched_term: None,
        }
    }

    pub fn blocked_on(term: String) -> Self {
        Self {
            blocked: true,
            matched_term: Some(term),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RailPolicy {
    kind: RailKind,
    blocked_terms: Vec<String>,
    refusal: String,
}

impl RailPolicy {
    pub fn new(kind: RailKind, blocked_terms: Vec<String>, refusal: String) -> Self {
        Self {
            kind,
            blocked_terms,
            refusal,
        }
    }

    pub fn kind(&self) -> RailKind {
        self.kind
    }

    pub fn refusal(&self) -> &str {
        &self.refusal
    }

    pub fn check(&self, text: Option<&str>) -> RailVerdict {
        match first_match(text, &self.blocked_terms) {
            Some(term) => {
                debug!(rail = self.kind.as_str(), term = %term, "blocked term matched");
                RailVerdict::blocked_on(term)
            }
            None => RailVerdict::pass(),
        }
    }
}
