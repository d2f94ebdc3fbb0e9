use std::{env, fs, net::SocketAddr, path::Path};

use serde::Deserialize;

const DEFAULT_INPUT_REFUSAL: &str = "I can't help with that request.";
const DEFAULT_OUTPUT_REFUSAL: &str = "I can't share that.";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_bind: SocketAddr,
    pub input_terms: Vec<String>,
    pub output_terms: Vec<String>,
    pub input_refusal: String,
    pub output_refusal: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RailsFile {
    #[serde(default)]
    pub input_terms: Vec<String>,
    #[serde(default)]
    pub output_terms: Vec<String>,
    pub input_refusal: Option<String>,
    pub output_refusal: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let port = env::var("PORT").unwrap_or_else(|_| "8080".to_owned());
        let http_bind = env::var("HTTP_BIND").unwrap_or_else(|_| format!("0.0.0.0:{port}"));
        let http_bind = http_bind.parse()?;

        let mut config = Self {
            http_bind,
            input_terms: parse_term_list(&env::var("INPUT_BLOCKED_TERMS").unwrap_or_default()),
            output_terms: parse_term_list(&env::var("OUTPUT_BLOCKED_TERMS").unwrap_or_default()),
            input_refusal: env::var("INPUT_REFUSAL")
                .unwrap_or_else(|_| DEFAULT_INPUT_REFUSAL.to_owned()),
            output_refusal: env::var("OUTPUT_REFUSAL")
                .unwrap_or_else(|_| DEFAULT_OUTPUT_REFUSAL.to_owned()),
        };

        // A rails file takes precedence over the env lists.
        if let Ok(path) = env::var("RAILS_FILE") {
            let file = load_rails_file(Path::new(&path))?;
            config.apply(file);
        }

        Ok(config)
    }

    pub fn apply(&mut self, file: RailsFile) {
        if !file.input_terms.is_empty() {
            self.input_terms = clean_terms(file.input_terms);
        }
        if !file.output_terms.is_empty() {
            self.output_terms = clean_terms(file.output_terms);
        }
        if let Some(refusal) = file.input_refusal {
            self.input_refusal = refusal;
        }
        if let Some(refusal) = file.output_refusal {
            self.output_refusal = refusal;
        }
    }
}

pub fn load_rails_file(path: &Path) -> anyhow::Result<RailsFile> {
    let raw = fs::read_to_string(path)?;
    let file = serde_json::from_str(&raw)?;
    Ok(file)
}

// Blank terms would match every message, so they are stripped here rather
// than special-cased in the filter.
fn parse_term_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_owned)
        .collect()
}

fn clean_terms(terms: Vec<String>) -> Vec<String> {
    terms
        .into_iter()
        .map(|term| term.trim().to_owned())
        .filter(|term| !term.is_empty())
        .collect()
}
