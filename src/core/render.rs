//! Renderer module
//!
//! Renders ResultSet to different output formats: jsonl, json, md

use crate::core::model::{Kind, ResultItem, ResultSet};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jsonl,
    Json,
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Renderer for result sets
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a result set to a string
    pub fn render(&self, result_set: &ResultSet) -> String {
        match self.config.format {
            OutputFormat::Jsonl => self.render_jsonl(result_set),
            OutputFormat::Json => self.render_json(result_set),
            OutputFormat::Markdown => self.render_markdown(result_set),
        }
    }

    /// Render as JSON Lines (one JSON object per line)
    fn render_jsonl(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| {
                if self.config.pretty {
                    serde_json::to_string_pretty(item).ok()
                } else {
                    serde_json::to_string(item).ok()
                }
            })
            .collect::<Vec<_>>()
            .join(if self.config.pretty { "\n\n" } else { "\n" })
    }

    /// Render as a single JSON array
    fn render_json(&self, result_set: &ResultSet) -> String {
        if self.config.pretty {
            serde_json::to_string_pretty(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        } else {
            serde_json::to_string(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        }
    }

    /// Render as Markdown
    fn render_markdown(&self, result_set: &ResultSet) -> String {
        let mut output = String::new();

        let mut players = Vec::new();
        let mut caches = Vec::new();
        let mut events = Vec::new();
        let mut errors = Vec::new();

        for item in &result_set.items {
            match item.kind {
                Kind::Player => players.push(item),
                Kind::Cache => caches.push(item),
                Kind::Transfer | Kind::Session => events.push(item),
                Kind::Error => errors.push(item),
            }
        }

        if !errors.is_empty() {
            output.push_str("## Errors\n\n");
            for item in errors {
                for error in &item.errors {
                    output.push_str(&format!("- **{}**: {}\n", error.code, error.message));
                }
            }
            output.push('\n');
        }

        if !events.is_empty() {
            output.push_str("## Events\n\n");
            for item in events {
                if let Some(message) = &item.message {
                    output.push_str(&format!("- {}", message));
                    if let Some(key) = &item.key {
                        output.push_str(&format!(" at `{}`", key));
                    }
                    output.push('\n');
                }
            }
            output.push('\n');
        }

        if !players.is_empty() {
            output.push_str("## Player\n\n");
            for item in players {
                if let Some(position) = &item.position {
                    output.push_str(&format!(
                        "Position: {:.6}, {:.6}\n",
                        position.lat, position.lng
                    ));
                }
                self.render_coins_md(&mut output, item);
            }
            output.push('\n');
        }

        if !caches.is_empty() {
            output.push_str("## Caches\n\n");
            for item in caches {
                if let Some(key) = &item.key {
                    output.push_str(&format!("### `{}`\n", key));
                }
                self.render_coins_md(&mut output, item);
                output.push('\n');
            }
        }

        output
    }

    fn render_coins_md(&self, output: &mut String, item: &ResultItem) {
        if item.coins.is_empty() {
            output.push_str("\n_no coins_\n");
            return;
        }
        output.push('\n');
        for coin in &item.coins {
            output.push_str(&format!("- {}\n", coin));
        }
    }
}
