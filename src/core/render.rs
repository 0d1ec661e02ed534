//! Renderer module
//!
//! Renders ResultSet to different output formats: jsonl, json, md, raw

use crate::core::model::{Kind, ResultItem, ResultSet};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jsonl,
    Json,
    Markdown,
    Raw,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            "raw" => Ok(OutputFormat::Raw),
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
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a result set to a string
    pub fn render(&self, result_set: &ResultSet) -> String {
        match self.config.format {
            OutputFormat::Jsonl => self.render_jsonl(result_set),
            OutputFormat::Json => self.render_json(result_set),
            OutputFormat::Markdown => self.render_markdown(result_set),
            OutputFormat::Raw => self.render_raw(result_set),
        }
    }

    /// Render and print to stdout, skipping the trailing newline for empty output
    pub fn print(&self, result_set: &ResultSet) {
        let output = self.render(result_set);
        if !output.is_empty() {
            println!("{}", output);
        }
    }

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

    fn render_json(&self, result_set: &ResultSet) -> String {
        if self.config.pretty {
            serde_json::to_string_pretty(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        } else {
            serde_json::to_string(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        }
    }

    fn render_markdown(&self, result_set: &ResultSet) -> String {
        let sections = [
            (Kind::Error, "Errors"),
            (Kind::Resolved, "Resolved"),
            (Kind::Identifier, "Identifiers"),
            (Kind::Name, "Names"),
            (Kind::Entry, "Entries"),
            (Kind::Link, "Links"),
            (Kind::Check, "Checks"),
        ];

        let mut output = String::new();
        for (kind, title) in sections {
            let items: Vec<_> = result_set.items.iter().filter(|i| i.kind == kind).collect();
            if items.is_empty() {
                continue;
            }
            output.push_str(&format!("## {}\n\n", title));
            for item in items {
                Self::render_item_md(&mut output, item);
            }
            output.push('\n');
        }
        output
    }

    fn render_item_md(output: &mut String, item: &ResultItem) {
        output.push_str("- ");
        match (&item.input, &item.path) {
            (Some(input), Some(path)) => output.push_str(&format!("`{}` → `{}`", input, path)),
            (None, Some(path)) => output.push_str(&format!("`{}`", path)),
            (Some(input), None) => output.push_str(&format!("`{}`", input)),
            (None, None) => {}
        }
        if let Some(line) = item.line {
            output.push_str(&format!(" (line {})", line));
        }
        if let Some(id) = &item.identifier {
            output.push_str(&format!(" [{}]", id));
        }
        if let Some(excerpt) = &item.excerpt {
            output.push_str(&format!(" {}", excerpt));
        }
        for error in &item.errors {
            output.push_str(&format!(" **{}**: {}", error.code, error.message));
        }
        output.push('\n');
    }

    /// Raw mode: the single most useful string per item, one per line
    fn render_raw(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| match item.kind {
                Kind::Identifier => item.identifier.clone(),
                Kind::Name | Kind::Check => item.excerpt.clone(),
                _ => item.path.clone(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{Issue, SourceMode};

    fn renderer(format: OutputFormat) -> Renderer {
        Renderer::new(RenderConfig::with_pretty(format, false))
    }

    #[test]
    fn test_render_jsonl() {
        let mut result_set = ResultSet::new();
        result_set.push(ResultItem::entry("/a/one.txt", SourceMode::Walk));
        result_set.push(ResultItem::entry("/a/two.txt", SourceMode::Walk));

        let output = renderer(OutputFormat::Jsonl).render(&result_set);
        assert!(output.contains("/a/one.txt"));
        assert_eq!(output.lines().count(), 2);
    }

    #[test]
    fn test_render_json() {
        let mut result_set = ResultSet::new();
        result_set.push(ResultItem::identifier("20240101T120000"));

        let output = renderer(OutputFormat::Json).render(&result_set);
        assert!(output.starts_with('['));
        assert!(output.ends_with(']'));
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("jsonl".parse::<OutputFormat>().unwrap(), OutputFormat::Jsonl);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("markdown".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("raw".parse::<OutputFormat>().unwrap(), OutputFormat::Raw);
        assert!("yaml".parse::<OutputFormat>().unwrap_err().contains("Unknown format"));
    }

    #[test]
    fn test_render_json_pretty() {
        let mut result_set = ResultSet::new();
        result_set.push(ResultItem::identifier("20240101T120000"));
        let config = RenderConfig::with_pretty(OutputFormat::Json, true);
        let output = Renderer::new(config).render(&result_set);
        assert!(output.contains("  "));
    }

    #[test]
    fn test_render_markdown_sections() {
        let mut result_set = ResultSet::new();
        result_set.push(ResultItem::resolved("/old/a", "/new/a", SourceMode::Store));
        result_set.push(ResultItem::error(Issue::new("NOT_FOUND", "could not resolve /x")));

        let output = renderer(OutputFormat::Markdown).render(&result_set);
        assert!(output.contains("## Resolved"));
        assert!(output.contains("`/old/a` → `/new/a`"));
        assert!(output.contains("## Errors"));
        assert!(output.contains("NOT_FOUND"));
        assert!(output.find("## Errors").unwrap() < output.find("## Resolved").unwrap());
    }

    #[test]
    fn test_render_markdown_empty() {
        let output = renderer(OutputFormat::Markdown).render(&ResultSet::new());
        assert!(output.is_empty());
    }

    #[test]
    fn test_render_raw() {
        let mut result_set = ResultSet::new();
        result_set.push(ResultItem::identifier("20240101T120000"));
        result_set.push(ResultItem::name("a.txt", "a--20240101T120000.txt"));
        result_set.push(ResultItem::resolved("/x", "/y", SourceMode::Direct));

        let output = renderer(OutputFormat::Raw).render(&result_set);
        assert_eq!(output, "20240101T120000\na--20240101T120000.txt\n/y");
    }
}
