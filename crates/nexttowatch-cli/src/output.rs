use clap::ValueEnum;
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => println!("{} {}", "✓".green(), msg.as_ref()),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({ "type": "success", "message": msg.as_ref() }));
            }
        }
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        // Shown even in quiet mode
        match self.format {
            OutputFormat::Human => eprintln!("{} {}", "✗".red(), msg.as_ref()),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({ "type": "error", "message": msg.as_ref() }));
            }
        }
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => println!("{}", msg.as_ref()),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({ "type": "info", "message": msg.as_ref() }));
            }
        }
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => println!("{} {}", "⚠".yellow(), msg.as_ref()),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({ "type": "warning", "message": msg.as_ref() }));
            }
        }
    }

    /// Emit a payload in the selected JSON format. Callers render their own
    /// human view and only reach here in JSON mode.
    pub fn data<T: Serialize>(&self, data: &T) {
        match serde_json::to_value(data) {
            Ok(value) => self.print_json(&value),
            Err(e) => self.error(format!("Failed to serialize output: {}", e)),
        }
    }

    fn print_json(&self, data: &serde_json::Value) {
        match self.format {
            OutputFormat::JsonPretty => {
                println!("{}", serde_json::to_string_pretty(data).unwrap_or_default());
            }
            OutputFormat::Json | OutputFormat::Human => {
                println!("{}", serde_json::to_string(data).unwrap_or_default());
            }
        }
    }
}
