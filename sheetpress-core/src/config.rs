use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use crate::record::RecordFormat;
use crate::sink::DEFAULT_INDENT;

/// Everything the publishing pipeline needs besides the data source itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub poll: PollConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub blog: BlogConfig,
}

impl Config {
    pub fn trace_loaded(&self) {
        info!(
            output_path = %self.output.path.display(),
            interval_secs = self.poll.interval_secs,
            content_page = %self.blog.content.page,
            users_page = %self.blog.users.page,
            "Loaded Config"
        );
        debug!(?self, "Config loaded (full debug)");
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub interval_secs: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self { interval_secs: 30 }
    }
}

impl PollConfig {
    /// Poll period; a zero setting is raised to one second.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: PathBuf,
    #[serde(default = "default_indent")]
    pub indent: usize,
}

fn default_indent() -> usize {
    DEFAULT_INDENT
}

/// Layout of the blog inside the spreadsheet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    pub content: ContentPageConfig,
    pub users: UsersPageConfig,
}

/// Blog posts: one column read top to bottom, posts separated by a delimiter cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentPageConfig {
    /// Key of this page in the published snapshot.
    pub id: String,
    pub page: String,
    pub column: u64,
    /// `null` splits on blank cells; omit the key to keep the default.
    #[serde(
        deserialize_with = "crate::record::deserialize_delimiter",
        skip_serializing_if = "Option::is_none"
    )]
    pub delimiter: Option<Value>,
    pub order: Vec<String>,
    pub overflow_key: String,
}

impl Default for ContentPageConfig {
    fn default() -> Self {
        Self {
            id: "blogContent".to_string(),
            page: "src".to_string(),
            column: 0,
            delimiter: Some(Value::String("---".to_string())),
            order: ["date", "username", "title", "link", "content"]
                .map(String::from)
                .to_vec(),
            overflow_key: "IMAGES".to_string(),
        }
    }
}

impl ContentPageConfig {
    pub fn format(&self) -> RecordFormat {
        RecordFormat::new(
            self.delimiter.clone(),
            self.order.iter().cloned(),
            self.overflow_key.clone(),
        )
    }
}

/// User profiles: one user per column over a fixed block of rows, the first
/// column being a header.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UsersPageConfig {
    pub id: String,
    pub page: String,
    pub first_row: u64,
    pub last_row: u64,
    /// Field whose value keys each user in the output.
    pub key: String,
    pub order: Vec<String>,
    pub overflow_key: String,
    /// Value of `key` in the header column, which is skipped.
    pub header: Option<String>,
}

impl Default for UsersPageConfig {
    fn default() -> Self {
        Self {
            id: "usernameContent".to_string(),
            page: "usrs".to_string(),
            first_row: 0,
            last_row: 5,
            key: "username".to_string(),
            order: ["username", "display", "ppic", "bio", "link", "bday"]
                .map(String::from)
                .to_vec(),
            overflow_key: "EXTRA".to_string(),
            header: Some("Username".to_string()),
        }
    }
}

impl UsersPageConfig {
    pub fn format(&self) -> RecordFormat {
        RecordFormat::new(None, self.order.iter().cloned(), self.overflow_key.clone())
    }
}
