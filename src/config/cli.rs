use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, builder::BoolishValueParser};

/// Command-line arguments for the blogdesk binary.
#[derive(Debug, Parser)]
#[command(name = "blogdesk", version, about = "Blog administration client")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "BLOGDESK_CONFIG_FILE",
        value_name = "PATH",
        global = true
    )]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: GlobalOverrides,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args, Default, Clone)]
pub struct GlobalOverrides {
    /// Override the posts API base URL.
    #[arg(long = "api-base-url", value_name = "URL", global = true)]
    pub api_base_url: Option<String>,

    /// Override the request timeout; unset means no timeout.
    #[arg(long = "api-timeout-seconds", value_name = "SECONDS", global = true)]
    pub api_timeout_seconds: Option<u64>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Post management (list/get/create/edit/delete)
    Posts(PostsArgs),
}

#[derive(Debug, Args, Clone)]
pub struct PostsArgs {
    #[command(subcommand)]
    pub action: PostsCmd,
}

#[derive(Debug, Subcommand, Clone)]
pub enum PostsCmd {
    /// List all posts
    List,
    /// Get a post by id
    Get { id: String },
    /// Create a post through the post form
    Create(CreatePostArgs),
    /// Load a post into the form, apply changes, and save it
    Edit(EditPostArgs),
    /// Delete a post by id
    Delete { id: String },
}

#[derive(Debug, Args, Default, Clone)]
pub struct CreatePostArgs {
    #[arg(long, default_value = "")]
    pub title: String,
    #[arg(long, default_value = "")]
    pub description: String,
    /// Featured image URL
    #[arg(long, default_value = "")]
    pub featured_image: String,
    /// RFC 3339 timestamp or `YYYY-MM-DDTHH:MM`
    #[arg(long, default_value = "")]
    pub publish_date: String,
    #[arg(long, default_value_t = false)]
    pub published: bool,
}

#[derive(Debug, Args, Default, Clone)]
pub struct EditPostArgs {
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub featured_image: Option<String>,
    #[arg(long)]
    pub publish_date: Option<String>,
    #[arg(long, value_parser = BoolishValueParser::new())]
    pub published: Option<bool>,
}
