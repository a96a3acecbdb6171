//! bz - Bugzilla from the command line
//!
//! Reads its settings from `--config <file>` or from `BUGZILLA_URL`,
//! `BUGZILLA_USERNAME`, `BUGZILLA_API_KEY` and `BUGZILLA_TIMEOUT_SECS`.

mod output;

use anyhow::Context;
use bugzilla::{Changes, Client, Config, DirCache, FromEnv, PostAttachment, Priority};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Prefix of the environment variables read when no file is given.
const ENV_PREFIX: &str = "BUGZILLA";

#[derive(Parser)]
#[command(name = "bz")]
#[command(about = "bz - Read and update Bugzilla bugs", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Configuration file (YAML, JSON or TOML)
    #[arg(short, long, global = true, env = "BZ_CONFIG")]
    config: Option<PathBuf>,

    /// Keep a JSON copy of every fetched bug in this directory
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a bug
    Show {
        /// Bug ID
        id: u64,
        /// Print the raw JSON document
        #[arg(long)]
        json: bool,
        /// Skip fetching comments
        #[arg(long)]
        no_comments: bool,
        /// Skip fetching attachment metadata
        #[arg(long)]
        no_attachments: bool,
    },

    /// Change a bug
    Update {
        /// Bug ID
        id: u64,
        #[command(flatten)]
        changes: UpdateArgs,
    },

    /// Attachment commands
    #[command(subcommand)]
    Attachment(AttachmentCommands),
}

#[derive(Args, Default)]
struct UpdateArgs {
    /// Ask this address for more information
    #[arg(long, value_name = "EMAIL")]
    needinfo: Option<String>,
    /// Clear the open needinfos addressed to this address
    #[arg(long, value_name = "EMAIL")]
    remove_needinfo: Option<String>,
    /// Clear the single open needinfo
    #[arg(long)]
    clear_needinfo: bool,
    /// Clear every open needinfo
    #[arg(long)]
    clear_all_needinfos: bool,
    /// Clear the needinfos addressed to you
    #[arg(long)]
    clear_my_needinfos: bool,

    /// Add a comment
    #[arg(long)]
    comment: Option<String>,
    /// Make the comment private
    #[arg(long, requires = "comment")]
    private: bool,

    #[arg(long)]
    url: Option<String>,
    #[arg(long, value_name = "EMAIL")]
    assignee: Option<String>,
    /// Priority code (P0 to P5) or its full label, e.g. "P2 - High"
    #[arg(long)]
    priority: Option<String>,
    /// New summary line
    #[arg(long)]
    summary: Option<String>,
    #[arg(long)]
    whiteboard: Option<String>,
    #[arg(long)]
    status: Option<String>,
    #[arg(long)]
    resolution: Option<String>,
    /// Mark as duplicate of this bug
    #[arg(long, value_name = "ID")]
    duplicate_of: Option<u64>,

    #[arg(long, value_name = "EMAIL")]
    add_cc: Option<String>,
    #[arg(long, value_name = "EMAIL")]
    remove_cc: Option<String>,
    /// Add yourself to the CC list
    #[arg(long)]
    cc_myself: bool,

    /// Refuse the update if the bug changed after this time (RFC 3339)
    #[arg(long, value_name = "TIME", value_parser = parse_timestamp)]
    delta_ts: Option<DateTime<Utc>>,
}

#[derive(Subcommand)]
enum AttachmentCommands {
    /// Download an attachment
    Get {
        /// Attachment ID
        id: u64,
        /// Write the contents here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Attach a file to a bug
    Upload {
        /// Bug ID
        bug_id: u64,
        /// File to attach
        file: PathBuf,
        /// Attachment description
        #[arg(short, long)]
        summary: String,
        /// MIME type
        #[arg(short = 't', long, default_value = "application/octet-stream")]
        content_type: String,
        /// Comment posted with the attachment
        #[arg(long)]
        comment: Option<String>,
        /// Mark as a patch
        #[arg(long)]
        patch: bool,
        /// Mark as private
        #[arg(long)]
        private: bool,
    },
}

impl UpdateArgs {
    fn into_changes(self) -> Changes {
        let mut changes = Changes::new();
        changes.set_needinfo = self.needinfo;
        changes.remove_needinfo = self.remove_needinfo;
        if self.clear_needinfo {
            changes = changes.clear_needinfo();
        }
        if self.clear_all_needinfos {
            changes = changes.clear_all_needinfos();
        }
        if self.clear_my_needinfos {
            changes = changes.clear_my_needinfos();
        }
        changes.add_comment = self.comment;
        changes.comment_is_private = self.private;
        changes.set_url = self.url;
        changes.set_assignee = self.assignee;
        changes.set_priority = self.priority.map(priority_code);
        changes.set_description = self.summary;
        changes.set_whiteboard = self.whiteboard;
        changes.set_status = self.status;
        changes.set_resolution = self.resolution;
        changes.set_duplicate = self.duplicate_of;
        changes.add_cc = self.add_cc;
        changes.remove_cc = self.remove_cc;
        changes.cc_myself = self.cc_myself;
        changes.delta_ts = self.delta_ts;
        changes
    }
}

/// Accept a server label such as `P2 - High` in place of its code.
fn priority_code(value: String) -> String {
    match Priority::from_label(&value) {
        Some(priority) => priority.code().to_string(),
        None => value,
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| format!("not an RFC 3339 timestamp: {}", e))
}

fn load_config(path: Option<&Path>, cache_dir: Option<PathBuf>) -> anyhow::Result<Config> {
    let mut config = match path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("cannot load configuration from {}", path.display()))?,
        None => Config::from_env(ENV_PREFIX).with_context(|| {
            format!("set {}_URL or pass --config", ENV_PREFIX)
        })?,
    };
    if let Some(dir) = cache_dir {
        let cache = DirCache::new(dir);
        debug!(dir = %cache.dir().display(), "Caching fetched bugs");
        config = config.with_cache(Arc::new(cache));
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(rust_log)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.cache_dir)?;
    debug!(base_url = %config.base_url, "Loaded configuration");
    let client = Client::new(config)?;

    match cli.command {
        Commands::Show {
            id,
            json,
            no_comments,
            no_attachments,
        } => {
            let bug = client.get_bug_ex(id, !no_comments, !no_attachments).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&bug)?);
            } else {
                print!("{}", output::render_bug(&bug));
            }
        }
        Commands::Update { id, changes } => {
            let ack = client.update(id, &changes.into_changes()).await?;
            print!("{}", output::render_update(&ack));
        }
        Commands::Attachment(AttachmentCommands::Get { id, output }) => {
            let attachment = client.get_attachment(id).await?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &attachment.data)
                        .with_context(|| format!("cannot write {}", path.display()))?;
                    eprintln!("✓ Saved {} bytes to {}", attachment.data.len(), path.display());
                }
                None => {
                    use std::io::Write;
                    std::io::stdout().write_all(&attachment.data)?;
                }
            }
        }
        Commands::Attachment(AttachmentCommands::Upload {
            bug_id,
            file,
            summary,
            content_type,
            comment,
            patch,
            private,
        }) => {
            let data = std::fs::read(&file)
                .with_context(|| format!("cannot read {}", file.display()))?;
            let file_name = file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "attachment".to_string());

            let mut upload = PostAttachment::new(data, file_name, summary, content_type);
            if let Some(comment) = comment {
                upload = upload.with_comment(comment);
            }
            if patch {
                upload = upload.as_patch();
            }
            if private {
                upload = upload.as_private();
            }

            let id = client.upload_attachment(bug_id, &upload).await?;
            println!("✓ Created attachment {} on bug {}", id, bug_id);
        }
    }

    Ok(())
}
