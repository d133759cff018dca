//! CLI `list` command: fetch lifelog entries and print them to stdout.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::client::{Direction, LifelogClient, LifelogEntry, ListParams};
use crate::config::{LifelogConfig, OutputFormat};
use crate::render;

/// Flags accepted by `lifelog list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// API key (falls back to LIMITLESS_API_KEY, then the config file)
    #[arg(long)]
    pub api_key: Option<String>,

    /// API base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Entries per page, 1-10
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=10))]
    pub limit: Option<u32>,

    /// Restrict to one day (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,

    /// ISO-8601 start of the window
    #[arg(long)]
    pub start: Option<String>,

    /// ISO-8601 end of the window
    #[arg(long)]
    pub end: Option<String>,

    /// IANA timezone, e.g. Asia/Tokyo
    #[arg(long)]
    pub timezone: Option<String>,

    /// Resume from a pagination cursor
    #[arg(long)]
    pub cursor: Option<String>,

    /// Sort order (asc or desc)
    #[arg(long)]
    pub direction: Option<Direction>,

    /// Only starred entries
    #[arg(long)]
    pub starred: bool,

    /// Follow cursors until the last page (bounded by --max-pages)
    #[arg(long)]
    pub all: bool,

    /// Page cap when --all is set
    #[arg(
        long,
        default_value_t = 10,
        requires = "all",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_pages: u32,

    /// Output format (defaults to the config file's setting)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

impl ListArgs {
    pub fn to_params(&self, default_limit: u32) -> ListParams {
        ListParams::new()
            .limit(Some(self.limit.unwrap_or(default_limit)))
            .date(self.date.as_deref())
            .start(self.start.as_deref())
            .end(self.end.as_deref())
            .timezone(self.timezone.as_deref())
            .cursor(self.cursor.as_deref())
            .direction(self.direction)
            .starred(self.starred.then_some(true))
    }

    /// The key from `--api-key`, else from the environment or config file.
    pub fn resolve_api_key(&self, config: &LifelogConfig) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| config.api.api_key.clone())
            .filter(|k| !k.trim().is_empty())
    }
}

/// Run `lifelog list`. API failures and a missing key become exit codes;
/// anything else is an error.
pub async fn list(config: &LifelogConfig, args: &ListArgs) -> Result<ExitCode> {
    let Some(api_key) = args.resolve_api_key(config) else {
        eprintln!("error: no API key found: pass --api-key or set LIMITLESS_API_KEY");
        return Ok(ExitCode::from(super::EXIT_USAGE));
    };

    let mut options = config.client_options();
    if let Some(base_url) = &args.base_url {
        options.base_url = base_url.clone();
    }

    let client = LifelogClient::new(api_key, options)?;
    let params = args.to_params(config.output.default_limit);

    let result = if args.all {
        client.pages(params).collect(args.max_pages as usize).await
    } else {
        client.list_lifelogs(&params).await.map(|page| page.into_parts())
    };

    let (entries, next_cursor) = match result {
        Ok(found) => found,
        Err(failure) => return Ok(super::report_failure(&failure)),
    };

    let format = args.format.unwrap_or(config.output.format);
    print!("{}", render_output(&entries, next_cursor.as_deref(), format)?);

    Ok(ExitCode::SUCCESS)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    lifelogs: &'a [LifelogEntry],
    next_cursor: Option<&'a str>,
}

/// Build the stdout text for a fetched batch.
pub fn render_output(
    entries: &[LifelogEntry],
    next_cursor: Option<&str>,
    format: OutputFormat,
) -> Result<String> {
    let mut out = String::new();

    match format {
        OutputFormat::Json => {
            let doc = JsonOutput {
                lifelogs: entries,
                next_cursor,
            };
            out.push_str(&serde_json::to_string_pretty(&doc).context("failed to encode JSON")?);
            out.push('\n');
            return Ok(out);
        }
        OutputFormat::Markdown => out.push_str(&render::entries_to_markdown(entries)),
        OutputFormat::Text => {
            if entries.is_empty() {
                out.push_str("No lifelog entries found.\n");
            }
            for (idx, entry) in entries.iter().enumerate() {
                out.push_str(&format!("--- Entry {} ---\n", idx + 1));
                out.push_str(&render::format_entry(entry));
                out.push_str("\n\n");
            }
        }
    }

    if let Some(cursor) = next_cursor {
        out.push_str(&format!("Next cursor: {cursor}\n"));
    }
    Ok(out)
}
