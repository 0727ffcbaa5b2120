use std::path::PathBuf;

use clap::Args;
use serde_json::Value;

use crate::cli::{utils, OutputFormat};
use crate::config;
use crate::scope::{QueryScoper, QueryShape, TenantFields};
use crate::types::AuthorizationContext;

#[derive(Args)]
pub struct ScopeArgs {
    #[arg(long, default_value = "search", help = "Document shape: search, internal or suggestions")]
    pub shape: QueryShape,

    #[arg(long = "org", help = "Organization id to scope to (repeatable)")]
    pub orgs: Vec<String>,

    #[arg(long = "space", help = "Space id to scope to (repeatable)")]
    pub spaces: Vec<String>,

    #[arg(help = "JSON document file (stdin when omitted)")]
    pub file: Option<PathBuf>,
}

pub fn handle(args: ScopeArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let raw = utils::read_document(args.file.as_deref())?;
    let document: Value = if raw.trim().is_empty() {
        Value::Object(Default::default())
    } else {
        serde_json::from_str(&raw)?
    };

    let context = AuthorizationContext {
        organization_ids: args.orgs,
        space_ids: args.spaces,
        ..Default::default()
    };
    let scoper = QueryScoper::new(TenantFields::with_prefix(&config::config().scope.field_prefix));
    let scoped = scoper.scoped(args.shape, document, &context)?;

    // Text output is the compact document, one line, ready to pipe
    utils::output_value(&output_format, &scoped, |value| println!("{}", value))
}
