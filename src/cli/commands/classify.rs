use clap::Args;
use serde_json::json;

use crate::access::{PathClassifier, RuleSet, Verdict};
use crate::audit::RecordingSink;
use crate::cli::{utils, OutputFormat};
use crate::config;

#[derive(Args)]
pub struct ClassifyArgs {
    #[arg(required = true, help = "Request paths to classify")]
    pub paths: Vec<String>,
}

pub fn handle(args: ClassifyArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let access = &config::config().access;
    let rules = RuleSet::compile(access.deny_rules.as_slice(), access.allow_rules.as_slice())?;
    let classifier = PathClassifier::new(rules);
    let sink = RecordingSink::new();

    let decisions: Vec<_> = args
        .paths
        .iter()
        .map(|path| classifier.classify(path, &sink))
        .collect();

    let value = json!({
        "decisions": decisions,
        "audit_events": sink.events(),
    });

    utils::output_value(&output_format, &value, |_| {
        for decision in &decisions {
            let verdict = match decision.verdict {
                Verdict::Allowed => "ALLOWED",
                Verdict::Denied => "DENIED ",
                Verdict::Unknown => "UNKNOWN",
            };
            match &decision.rule {
                Some(rule) => println!("{} {} ({}) by {}", verdict, decision.original, decision.normalized, rule),
                None => println!("{} {} ({})", verdict, decision.original, decision.normalized),
            }
        }
        if !sink.is_empty() {
            println!("{} unclassified path(s) would be audited", sink.len());
        }
    })
}
