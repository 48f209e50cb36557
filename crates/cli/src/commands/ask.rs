//! `bizpilot ask`: run one business query.

use std::path::{Path, PathBuf};

use bizpilot_agent::BusinessAgent;
use bizpilot_core::{BusinessQuery, Domain, OutputFormat, Urgency};
use bizpilot_sources::load_attachment;
use tracing::warn;

pub struct AskArgs {
    pub task: String,
    pub domain: Option<Domain>,
    pub urgency: Option<Urgency>,
    pub format: OutputFormat,
    pub deep: bool,
    pub attach: Vec<PathBuf>,
    pub json: bool,
}

pub async fn run(config_path: Option<&Path>, args: AskArgs) -> Result<(), Box<dyn std::error::Error>> {
    let query = build_query(&args).await?;

    let config = super::load_config(config_path)?;
    let agent = BusinessAgent::from_config(&config)?;

    if args.deep && config.data.base_url.is_none() {
        warn!("--deep without data.base_url; the prompt gets a placeholder snapshot");
    }

    let response = agent.try_process(&query).await?;
    super::print_response(&response, args.json)
}

async fn build_query(args: &AskArgs) -> Result<BusinessQuery, Box<dyn std::error::Error>> {
    let mut query = BusinessQuery::new(args.task.clone()).with_format(args.format);
    if let Some(domain) = args.domain {
        query = query.with_domain(domain);
    }
    if let Some(urgency) = args.urgency {
        query = query.with_urgency(urgency);
    }
    if args.deep {
        query = query.with_deep_context(None);
    }

    for path in &args.attach {
        let attachment = load_attachment(path).await?;
        if let Some(err) = &attachment.error {
            warn!(file = %path.display(), error = %err, "Attachment not processed");
        }
        query = query.with_attachment(attachment);
    }

    query.validate()?;
    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(task: &str) -> AskArgs {
        AskArgs {
            task: task.into(),
            domain: None,
            urgency: None,
            format: OutputFormat::Text,
            deep: false,
            attach: Vec::new(),
            json: false,
        }
    }

    #[tokio::test]
    async fn builds_query_with_attachment() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, "Supplier prices rise 5% in March").unwrap();

        let mut a = args("Summarize the notes");
        a.domain = Some(Domain::Finance);
        a.urgency = Some(Urgency::High);
        a.format = OutputFormat::Markdown;
        a.deep = true;
        a.attach.push(file);

        let query = build_query(&a).await.unwrap();
        assert_eq!(query.domain, Some(Domain::Finance));
        assert_eq!(query.urgency, Some(Urgency::High));
        assert_eq!(query.output_format, OutputFormat::Markdown);
        assert!(query.deep_context);
        assert_eq!(query.attachments.len(), 1);
        assert_eq!(query.attachments[0].name, "notes.txt");
        assert!(query.attachments[0].error.is_none());
    }

    #[tokio::test]
    async fn blank_task_rejected_before_config() {
        assert!(build_query(&args("  ")).await.is_err());
    }

    #[tokio::test]
    async fn missing_attachment_is_an_error() {
        let mut a = args("Read this");
        a.attach.push(PathBuf::from("/definitely/not/here.txt"));
        assert!(build_query(&a).await.is_err());
    }
}
