use anyhow::{bail, Context, Result};
use newsdesk_agent::{AgentClient, ResearchSession, StreamEvent};
use newsdesk_api_client::{heatmap_context, NewsApiClient};
use newsdesk_core::{classify_update, Role};

pub async fn run_ask(
    api_url: &str,
    agent_url: &str,
    question: &str,
    effort: &str,
    model: &str,
    market_context: bool,
) -> Result<()> {
    let mut session = ResearchSession::new();

    if market_context {
        let api = NewsApiClient::new(api_url)?;
        let heatmap = api
            .heatmap(None, 50)
            .await
            .context("fetching market context (is the news server running?)")?;
        session.set_background_context(heatmap_context(&heatmap));
        println!("(forwarded the market heatmap as background context)");
    }

    let request = session.submit(question, effort, model);
    let client = AgentClient::new(agent_url);
    let mut run = client
        .submit(&request)
        .await
        .context("reaching the research runtime")?;

    while let Some(event) = run.next_event().await {
        if let StreamEvent::Update(update) = &event {
            if let Some(summary) = classify_update(update) {
                println!("• {} — {}", summary.record.title, summary.record.data);
            }
        }
        session.apply(event);
    }

    if let Some(error) = session.error() {
        bail!("research stream failed: {error}. Check the runtime and retry.");
    }

    let answer = session.messages().iter().rev().find(|m| m.role == Role::Ai);
    match answer {
        Some(message) => {
            println!();
            println!("{}", message.content);
            if let Some(id) = &message.id {
                if let Some(trace) = session.archived_activity(id) {
                    println!();
                    println!("({} research steps archived for this answer)", trace.len());
                }
            }
        }
        None => println!("(no answer received)"),
    }

    Ok(())
}
