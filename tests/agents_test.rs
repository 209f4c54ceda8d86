mod server;

use auditly::agents::{Agent, CopywriterAgent, ResearchAgent, SeoSpecialistAgent, UxAnalystAgent};
use auditly::crawler::Crawler;
use auditly::llm::ChatModel;
use auditly::models::{
    AgentRole, CrawlResult, CrewContext, Heading, PageImage, PageLink,
};
use auditly::search::DisabledSearchProvider;
use auditly::url_validator::UrlValidator;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use server::get_test_server_url;
use std::sync::Arc;

fn empty_crawl() -> CrawlResult {
    CrawlResult {
        url: "http://example.com/".to_string(),
        title: None,
        meta_description: None,
        headings: Vec::new(),
        paragraphs: Vec::new(),
        links: Vec::new(),
        ctas: Vec::new(),
        images: Vec::new(),
        summary: String::new(),
    }
}

fn context_with(crawl: CrawlResult) -> CrewContext {
    let mut ctx = CrewContext::new(&crawl.url.clone());
    ctx.crawl_data = Some(crawl);
    ctx
}

fn image_without_alt(n: usize) -> Vec<PageImage> {
    (0..n)
        .map(|i| PageImage {
            alt: None,
            src: format!("/img-{}.png", i),
        })
        .collect()
}

#[tokio::test]
async fn researcher_crawls_and_recommends_a_meta_description() {
    let base_url = get_test_server_url().await;
    let crawler = Crawler::with_validator(5, UrlValidator::new().allow_host("127.0.0.1"))
        .expect("Failed to build crawler");
    let agent = ResearchAgent::new(crawler, Arc::new(DisabledSearchProvider));

    let ctx = CrewContext::new(&format!("{}/example-domain.html", base_url));
    let result = agent.work(&ctx).await.expect("researcher should succeed");

    assert_eq!(result.role, AgentRole::Researcher);
    assert_eq!(result.score, None);
    assert!(
        result
            .recommendations
            .iter()
            .any(|r| r.contains("meta description")),
        "a page without a meta description should trigger the recommendation"
    );

    let raw = result.raw.expect("researcher carries a raw payload");
    assert_eq!(raw["crawl"]["title"], "Example Domain");
    assert!(raw["search_results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn seo_agent_errors_without_crawl_data() {
    let agent = SeoSpecialistAgent::new();
    let ctx = CrewContext::new("http://example.com/");

    let result = agent.work(&ctx).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn seo_exact_arithmetic_on_degenerate_page() {
    // Zero headings (-20), no meta description (-20), 5 images missing
    // alt (-10), a single link (-10): 100 - 60 = 40.
    let mut crawl = empty_crawl();
    crawl.images = image_without_alt(5);
    crawl.links = vec![PageLink {
        text: "home".to_string(),
        href: "/".to_string(),
    }];

    let agent = SeoSpecialistAgent::new();
    let result = agent.work(&context_with(crawl)).await.unwrap();

    assert_eq!(result.role, AgentRole::SeoSpecialist);
    assert_eq!(result.score, Some(40));
    assert!(!result.recommendations.is_empty());
}

#[tokio::test]
async fn seo_score_is_floored_at_zero() {
    let mut crawl = empty_crawl();
    // 40 alt-less images alone are worth -80; with the other penalties
    // the raw total goes negative.
    crawl.images = image_without_alt(40);

    let agent = SeoSpecialistAgent::new();
    let result = agent.work(&context_with(crawl)).await.unwrap();

    assert_eq!(result.score, Some(0));
}

#[tokio::test]
async fn seo_scoring_is_deterministic() {
    let mut crawl = empty_crawl();
    crawl.headings.push(Heading {
        level: 1,
        text: "Welcome".to_string(),
    });
    crawl.meta_description = Some("Too short".to_string());
    crawl.images = image_without_alt(2);

    let agent = SeoSpecialistAgent::new();
    let first = agent.work(&context_with(crawl.clone())).await.unwrap();
    let second = agent.work(&context_with(crawl)).await.unwrap();

    assert_eq!(first.score, second.score);
    assert_eq!(first.insights, second.insights);
}

#[tokio::test]
async fn seo_single_h1_earns_a_positive_insight() {
    let mut crawl = empty_crawl();
    crawl.headings.push(Heading {
        level: 1,
        text: "Only one".to_string(),
    });
    crawl.meta_description =
        Some("A description comfortably longer than fifty characters in total.".to_string());
    crawl.links = vec![
        PageLink { text: "a".into(), href: "/a".into() },
        PageLink { text: "b".into(), href: "/b".into() },
        PageLink { text: "c".into(), href: "/c".into() },
    ];

    let agent = SeoSpecialistAgent::new();
    let result = agent.work(&context_with(crawl)).await.unwrap();

    assert_eq!(result.score, Some(100));
    assert!(
        result
            .insights
            .iter()
            .any(|i| i.contains("Exactly one H1"))
    );
}

#[tokio::test]
async fn seo_multiple_h1_penalty() {
    let mut crawl = empty_crawl();
    for text in ["First", "Second"] {
        crawl.headings.push(Heading {
            level: 1,
            text: text.to_string(),
        });
    }
    crawl.meta_description =
        Some("A description comfortably longer than fifty characters in total.".to_string());
    crawl.links = vec![
        PageLink { text: "a".into(), href: "/a".into() },
        PageLink { text: "b".into(), href: "/b".into() },
        PageLink { text: "c".into(), href: "/c".into() },
    ];

    let agent = SeoSpecialistAgent::new();
    let result = agent.work(&context_with(crawl)).await.unwrap();

    assert_eq!(result.score, Some(90));
}

#[tokio::test]
async fn ux_no_cta_and_no_contact() {
    // -30 no CTA, -10 no contact affordance: 60.
    let crawl = empty_crawl();

    let agent = UxAnalystAgent::new();
    let result = agent.work(&context_with(crawl)).await.unwrap();

    assert_eq!(result.role, AgentRole::UxAnalyst);
    assert_eq!(result.score, Some(60));
}

#[tokio::test]
async fn ux_mailto_counts_as_contact_affordance() {
    let mut crawl = empty_crawl();
    crawl.ctas.push("Book now".to_string());
    crawl.links.push(PageLink {
        text: "write us".to_string(),
        href: "mailto:hi@example.com".to_string(),
    });

    let agent = UxAnalystAgent::new();
    let result = agent.work(&context_with(crawl)).await.unwrap();

    assert_eq!(result.score, Some(100));
}

#[tokio::test]
async fn ux_penalizes_cta_overload_and_long_paragraphs() {
    let mut crawl = empty_crawl();
    for i in 0..6 {
        crawl.ctas.push(format!("CTA {}", i));
    }
    crawl.links.push(PageLink {
        text: "contact".to_string(),
        href: "/contact".to_string(),
    });
    crawl.paragraphs.push("x".repeat(301));

    let agent = UxAnalystAgent::new();
    let result = agent.work(&context_with(crawl)).await.unwrap();

    // -5 CTA overload, -10 long paragraph
    assert_eq!(result.score, Some(85));
}

struct CannedModel {
    reply: String,
}

#[async_trait]
impl ChatModel for CannedModel {
    async fn chat(&self, _system_prompt: &str, _user_message: &str) -> Result<String> {
        Ok(self.reply.clone())
    }
}

struct FailingModel;

#[async_trait]
impl ChatModel for FailingModel {
    async fn chat(&self, _system_prompt: &str, _user_message: &str) -> Result<String> {
        Err(anyhow!("provider unavailable"))
    }
}

#[tokio::test]
async fn copywriter_parses_json_wrapped_in_prose() {
    let model = Arc::new(CannedModel {
        reply: "Sure! Here is my review:\n{\"score\": 72, \"insights\": [\"Clear headline\"], \
                \"recommendations\": [\"Shorten the intro\"]}\nLet me know."
            .to_string(),
    });
    let agent = CopywriterAgent::new(Some(model));

    let result = agent.work(&context_with(empty_crawl())).await.unwrap();

    assert_eq!(result.role, AgentRole::Copywriter);
    assert_eq!(result.score, Some(72));
    assert_eq!(result.insights, vec!["Clear headline".to_string()]);
    assert_eq!(result.recommendations, vec!["Shorten the intro".to_string()]);
}

#[tokio::test]
async fn copywriter_degrades_on_unparseable_reply() {
    let model = Arc::new(CannedModel {
        reply: "I cannot produce JSON today, sorry.".to_string(),
    });
    let agent = CopywriterAgent::new(Some(model));

    let result = agent.work(&context_with(empty_crawl())).await.unwrap();

    assert_eq!(result.score, Some(50));
    assert!(
        result
            .insights
            .iter()
            .any(|i| i.contains("failed to parse"))
    );
}

#[tokio::test]
async fn copywriter_degrades_on_model_failure() {
    let agent = CopywriterAgent::new(Some(Arc::new(FailingModel)));

    let result = agent
        .work(&context_with(empty_crawl()))
        .await
        .expect("copywriter must not propagate model failures");

    assert_eq!(result.score, Some(50));
}

#[tokio::test]
async fn copywriter_degrades_without_a_model() {
    let agent = CopywriterAgent::new(None);

    let result = agent.work(&context_with(empty_crawl())).await.unwrap();

    assert_eq!(result.score, Some(50));
    assert!(
        result
            .insights
            .iter()
            .any(|i| i.contains("no language model configured"))
    );
}

#[tokio::test]
async fn copywriter_caps_out_of_range_scores() {
    let model = Arc::new(CannedModel {
        reply: r#"{"score": 400, "insights": [], "recommendations": []}"#.to_string(),
    });
    let agent = CopywriterAgent::new(Some(model));

    let result = agent.work(&context_with(empty_crawl())).await.unwrap();

    assert_eq!(result.score, Some(100));
}
