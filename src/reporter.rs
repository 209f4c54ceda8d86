use crate::gamification::compute_gamification;
use crate::models::{AgentResult, AuditReport};
use anyhow::Result;
use colored::*;
use std::fs::File;
use std::io::Write;

pub struct Reporter;

impl Reporter {
    pub fn generate_report(url: &str, results: &[AgentResult]) -> AuditReport {
        let overall_score = Self::average_score(results);
        let timestamp = chrono::Utc::now().to_rfc3339();

        // Gamification reads the serialized agent output plus the raw
        // crawl summary, same text the kiosk shows the user.
        let report_text = serde_json::to_string(results).unwrap_or_default();
        let audit_html = results
            .iter()
            .find_map(|r| {
                r.raw
                    .as_ref()
                    .and_then(|raw| raw.get("crawl"))
                    .and_then(|c| c.get("summary"))
                    .and_then(|s| s.as_str())
                    .map(|s| s.to_string())
            })
            .unwrap_or_default();
        let section_count = results.len();
        let gamification = compute_gamification(&report_text, &audit_html, section_count);

        AuditReport {
            url: url.to_string(),
            results: results.to_vec(),
            overall_score,
            gamification,
            timestamp,
        }
    }

    fn colorize_score(score: u8) -> ColoredString {
        if score >= 80 {
            score.to_string().bright_green()
        } else if score >= 50 {
            score.to_string().yellow()
        } else {
            score.to_string().bright_red()
        }
    }

    fn average_score(results: &[AgentResult]) -> Option<u8> {
        let scores: Vec<u8> = results.iter().filter_map(|r| r.score).collect();
        if scores.is_empty() {
            return None;
        }
        let sum: u32 = scores.iter().map(|&s| s as u32).sum();
        Some((sum / scores.len() as u32) as u8)
    }

    pub fn print_text_report(report: &AuditReport) {
        println!("\n{}", "=".repeat(80).bright_blue());
        println!("{}", "Auditly - Website Audit Report".bright_cyan().bold());
        println!("{}", "=".repeat(80).bright_blue());
        println!();

        println!("{}: {}", "URL".bright_white().bold(), report.url);
        println!(
            "{}: {}",
            "Timestamp".bright_white().bold(),
            report.timestamp
        );
        if let Some(score) = report.overall_score {
            println!(
                "{}: {}",
                "Overall score".bright_white().bold(),
                Self::colorize_score(score)
            );
        }
        println!();

        for result in &report.results {
            println!(
                "{} {}",
                format!("[{}]", result.role).bright_yellow().bold(),
                result.agent_name.bright_white().bold()
            );
            if let Some(score) = result.score {
                println!("  Score: {}", Self::colorize_score(score));
            }
            for insight in &result.insights {
                println!("  - {}", insight);
            }
            if !result.recommendations.is_empty() {
                println!("  {}", "Recommendations:".bright_cyan());
                for rec in &result.recommendations {
                    println!("    * {}", rec);
                }
            }
            println!();
        }

        let g = &report.gamification;
        println!("{}", "Digital maturity".bright_yellow().bold().underline());
        println!(
            "  Score: {} / 10  ({})",
            format!("{:.1}", g.score).bright_green(),
            g.label
        );
        println!("  Tier:  {:?}", g.tier);
        println!("  Badges:");
        for badge in &g.badges {
            let mark = if badge.earned {
                "earned".bright_green()
            } else {
                "missed".dimmed()
            };
            println!("    [{}] {:?}", mark, badge.kind);
        }

        println!();
        println!("{}", "=".repeat(80).bright_blue());
    }

    pub fn save_json_report(report: &AuditReport, filename: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        let mut file = File::create(filename)?;
        file.write_all(json.as_bytes())?;
        println!("Report saved to: {}", filename.bright_green());
        Ok(())
    }
}
