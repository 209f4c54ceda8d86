use serde::{Deserialize, Serialize};

/// Number of heading-level sections counted toward the bonus.
const MAX_BONUS_SECTIONS: usize = 5;
const SECTION_BONUS: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeKind {
    SocialProof,
    SeoPresence,
    ClearOffer,
    ContactReady,
    MobileFriendly,
    SecureSite,
    FreshContent,
    CallToAction,
}

impl BadgeKind {
    pub const ALL: [BadgeKind; 8] = [
        BadgeKind::SocialProof,
        BadgeKind::SeoPresence,
        BadgeKind::ClearOffer,
        BadgeKind::ContactReady,
        BadgeKind::MobileFriendly,
        BadgeKind::SecureSite,
        BadgeKind::FreshContent,
        BadgeKind::CallToAction,
    ];
}

/// A boolean-earned heuristic marker contributing to the score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Badge {
    pub kind: BadgeKind,
    pub earned: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Beginner,
    Intermediate,
    Advanced,
}

/// Digital maturity score derived from the finished audit. Recomputed
/// from scratch on every report; never incrementally updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GamificationScore {
    /// 0-10.
    pub score: f64,
    /// Bilingual label, "fr / en".
    pub label: String,
    pub badges: Vec<Badge>,
    pub tier: Tier,
}

fn keyword_count(haystack: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|k| haystack.contains(*k)).count()
}

fn badge_earned(kind: BadgeKind, haystack: &str) -> bool {
    match kind {
        BadgeKind::SocialProof => {
            keyword_count(
                haystack,
                &["avis", "review", "témoignage", "testimonial", "google", "étoile", "star", "rating"],
            ) >= 1
        }
        // SEO signals are generic words, so require at least two hits
        BadgeKind::SeoPresence => {
            keyword_count(haystack, &["meta", "title", "description", "h1", "seo", "google"]) >= 2
        }
        BadgeKind::ClearOffer => {
            keyword_count(
                haystack,
                &["service", "prestation", "tarif", "prix", "offre", "offer", "pricing", "menu"],
            ) >= 1
        }
        BadgeKind::ContactReady => {
            keyword_count(
                haystack,
                &["contact", "téléphone", "phone", "email", "mail", "adresse", "address", "rendez-vous", "booking"],
            ) >= 1
        }
        BadgeKind::MobileFriendly => {
            keyword_count(haystack, &["mobile", "responsive", "viewport"]) >= 1
        }
        BadgeKind::SecureSite => {
            keyword_count(haystack, &["https", "ssl", "sécurisé", "secure"]) >= 1
        }
        BadgeKind::FreshContent => {
            keyword_count(
                haystack,
                &["blog", "actualité", "news", "article", "2024", "2025", "2026"],
            ) >= 1
        }
        BadgeKind::CallToAction => {
            keyword_count(
                haystack,
                &["cta", "bouton", "button", "réserver", "book", "appointment", "commander", "order"],
            ) >= 1
        }
    }
}

/// Derives the 0-10 maturity score and badge set from the final report
/// text plus the audit HTML summary.
///
/// `section_count` is the number of distinct sections in the rendered
/// report; each one adds a small bonus, capped at five.
pub fn compute_gamification(
    report_text: &str,
    audit_html: &str,
    section_count: usize,
) -> GamificationScore {
    let haystack = format!("{}\n{}", report_text, audit_html).to_lowercase();

    let badges: Vec<Badge> = BadgeKind::ALL
        .iter()
        .map(|&kind| Badge {
            kind,
            earned: badge_earned(kind, &haystack),
        })
        .collect();

    let earned = badges.iter().filter(|b| b.earned).count();
    let raw = ((earned as f64 / BadgeKind::ALL.len() as f64) * 10.0).round();
    let bonus = section_count.min(MAX_BONUS_SECTIONS) as f64 * SECTION_BONUS;
    let score = (raw + bonus).min(10.0);

    // Tier and label boundaries are defined independently on purpose;
    // do not unify them without a product decision.
    let tier = if score <= 3.0 {
        Tier::Beginner
    } else if score <= 6.0 {
        Tier::Intermediate
    } else {
        Tier::Advanced
    };

    let label = if score <= 3.0 {
        "Gros potentiel / Huge potential"
    } else if score <= 5.0 {
        "Bonne base / Good foundation"
    } else if score <= 7.0 {
        "Solide / Solid"
    } else {
        "Très solide / Very solid"
    }
    .to_string();

    GamificationScore {
        score,
        label,
        badges,
        tier,
    }
}
