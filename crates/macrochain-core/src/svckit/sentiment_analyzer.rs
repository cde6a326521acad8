//! Sentiment Analyzer
//!
//! Fear & Greed components, social platforms, news coverage and momentum.

use serde::Serialize;

use crate::error::Result;
use crate::model::{
    humanize_key, Confidence, Indicator, IndicatorTable, Reading, ResearchContext, ResearchPhase,
};

use super::{majority_label, PhaseAnalyzer, PhaseReport};

/// Composite Fear & Greed reading; placeholder for a real index feed
const FEAR_GREED_SCORE: u8 = 50;

const POSITIVE_SIGNALS: &[&str] = &["extreme_greed", "optimistic", "bullish", "strengthening"];
const NEGATIVE_SIGNALS: &[&str] = &["extreme_fear", "pessimistic", "bearish", "weakening"];

const FEAR_GREED_COMPONENTS: IndicatorTable = IndicatorTable(&[
    Indicator {
        name: "volatility",
        readings: &[
            ("current", Reading::Text("moderate")),
            ("interpretation", Reading::Text("Market volatility compared to historical averages")),
        ],
        explanation: "Higher volatility often indicates fear, while lower volatility can suggest complacency or greed.",
    },
    Indicator {
        name: "market_momentum",
        readings: &[
            ("current", Reading::Text("neutral")),
            ("interpretation", Reading::Text("Price momentum and volume trends")),
        ],
        explanation: "Strong upward momentum can indicate greed, while sharp declines often signal fear.",
    },
    Indicator {
        name: "social_media",
        readings: &[
            ("current", Reading::Text("mixed")),
            ("interpretation", Reading::Text("Social media sentiment and posting frequency")),
        ],
        explanation: "High posting volume with positive sentiment may indicate greed, while negative sentiment suggests fear.",
    },
    Indicator {
        name: "dominance",
        readings: &[
            ("current", Reading::Text("stable")),
            ("interpretation", Reading::Text("Bitcoin's market dominance")),
        ],
        explanation: "Rising Bitcoin dominance can indicate fear (flight to safety), while falling dominance may suggest greed (risk appetite).",
    },
    Indicator {
        name: "trends",
        readings: &[
            ("current", Reading::Text("neutral")),
            ("interpretation", Reading::Text("Google Trends search volume")),
        ],
        explanation: "Increased search interest often correlates with market enthusiasm or panic.",
    },
]);

const SOCIAL_PLATFORMS: IndicatorTable = IndicatorTable(&[
    Indicator {
        name: "twitter",
        readings: &[
            ("sentiment_score", Reading::Text("neutral")),
            ("volume", Reading::Text("moderate")),
            ("key_themes", Reading::List(&["market discussion", "technical analysis", "regulation"])),
        ],
        explanation: "Twitter sentiment reflects real-time market participant reactions and can indicate prevailing mood.",
    },
    Indicator {
        name: "reddit",
        readings: &[
            ("sentiment_score", Reading::Text("cautiously_optimistic")),
            ("volume", Reading::Text("moderate")),
            ("key_themes", Reading::List(&["long-term perspective", "technology", "adoption"])),
        ],
        explanation: "Reddit discussions often provide longer-term perspective and can indicate retail investor sentiment.",
    },
    Indicator {
        name: "telegram_discord",
        readings: &[
            ("sentiment_score", Reading::Text("neutral")),
            ("volume", Reading::Text("low_to_moderate")),
            ("key_themes", Reading::List(&["project updates", "community", "education"])),
        ],
        explanation: "Community platforms can provide insights into project-specific sentiment and engagement.",
    },
]);

const NEWS_CATEGORIES: IndicatorTable = IndicatorTable(&[
    Indicator {
        name: "mainstream_media",
        readings: &[
            ("sentiment", Reading::Text("cautious")),
            ("coverage_tone", Reading::Text("balanced")),
            ("key_topics", Reading::List(&["regulation", "institutional adoption", "market volatility"])),
        ],
        explanation: "Mainstream media coverage often reflects broader market sentiment and can influence public perception.",
    },
    Indicator {
        name: "crypto_media",
        readings: &[
            ("sentiment", Reading::Text("optimistic")),
            ("coverage_tone", Reading::Text("bullish_on_technology")),
            ("key_topics", Reading::List(&["technology development", "network upgrades", "ecosystem growth"])),
        ],
        explanation: "Crypto-focused media tends to be more optimistic about long-term prospects while acknowledging short-term challenges.",
    },
    Indicator {
        name: "financial_media",
        readings: &[
            ("sentiment", Reading::Text("skeptical")),
            ("coverage_tone", Reading::Text("risk_focused")),
            ("key_topics", Reading::List(&["risk management", "volatility", "regulatory concerns"])),
        ],
        explanation: "Traditional financial media often emphasizes risks and volatility, reflecting institutional perspectives.",
    },
]);

const MOMENTUM_INDICATORS: IndicatorTable = IndicatorTable(&[
    Indicator {
        name: "price_momentum",
        readings: &[
            ("short_term", Reading::Text("neutral")),
            ("medium_term", Reading::Text("neutral")),
            ("long_term", Reading::Text("slightly_bullish")),
        ],
        explanation: "Price momentum across different timeframes can indicate market strength or weakness.",
    },
    Indicator {
        name: "volume_momentum",
        readings: &[
            ("trend", Reading::Text("declining")),
            ("significance", Reading::Text("Lower volume may indicate reduced conviction")),
        ],
        explanation: "Volume analysis helps confirm price trends and can signal potential reversals.",
    },
    Indicator {
        name: "relative_strength",
        readings: &[
            ("vs_traditional_assets", Reading::Text("outperforming")),
            ("within_crypto", Reading::Text("neutral")),
        ],
        explanation: "Relative strength analysis shows how crypto performs compared to other asset classes.",
    },
    Indicator {
        name: "breadth",
        readings: &[
            ("market_breadth", Reading::Text("mixed")),
            ("participation", Reading::Text("moderate")),
        ],
        explanation: "Market breadth indicates how widespread participation is across different cryptocurrencies.",
    },
]);

const EDUCATIONAL_CONTEXT: &[&str] = &[
    "Sentiment analysis helps understand market psychology",
    "Extreme sentiment readings often coincide with turning points",
    "Sentiment is most useful when combined with other analysis types",
    "Social media sentiment can be manipulated and should be verified",
    "News sentiment reflects media priorities as much as market reality",
    "Momentum indicators work best when confirming other signals",
];

/// Fear & Greed band for a 0-100 score
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FearGreedLevel {
    ExtremeFear,
    Fear,
    Neutral,
    Greed,
    ExtremeGreed,
}

impl FearGreedLevel {
    pub const fn from_score(score: u8) -> Self {
        match score {
            0..=25 => Self::ExtremeFear,
            26..=45 => Self::Fear,
            46..=55 => Self::Neutral,
            56..=75 => Self::Greed,
            _ => Self::ExtremeGreed,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExtremeFear => "extreme_fear",
            Self::Fear => "fear",
            Self::Neutral => "neutral",
            Self::Greed => "greed",
            Self::ExtremeGreed => "extreme_greed",
        }
    }

    pub const fn is_extreme(self) -> bool {
        matches!(self, Self::ExtremeFear | Self::ExtremeGreed)
    }
}

/// Market sentiment report
#[derive(Clone, Debug, Serialize)]
pub struct SentimentReport {
    pub analysis_type: &'static str,
    pub fear_greed_index: FearGreedIndex,
    pub social_media_sentiment: SocialMediaSentiment,
    pub news_sentiment: NewsSentiment,
    pub market_momentum: MarketMomentum,
    pub overall_sentiment: OverallSentiment,
    pub insights: Vec<String>,
    pub educational_context: &'static [&'static str],
}

#[derive(Clone, Debug, Serialize)]
pub struct FearGreedIndex {
    pub components: IndicatorTable,
    pub overall_score: u8,
    pub sentiment_level: FearGreedLevel,
    pub historical_context: &'static str,
    pub educational_notes: &'static [&'static str],
}

#[derive(Clone, Debug, Serialize)]
pub struct SocialMediaSentiment {
    pub platforms: IndicatorTable,
    pub overall_social_sentiment: &'static str,
    pub volume_trends: &'static str,
    pub key_insights: &'static [&'static str],
    pub methodology: SocialMethodology,
}

#[derive(Clone, Debug, Serialize)]
pub struct SocialMethodology {
    pub approach: &'static str,
    pub limitations: &'static str,
    pub best_use: &'static str,
}

#[derive(Clone, Debug, Serialize)]
pub struct NewsSentiment {
    pub categories: IndicatorTable,
    pub media_bias_analysis: MediaBiasAnalysis,
    pub coverage_volume: &'static str,
    pub narrative_themes: &'static [&'static str],
}

#[derive(Clone, Debug, Serialize)]
pub struct MediaBiasAnalysis {
    pub overall_bias: &'static str,
    pub bias_diversity: &'static str,
    pub key_observations: &'static [&'static str],
}

#[derive(Clone, Debug, Serialize)]
pub struct MarketMomentum {
    pub indicators: IndicatorTable,
    pub overall_momentum: MomentumAssessment,
    pub trend_strength: &'static str,
    pub educational_notes: &'static [&'static str],
}

#[derive(Clone, Debug, Serialize)]
pub struct MomentumAssessment {
    /// `weakening`, `neutral` or `strengthening`
    pub status: &'static str,
    pub strength: &'static str,
    pub sustainability: &'static str,
    pub key_factors: &'static [&'static str],
}

/// The four headline sentiment components, in evaluation order
#[derive(Clone, Debug, Serialize)]
pub struct SentimentComponents {
    pub fear_greed: &'static str,
    pub social_media: &'static str,
    pub news_sentiment: &'static str,
    pub momentum: &'static str,
}

impl SentimentComponents {
    fn entries(&self) -> [(&'static str, &'static str); 4] {
        [
            ("fear_greed", self.fear_greed),
            ("social_media", self.social_media),
            ("news_sentiment", self.news_sentiment),
            ("momentum", self.momentum),
        ]
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct OverallSentiment {
    /// `positive`, `negative` or `neutral`
    pub overall_sentiment: &'static str,
    pub components: SentimentComponents,
    pub confidence: Confidence,
    pub key_drivers: Vec<String>,
    pub contrarian_signals: Vec<String>,
}

impl OverallSentiment {
    pub fn assess(components: SentimentComponents) -> Self {
        let entries = components.entries();
        let overall_sentiment =
            majority_label(entries.iter().map(|(_, v)| *v), POSITIVE_SIGNALS, NEGATIVE_SIGNALS);

        let key_drivers = entries
            .iter()
            .filter(|(_, value)| *value != "neutral")
            .map(|(key, value)| format!("{}: {value}", humanize_key(key)))
            .collect();

        let mut contrarian_signals = Vec::new();
        if matches!(components.fear_greed, "extreme_fear" | "extreme_greed") {
            contrarian_signals.push("Extreme Fear & Greed reading may present contrarian opportunity".to_string());
        }

        Self {
            overall_sentiment,
            components,
            confidence: Confidence::Moderate,
            key_drivers,
            contrarian_signals,
        }
    }
}

/// Sentiment phase analyzer
#[derive(Debug, Default, Clone, Copy)]
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    pub const fn new() -> Self {
        Self
    }

    fn fear_greed_index() -> FearGreedIndex {
        FearGreedIndex {
            components: FEAR_GREED_COMPONENTS,
            overall_score: FEAR_GREED_SCORE,
            sentiment_level: FearGreedLevel::from_score(FEAR_GREED_SCORE),
            historical_context: "Current sentiment levels appear moderate compared to historical extremes",
            educational_notes: &[
                "Fear & Greed Index is a contrarian indicator",
                "Extreme readings often precede market reversals",
                "The index combines multiple data points for a comprehensive view",
                "It's most useful when analyzed over time rather than as a snapshot",
            ],
        }
    }

    fn social_media_sentiment() -> SocialMediaSentiment {
        SocialMediaSentiment {
            platforms: SOCIAL_PLATFORMS,
            overall_social_sentiment: "neutral",
            volume_trends: "stable",
            key_insights: &[
                "Social media sentiment provides real-time market pulse",
                "Platform-specific differences reflect different user demographics",
                "Volume changes often precede sentiment shifts",
                "Social media can amplify both rational and irrational behaviors",
            ],
            methodology: SocialMethodology {
                approach: "Educational analysis of sentiment patterns",
                limitations: "Social media sentiment can be noisy and manipulated",
                best_use: "As one component of broader sentiment analysis",
            },
        }
    }

    fn news_sentiment() -> NewsSentiment {
        NewsSentiment {
            categories: NEWS_CATEGORIES,
            media_bias_analysis: MediaBiasAnalysis {
                overall_bias: "neutral",
                bias_diversity: "high",
                key_observations: &[
                    "Different media types show varying perspectives",
                    "Coverage tends to be more balanced during stable periods",
                    "Crisis periods often see more polarized coverage",
                ],
            },
            coverage_volume: "moderate",
            narrative_themes: &[
                "Regulatory development continues to evolve",
                "Institutional adoption remains a key theme",
                "Technology development progresses despite market cycles",
                "Market volatility attracts media attention",
            ],
        }
    }

    fn market_momentum() -> MarketMomentum {
        MarketMomentum {
            indicators: MOMENTUM_INDICATORS,
            overall_momentum: MomentumAssessment {
                status: "neutral",
                strength: "moderate",
                sustainability: "uncertain",
                key_factors: &[
                    "Price momentum shows mixed signals across timeframes",
                    "Volume momentum suggests some weakening",
                    "Relative strength remains positive vs traditional assets",
                ],
            },
            trend_strength: "moderate",
            educational_notes: &[
                "Momentum indicators work best when used together",
                "Divergence between price and volume momentum can signal changes",
                "Relative strength helps identify sector rotation",
                "Market breadth indicates overall market health",
            ],
        }
    }
}

fn sentiment_insights(
    fear_greed: &FearGreedIndex,
    social: &SocialMediaSentiment,
    news: &NewsSentiment,
    momentum: &MarketMomentum,
) -> Vec<String> {
    let mut insights = Vec::new();

    match fear_greed.sentiment_level {
        FearGreedLevel::ExtremeFear => insights.push(
            "Extreme fear may indicate oversold conditions, but markets can remain irrational longer than expected",
        ),
        FearGreedLevel::ExtremeGreed => insights.push(
            "Extreme greed often coincides with market tops, though timing reversals remains challenging",
        ),
        _ => {}
    }

    match social.overall_social_sentiment {
        "overly_optimistic" => {
            insights.push("High social media optimism may suggest complacency among market participants");
        }
        "excessively_fearful" => {
            insights.push("Widespread fear on social media may indicate panic selling could be near exhaustion");
        }
        _ => {}
    }

    if news.coverage_volume == "high" && news.media_bias_analysis.overall_bias == "negative" {
        insights.push("High negative media coverage often coincides with market bottoms, though this is not guaranteed");
    }

    match momentum.overall_momentum.status {
        "weakening" => insights.push("Weakening momentum suggests the current trend may be losing strength"),
        "strengthening" => insights.push("Strengthening momentum indicates the current trend has underlying support"),
        _ => {}
    }

    insights.into_iter().map(String::from).collect()
}

impl PhaseAnalyzer for SentimentAnalyzer {
    fn phase(&self) -> ResearchPhase {
        ResearchPhase::Sentiment
    }

    fn analyze(&self, ctx: &ResearchContext) -> Result<PhaseReport> {
        tracing::debug!(research_id = %ctx.research_id, "Running sentiment analysis");

        let fear_greed = Self::fear_greed_index();
        let social = Self::social_media_sentiment();
        let news = Self::news_sentiment();
        let momentum = Self::market_momentum();

        let insights = sentiment_insights(&fear_greed, &social, &news, &momentum);
        let overall_sentiment = OverallSentiment::assess(SentimentComponents {
            fear_greed: fear_greed.sentiment_level.as_str(),
            social_media: social.overall_social_sentiment,
            news_sentiment: news.media_bias_analysis.overall_bias,
            momentum: momentum.overall_momentum.status,
        });

        Ok(PhaseReport::Sentiment(SentimentReport {
            analysis_type: "sentiment",
            fear_greed_index: fear_greed,
            social_media_sentiment: social,
            news_sentiment: news,
            market_momentum: momentum,
            overall_sentiment,
            insights,
            educational_context: EDUCATIONAL_CONTEXT,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::ResearchQuery;

    #[test]
    fn test_fear_greed_bands() {
        assert_eq!(FearGreedLevel::from_score(0), FearGreedLevel::ExtremeFear);
        assert_eq!(FearGreedLevel::from_score(25), FearGreedLevel::ExtremeFear);
        assert_eq!(FearGreedLevel::from_score(45), FearGreedLevel::Fear);
        assert_eq!(FearGreedLevel::from_score(50), FearGreedLevel::Neutral);
        assert_eq!(FearGreedLevel::from_score(75), FearGreedLevel::Greed);
        assert_eq!(FearGreedLevel::from_score(76), FearGreedLevel::ExtremeGreed);
    }

    #[test]
    fn test_canned_sentiment_is_neutral() {
        let ctx = ResearchContext::new(&ResearchQuery {
            query: "crowd mood".into(),
            assets: None,
        });
        let PhaseReport::Sentiment(report) = SentimentAnalyzer::new().analyze(&ctx).unwrap() else {
            panic!("expected a sentiment report");
        };

        assert!(report.insights.is_empty());
        assert_eq!(report.fear_greed_index.sentiment_level, FearGreedLevel::Neutral);
        assert_eq!(report.overall_sentiment.overall_sentiment, "neutral");
        assert!(report.overall_sentiment.key_drivers.is_empty());
        assert!(report.overall_sentiment.contrarian_signals.is_empty());
    }

    #[test]
    fn test_overall_sentiment_counts_signals() {
        let overall = OverallSentiment::assess(SentimentComponents {
            fear_greed: "extreme_greed",
            social_media: "optimistic",
            news_sentiment: "bearish",
            momentum: "neutral",
        });

        assert_eq!(overall.overall_sentiment, "positive");
        assert_eq!(
            overall.key_drivers,
            vec!["Fear Greed: extreme_greed", "Social Media: optimistic", "News Sentiment: bearish"]
        );
        assert_eq!(overall.contrarian_signals.len(), 1);
        assert!(FearGreedLevel::ExtremeGreed.is_extreme());
    }
}
