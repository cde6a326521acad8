//! Macro Analyzer
//!
//! Liquidity, interest rates, global risk appetite and regulation, and how
//! each of them tends to carry over into crypto markets.

use serde::Serialize;

use crate::error::Result;
use crate::model::{Confidence, Indicator, IndicatorTable, Reading, ResearchContext, ResearchPhase};

use super::{PhaseAnalyzer, PhaseReport};

const LIQUIDITY_FACTORS: IndicatorTable = IndicatorTable(&[
    Indicator {
        name: "central_bank_policies",
        readings: &[
            ("status", Reading::Text("accommodative")),
            ("impact", Reading::Text("Central bank balance sheets affect global liquidity")),
        ],
        explanation: "When central banks expand balance sheets through quantitative easing, it typically increases available liquidity that can flow into various asset classes, including cryptocurrencies.",
    },
    Indicator {
        name: "dollar_strength",
        readings: &[
            ("status", Reading::Text("neutral")),
            ("impact", Reading::Text("Strong dollar can pressure crypto prices")),
        ],
        explanation: "A stronger US dollar typically makes dollar-denominated assets more expensive for international investors, potentially reducing demand for cryptocurrencies.",
    },
    Indicator {
        name: "credit_conditions",
        readings: &[
            ("status", Reading::Text("moderate")),
            ("impact", Reading::Text("Credit availability influences risk asset demand")),
        ],
        explanation: "Loose credit conditions often correlate with higher demand for risk assets like cryptocurrencies, while tight credit conditions can reduce investment flows.",
    },
]);

const RATE_FACTORS: IndicatorTable = IndicatorTable(&[
    Indicator {
        name: "policy_rates",
        readings: &[
            ("current_trend", Reading::Text("stable")),
            ("impact", Reading::Text("Higher rates can reduce demand for risk assets")),
        ],
        explanation: "When interest rates rise, traditional savings become more attractive, potentially reducing the relative appeal of cryptocurrencies as alternative investments.",
    },
    Indicator {
        name: "real_rates",
        readings: &[
            ("status", Reading::Text("negative_to_neutral")),
            ("impact", Reading::Text("Negative real rates historically support crypto")),
        ],
        explanation: "When inflation exceeds nominal interest rates, investors may seek assets like cryptocurrencies that can potentially preserve purchasing power.",
    },
    Indicator {
        name: "yield_curve",
        readings: &[
            ("shape", Reading::Text("normal")),
            ("impact", Reading::Text("Yield curve shape indicates economic expectations")),
        ],
        explanation: "The yield curve reflects market expectations about future economic conditions and can influence risk appetite across all asset classes.",
    },
]);

const RISK_INDICATORS: IndicatorTable = IndicatorTable(&[
    Indicator {
        name: "equity_markets",
        readings: &[
            ("trend", Reading::Text("cautious")),
            ("impact", Reading::Text("Equity performance often correlates with crypto")),
        ],
        explanation: "Cryptocurrencies, particularly Bitcoin, have shown increasing correlation with broader risk assets, especially during periods of market stress.",
    },
    Indicator {
        name: "volatility_indices",
        readings: &[
            ("level", Reading::Text("moderate")),
            ("impact", Reading::Text("Higher volatility indicates increased fear")),
        ],
        explanation: "Traditional volatility indices like the VIX can serve as proxies for overall market risk appetite, which often extends to cryptocurrency markets.",
    },
    Indicator {
        name: "safe_haven_demand",
        readings: &[
            ("status", Reading::Text("balanced")),
            ("impact", Reading::Text("Safe haven demand affects risk asset flows")),
        ],
        explanation: "During periods of heightened uncertainty, investors may rotate between safe havens and risk assets, impacting cryptocurrency demand patterns.",
    },
]);

const REGULATORY_FACTORS: IndicatorTable = IndicatorTable(&[
    Indicator {
        name: "major_jurisdictions",
        readings: &[
            ("trend", Reading::Text("clarification_increasing")),
            ("impact", Reading::Text("Regulatory clarity can support institutional adoption")),
        ],
        explanation: "Clear regulatory frameworks reduce uncertainty for institutional investors and can support market development.",
    },
    Indicator {
        name: "compliance_requirements",
        readings: &[
            ("status", Reading::Text("evolving")),
            ("impact", Reading::Text("Compliance costs affect market participants")),
        ],
        explanation: "Increasing compliance requirements can impact operational costs for crypto businesses and influence market structure.",
    },
    Indicator {
        name: "international_coordination",
        readings: &[
            ("level", Reading::Text("improving")),
            ("impact", Reading::Text("Coordinated approaches reduce regulatory arbitrage")),
        ],
        explanation: "Better international coordination on crypto regulation can create more consistent global market conditions.",
    },
]);

const EDUCATIONAL_NOTES: &[&str] = &[
    "Macroeconomic factors provide context for cryptocurrency market movements",
    "Traditional market relationships with crypto are evolving over time",
    "Global liquidity cycles often correlate with crypto market cycles",
    "Interest rate environments influence relative attractiveness of different assets",
    "Regulatory development is a key factor in long-term market maturation",
];

/// Macroeconomic backdrop report
#[derive(Clone, Debug, Serialize)]
pub struct MacroReport {
    pub analysis_type: &'static str,
    pub liquidity_conditions: LiquidityConditions,
    pub interest_rate_environment: InterestRateEnvironment,
    pub global_risk_sentiment: GlobalRiskSentiment,
    pub regulatory_environment: RegulatoryEnvironment,
    pub overall_conditions: MacroConditions,
    pub insights: Vec<String>,
    pub educational_notes: &'static [&'static str],
}

#[derive(Clone, Debug, Serialize)]
pub struct LiquidityConditions {
    pub factors: IndicatorTable,
    /// `tight`, `neutral` or `ample`
    pub overall_status: &'static str,
    pub trend: &'static str,
    pub key_observations: &'static [&'static str],
}

#[derive(Clone, Debug, Serialize)]
pub struct InterestRateEnvironment {
    pub factors: IndicatorTable,
    pub implications: RateImplications,
    pub trend: &'static str,
    pub educational_context: &'static [&'static str],
}

#[derive(Clone, Debug, Serialize)]
pub struct RateImplications {
    /// `challenging`, `neutral` or `supportive`
    pub overall: &'static str,
    pub key_considerations: &'static [&'static str],
}

#[derive(Clone, Debug, Serialize)]
pub struct GlobalRiskSentiment {
    pub indicators: IndicatorTable,
    pub overall_sentiment: RiskSentimentStatus,
    pub risk_appetite: &'static str,
    pub key_insights: &'static [&'static str],
}

#[derive(Clone, Debug, Serialize)]
pub struct RiskSentimentStatus {
    /// `risk_off`, `neutral` or `risk_on`
    pub status: &'static str,
    pub confidence: Confidence,
    pub factors: &'static str,
}

#[derive(Clone, Debug, Serialize)]
pub struct RegulatoryEnvironment {
    pub factors: IndicatorTable,
    pub outlook: RegulatoryOutlook,
    pub focus_areas: &'static [&'static str],
}

#[derive(Clone, Debug, Serialize)]
pub struct RegulatoryOutlook {
    pub trend: &'static str,
    pub certainty: &'static str,
    pub key_developments: &'static str,
}

/// Overall macro assessment, driven by how many headwinds are present
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MacroOverall {
    Supportive,
    Mixed,
    Challenging,
}

impl MacroOverall {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Supportive => "supportive",
            Self::Mixed => "mixed",
            Self::Challenging => "challenging",
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct MacroConditions {
    pub overall: MacroOverall,
    pub key_drivers: Vec<String>,
    pub outlook: &'static str,
}

impl MacroConditions {
    /// Two or more headwinds are `challenging`, one is `mixed`, none is `supportive`.
    pub fn assess(liquidity: &str, rates: &str, risk_sentiment: &str) -> Self {
        let mut key_drivers = Vec::new();
        if liquidity == "tight" {
            key_drivers.push("Liquidity constraints".to_string());
        }
        if rates == "challenging" {
            key_drivers.push("Unfavorable rate environment".to_string());
        }
        if risk_sentiment == "risk_off" {
            key_drivers.push("Risk aversion".to_string());
        }

        let overall = match key_drivers.len() {
            0 => MacroOverall::Supportive,
            1 => MacroOverall::Mixed,
            _ => MacroOverall::Challenging,
        };

        Self {
            overall,
            key_drivers,
            outlook: "uncertain",
        }
    }
}

/// Rule-based insights over the headline macro labels
pub fn macro_insights(liquidity: &str, rates: &str, risk_sentiment: &str, regulatory: &str) -> Vec<String> {
    let mut insights = Vec::new();

    match liquidity {
        "tight" => insights.push("Tight liquidity conditions may constrain crypto market growth"),
        "ample" => insights.push("Supportive liquidity environment could benefit crypto markets"),
        _ => {}
    }
    match rates {
        "challenging" => insights.push("Current interest rate environment presents headwinds for risk assets"),
        "supportive" => insights.push("Interest rate conditions appear supportive for crypto markets"),
        _ => {}
    }
    match risk_sentiment {
        "risk_off" => insights.push("Risk-off sentiment may pressure crypto prices in short term"),
        "risk_on" => insights.push("Risk-on environment could support crypto market performance"),
        _ => {}
    }
    if regulatory == "positive" {
        insights.push("Evolving regulatory clarity may support institutional adoption");
    }

    insights.into_iter().map(String::from).collect()
}

/// Macroeconomic phase analyzer
#[derive(Debug, Default, Clone, Copy)]
pub struct MacroAnalyzer;

impl MacroAnalyzer {
    pub const fn new() -> Self {
        Self
    }

    fn liquidity_conditions() -> LiquidityConditions {
        LiquidityConditions {
            factors: LIQUIDITY_FACTORS,
            overall_status: "neutral",
            trend: "stable",
            key_observations: &[
                "Global liquidity remains a key driver of crypto market cycles",
                "Liquidity changes often precede price movements in crypto markets",
                "Cross-asset liquidity correlations are important to monitor",
            ],
        }
    }

    fn interest_rate_environment() -> InterestRateEnvironment {
        InterestRateEnvironment {
            factors: RATE_FACTORS,
            implications: RateImplications {
                overall: "neutral",
                key_considerations: &[
                    "Rate expectations matter more than current rates",
                    "Real rates impact investment decisions",
                    "Policy divergence creates complexity",
                ],
            },
            trend: "monitoring",
            educational_context: &[
                "Interest rates are a fundamental driver of asset allocation decisions",
                "Cryptocurrencies often behave like high-duration assets in rate environments",
                "Rate expectations can be more important than current rates",
            ],
        }
    }

    fn global_risk_sentiment() -> GlobalRiskSentiment {
        GlobalRiskSentiment {
            indicators: RISK_INDICATORS,
            overall_sentiment: RiskSentimentStatus {
                status: "neutral",
                confidence: Confidence::Moderate,
                factors: "Mixed signals across different indicators",
            },
            risk_appetite: "moderate",
            key_insights: &[
                "Risk sentiment is a major driver of short-term crypto price movements",
                "Cryptocurrency's role as risk asset vs safe haven continues to evolve",
                "Global risk flows increasingly interconnected across asset classes",
            ],
        }
    }

    fn regulatory_environment() -> RegulatoryEnvironment {
        RegulatoryEnvironment {
            factors: REGULATORY_FACTORS,
            outlook: RegulatoryOutlook {
                trend: "neutral",
                certainty: "increasing",
                key_developments: "Continued framework development",
            },
            focus_areas: &[
                "Institutional adoption frameworks",
                "Consumer protection measures",
                "Market structure regulations",
                "Cross-border coordination",
            ],
        }
    }
}

impl PhaseAnalyzer for MacroAnalyzer {
    fn phase(&self) -> ResearchPhase {
        ResearchPhase::Macro
    }

    fn analyze(&self, ctx: &ResearchContext) -> Result<PhaseReport> {
        tracing::debug!(research_id = %ctx.research_id, "Running macro analysis");

        let liquidity = Self::liquidity_conditions();
        let rates = Self::interest_rate_environment();
        let risk = Self::global_risk_sentiment();
        let regulatory = Self::regulatory_environment();

        let insights = macro_insights(
            liquidity.overall_status,
            rates.implications.overall,
            risk.overall_sentiment.status,
            regulatory.outlook.trend,
        );
        let overall_conditions = MacroConditions::assess(
            liquidity.overall_status,
            rates.implications.overall,
            risk.overall_sentiment.status,
        );

        Ok(PhaseReport::Macro(MacroReport {
            analysis_type: "macroeconomic",
            liquidity_conditions: liquidity,
            interest_rate_environment: rates,
            global_risk_sentiment: risk,
            regulatory_environment: regulatory,
            overall_conditions,
            insights,
            educational_notes: EDUCATIONAL_NOTES,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::ResearchQuery;

    fn report() -> MacroReport {
        let ctx = ResearchContext::new(&ResearchQuery {
            query: "macro outlook".into(),
            assets: None,
        });
        match MacroAnalyzer::new().analyze(&ctx).unwrap() {
            PhaseReport::Macro(r) => r,
            other => panic!("unexpected report for {}", other.phase()),
        }
    }

    #[test]
    fn test_canned_backdrop_is_supportive_without_insights() {
        let r = report();
        assert!(r.insights.is_empty());
        assert_eq!(r.overall_conditions.overall, MacroOverall::Supportive);
        assert!(r.overall_conditions.key_drivers.is_empty());
        assert_eq!(r.overall_conditions.outlook, "uncertain");
        assert_eq!(r.liquidity_conditions.overall_status, "neutral");
    }

    #[test]
    fn test_conditions_count_headwinds() {
        assert_eq!(MacroConditions::assess("tight", "neutral", "neutral").overall, MacroOverall::Mixed);

        let c = MacroConditions::assess("tight", "challenging", "risk_off");
        assert_eq!(c.overall, MacroOverall::Challenging);
        assert_eq!(
            c.key_drivers,
            vec!["Liquidity constraints", "Unfavorable rate environment", "Risk aversion"]
        );
    }

    #[test]
    fn test_insights_fire_on_non_neutral_labels() {
        let insights = macro_insights("ample", "challenging", "risk_on", "positive");
        assert_eq!(insights.len(), 4);
        assert!(insights[0].starts_with("Supportive liquidity"));
        assert!(macro_insights("neutral", "neutral", "neutral", "neutral").is_empty());
    }

    #[test]
    fn test_report_serializes_factor_tables() {
        let value = serde_json::to_value(report()).unwrap();
        assert_eq!(value["analysis_type"], "macroeconomic");
        assert_eq!(
            value["liquidity_conditions"]["factors"]["dollar_strength"]["status"],
            "neutral"
        );
        assert_eq!(value["overall_conditions"]["overall"], "supportive");
    }
}
