//! On-Chain Analyzer
//!
//! Network activity, holder behavior, transaction metrics and network
//! health.

use serde::Serialize;

use crate::error::{AnalysisError, Result};
use crate::model::{humanize_key, Indicator, IndicatorTable, Reading, ResearchContext, ResearchPhase};

use super::{majority_label, PhaseAnalyzer, PhaseReport};

const STRONG_FACTORS: &[&str] = &["growing", "accumulation", "healthy", "strong"];
const WEAK_FACTORS: &[&str] = &["declining", "distribution", "unhealthy", "weak"];

const ACTIVITY_METRICS: IndicatorTable = IndicatorTable(&[
    Indicator {
        name: "active_addresses",
        readings: &[
            ("current_trend", Reading::Text("stable")),
            ("30_day_change", Reading::Text("neutral")),
            ("significance", Reading::Text("Active addresses indicate network usage and adoption")),
        ],
        explanation: "The number of unique active addresses shows how many users are actively using the network, serving as a proxy for adoption and engagement.",
    },
    Indicator {
        name: "new_addresses",
        readings: &[
            ("current_trend", Reading::Text("moderately_increasing")),
            ("significance", Reading::Text("New address creation indicates user growth")),
        ],
        explanation: "Growth in new addresses suggests ongoing user acquisition and network expansion, though some addresses may belong to existing users.",
    },
    Indicator {
        name: "network_utilization",
        readings: &[
            ("current_level", Reading::Text("moderate")),
            ("significance", Reading::Text("Network utilization shows demand for block space")),
        ],
        explanation: "High network utilization can indicate strong demand for transactions, potentially leading to higher fees during peak periods.",
    },
    Indicator {
        name: "dapp_activity",
        readings: &[
            ("trend", Reading::Text("growing")),
            ("significance", Reading::Text("DeFi and application usage drives network demand")),
        ],
        explanation: "Decentralized application activity generates transactions and demonstrates practical utility of the network.",
    },
]);

const HOLDER_METRICS: IndicatorTable = IndicatorTable(&[
    Indicator {
        name: "holder_distribution",
        readings: &[
            ("retail_holders", Reading::Text("increasing")),
            ("whale_concentration", Reading::Text("stable")),
            ("institutional_holdings", Reading::Text("growing")),
        ],
        explanation: "Holder distribution shows how tokens are distributed across different holder types, which can indicate market maturity and stability.",
    },
    Indicator {
        name: "holding_periods",
        readings: &[
            ("short_term", Reading::Text("decreasing")),
            ("medium_term", Reading::Text("stable")),
            ("long_term", Reading::Text("increasing")),
        ],
        explanation: "Holding period analysis reveals investor sentiment and conviction levels across different time horizons.",
    },
    Indicator {
        name: "profit_loss_status",
        readings: &[
            ("in_profit", Reading::Text("moderate_percentage")),
            ("in_loss", Reading::Text("moderate_percentage")),
            ("break_even", Reading::Text("small_percentage")),
        ],
        explanation: "The percentage of holders in profit or loss can influence selling pressure and market dynamics.",
    },
    Indicator {
        name: "accumulation_distribution",
        readings: &[
            ("current_phase", Reading::Text("accumulation")),
            ("accumulation_zones", Reading::Text("identified")),
            ("distribution_zones", Reading::Text("minimal")),
        ],
        explanation: "Accumulation and distribution patterns show how different holder groups are positioning themselves over time.",
    },
]);

const TRANSACTION_METRICS: IndicatorTable = IndicatorTable(&[
    Indicator {
        name: "transaction_volume",
        readings: &[
            ("daily_volume", Reading::Text("stable")),
            ("volume_trend", Reading::Text("sideways")),
            ("value_transferred", Reading::Text("moderate")),
        ],
        explanation: "Transaction volume measures the total value being moved on-chain, reflecting economic activity and network utilization.",
    },
    Indicator {
        name: "transaction_count",
        readings: &[
            ("daily_count", Reading::Text("stable")),
            ("count_trend", Reading::Text("slightly_increasing")),
            ("average_transaction_size", Reading::Text("decreasing")),
        ],
        explanation: "Transaction count shows network usage frequency, while average size can indicate usage patterns and efficiency.",
    },
    Indicator {
        name: "transaction_fees",
        readings: &[
            ("average_fee", Reading::Text("moderate")),
            ("fee_trend", Reading::Text("stable")),
            ("fee_pressure", Reading::Text("low")),
        ],
        explanation: "Transaction fees reflect network demand and can influence user behavior, especially for smaller transactions.",
    },
    Indicator {
        name: "transaction_types",
        readings: &[
            ("simple_transfers", Reading::Text("majority")),
            ("smart_contract_interactions", Reading::Text("growing")),
            ("exchange_transactions", Reading::Text("stable")),
        ],
        explanation: "Transaction type analysis shows how the network is being used and what activities drive demand.",
    },
]);

const HEALTH_METRICS: IndicatorTable = IndicatorTable(&[
    Indicator {
        name: "network_security",
        readings: &[
            ("hash_rate", Reading::Text("stable")),
            ("staking_participation", Reading::Text("healthy")),
            ("decentralization_level", Reading::Text("good")),
        ],
        explanation: "Network security metrics show how robust and resilient the network is against attacks and centralization.",
    },
    Indicator {
        name: "network_performance",
        readings: &[
            ("block_time_consistency", Reading::Text("stable")),
            ("confirmation_time", Reading::Text("normal")),
            ("network_latency", Reading::Text("acceptable")),
        ],
        explanation: "Performance metrics indicate how well the network is functioning and providing reliable service to users.",
    },
    Indicator {
        name: "development_activity",
        readings: &[
            ("developer_contribution", Reading::Text("active")),
            ("code_updates", Reading::Text("regular")),
            ("ecosystem_growth", Reading::Text("expanding")),
        ],
        explanation: "Development activity shows the long-term viability and innovation capacity of the network.",
    },
    Indicator {
        name: "ecosystem_metrics",
        readings: &[
            ("node_count", Reading::Text("stable")),
            ("client_diversity", Reading::Text("good")),
            ("geographic_distribution", Reading::Text("diverse")),
        ],
        explanation: "Ecosystem metrics indicate network decentralization and resilience against single points of failure.",
    },
]);

const EDUCATIONAL_EXPLANATIONS: &[&str] = &[
    "On-chain metrics provide transparent insights into network activity",
    "Blockchain data allows for unprecedented market analysis capabilities",
    "Network fundamentals often diverge from price action in short term",
    "Long-term value correlates with network utility and adoption",
    "On-chain analysis complements traditional market analysis methods",
    "Understanding blockchain metrics helps assess project fundamentals",
];

/// On-chain fundamentals report
#[derive(Clone, Debug, Serialize)]
pub struct OnchainReport {
    pub analysis_type: &'static str,
    pub network_activity: NetworkActivity,
    pub holder_behavior: HolderBehavior,
    pub transaction_metrics: TransactionMetrics,
    pub network_health: NetworkHealth,
    pub network_conditions: NetworkConditions,
    pub insights: Vec<String>,
    pub educational_explanations: &'static [&'static str],
}

#[derive(Clone, Debug, Serialize)]
pub struct NetworkActivity {
    pub metrics: IndicatorTable,
    pub overall_activity: ActivityAssessment,
    pub growth_indicators: &'static [&'static str],
    pub usage_patterns: UsagePatterns,
    pub educational_notes: &'static [&'static str],
}

#[derive(Clone, Debug, Serialize)]
pub struct ActivityAssessment {
    pub trend: &'static str,
    pub strength: &'static str,
    pub sustainability: &'static str,
}

#[derive(Clone, Debug, Serialize)]
pub struct UsagePatterns {
    pub primary_usage: &'static str,
    pub user_engagement: &'static str,
    pub retention_indicators: &'static str,
}

#[derive(Clone, Debug, Serialize)]
pub struct HolderBehavior {
    pub metrics: IndicatorTable,
    pub behavioral_insights: HolderPatterns,
    pub market_maturity: &'static str,
    pub risk_indicators: &'static [&'static str],
    pub educational_context: &'static [&'static str],
}

#[derive(Clone, Debug, Serialize)]
pub struct HolderPatterns {
    pub long_term_trend: &'static str,
    pub distribution_pattern: &'static str,
    pub overall_sentiment: &'static str,
}

#[derive(Clone, Debug, Serialize)]
pub struct TransactionMetrics {
    pub metrics: IndicatorTable,
    pub transaction_insights: TransactionPatterns,
    pub efficiency_metrics: EfficiencyMetrics,
    pub economic_activity: EconomicActivity,
    pub educational_notes: &'static [&'static str],
}

impl TransactionMetrics {
    /// Fee pressure as read off the transaction-fee indicator
    pub fn fee_pressure(&self) -> Option<&'static str> {
        self.metrics.reading("transaction_fees", "fee_pressure")
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct TransactionPatterns {
    pub volume_trend: &'static str,
    pub efficiency_trend: &'static str,
    pub usage_evolution: &'static str,
}

#[derive(Clone, Debug, Serialize)]
pub struct EfficiencyMetrics {
    pub fee_efficiency: &'static str,
    pub throughput_utilization: &'static str,
    pub cost_effectiveness: &'static str,
}

#[derive(Clone, Debug, Serialize)]
pub struct EconomicActivity {
    pub status: &'static str,
    pub trend: &'static str,
    pub quality: &'static str,
}

#[derive(Clone, Debug, Serialize)]
pub struct NetworkHealth {
    pub metrics: IndicatorTable,
    pub overall_health: NetworkVitality,
    pub security_analysis: SecurityPosture,
    pub sustainability_factors: &'static [&'static str],
    pub educational_insights: &'static [&'static str],
}

#[derive(Clone, Debug, Serialize)]
pub struct NetworkVitality {
    pub status: &'static str,
    pub strength: &'static str,
    pub resilience: &'static str,
}

#[derive(Clone, Debug, Serialize)]
pub struct SecurityPosture {
    pub overall_security: &'static str,
    pub attack_resistance: &'static str,
    pub decentralization: &'static str,
}

/// The four condition factors weighed for the overall network status
#[derive(Clone, Debug, Serialize)]
pub struct ConditionFactors {
    pub activity_trend: &'static str,
    pub holder_sentiment: &'static str,
    pub transaction_health: &'static str,
    pub network_vitality: &'static str,
}

impl ConditionFactors {
    fn entries(&self) -> [(&'static str, &'static str); 4] {
        [
            ("activity_trend", self.activity_trend),
            ("holder_sentiment", self.holder_sentiment),
            ("transaction_health", self.transaction_health),
            ("network_vitality", self.network_vitality),
        ]
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct NetworkConditions {
    /// `positive`, `negative` or `neutral`
    pub overall_status: &'static str,
    pub key_factors: ConditionFactors,
    pub strengths: Vec<String>,
    pub concerns: Vec<String>,
    pub outlook: &'static str,
}

impl NetworkConditions {
    pub fn assess(key_factors: ConditionFactors) -> Self {
        let entries = key_factors.entries();
        let overall_status =
            majority_label(entries.iter().map(|(_, v)| *v), STRONG_FACTORS, WEAK_FACTORS);

        let matching = |set: &[&str]| -> Vec<String> {
            entries
                .iter()
                .filter(|(_, value)| set.contains(value))
                .map(|(key, value)| format!("{}: {value}", humanize_key(key)))
                .collect()
        };

        Self {
            overall_status,
            strengths: matching(STRONG_FACTORS),
            concerns: matching(WEAK_FACTORS),
            key_factors,
            outlook: "stable",
        }
    }
}

/// On-chain phase analyzer
#[derive(Debug, Default, Clone, Copy)]
pub struct OnchainAnalyzer;

impl OnchainAnalyzer {
    pub const fn new() -> Self {
        Self
    }

    fn network_activity() -> NetworkActivity {
        NetworkActivity {
            metrics: ACTIVITY_METRICS,
            overall_activity: ActivityAssessment {
                trend: "stable",
                strength: "moderate",
                sustainability: "likely_sustainable",
            },
            growth_indicators: &[
                "New address creation shows user acquisition",
                "DApp activity demonstrates utility beyond speculation",
                "Network utilization indicates demand for services",
            ],
            usage_patterns: UsagePatterns {
                primary_usage: "transfers_and_dapps",
                user_engagement: "moderate",
                retention_indicators: "positive",
            },
            educational_notes: &[
                "Network activity metrics provide insights into real usage vs speculation",
                "Active addresses can be influenced by market conditions and user behavior",
                "Network utilization affects transaction costs and user experience",
                "DApp activity demonstrates practical utility beyond simple transfers",
            ],
        }
    }

    fn holder_behavior() -> HolderBehavior {
        HolderBehavior {
            metrics: HOLDER_METRICS,
            behavioral_insights: HolderPatterns {
                long_term_trend: "accumulation",
                distribution_pattern: "stable",
                overall_sentiment: "cautiously_optimistic",
            },
            market_maturity: "maturing",
            risk_indicators: &[
                "Concentration risk if whale holdings increase",
                "Liquidity risk if long-term holders start distributing",
                "Volatility risk if short-term holders dominate",
            ],
            educational_context: &[
                "Holder behavior provides insights into market psychology",
                "Distribution patterns can indicate market structure changes",
                "Long-term holder accumulation often signals conviction",
                "Whale activity can significantly impact market dynamics",
            ],
        }
    }

    fn transaction_metrics() -> TransactionMetrics {
        TransactionMetrics {
            metrics: TRANSACTION_METRICS,
            transaction_insights: TransactionPatterns {
                volume_trend: "stable",
                efficiency_trend: "improving",
                usage_evolution: "maturing",
            },
            efficiency_metrics: EfficiencyMetrics {
                fee_efficiency: "good",
                throughput_utilization: "moderate",
                cost_effectiveness: "reasonable",
            },
            economic_activity: EconomicActivity {
                status: "moderate",
                trend: "stable",
                quality: "improving",
            },
            educational_notes: &[
                "Transaction metrics provide insights into real economic activity",
                "Fee analysis helps understand network congestion and user costs",
                "Transaction types reveal how the network is being utilized",
                "Volume patterns can indicate market sentiment and activity",
            ],
        }
    }

    fn network_health() -> NetworkHealth {
        NetworkHealth {
            metrics: HEALTH_METRICS,
            overall_health: NetworkVitality {
                status: "healthy",
                strength: "strong",
                resilience: "good",
            },
            security_analysis: SecurityPosture {
                overall_security: "strong",
                attack_resistance: "high",
                decentralization: "adequate",
            },
            sustainability_factors: &[
                "Active development ensures continuous improvement",
                "Diverse ecosystem reduces single points of failure",
                "Healthy economic incentives support network security",
            ],
            educational_insights: &[
                "Network health is fundamental to long-term viability",
                "Security metrics ensure network integrity and user trust",
                "Development activity indicates ongoing innovation and maintenance",
                "Ecosystem diversity contributes to network resilience",
            ],
        }
    }
}

fn onchain_insights(
    activity: &NetworkActivity,
    holders: &HolderBehavior,
    transactions: &TransactionMetrics,
    fee_pressure: &str,
    health: &NetworkHealth,
) -> Vec<String> {
    let mut insights = Vec::new();

    match activity.overall_activity.trend {
        "growing" => insights.push("Growing network activity suggests increasing adoption and utility"),
        "declining" => insights.push("Declining activity may indicate reduced usage or market fatigue"),
        _ => {}
    }

    if holders.behavioral_insights.long_term_trend == "accumulation" {
        insights.push("Long-term holder accumulation suggests conviction in network fundamentals");
    } else if holders.behavioral_insights.distribution_pattern == "distribution" {
        insights.push("Distribution from long-term holders may indicate profit-taking or reduced conviction");
    }

    if transactions.economic_activity.trend == "increasing" {
        insights.push("Rising transaction volume indicates growing economic activity on-chain");
    } else if fee_pressure == "high" {
        insights.push("High fee pressure may constrain smaller transactions and affect user experience");
    }

    match health.overall_health.status {
        "strong" => insights.push("Strong network health provides foundation for long-term growth"),
        "concerning" => insights.push("Network health concerns may require attention for sustainable development"),
        _ => {}
    }

    insights.into_iter().map(String::from).collect()
}

impl PhaseAnalyzer for OnchainAnalyzer {
    fn phase(&self) -> ResearchPhase {
        ResearchPhase::Onchain
    }

    fn analyze(&self, ctx: &ResearchContext) -> Result<PhaseReport> {
        tracing::debug!(research_id = %ctx.research_id, "Running on-chain analysis");

        let activity = Self::network_activity();
        let holders = Self::holder_behavior();
        let transactions = Self::transaction_metrics();
        let health = Self::network_health();

        let fee_pressure = transactions.fee_pressure().ok_or_else(|| AnalysisError::PhaseFailed {
            phase: ResearchPhase::Onchain,
            message: "transaction_fees indicator has no fee_pressure reading".into(),
        })?;

        let insights = onchain_insights(&activity, &holders, &transactions, fee_pressure, &health);
        let network_conditions = NetworkConditions::assess(ConditionFactors {
            activity_trend: activity.overall_activity.trend,
            holder_sentiment: holders.behavioral_insights.overall_sentiment,
            transaction_health: transactions.economic_activity.status,
            network_vitality: health.overall_health.status,
        });

        Ok(PhaseReport::Onchain(OnchainReport {
            analysis_type: "onchain",
            network_activity: activity,
            holder_behavior: holders,
            transaction_metrics: transactions,
            network_health: health,
            network_conditions,
            insights,
            educational_explanations: EDUCATIONAL_EXPLANATIONS,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::ResearchQuery;

    fn report() -> OnchainReport {
        let ctx = ResearchContext::new(&ResearchQuery {
            query: "network health".into(),
            assets: Some(vec!["ethereum".into()]),
        });
        let PhaseReport::Onchain(report) = OnchainAnalyzer::new().analyze(&ctx).unwrap() else {
            panic!("expected an on-chain report");
        };
        report
    }

    #[test]
    fn test_canned_network_is_positive() {
        let r = report();
        assert_eq!(
            r.insights,
            vec!["Long-term holder accumulation suggests conviction in network fundamentals"]
        );
        assert_eq!(r.network_conditions.overall_status, "positive");
        assert_eq!(r.network_conditions.strengths, vec!["Network Vitality: healthy"]);
        assert!(r.network_conditions.concerns.is_empty());
    }

    #[test]
    fn test_fee_pressure_comes_from_fee_indicator() {
        assert_eq!(report().transaction_metrics.fee_pressure(), Some("low"));
    }

    #[test]
    fn test_conditions_list_strengths_and_concerns() {
        let c = NetworkConditions::assess(ConditionFactors {
            activity_trend: "declining",
            holder_sentiment: "distribution",
            transaction_health: "strong",
            network_vitality: "healthy",
        });
        assert_eq!(c.overall_status, "neutral");
        assert_eq!(c.strengths, vec!["Transaction Health: strong", "Network Vitality: healthy"]);
        assert_eq!(c.concerns, vec!["Activity Trend: declining", "Holder Sentiment: distribution"]);
    }
}
