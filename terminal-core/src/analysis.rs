//! AI sentiment judgments

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction the model reads the market in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Bullish, Sentiment::Bearish, Sentiment::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Bullish => "BULLISH",
            Sentiment::Bearish => "BEARISH",
            Sentiment::Neutral => "NEUTRAL",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structured sentiment summary, replaced wholesale on every analysis cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub sentiment: Sentiment,
    /// 0-100
    pub confidence: u8,
    pub analysis: String,
    pub recommendation: String,
}

impl AnalysisResult {
    /// Canned answer when the AI service could not be reached or answered garbage
    pub fn interrupted() -> Self {
        Self {
            sentiment: Sentiment::Neutral,
            confidence: 50,
            analysis: "COMMUNICATION INTERRUPTED. STATIC IN THE DATASTREAM.".to_string(),
            recommendation: "WAIT".to_string(),
        }
    }

    /// Canned answer when no AI credential is configured
    pub fn offline() -> Self {
        Self {
            sentiment: Sentiment::Neutral,
            confidence: 75,
            analysis: "SYSTEM WARNING: NEURAL LINK SEVERED. UNABLE TO CONNECT TO AI CORE. \
                       DISPLAYING CACHED HEURISTICS: MARKET VOLATILITY WITHIN TOLERANCE."
                .to_string(),
            recommendation: "HODL".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentiment_wire_format() {
        assert_eq!(serde_json::to_string(&Sentiment::Bullish).unwrap(), r#""BULLISH""#);
        let s: Sentiment = serde_json::from_str(r#""BEARISH""#).unwrap();
        assert_eq!(s, Sentiment::Bearish);
        assert!(serde_json::from_str::<Sentiment>(r#""MOON""#).is_err());
    }

    #[test]
    fn test_fallbacks() {
        let interrupted = AnalysisResult::interrupted();
        assert_eq!(interrupted.sentiment, Sentiment::Neutral);
        assert_eq!(interrupted.confidence, 50);
        assert_eq!(interrupted.recommendation, "WAIT");

        let offline = AnalysisResult::offline();
        assert_eq!(offline.confidence, 75);
        assert_eq!(offline.recommendation, "HODL");
        assert!(offline.analysis.starts_with("SYSTEM WARNING"));
    }
}
