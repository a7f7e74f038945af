//! AI sentiment summaries for the Orange Reactor terminal
//!
//! A thin Gemini `generateContent` client, the prompt built from the live
//! market snapshot and chart, and a summarizer that always yields an
//! [`AnalysisResult`](terminal_core::AnalysisResult), substituting canned
//! answers when the model is unconfigured or unreachable.

pub mod gemini;
pub mod prompt;
pub mod summarizer;

pub use gemini::GeminiClient;
pub use prompt::{build_prompt, response_schema, TrendContext};
pub use summarizer::{parse_analysis, SentimentModel, SentimentSummarizer};
