//! Structured insight payload returned with every agent reply.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

const DEFAULT_VALUE_SHARE: f64 = 12.0;

/// Where the conversation currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationStage {
    #[default]
    Intro,
    Discovery,
    Quantification,
    Automation,
    Agreement,
    Complete,
}

/// A pain point the agent has heard about.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeardPainPoint {
    #[serde(deserialize_with = "lenient")]
    pub label: String,
    #[serde(deserialize_with = "lenient")]
    pub hours_per_week: f64,
    #[serde(deserialize_with = "lenient")]
    pub consequence: String,
}

/// An automation the agent has suggested.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutomationSuggestion {
    #[serde(deserialize_with = "lenient")]
    pub title: String,
    #[serde(deserialize_with = "lenient")]
    pub description: String,
    #[serde(deserialize_with = "lenient")]
    pub estimated_savings: f64,
}

/// Snapshot of conversation progress. Each reply replaces it wholesale.
///
/// Model output is loosely typed, so a field with an unexpected value falls
/// back to its default instead of failing the whole payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InsightPayload {
    #[serde(deserialize_with = "lenient")]
    pub stage: ConversationStage,
    #[serde(deserialize_with = "lenient_list")]
    pub pain_points: Vec<HeardPainPoint>,
    #[serde(deserialize_with = "lenient")]
    pub estimated_annual_cost: f64,
    #[serde(deserialize_with = "lenient_list")]
    pub automation_suggestions: Vec<AutomationSuggestion>,
    #[serde(deserialize_with = "lenient_value_share")]
    pub value_share_percent: f64,
    #[serde(deserialize_with = "lenient")]
    pub ready_for_agreement: bool,
    #[serde(deserialize_with = "lenient")]
    pub agreed_to_terms: bool,
}

impl Default for InsightPayload {
    fn default() -> Self {
        Self {
            stage: ConversationStage::Intro,
            pain_points: Vec::new(),
            estimated_annual_cost: 0.0,
            automation_suggestions: Vec::new(),
            value_share_percent: DEFAULT_VALUE_SHARE,
            ready_for_agreement: false,
            agreed_to_terms: false,
        }
    }
}

impl InsightPayload {
    /// Total weekly hours across the heard pain points.
    pub fn total_hours_per_week(&self) -> f64 {
        self.pain_points.iter().map(|p| p.hours_per_week).sum()
    }
}

/// One reasoning-service turn: spoken text plus insights.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentReply {
    pub message: String,
    pub insights: InsightPayload,
}

impl AgentReply {
    /// Parses model output, tolerating a surrounding ```json fence.
    ///
    /// Anything that is not a JSON object becomes a reply whose message is
    /// the raw text and whose insights are the defaults. Inside an object a
    /// non-string `message` reads as blank, and unreadable insights fall
    /// back field by field.
    pub fn parse(raw: &str) -> Self {
        let cleaned = strip_code_fence(raw);
        let Ok(Value::Object(mut object)) = serde_json::from_str::<Value>(cleaned) else {
            return AgentReply {
                message: raw.to_string(),
                insights: InsightPayload::default(),
            };
        };
        let message = match object.remove("message") {
            Some(Value::String(message)) => message,
            _ => String::new(),
        };
        let insights = object
            .remove("insights")
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_default();
        AgentReply { message, insights }
    }

    /// Whether the reply carries something worth speaking.
    pub fn has_message(&self) -> bool {
        !self.message.trim().is_empty()
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Keeps the entries that read as objects and skips the rest.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| T::deserialize(item).ok())
        .collect())
}

fn lenient_value_share<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_f64().unwrap_or(DEFAULT_VALUE_SHARE))
}

fn strip_code_fence(raw: &str) -> &str {
    let mut text = raw.trim_start();
    if let Some(rest) = text
        .get(..7)
        .filter(|prefix| prefix.eq_ignore_ascii_case("```json"))
        .and_then(|_| text.get(7..))
    {
        text = rest.trim_start();
    }
    let mut text = text.trim_end();
    if let Some(stripped) = text.strip_suffix("```") {
        text = stripped.trim_end();
    }
    text.trim()
}
