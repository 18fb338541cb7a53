//! Per-widget configuration: which agent to call and how to present it.

use reqwest::Url;

/// Title shown when the embedding page does not provide one.
pub const DEFAULT_TITLE: &str = "Chatterbox AI Voice Demo";

/// Configuration owned by a single widget instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WidgetConfig {
    pub agent_id: Option<String>,
    pub title: String,
    pub sample_rate: Option<u32>,
    pub emit_raw_audio_samples: bool,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            agent_id: None,
            title: DEFAULT_TITLE.to_string(),
            sample_rate: None,
            emit_raw_audio_samples: false,
        }
    }
}

impl WidgetConfig {
    pub fn for_agent(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: Some(agent_id.into()),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Builds a config from key/value pairs such as URL query parameters or
    /// the embedding element's `data-*` attributes. Later keys win; blank
    /// values and unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        for (key, value) in pairs {
            let value = value.as_ref().trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "agentId" | "data-agent-id" => config.agent_id = Some(value.to_string()),
                "title" | "data-title" => config.title = value.to_string(),
                _ => {}
            }
        }
        config
    }

    /// Parses a URL query string, with or without the leading `?`.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        match Url::parse(&format!("http://widget.local/?{}", query)) {
            Ok(url) => Self::from_pairs(url.query_pairs()),
            Err(_) => Self::default(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.agent_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_agent_and_default_title() {
        let config = WidgetConfig::default();
        assert_eq!(config.agent_id, None);
        assert_eq!(config.title, DEFAULT_TITLE);
        assert!(!config.is_configured());
    }

    #[test]
    fn test_from_query_reads_agent_and_percent_decoded_title() {
        let config = WidgetConfig::from_query("?agentId=agent_99f4&title=Support%20Line");
        assert_eq!(config.agent_id.as_deref(), Some("agent_99f4"));
        assert_eq!(config.title, "Support Line");
        assert!(config.is_configured());
    }

    #[test]
    fn test_from_query_ignores_blank_and_unknown_keys() {
        let config = WidgetConfig::from_query("agentId=&title=%20&theme=dark");
        assert_eq!(config, WidgetConfig::default());
    }

    #[test]
    fn test_from_pairs_accepts_data_attributes() {
        let config = WidgetConfig::from_pairs([
            ("data-agent-id", "agent_iframe"),
            ("data-title", "Embedded"),
        ]);
        assert_eq!(config.agent_id.as_deref(), Some("agent_iframe"));
        assert_eq!(config.title, "Embedded");
    }

    #[test]
    fn test_builders() {
        let config = WidgetConfig::for_agent("agent_1").with_title("Sales");
        assert_eq!(config.agent_id.as_deref(), Some("agent_1"));
        assert_eq!(config.title, "Sales");
    }
}
