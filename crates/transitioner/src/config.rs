use indexmap::IndexMap;
use serde::Deserialize;
use web_time::Duration;

use crate::error::Result;
use crate::handle::Phase;
use crate::style::{StyleMap, TransitionSpec};

/// Transition defaults plus the optional appear / enter / leave specs.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionerConfig {
    pub duration: Duration,
    pub timing_function: String,
    pub appear: Option<TransitionSpec>,
    pub enter: Option<TransitionSpec>,
    pub leave: Option<TransitionSpec>,
}

impl Default for TransitionerConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(500),
            timing_function: "linear".to_owned(),
            appear: None,
            enter: None,
            leave: None,
        }
    }
}

impl TransitionerConfig {
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_timing_function(mut self, token: impl Into<String>) -> Self {
        self.timing_function = token.into();
        self
    }

    pub fn with_appear(mut self, spec: TransitionSpec) -> Self {
        self.appear = Some(spec);
        self
    }

    pub fn with_enter(mut self, spec: TransitionSpec) -> Self {
        self.enter = Some(spec);
        self
    }

    pub fn with_leave(mut self, spec: TransitionSpec) -> Self {
        self.leave = Some(spec);
        self
    }

    pub fn spec_for(&self, phase: Phase) -> Option<&TransitionSpec> {
        match phase {
            Phase::Appear => self.appear.as_ref(),
            Phase::Enter => self.enter.as_ref(),
            Phase::Leave => self.leave.as_ref(),
        }
    }

    /// Parses a TOML config. Durations are integer milliseconds; style values
    /// may be strings or numbers.
    ///
    /// ```toml
    /// duration = 300
    /// timing_function = "cubic.easeOut"
    ///
    /// [enter]
    /// from = { opacity = 0, transform = "translateY(-8px)" }
    /// to = { opacity = 1, transform = "none" }
    /// ```
    ///
    /// A spec missing `from` or `to` is dropped with a warning; the phase then
    /// completes immediately.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(s)?;

        let mut config = Self::default();
        if let Some(ms) = raw.duration {
            config.duration = Duration::from_millis(ms);
        }
        if let Some(token) = raw.timing_function {
            config.timing_function = token;
        }
        config.appear = raw.appear.and_then(|r| r.into_spec(Phase::Appear));
        config.enter = raw.enter.and_then(|r| r.into_spec(Phase::Enter));
        config.leave = raw.leave.and_then(|r| r.into_spec(Phase::Leave));
        Ok(config)
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawConfig {
    duration: Option<u64>,
    #[serde(alias = "timingFunction")]
    timing_function: Option<String>,
    #[serde(alias = "transitionAppear")]
    appear: Option<RawSpec>,
    #[serde(alias = "transitionEnter")]
    enter: Option<RawSpec>,
    #[serde(alias = "transitionLeave")]
    leave: Option<RawSpec>,
}

#[derive(Deserialize)]
struct RawSpec {
    from: Option<IndexMap<String, StyleValue>>,
    to: Option<IndexMap<String, StyleValue>>,
    duration: Option<u64>,
    #[serde(alias = "timingFunction")]
    timing_function: Option<String>,
    delay: Option<u64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StyleValue {
    Text(String),
    Int(i64),
    Float(f64),
}

impl StyleValue {
    fn into_css(self) -> String {
        match self {
            StyleValue::Text(s) => s,
            StyleValue::Int(n) => n.to_string(),
            StyleValue::Float(f) => f.to_string(),
        }
    }
}

fn to_style_map(raw: IndexMap<String, StyleValue>) -> StyleMap {
    raw.into_iter().map(|(k, v)| (k, v.into_css())).collect()
}

impl RawSpec {
    fn into_spec(self, phase: Phase) -> Option<TransitionSpec> {
        let spec = TransitionSpec::try_from_parts(
            self.from.map(to_style_map),
            self.to.map(to_style_map),
        );
        match spec {
            Ok(mut spec) => {
                spec.duration = self.duration.map(Duration::from_millis);
                spec.delay = self.delay.map(Duration::from_millis);
                spec.timing_function = self.timing_function;
                Some(spec)
            }
            Err(err) => {
                log::warn!("dropping {phase} transition: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransitionError;

    #[test]
    fn defaults() {
        let c = TransitionerConfig::default();
        assert_eq!(c.duration, Duration::from_millis(500));
        assert_eq!(c.timing_function, "linear");
        assert!(c.spec_for(Phase::Enter).is_none());
    }

    #[test]
    fn parses_toml() {
        let c = TransitionerConfig::from_toml_str(
            r#"
            duration = 300
            timingFunction = "cubic.easeOut"

            [enter]
            from = { opacity = 0, transform = "translateY(-8px)" }
            to = { opacity = 1.5, transform = "none" }
            delay = 20

            [transitionLeave]
            from = { opacity = 1 }
            to = { opacity = 0 }
            timing_function = "easeInQuad"
            "#,
        )
        .unwrap();

        assert_eq!(c.duration, Duration::from_millis(300));
        assert_eq!(c.timing_function, "cubic.easeOut");

        let enter = c.enter.as_ref().unwrap();
        assert_eq!(enter.from["opacity"], "0");
        assert_eq!(enter.from["transform"], "translateY(-8px)");
        assert_eq!(enter.to["opacity"], "1.5");
        assert_eq!(enter.delay, Some(Duration::from_millis(20)));
        assert_eq!(enter.duration, None);

        let leave = c.spec_for(Phase::Leave).unwrap();
        assert_eq!(leave.timing_function.as_deref(), Some("easeInQuad"));
        assert!(c.appear.is_none());
    }

    #[test]
    fn spec_missing_to_is_dropped() {
        let c = TransitionerConfig::from_toml_str(
            r#"
            [appear]
            from = { opacity = 0 }
            "#,
        )
        .unwrap();
        assert!(c.appear.is_none());
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = TransitionerConfig::from_toml_str("duration = \"soon\"").unwrap_err();
        assert!(matches!(err, TransitionError::Config(_)));
    }
}
