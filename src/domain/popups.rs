//! Usage: Popup routing rules (which content-requested windows stay in-app vs open in the browser).
//!
//! Rules use the same JSON shape the conferencing web app ships:
//!
//! ```json
//! { "google-auth": { "matchPatterns": { "url": "^https://accounts\\.google\\.com/" }, "target": "electron" } }
//! ```
//!
//! A rule matches when its `url` pattern matches the requested URL OR its `frameName` pattern
//! matches the requested frame name. Rules are evaluated in name order; the first match wins.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum PopupTarget {
    /// Open as a native in-app popup window.
    #[serde(rename = "electron")]
    InApp,
    #[serde(rename = "browser")]
    Browser,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MatchPatterns {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PopupRuleInput {
    #[serde(default)]
    pub match_patterns: MatchPatterns,
    pub target: PopupTarget,
}

pub(crate) type PopupsConfigInput = BTreeMap<String, PopupRuleInput>;

#[derive(Debug, Clone)]
struct PopupRule {
    name: String,
    url: Option<Regex>,
    frame_name: Option<Regex>,
    target: PopupTarget,
}

impl PopupRule {
    fn matches(&self, url: &str, frame_name: Option<&str>) -> bool {
        let url_matched = self.url.as_ref().is_some_and(|re| re.is_match(url));
        let frame_matched = match (&self.frame_name, frame_name) {
            (Some(re), Some(name)) => re.is_match(name),
            _ => false,
        };
        url_matched || frame_matched
    }
}

/// A resolved routing decision for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PopupRoute {
    pub role: String,
    pub target: PopupTarget,
}

#[derive(Debug, Clone)]
pub(crate) struct PopupsConfig {
    rules: Vec<PopupRule>,
}

fn compile_pattern(rule: &str, field: &str, pattern: Option<&str>) -> Result<Option<Regex>, String> {
    let Some(pattern) = pattern.map(str::trim).filter(|p| !p.is_empty()) else {
        return Ok(None);
    };
    Regex::new(pattern)
        .map(Some)
        .map_err(|e| format!("SEC_INVALID_INPUT: popup rule {rule} has invalid {field} pattern: {e}"))
}

impl PopupsConfig {
    pub(crate) fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub(crate) fn from_input(input: &PopupsConfigInput) -> Result<Self, String> {
        let mut rules = Vec::with_capacity(input.len());
        for (name, rule) in input {
            let name = name.trim();
            if name.is_empty() {
                return Err("SEC_INVALID_INPUT: popup rule name is required".to_string());
            }
            rules.push(PopupRule {
                name: name.to_string(),
                url: compile_pattern(name, "url", rule.match_patterns.url.as_deref())?,
                frame_name: compile_pattern(
                    name,
                    "frameName",
                    rule.match_patterns.frame_name.as_deref(),
                )?,
                target: rule.target,
            });
        }
        Ok(Self { rules })
    }

    pub(crate) fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.name.as_str()).collect()
    }

    /// Finds the first rule matching the request; `None` when no rule applies.
    pub(crate) fn resolve(&self, url: &str, frame_name: Option<&str>) -> Option<PopupRoute> {
        self.rules
            .iter()
            .find(|rule| rule.matches(url, frame_name))
            .map(|rule| PopupRoute {
                role: rule.name.clone(),
                target: rule.target,
            })
    }
}

impl Default for PopupsConfig {
    /// OAuth sign-in pages that must stay in-app so the conferencing page can read the result.
    fn default() -> Self {
        let defaults: [(&str, &str); 3] = [
            ("dropbox-auth", r"^https://www\.dropbox\.com/oauth2/authorize"),
            ("google-auth", r"^https://accounts\.google\.com/o/oauth2/"),
            ("microsoft-auth", r"^https://login\.microsoftonline\.com/"),
        ];
        let rules = defaults
            .iter()
            .filter_map(|(name, pattern)| {
                Regex::new(pattern).ok().map(|re| PopupRule {
                    name: (*name).to_string(),
                    url: Some(re),
                    frame_name: None,
                    target: PopupTarget::InApp,
                })
            })
            .collect();
        Self { rules }
    }
}

/// Both "no rule matched" and an explicit `browser` target hand the URL to the OS browser.
pub(crate) fn should_open_externally(route: Option<&PopupRoute>) -> bool {
    match route {
        Some(route) => route.target == PopupTarget::Browser,
        None => true,
    }
}

pub(crate) fn popup_window_label(role: &str) -> String {
    let sanitized: String = role
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    format!("popup-{sanitized}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> PopupsConfig {
        let input: PopupsConfigInput = serde_json::from_str(json).expect("parse input");
        PopupsConfig::from_input(&input).expect("compile config")
    }

    #[test]
    fn default_config_keeps_google_oauth_in_app() {
        let config = PopupsConfig::default();
        let route = config
            .resolve(
                "https://accounts.google.com/o/oauth2/auth?client_id=abc",
                None,
            )
            .expect("google oauth should match");
        assert_eq!(route.role, "google-auth");
        assert_eq!(route.target, PopupTarget::InApp);
        assert!(!should_open_externally(Some(&route)));
    }

    #[test]
    fn unmatched_url_opens_externally() {
        let config = PopupsConfig::default();
        let route = config.resolve("https://jitsi.org/", Some("_blank"));
        assert!(route.is_none());
        assert!(should_open_externally(route.as_ref()));
    }

    #[test]
    fn browser_target_opens_externally() {
        let config = parse(
            r#"{"docs":{"matchPatterns":{"url":"^https://docs\\.example\\.com/"},"target":"browser"}}"#,
        );
        let route = config.resolve("https://docs.example.com/page", None);
        assert_eq!(
            route,
            Some(PopupRoute {
                role: "docs".to_string(),
                target: PopupTarget::Browser,
            })
        );
        assert!(should_open_externally(route.as_ref()));
    }

    #[test]
    fn frame_name_alone_can_match() {
        let config = parse(
            r#"{"auth":{"matchPatterns":{"url":"^https://never\\.example/","frameName":"^AuthPopup$"},"target":"electron"}}"#,
        );
        assert!(config
            .resolve("https://elsewhere.example/", Some("AuthPopup"))
            .is_some());
        assert!(config.resolve("https://elsewhere.example/", None).is_none());
        assert!(config
            .resolve("https://elsewhere.example/", Some("Other"))
            .is_none());
    }

    #[test]
    fn first_rule_in_name_order_wins() {
        let config = parse(
            r#"{
                "b-browser":{"matchPatterns":{"url":"example"},"target":"browser"},
                "a-app":{"matchPatterns":{"url":"example"},"target":"electron"}
            }"#,
        );
        assert_eq!(config.rule_names(), vec!["a-app", "b-browser"]);
        let route = config.resolve("https://example.com", None).expect("match");
        assert_eq!(route.role, "a-app");
    }

    #[test]
    fn rule_without_patterns_never_matches() {
        let config = parse(r#"{"idle":{"target":"electron"}}"#);
        assert!(config.resolve("https://example.com", Some("x")).is_none());
    }

    #[test]
    fn invalid_pattern_is_rejected_with_rule_name() {
        let input: PopupsConfigInput = serde_json::from_str(
            r#"{"broken":{"matchPatterns":{"url":"(unclosed"},"target":"electron"}}"#,
        )
        .expect("parse input");
        let err = PopupsConfig::from_input(&input).unwrap_err();
        assert!(err.starts_with("SEC_INVALID_INPUT: popup rule broken"));
    }

    #[test]
    fn unknown_target_fails_to_deserialize() {
        let parsed: Result<PopupsConfigInput, _> =
            serde_json::from_str(r#"{"x":{"target":"tab"}}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn popup_window_label_sanitizes_role() {
        assert_eq!(popup_window_label("google-auth"), "popup-google-auth");
        assert_eq!(popup_window_label("a b/c"), "popup-a-b-c");
    }
}
