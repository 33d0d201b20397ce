//! Prompt rendering for batch field extraction

/// Placeholder the campaign list is substituted into
pub const CAMPAIGNS_PLACEHOLDER: &str = "{campaigns}";

/// Default batch prompt
///
/// Names the four target fields with example values, asks for one object per
/// campaign in input order, and forbids prose around the JSON.
pub const DEFAULT_TEMPLATE: &str = r#"Parse these campaign names and extract structured fields for each.

Campaign names:
{campaigns}

For each campaign, extract:
- source: The ad platform (facebook, google, tiktok, linkedin, etc.)
- objective: The campaign goal (prospecting, retargeting, brand, conversion, awareness, etc.)
- geo: The target geography as 2-letter code (US, UK, DE, FR, etc.)
- audience: The audience type (cold, warm, lookalike, etc.) or null if not specified

Return a JSON array with one object per campaign, in the same order:
[{"campaign_name": "...", "source": "...", "objective": "...", "geo": "...", "audience": "..."}]

Return JSON only, no explanation."#;

/// Builds the extraction prompt for one batch
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    template: String,
}

impl PromptBuilder {
    /// Builder using [`DEFAULT_TEMPLATE`]
    pub fn new() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }

    /// Builder using a custom template containing `{campaigns}`
    pub fn with_template(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Render the prompt for `names`, one `- name` line each, in order
    ///
    /// Only the template is scanned for the placeholder, so a campaign name
    /// that happens to contain `{campaigns}` is inserted literally.
    pub fn build(&self, names: &[String]) -> String {
        let campaigns = names
            .iter()
            .map(|name| format!("- {}", name))
            .collect::<Vec<_>>()
            .join("\n");

        self.template.replace(CAMPAIGNS_PLACEHOLDER, &campaigns)
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_prompt_lists_names_in_order() {
        let prompt = PromptBuilder::new().build(&names(&["fb_prospecting_us", "Facebook - Retargeting"]));

        assert!(prompt.contains("- fb_prospecting_us\n- Facebook - Retargeting\n"));
        let first = prompt.find("fb_prospecting_us").unwrap();
        let second = prompt.find("Facebook - Retargeting").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_prompt_names_all_target_fields() {
        let prompt = PromptBuilder::new().build(&names(&["x"]));
        for field in ["source:", "objective:", "geo:", "audience:"] {
            assert!(prompt.contains(field), "missing {}", field);
        }
        assert!(prompt.contains("facebook, google, tiktok, linkedin"));
        assert!(prompt.contains("2-letter code"));
    }

    #[test]
    fn test_prompt_mandates_ordered_json_only() {
        let prompt = PromptBuilder::new().build(&names(&["x"]));
        assert!(prompt.contains("JSON array with one object per campaign, in the same order"));
        assert!(prompt.contains(r#"{"campaign_name": "...", "source": "...", "objective": "...", "geo": "...", "audience": "..."}"#));
        assert!(prompt.ends_with("Return JSON only, no explanation."));
        assert!(!prompt.contains(CAMPAIGNS_PLACEHOLDER));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let batch = names(&["a", "b", "c"]);
        let builder = PromptBuilder::new();
        assert_eq!(builder.build(&batch), builder.build(&batch));
    }

    #[test]
    fn test_custom_template() {
        let builder = PromptBuilder::with_template("Names:\n{campaigns}\nJSON please.");
        assert_eq!(builder.build(&names(&["a", "b"])), "Names:\n- a\n- b\nJSON please.");
    }

    #[test]
    fn test_name_containing_placeholder_is_literal() {
        let builder = PromptBuilder::with_template("[{campaigns}]");
        assert_eq!(builder.build(&names(&["{campaigns}"])), "[- {campaigns}]");
    }
}
