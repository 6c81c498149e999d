// ABOUTME: Template engine implementation using Handlebars in strict mode
// ABOUTME: Substitutes merged variables and helper results into job descriptor templates

use handlebars::Handlebars;
use serde_json::Value as JsonValue;
use std::sync::Arc;

use super::context::{EnvironmentReader, ProcessEnvironment};
use super::error::{Result, TemplateError};
use super::helpers;
use crate::variables::VariableSet;

/// Renders job templates against a merged variable set.
///
/// Strict mode is always on: a placeholder that resolves to nothing fails the
/// whole render with [`TemplateError::MissingVariable`], including the
/// condition of `#if` and `#unless`. Output is never HTML-escaped.
#[derive(Clone)]
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
}

impl TemplateEngine {
    /// Create an engine whose `env` helper reads the process environment
    pub fn new() -> Self {
        Self::with_environment(Arc::new(ProcessEnvironment))
    }

    /// Create an engine whose `env` helper reads from `env`
    pub fn with_environment(env: Arc<dyn EnvironmentReader>) -> Self {
        let mut handlebars = Handlebars::new();

        handlebars.set_strict_mode(true);
        handlebars.set_dev_mode(false);

        // Job specs are not HTML
        handlebars.register_escape_fn(handlebars::no_escape);

        helpers::register_helpers(&mut handlebars, env);

        Self { handlebars }
    }

    /// Render a template with a merged variable set
    pub fn render(&self, template: &str, variables: &VariableSet) -> Result<String> {
        self.render_with_json(template, &variables.to_context())
    }

    /// Render a template with a raw JSON context
    pub fn render_with_json(&self, template: &str, context: &JsonValue) -> Result<String> {
        self.handlebars
            .render_template(template, context)
            .map_err(TemplateError::from)
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::context::MapEnvironment;
    use serde_json::json;

    fn engine() -> TemplateEngine {
        let env = MapEnvironment::new().with_var("GROUP_NAME_ENV", "cache");
        TemplateEngine::with_environment(Arc::new(env))
    }

    fn vars(pairs: &[(&str, &str)]) -> VariableSet {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn test_basic_substitution() {
        let result = engine()
            .render("job \"{{job_name}}\" {}", &vars(&[("job_name", "levantExample")]))
            .unwrap();
        assert_eq!(result, "job \"levantExample\" {}");
    }

    #[test]
    fn test_nested_variables() {
        let mut set = VariableSet::new();
        set.insert_flattened("app".to_string(), &json!({ "image": "redis", "tag": "7" }));

        let result = engine().render("{{app.image}}:{{app.tag}}", &set).unwrap();
        assert_eq!(result, "redis:7");
    }

    #[test]
    fn test_no_html_escaping() {
        let result = engine()
            .render("{{url}}", &vars(&[("url", "http://x/?a=1&b=<2>")]))
            .unwrap();
        assert_eq!(result, "http://x/?a=1&b=<2>");
    }

    #[test]
    fn test_missing_variable_is_named() {
        let err = engine()
            .render(
                "artifact { source = \"{{binary_url}}\" }",
                &vars(&[("job_name", "example")]),
            )
            .unwrap_err();

        assert_eq!(err.missing_variable(), Some("binary_url"));
        assert!(err.to_string().contains("binary_url"));
    }

    #[test]
    fn test_missing_helper_argument_is_named() {
        let err = engine()
            .render("{{upper group_name}}", &VariableSet::new())
            .unwrap_err();
        assert!(err.to_string().contains("group_name"));
    }

    #[test]
    fn test_default_suppresses_only_its_placeholder() {
        let template = "{{default \"binary_url\" \"http://fallback\"}} {{other}}";

        let err = engine().render(template, &VariableSet::new()).unwrap_err();
        assert_eq!(err.missing_variable(), Some("other"));

        let ok = engine()
            .render(template, &vars(&[("other", "set")]))
            .unwrap();
        assert_eq!(ok, "http://fallback set");
    }

    #[test]
    fn test_env_helper_uses_injected_environment() {
        let result = engine()
            .render("group \"{{env \"GROUP_NAME_ENV\"}}\"", &VariableSet::new())
            .unwrap();
        assert_eq!(result, "group \"cache\"");
    }

    #[test]
    fn test_env_ignores_variable_set() {
        let result = engine()
            .render("[{{env \"job_name\"}}]", &vars(&[("job_name", "example")]))
            .unwrap();
        assert_eq!(result, "[]");
    }

    #[test]
    fn test_malformed_expression() {
        let err = engine()
            .render("job \"{{job_name}\" {}", &vars(&[("job_name", "x")]))
            .unwrap_err();
        assert!(matches!(err, TemplateError::SyntaxError(_)));
    }

    #[test]
    fn test_unknown_helper() {
        let err = engine()
            .render("{{consul_key \"service/name\"}}", &VariableSet::new())
            .unwrap_err();
        assert!(matches!(err, TemplateError::SyntaxError(_)));
        assert!(err.to_string().contains("consul_key"));
    }

    #[test]
    fn test_helper_misuse_is_a_syntax_error() {
        for template in [
            "{{default \"binary_url\"}}",
            "{{env}}",
            "{{env 5}}",
            "{{join \", \" \"not a list\"}}",
            "{{> partial}}",
        ] {
            let err = engine().render(template, &VariableSet::new()).unwrap_err();
            assert!(
                matches!(err, TemplateError::SyntaxError(_)),
                "{} gave {:?}",
                template,
                err
            );
        }
    }

    #[test]
    fn test_decode_failure_is_a_render_error() {
        let err = engine()
            .render("{{base64_decode \"not base64!\"}}", &VariableSet::new())
            .unwrap_err();
        assert!(matches!(err, TemplateError::RenderError(_)));
    }

    #[test]
    fn test_conditionals_require_the_variable() {
        let err = engine()
            .render("{{#if enable_canary}}canary{{/if}}", &VariableSet::new())
            .unwrap_err();
        assert_eq!(err.missing_variable(), Some("enable_canary"));

        let err = engine()
            .render("{{#unless enable_canary}}stable{{/unless}}", &VariableSet::new())
            .unwrap_err();
        assert_eq!(err.missing_variable(), Some("enable_canary"));
    }

    #[test]
    fn test_conditionals_on_present_variables() {
        let mut set = VariableSet::new();
        set.insert("canary".to_string(), json!(false));
        set.insert("count".to_string(), json!(0));
        set.insert("region".to_string(), json!("eu"));

        let template = "{{#if canary}}a{{else if region}}b{{else}}c{{/if}}";
        assert_eq!(engine().render(template, &set).unwrap(), "b");

        let unless = engine()
            .render("{{#unless canary}}stable{{/unless}}", &set)
            .unwrap();
        assert_eq!(unless, "stable");

        let zero = engine()
            .render("{{#if count includeZero=true}}zero{{/if}}", &set)
            .unwrap();
        assert_eq!(zero, "zero");
    }

    #[test]
    fn test_template_without_placeholders() {
        let text = "job \"static\" {\n  datacenters = [\"dc1\"]\n}\n";
        let result = engine().render(text, &VariableSet::new()).unwrap();
        assert_eq!(result, text);
    }

    #[test]
    fn test_escaped_braces_pass_through() {
        let result = engine()
            .render("data = \\{{ key }}", &VariableSet::new())
            .unwrap();
        assert_eq!(result, "data = {{ key }}");
    }

    #[test]
    fn test_render_is_deterministic() {
        let set = vars(&[("job_name", "example"), ("datacentre", "dc13")]);
        let template = "job \"{{job_name}}\" { datacenters = [\"{{datacentre}}\"] }";

        let first = engine().render(template, &set).unwrap();
        let second = engine().render(template, &set).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_block_helpers_available() {
        let mut set = VariableSet::new();
        set.insert("servers".to_string(), json!(["a", "b"]));

        let result = engine()
            .render("{{#each servers}}[{{this}}]{{/each}}", &set)
            .unwrap();
        assert_eq!(result, "[a][b]");
    }

}
