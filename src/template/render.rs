//! Render orchestration for notification content records

use serde_json::Value;

use super::parser::parse;
use super::substitution::{render_nodes, OutputMode};
use super::types::{RenderedContent, TemplateContent, TemplateError, TemplateResult};

/// Render a single template string.
///
/// Never fails: missing variables render empty and malformed directive
/// syntax is kept as literal text.
pub fn render_template(source: &str, variables: &Value, mode: OutputMode) -> String {
    render_nodes(&parse(source), variables, mode)
}

/// Render every field present in `content`.
///
/// Only the `html` field is escaped. Fields absent from the input are absent
/// from the result.
pub fn render_content(
    content: &TemplateContent,
    variables: &Value,
) -> TemplateResult<RenderedContent> {
    if !variables.is_object() {
        return Err(TemplateError::InvalidInput(
            "Variables must be an object".to_string(),
        ));
    }

    let render = |field: &Option<String>, mode| {
        field
            .as_deref()
            .map(|source| render_template(source, variables, mode))
    };

    let rendered = RenderedContent {
        subject: render(&content.subject, OutputMode::Plain),
        text: render(&content.text, OutputMode::Plain),
        html: render(&content.html, OutputMode::Html),
    };

    tracing::trace!(
        subject = rendered.subject.is_some(),
        text = rendered.text.is_some(),
        html = rendered.html.is_some(),
        "Rendered template content"
    );

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn content(subject: Option<&str>, text: Option<&str>, html: Option<&str>) -> TemplateContent {
        TemplateContent {
            subject: subject.map(str::to_string),
            text: text.map(str::to_string),
            html: html.map(str::to_string),
        }
    }

    #[test]
    fn test_render_identity_without_placeholders() {
        let source = "Plain text with { braces } and }} stray closers {{";
        assert_eq!(
            render_template(source, &json!({"a": 1}), OutputMode::Plain),
            source
        );
        assert_eq!(render_template(source, &json!({}), OutputMode::Html), source);
    }

    #[test]
    fn test_render_vip_scenario() {
        let source = "{{#if vip}}VIP{{/if}} customer";
        assert_eq!(
            render_template(source, &json!({"vip": true}), OutputMode::Plain),
            "VIP customer"
        );
        assert_eq!(
            render_template(source, &json!({"vip": false}), OutputMode::Plain),
            " customer"
        );
    }

    #[test]
    fn test_render_is_idempotent_on_output() {
        let vars = json!({"booking": {"id": "B-7", "items": [{"name": "Spa"}]}});
        let once = render_template(
            "Booking {{booking.id}}: {{#each booking.items}}{{name}}{{/each}}",
            &vars,
            OutputMode::Plain,
        );
        assert_eq!(once, "Booking B-7: Spa");
        assert_eq!(render_template(&once, &vars, OutputMode::Plain), once);
        assert_eq!(render_template(&once, &json!({}), OutputMode::Plain), once);
    }

    #[test]
    fn test_render_content_escapes_html_only() {
        let vars = json!({"name": "<Tom & 'Jerry'>", "quote": "\"hi\""});
        let rendered = render_content(
            &content(
                Some("Hello {{name}}"),
                Some("{{name}} says {{quote}}"),
                Some("<p>{{name}} says {{quote}}</p>"),
            ),
            &vars,
        )
        .unwrap();

        assert_eq!(rendered.subject.as_deref(), Some("Hello <Tom & 'Jerry'>"));
        assert_eq!(
            rendered.text.as_deref(),
            Some("<Tom & 'Jerry'> says \"hi\"")
        );
        assert_eq!(
            rendered.html.as_deref(),
            Some("<p>&lt;Tom &amp; &#39;Jerry&#39;&gt; says &quot;hi&quot;</p>")
        );
    }

    #[test]
    fn test_render_content_keeps_only_present_fields() {
        let rendered =
            render_content(&content(None, Some("Code {{code}}"), None), &json!({"code": 1234}))
                .unwrap();

        assert_eq!(rendered.subject, None);
        assert_eq!(rendered.text.as_deref(), Some("Code 1234"));
        assert_eq!(rendered.html, None);
    }

    #[test]
    fn test_render_content_rejects_non_object_variables() {
        let c = content(Some("Hi"), None, None);
        for vars in [json!(null), json!([1, 2]), json!("name"), json!(3)] {
            assert!(matches!(
                render_content(&c, &vars),
                Err(TemplateError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_render_booking_confirmation() {
        let vars = json!({
            "booking": {
                "id": "BK-1001",
                "customerName": "Asha",
                "date": "2026-11-02",
                "time": "19:30",
                "location": "Lisbon",
                "specialRequests": "",
                "items": [
                    {"name": "Dinner cruise", "price": 80},
                    {"name": "Wine pairing", "price": 25}
                ],
                "total": 105
            }
        });
        let source = "Dear {{booking.customerName}},\n\
            {{#each booking.items}}- {{name}}: {{price}}\n{{/each}}\
            Total: {{booking.total}}\n\
            {{#if booking.specialRequests}}Requests: {{booking.specialRequests}}{{/if}}";

        assert_eq!(
            render_template(source, &vars, OutputMode::Plain),
            "Dear Asha,\n- Dinner cruise: 80\n- Wine pairing: 25\nTotal: 105\n"
        );
    }
}
