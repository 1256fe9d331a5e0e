//! JavaScript generation for DOM queries and actions
//!
//! Every script is a self-contained IIFE returning a JSON string, evaluated
//! through `Runtime.evaluate` with `returnByValue`.

use serde::Deserialize;

use crate::session::selector::{normalize_whitespace, Selector};

/// Quote a string as a JavaScript literal
pub fn js_string(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}

/// Expression evaluating to an array of the elements matched by `selector`
pub fn resolve_expression(selector: &Selector) -> String {
    match selector {
        Selector::Css(css) => format!("Array.from(document.querySelectorAll({}))", js_string(css)),
        Selector::XPath(xpath) => format!(
            "(() => {{ \
                const r = document.evaluate({}, document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null); \
                const out = []; \
                for (let i = 0; i < r.snapshotLength; i++) out.push(r.snapshotItem(i)); \
                return out.filter(n => n.nodeType === Node.ELEMENT_NODE); \
            }})()",
            js_string(xpath)
        ),
        Selector::HasText { css, text } => format!(
            "Array.from(document.querySelectorAll({})).filter(el => \
                (el.textContent || '').replace(/\\s+/g, ' ').trim().toLowerCase().includes({}))",
            js_string(css),
            js_string(&normalize_whitespace(text).to_lowercase())
        ),
    }
}

/// Helper functions shared by query and fill scripts
const ELEMENT_HELPERS: &str = r#"
    const isVisible = (el) => {
        const style = window.getComputedStyle(el);
        if (style.visibility === 'hidden' || style.display === 'none') return false;
        const rect = el.getBoundingClientRect();
        return rect.width > 0 && rect.height > 0;
    };
    const isFormControl = (el) => ['input', 'textarea', 'select'].includes(el.tagName.toLowerCase());
    const isEditable = (el) => {
        if (el.isContentEditable) return true;
        const tag = el.tagName.toLowerCase();
        if (tag !== 'input' && tag !== 'textarea') return false;
        return !el.disabled && !el.readOnly;
    };
"#;

/// Script returning a JSON array of [`crate::session::ElementSnapshot`]s
pub fn query_script(selector: &Selector) -> String {
    format!(
        r#"(() => {{
    {helpers}
    const elements = {resolve};
    return JSON.stringify(elements.map(el => ({{
        tag_name: el.tagName.toLowerCase(),
        visible: isVisible(el),
        text_content: el.textContent || '',
        input_value: isFormControl(el) ? el.value : null,
        enabled: !el.disabled,
        editable: isEditable(el)
    }})));
}})()"#,
        helpers = ELEMENT_HELPERS,
        resolve = resolve_expression(selector)
    )
}

/// Script filling the single element matched by `selector`, returning a
/// JSON-encoded [`FillOutcome`]
pub fn fill_script(selector: &Selector, value: &str) -> String {
    format!(
        r#"(() => {{
    {helpers}
    const elements = {resolve};
    if (elements.length === 0) return JSON.stringify({{ status: 'not_found' }});
    if (elements.length > 1) return JSON.stringify({{ status: 'ambiguous', count: elements.length }});
    const el = elements[0];
    if (!isVisible(el)) return JSON.stringify({{ status: 'not_interactable', reason: 'element is not visible' }});
    if (el.disabled) return JSON.stringify({{ status: 'not_interactable', reason: 'element is disabled' }});
    if (!isEditable(el)) return JSON.stringify({{ status: 'not_interactable', reason: 'element is not editable' }});
    const value = {value};
    el.focus();
    if (el.isContentEditable) {{
        el.textContent = value;
    }} else {{
        const proto = el.tagName.toLowerCase() === 'textarea' ? HTMLTextAreaElement.prototype : HTMLInputElement.prototype;
        Object.getOwnPropertyDescriptor(proto, 'value').set.call(el, value);
    }}
    el.dispatchEvent(new Event('input', {{ bubbles: true }}));
    el.dispatchEvent(new Event('change', {{ bubbles: true }}));
    return JSON.stringify({{ status: 'ok' }});
}})()"#,
        helpers = ELEMENT_HELPERS,
        resolve = resolve_expression(selector),
        value = js_string(value)
    )
}

/// Result reported by [`fill_script`]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FillOutcome {
    Ok,
    NotFound,
    Ambiguous { count: usize },
    NotInteractable { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_string_escapes() {
        assert_eq!(js_string(r#"a"b'c\d"#), r#""a\"b'c\\d""#);
    }

    #[test]
    fn test_resolve_css() {
        let script = resolve_expression(&Selector::css("footer .copyright"));
        assert_eq!(script, r#"Array.from(document.querySelectorAll("footer .copyright"))"#);
    }

    #[test]
    fn test_resolve_xpath_quotes_expression() {
        let script = resolve_expression(&Selector::xpath(r#"//input[@id="user_login"]"#));
        assert!(script.contains(r#"document.evaluate("//input[@id=\"user_login\"]""#));
        assert!(script.contains("ORDERED_NODE_SNAPSHOT_TYPE"));
    }

    #[test]
    fn test_resolve_has_text_normalises_needle() {
        let script = resolve_expression(&Selector::has_text("h2", "  Recent   POSTS "));
        assert!(script.contains(r#"querySelectorAll("h2")"#));
        assert!(script.contains(r#".includes("recent posts")"#));
    }

    #[test]
    fn test_fill_script_embeds_value() {
        let script = fill_script(&Selector::css("#user_login"), "ad\"min");
        assert!(script.contains(r#"const value = "ad\"min";"#));
        assert!(script.contains("new Event('input'"));
    }

    #[test]
    fn test_fill_outcome_parse() {
        let ok: FillOutcome = serde_json::from_str(r#"{"status":"ok"}"#).unwrap();
        assert_eq!(ok, FillOutcome::Ok);

        let ambiguous: FillOutcome = serde_json::from_str(r#"{"status":"ambiguous","count":3}"#).unwrap();
        assert_eq!(ambiguous, FillOutcome::Ambiguous { count: 3 });

        let blocked: FillOutcome =
            serde_json::from_str(r#"{"status":"not_interactable","reason":"element is disabled"}"#).unwrap();
        assert_eq!(
            blocked,
            FillOutcome::NotInteractable {
                reason: "element is disabled".to_string()
            }
        );
    }
}
