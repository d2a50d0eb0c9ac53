//! Field checks shared by the request models.

use serde_json::Value;

/// Pushes `message` and returns `None` when `value` is absent or blank.
pub(crate) fn required_text(
    value: Option<String>,
    message: &str,
    errors: &mut Vec<String>,
) -> Option<String> {
    match value.map(|v| v.trim().to_owned()) {
        Some(v) if !v.is_empty() => Some(v),
        _ => {
            errors.push(message.to_owned());
            None
        }
    }
}

/// Accepts JSON numbers and numeric strings.
pub(crate) fn numeric(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

pub(crate) fn is_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn email_shape() {
        assert!(is_email("ana@example.com"));
        assert!(is_email("a.b@sub.example.org"));
        assert!(!is_email("ana@example"));
        assert!(!is_email("@example.com"));
        assert!(!is_email("ana@.com"));
        assert!(!is_email("ana @example.com"));
        assert!(!is_email("ana@ex@ample.com"));
    }

    #[test]
    fn numbers_and_numeric_strings() {
        assert_eq!(numeric(&json!(42)), Some(42.0));
        assert_eq!(numeric(&json!("19.90")), Some(19.9));
        assert_eq!(numeric(&json!("abc")), None);
        assert_eq!(numeric(&json!(null)), None);
        assert_eq!(numeric(&json!([1])), None);
    }

    #[test]
    fn blank_text_is_missing() {
        let mut errors = Vec::new();
        assert_eq!(required_text(Some("  ".into()), "nome is required", &mut errors), None);
        assert_eq!(required_text(None, "nome is required", &mut errors), None);
        assert_eq!(
            required_text(Some(" Ana ".into()), "nome is required", &mut errors),
            Some("Ana".into())
        );
        assert_eq!(errors.len(), 2);
    }
}
