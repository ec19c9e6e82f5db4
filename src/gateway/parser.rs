//! JSON extraction from model output.
//!
//! Models asked for JSON still wrap it in prose or a fenced block often
//! enough that callers cannot feed the raw response to serde directly.

use super::GatewayError;

/// Extract the JSON payload from a model response.
///
/// Accepts raw JSON, a ```json fenced block, or prose with an embedded
/// object/array (first `{`/`[` to last `}`/`]`).
pub fn extract_json(response: &str) -> Result<String, GatewayError> {
    let trimmed = response.trim();

    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return Ok(trimmed.to_string());
    }

    if let Some(fence_start) = trimmed.find("```json") {
        let content_start = fence_start + 7;
        let rest = &trimmed[content_start..];
        let end = rest
            .find("```")
            .ok_or_else(|| GatewayError::MalformedResponse("Unclosed JSON block".into()))?;
        return Ok(rest[..end].trim().to_string());
    }

    let object = span(trimmed, '{', '}');
    let array = span(trimmed, '[', ']');
    match (object, array) {
        (Some(o), Some(a)) => Ok(if o.0 < a.0 { o.1 } else { a.1 }),
        (Some(o), None) => Ok(o.1),
        (None, Some(a)) => Ok(a.1),
        (None, None) => Err(GatewayError::MalformedResponse(
            "No JSON found in response".into(),
        )),
    }
}

fn span(text: &str, open: char, close: char) -> Option<(usize, String)> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if end <= start {
        return None;
    }
    Some((start, text[start..=end].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_json_passes_through() {
        let out = extract_json(r#"{"score": 7}"#).unwrap();
        assert_eq!(out, r#"{"score": 7}"#);
    }

    #[test]
    fn fenced_block_extracted() {
        let response = "Here is the grading:\n```json\n{\"score\": 7}\n```\nDone.";
        let out = extract_json(response).unwrap();
        assert_eq!(out, r#"{"score": 7}"#);
    }

    #[test]
    fn embedded_object_extracted() {
        let response = "The result is {\"score\": 7} as requested.";
        let out = extract_json(response).unwrap();
        assert_eq!(out, r#"{"score": 7}"#);
    }

    #[test]
    fn embedded_array_extracted() {
        let response = "Timeline: [1, 2, 3]";
        let out = extract_json(response).unwrap();
        assert_eq!(out, "[1, 2, 3]");
    }

    #[test]
    fn unclosed_fence_is_error() {
        let result = extract_json("```json\n{\"score\": 7}");
        assert!(result.is_err());
    }

    #[test]
    fn prose_without_json_is_error() {
        let result = extract_json("I could not analyze the image.");
        assert!(result.is_err());
    }
}
