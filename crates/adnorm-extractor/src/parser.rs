//! Parse model output into per-campaign fields

use crate::error::ExtractorError;
use adnorm_domain::{ParsedFields, CAMPAIGN_NAME, TARGET_FIELDS};
use serde_json::{Map, Value};
use tracing::warn;

const FENCE: &str = "```";

/// Parse a raw model response into parsed fields
///
/// With `strict`, every element must be an object carrying `campaign_name`
/// (string) and the four target keys (string or null); any violation fails
/// the whole response. Without it, ill-typed target values become null and
/// elements lacking a string `campaign_name` are skipped.
///
/// There is no partial recovery of a broken array: invalid JSON fails the
/// whole response.
pub fn parse_response(response: &str, strict: bool) -> Result<Vec<ParsedFields>, ExtractorError> {
    let body = strip_code_fence(response);
    if body.is_empty() {
        return Err(ExtractorError::MalformedResponse("empty response body".to_string()));
    }

    let json: Value = serde_json::from_str(body)?;

    let elements = match json {
        Value::Array(elements) => elements,
        other => {
            return Err(ExtractorError::MalformedResponse(format!(
                "expected a JSON array, got {}",
                json_kind(&other)
            )))
        }
    };

    let mut parsed = Vec::with_capacity(elements.len());
    for (idx, element) in elements.iter().enumerate() {
        if strict {
            let fields = parse_element_strict(element).map_err(|reason| {
                ExtractorError::MalformedResponse(format!("element {}: {}", idx, reason))
            })?;
            parsed.push(fields);
        } else {
            match parse_element_lenient(element) {
                Some(fields) => parsed.push(fields),
                None => warn!("Skipping element {}: no string '{}'", idx, CAMPAIGN_NAME),
            }
        }
    }

    Ok(parsed)
}

/// Remove an enclosing fenced code block, if present
///
/// The opening line (which may carry a language tag) and everything from the
/// last fence marker on are dropped.
pub fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();

    let Some(rest) = trimmed.strip_prefix(FENCE) else {
        return trimmed;
    };

    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    let body = match body.rfind(FENCE) {
        Some(end) => &body[..end],
        None => body,
    };
    body.trim()
}

fn parse_element_strict(element: &Value) -> Result<ParsedFields, String> {
    let obj = element
        .as_object()
        .ok_or_else(|| format!("expected an object, got {}", json_kind(element)))?;

    let campaign_name = match obj.get(CAMPAIGN_NAME) {
        Some(Value::String(name)) => name.clone(),
        Some(other) => {
            return Err(format!("'{}' must be a string, got {}", CAMPAIGN_NAME, json_kind(other)))
        }
        None => return Err(format!("missing '{}'", CAMPAIGN_NAME)),
    };

    let mut values: [Option<String>; 4] = Default::default();
    for (slot, key) in values.iter_mut().zip(TARGET_FIELDS) {
        *slot = match obj.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Null) => None,
            Some(other) => {
                return Err(format!("'{}' must be a string or null, got {}", key, json_kind(other)))
            }
            None => return Err(format!("missing '{}'", key)),
        };
    }

    Ok(fields_from(campaign_name, values))
}

fn parse_element_lenient(element: &Value) -> Option<ParsedFields> {
    let obj: &Map<String, Value> = element.as_object()?;
    let campaign_name = obj.get(CAMPAIGN_NAME)?.as_str()?.to_string();

    let values = TARGET_FIELDS.map(|key| obj.get(key).and_then(Value::as_str).map(str::to_string));
    Some(fields_from(campaign_name, values))
}

fn fields_from(campaign_name: String, values: [Option<String>; 4]) -> ParsedFields {
    let [source, objective, geo, audience] = values;
    ParsedFields {
        campaign_name,
        source,
        objective,
        geo,
        audience,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
