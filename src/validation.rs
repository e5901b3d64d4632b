//! Structural gate in front of prompt construction.
//!
//! Validation runs on the parsed JSON value rather than a derived struct
//! so that every rejection (wrong type, empty string, unknown analysis
//! type) maps to the same [`MarketscopeError::Validation`] signal.

use serde_json::{Map, Value};

use crate::types::{AnalysisRequest, AnalysisType, BatchItem};
use crate::{MarketscopeError, Result};

/// Field carrying the analysis type.
pub const ANALYSIS_TYPE_FIELD: &str = "analysisType";

/// Accepted alias for [`ANALYSIS_TYPE_FIELD`], used by older dashboard builds.
pub const ANALYSIS_TYPE_ALIAS: &str = "promptType";

/// Upper bound on items in a single batch request.
pub const MAX_BATCH_ITEMS: usize = 10;

/// Validate a single-analysis request body.
///
/// Accepts only an object whose `product`, `objective` and `segment` are
/// non-empty strings and whose `analysisType` (or `promptType`) is in the
/// allow-list. An optional `prompt` string overrides the template; an
/// empty or null `prompt` counts as absent.
pub fn validate(body: &Value) -> Result<AnalysisRequest> {
    let obj = as_object(body)?;

    let product = required_string(obj, "product")?;
    let objective = required_string(obj, "objective")?;
    let segment = required_string(obj, "segment")?;

    let (field, raw_type) = match obj.get(ANALYSIS_TYPE_FIELD) {
        Some(value) => (ANALYSIS_TYPE_FIELD, value),
        None => match obj.get(ANALYSIS_TYPE_ALIAS) {
            Some(value) => (ANALYSIS_TYPE_ALIAS, value),
            None => return Err(invalid(format!("{ANALYSIS_TYPE_FIELD} is missing"))),
        },
    };
    let analysis_type = analysis_type(field, raw_type)?;

    let prompt = match obj.get("prompt") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => return Err(invalid("prompt must be a string")),
    };

    Ok(AnalysisRequest {
        product,
        objective,
        segment,
        analysis_type,
        prompt,
    })
}

/// Validate a batch request body: `{ "requests": [ { product, objective,
/// segment, analysisTypes: [..] }, .. ] }`.
pub fn validate_batch(body: &Value) -> Result<Vec<BatchItem>> {
    let obj = as_object(body)?;
    let requests = match obj.get("requests") {
        Some(Value::Array(items)) if !items.is_empty() => items,
        Some(Value::Array(_)) => return Err(invalid("requests must not be empty")),
        _ => return Err(invalid("requests must be an array")),
    };
    if requests.len() > MAX_BATCH_ITEMS {
        return Err(invalid(format!(
            "requests holds {} items, at most {MAX_BATCH_ITEMS} are allowed",
            requests.len()
        )));
    }

    requests
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let obj = item
                .as_object()
                .ok_or_else(|| invalid(format!("requests[{index}] must be an object")))?;
            let types = match obj.get("analysisTypes") {
                Some(Value::Array(types)) if !types.is_empty() => types,
                _ => {
                    return Err(invalid(format!(
                        "requests[{index}].analysisTypes must be a non-empty array"
                    )));
                }
            };
            let analysis_types = types
                .iter()
                .map(|t| analysis_type("analysisTypes", t))
                .collect::<Result<Vec<_>>>()?;

            Ok(BatchItem {
                product: required_string(obj, "product")?,
                objective: required_string(obj, "objective")?,
                segment: required_string(obj, "segment")?,
                analysis_types,
            })
        })
        .collect()
}

fn as_object(body: &Value) -> Result<&Map<String, Value>> {
    body.as_object()
        .ok_or_else(|| invalid("request body must be a JSON object"))
}

fn required_string(obj: &Map<String, Value>, field: &str) -> Result<String> {
    match obj.get(field) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::String(_)) => Err(invalid(format!("{field} must not be empty"))),
        Some(_) => Err(invalid(format!("{field} must be a string"))),
        None => Err(invalid(format!("{field} is missing"))),
    }
}

fn analysis_type(field: &str, value: &Value) -> Result<AnalysisType> {
    let id = value
        .as_str()
        .ok_or_else(|| invalid(format!("{field} must be a string")))?;
    AnalysisType::parse(id)
        .ok_or_else(|| invalid(format!("{field} '{id}' is not in the allow-list")))
}

fn invalid(detail: impl Into<String>) -> MarketscopeError {
    MarketscopeError::Validation(detail.into())
}
