//! Binding a request to a handler's declared parameters.

use crate::binding::error::BindError;
use crate::binding::spec::{BoundParameters, BoundValue, ParamSource, ParamSpec, ParamType};
use crate::dispatch::IncomingRequest;
use crate::routing::PathVariables;

/// Bind every declared parameter, in declaration order.
///
/// # Arguments
///
/// * `specs` - The handler's parameter list
/// * `request` - The request being dispatched
/// * `variables` - Variable bindings from the matched template
///
/// # Returns
///
/// All bound values, or the error for the first parameter that failed. The
/// handler is never given a partial binding.
pub fn bind(
    specs: &[ParamSpec],
    request: &IncomingRequest,
    variables: &PathVariables,
) -> Result<BoundParameters, BindError> {
    let mut bound = BoundParameters::new();

    for spec in specs {
        let raw = match spec.source {
            ParamSource::Path => variables.get(&spec.name).map(String::as_str),
            ParamSource::Query => request.query_param(&spec.name).or(spec.default.as_deref()),
            ParamSource::Body => {
                bound.insert(spec.name.clone(), decode_body(spec, &request.body)?);
                continue;
            }
        };

        match raw {
            Some(raw) => bound.insert(spec.name.clone(), coerce(spec, raw)?),
            None if spec.required => return Err(BindError::MissingParameter(spec.name.clone())),
            None => {}
        }
    }

    Ok(bound)
}

fn coerce(spec: &ParamSpec, raw: &str) -> Result<BoundValue, BindError> {
    let mismatch = || BindError::TypeMismatch {
        parameter: spec.name.clone(),
        raw: raw.to_string(),
        expected: spec.ty.name(),
    };

    match spec.ty {
        ParamType::Integer => raw.parse().map(BoundValue::Integer).map_err(|_| mismatch()),
        ParamType::Text => Ok(BoundValue::Text(raw.to_string())),
        ParamType::Entity { .. } => Err(mismatch()),
    }
}

fn decode_body(spec: &ParamSpec, body: &[u8]) -> Result<BoundValue, BindError> {
    let malformed = |reason: String| BindError::MalformedBody {
        parameter: spec.name.clone(),
        reason,
    };

    let ParamType::Entity { decode, .. } = spec.ty else {
        return Err(malformed(format!("{} is not an entity type", spec.ty)));
    };

    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(malformed("request body is empty".to_string()));
    }

    decode(body)
        .map(BoundValue::Entity)
        .map_err(|e| malformed(e.to_string()))
}
