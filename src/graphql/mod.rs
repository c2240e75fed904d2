//! GraphQL-over-HTTP wire types.
//!
//! Payloads are arbitrary JSON; call sites pick a concrete `T` for `data`
//! and the value is only decoded at the boundary. `serde_json::Value` is the
//! default when the shape is not known up front.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{GraphqlErrors, SdkError};

/// GraphQL variables: a JSON object keyed by variable name.
pub type Variables = Map<String, Value>;

// ─── Request ─────────────────────────────────────────────────────────────────

/// Request body sent to every endpoint: `{"query": ..., "variables": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlRequest {
    pub query: String,
    /// Serialized as `null` when absent.
    pub variables: Option<Variables>,
    #[serde(
        rename = "operationName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub operation_name: Option<String>,
}

impl GraphqlRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: None,
            operation_name: None,
        }
    }

    pub fn with_variables(mut self, variables: Option<Variables>) -> Self {
        self.variables = variables;
        self
    }

    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    /// Rejects blank documents before anything goes over the wire.
    pub fn validate(&self) -> Result<(), SdkError> {
        if self.query.trim().is_empty() {
            return Err(SdkError::Validation(
                "GraphQL document must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Build a [`Variables`] map from any serializable value.
///
/// The value must serialize to a JSON object; `None`-like values (`null`)
/// yield `Ok(None)`.
pub fn variables<V: Serialize>(value: &V) -> Result<Option<Variables>, SdkError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(Some(map)),
        Value::Null => Ok(None),
        other => Err(SdkError::Validation(format!(
            "GraphQL variables must be a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ─── Response ────────────────────────────────────────────────────────────────

/// Normalized result of one GraphQL operation.
///
/// Both `data` and `errors` may be present (partial success). A response
/// carrying `errors` is still a valid reply from a reachable server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct GraphqlResponse<T = Value> {
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<GraphqlError>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

impl<T> Default for GraphqlResponse<T> {
    fn default() -> Self {
        Self {
            data: None,
            errors: None,
            extensions: None,
        }
    }
}

impl<T> GraphqlResponse<T> {
    pub fn has_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|e| !e.is_empty())
    }

    pub fn error_messages(&self) -> Vec<&str> {
        self.errors
            .iter()
            .flatten()
            .map(|e| e.message.as_str())
            .collect()
    }

    /// Treat GraphQL-level errors as a failure.
    ///
    /// Returns the data when `errors` is absent or empty. A reply with
    /// neither data nor errors yields `Ok(None)`.
    pub fn into_result(self) -> Result<Option<T>, SdkError> {
        match self.errors {
            Some(errors) if !errors.is_empty() => Err(GraphqlErrors(errors).into()),
            _ => Ok(self.data),
        }
    }
}

impl GraphqlResponse<Value> {
    /// Build a response from any JSON reply without rejecting it.
    ///
    /// A reachable server may already have run the operation, so whatever
    /// JSON it sent back is the answer. `data` and `extensions` are taken
    /// as-is. Each `errors` entry is decoded on its own; one that does not
    /// fit the standard shape becomes a synthesized error with the raw entry
    /// under `extra["raw"]`. A non-object body yields no data and a single
    /// synthesized error.
    pub fn from_json(value: Value) -> Self {
        let mut object = match value {
            Value::Object(object) => object,
            other => {
                return Self {
                    data: None,
                    errors: Some(vec![GraphqlError::malformed(
                        format!("GraphQL reply is a JSON {}, not an object", json_kind(&other)),
                        other,
                    )]),
                    extensions: None,
                }
            }
        };

        let data = object.remove("data").filter(|d| !d.is_null());
        let extensions = object.remove("extensions").filter(|e| !e.is_null());
        let errors = match object.remove("errors") {
            None | Some(Value::Null) => None,
            Some(Value::Array(entries)) => Some(
                entries
                    .into_iter()
                    .map(|entry| {
                        serde_json::from_value::<GraphqlError>(entry.clone()).unwrap_or_else(|_| {
                            GraphqlError::malformed("Malformed GraphQL error entry", entry)
                        })
                    })
                    .collect(),
            ),
            Some(other) => Some(vec![GraphqlError::malformed(
                format!("GraphQL `errors` is a JSON {}, not a list", json_kind(&other)),
                other,
            )]),
        };

        Self {
            data,
            errors,
            extensions,
        }
    }

    /// Decode `data` into a concrete type, keeping errors and extensions.
    ///
    /// A JSON `null` for `data` decodes to `None` rather than failing.
    pub fn decode<T: DeserializeOwned>(self) -> Result<GraphqlResponse<T>, SdkError> {
        let data = match self.data {
            None | Some(Value::Null) => None,
            Some(value) => Some(serde_json::from_value(value)?),
        };
        Ok(GraphqlResponse {
            data,
            errors: self.errors,
            extensions: self.extensions,
        })
    }
}

/// A GraphQL error entry: `{"message": ..., "locations": ..., "path": ...}`.
///
/// Keys outside the standard set are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<Location>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<PathSegment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GraphqlError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: None,
            path: None,
            extensions: None,
            extra: Map::new(),
        }
    }

    /// An error standing in for a reply or entry that did not fit the
    /// GraphQL shape; the original JSON is kept under `extra["raw"]`.
    pub fn malformed(message: impl Into<String>, raw: Value) -> Self {
        let mut error = Self::new(message);
        error.extra.insert("raw".to_string(), raw);
        error
    }

    /// `extensions.code`, the conventional machine-readable error code.
    pub fn code(&self) -> Option<&str> {
        self.extensions.as_ref()?.get("code")?.as_str()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

/// One step of an error path: a field name or a list index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(u64),
    Field(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serializes_null_variables() {
        let req = GraphqlRequest::new("{ me { id } }");
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body, json!({"query": "{ me { id } }", "variables": null}));
    }

    #[test]
    fn test_request_serializes_operation_name() {
        let vars = variables(&json!({"quizId": "q1"})).unwrap();
        let req = GraphqlRequest::new("query Quiz($quizId: ID!) { quiz(id: $quizId) { title } }")
            .with_variables(vars)
            .with_operation_name("Quiz");
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["operationName"], "Quiz");
        assert_eq!(body["variables"]["quizId"], "q1");
    }

    #[test]
    fn test_validate_rejects_blank_document() {
        assert!(GraphqlRequest::new("   \n").validate().is_err());
        assert!(GraphqlRequest::new("{ me { id } }").validate().is_ok());
    }

    #[test]
    fn test_variables_must_be_object() {
        assert!(variables(&json!([1, 2])).is_err());
        assert!(variables(&json!(null)).unwrap().is_none());
        assert_eq!(variables(&json!({"a": 1})).unwrap().unwrap().len(), 1);
    }

    #[test]
    fn test_response_with_errors_only() {
        let resp: GraphqlResponse =
            serde_json::from_str(r#"{"errors":[{"message":"Invalid grade"}]}"#).unwrap();
        assert!(resp.data.is_none());
        assert!(resp.has_errors());
        assert_eq!(resp.error_messages(), vec!["Invalid grade"]);
    }

    #[test]
    fn test_error_keeps_locations_path_and_extra_keys() {
        let resp: GraphqlResponse = serde_json::from_value(json!({
            "data": null,
            "errors": [{
                "message": "Not allowed",
                "locations": [{"line": 2, "column": 3}],
                "path": ["quiz", 0, "answers"],
                "extensions": {"code": "FORBIDDEN"},
                "severity": "high"
            }]
        }))
        .unwrap();
        let err = &resp.errors.as_ref().unwrap()[0];
        assert_eq!(err.locations.as_ref().unwrap()[0], Location { line: 2, column: 3 });
        assert_eq!(
            err.path.as_ref().unwrap(),
            &vec![
                PathSegment::Field("quiz".into()),
                PathSegment::Index(0),
                PathSegment::Field("answers".into()),
            ]
        );
        assert_eq!(err.code(), Some("FORBIDDEN"));
        assert_eq!(err.extra["severity"], "high");
    }

    #[test]
    fn test_into_result() {
        let ok: GraphqlResponse = serde_json::from_value(json!({"data": {"x": 1}})).unwrap();
        assert_eq!(ok.into_result().unwrap(), Some(json!({"x": 1})));

        let empty_errors: GraphqlResponse =
            serde_json::from_value(json!({"data": {"x": 1}, "errors": []})).unwrap();
        assert!(empty_errors.into_result().is_ok());

        let failed: GraphqlResponse =
            serde_json::from_value(json!({"errors": [{"message": "Invalid grade"}]})).unwrap();
        match failed.into_result() {
            Err(SdkError::Graphql(errors)) => assert_eq!(errors.first_message(), Some("Invalid grade")),
            other => panic!("expected GraphQL error, got {other:?}"),
        }
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Me {
        id: String,
    }

    #[test]
    fn test_decode_typed_data() {
        let resp: GraphqlResponse = serde_json::from_value(json!({"data": {"id": "u1"}})).unwrap();
        let typed = resp.decode::<Me>().unwrap();
        assert_eq!(typed.data, Some(Me { id: "u1".into() }));

        let null: GraphqlResponse = serde_json::from_value(json!({"data": null})).unwrap();
        assert!(null.decode::<Me>().unwrap().data.is_none());

        let wrong: GraphqlResponse = serde_json::from_value(json!({"data": {"id": 7}})).unwrap();
        assert!(matches!(wrong.decode::<Me>(), Err(SdkError::Serde(_))));
    }

    #[test]
    fn test_from_json_standard_reply() {
        let resp = GraphqlResponse::from_json(json!({
            "data": {"x": 1},
            "errors": [{"message": "Partial", "path": ["y"]}],
            "extensions": {"cost": 3}
        }));
        assert_eq!(resp.data, Some(json!({"x": 1})));
        assert_eq!(resp.error_messages(), vec!["Partial"]);
        assert_eq!(resp.extensions, Some(json!({"cost": 3})));
    }

    #[test]
    fn test_from_json_error_entry_without_message() {
        let resp = GraphqlResponse::from_json(json!({
            "errors": [{"code": "GRADE_LOCKED"}, {"message": "Quiz closed"}]
        }));
        let errors = resp.errors.as_ref().unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].message, "Malformed GraphQL error entry");
        assert_eq!(errors[0].extra["raw"], json!({"code": "GRADE_LOCKED"}));
        assert_eq!(errors[1].message, "Quiz closed");
        assert!(resp.data.is_none());
    }

    #[test]
    fn test_from_json_errors_not_a_list() {
        let resp = GraphqlResponse::from_json(json!({"data": null, "errors": "oops"}));
        assert!(resp.data.is_none());
        let errors = resp.errors.unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "GraphQL `errors` is a JSON string, not a list");
        assert_eq!(errors[0].extra["raw"], "oops");
    }

    #[test]
    fn test_from_json_non_object_body() {
        let resp = GraphqlResponse::from_json(json!([1, 2, 3]));
        assert!(resp.data.is_none());
        assert!(resp.has_errors());
        let errors = resp.errors.unwrap();
        assert_eq!(errors[0].message, "GraphQL reply is a JSON array, not an object");
        assert_eq!(errors[0].extra["raw"], json!([1, 2, 3]));
    }
}
