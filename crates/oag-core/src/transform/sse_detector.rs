use crate::ir::{IrResponse, IrReturnType, IrSseReturn, IrType, StreamingFormat};
use crate::parse::media_type::MediaType;
use crate::parse::response::ResponseOrRef;
use crate::parse::schema::SchemaOrRef;

use super::name_normalizer::normalize_name;
use super::schema_resolver::schema_or_ref_to_ir_type;

use indexmap::IndexMap;

/// Detect whether an operation's responses include SSE streaming.
/// Returns the appropriate `IrReturnType`.
pub fn detect_return_type(
    operation_id: &str,
    responses: &IndexMap<String, ResponseOrRef>,
) -> IrReturnType {
    let Some((status, response)) = find_success_response(responses) else {
        return IrReturnType::Void;
    };
    if status == "204" {
        return IrReturnType::Void;
    }

    let content = match response {
        ResponseOrRef::Response(r) => &r.content,
        ResponseOrRef::Ref { .. } => return IrReturnType::Void,
    };

    if content.is_empty() {
        return IrReturnType::Void;
    }

    let json = content.get("application/json");
    let stream = content
        .iter()
        .find_map(|(ct, mt)| detect_streaming_format(ct).map(|fmt| (fmt, mt)));

    match (stream, json) {
        (Some((format, stream_mt)), json_mt) => {
            let sse_return = build_sse_return(operation_id, format, stream_mt, json_mt);
            IrReturnType::Sse(sse_return)
        }
        (None, Some(json_mt)) => {
            // Standard JSON response
            let response_type = match &json_mt.schema {
                Some(s) => schema_or_ref_to_ir_type(s),
                None => IrType::Any,
            };
            let description = match response {
                ResponseOrRef::Response(r) => Some(r.description.clone()),
                _ => None,
            };
            IrReturnType::Standard(IrResponse {
                response_type,
                description,
            })
        }
        (None, None) => {
            // Try any other content type
            if let Some((_ct, mt)) = content.first() {
                let response_type = match &mt.schema {
                    Some(s) => schema_or_ref_to_ir_type(s),
                    None => IrType::Any,
                };
                IrReturnType::Standard(IrResponse {
                    response_type,
                    description: None,
                })
            } else {
                IrReturnType::Void
            }
        }
    }
}

/// Classify a response content type as a streaming format, if any.
fn detect_streaming_format(content_type: &str) -> Option<StreamingFormat> {
    let ct = content_type.split(';').next().unwrap_or(content_type).trim();
    match ct {
        "text/event-stream" => Some(StreamingFormat::Sse),
        "application/x-ndjson" | "application/jsonl" | "application/x-jsonlines" => {
            Some(StreamingFormat::Ndjson)
        }
        _ if ct.contains("stream") || ct.contains("chunked") => Some(StreamingFormat::Chunked),
        _ => None,
    }
}

fn build_sse_return(
    operation_id: &str,
    format: StreamingFormat,
    stream_mt: &MediaType,
    json_mt: Option<&MediaType>,
) -> IrSseReturn {
    // Extract event type from itemSchema (OpenAPI 3.2)
    let (event_type, variants, event_type_name) = match &stream_mt.item_schema {
        Some(item_schema) => extract_event_info(operation_id, item_schema),
        None => {
            // Fallback: try the schema field
            match &stream_mt.schema {
                Some(s) => (schema_or_ref_to_ir_type(s), vec![], None),
                None => (IrType::Any, vec![], None),
            }
        }
    };

    let json_response = json_mt.map(|mt| {
        let response_type = match &mt.schema {
            Some(s) => schema_or_ref_to_ir_type(s),
            None => IrType::Any,
        };
        IrResponse {
            response_type,
            description: None,
        }
    });

    IrSseReturn {
        format,
        event_type,
        variants,
        event_type_name,
        also_has_json: json_response.is_some(),
        json_response,
    }
}

fn extract_event_info(
    operation_id: &str,
    item_schema: &SchemaOrRef,
) -> (IrType, Vec<IrType>, Option<String>) {
    match item_schema {
        SchemaOrRef::Ref { .. } => {
            let ir_type = schema_or_ref_to_ir_type(item_schema);
            (ir_type, vec![], None)
        }
        SchemaOrRef::Schema(schema) => {
            if !schema.one_of.is_empty() {
                // Union of event types
                let variants: Vec<IrType> =
                    schema.one_of.iter().map(schema_or_ref_to_ir_type).collect();
                let event_name = format!("{}StreamEvent", normalize_name(operation_id).pascal_case);
                let event_type = IrType::Union(variants.clone());
                (event_type, variants, Some(event_name))
            } else {
                let ir_type = schema_or_ref_to_ir_type(item_schema);
                (ir_type, vec![], None)
            }
        }
    }
}

/// Pick the response that represents a successful call: `200`, then `201`,
/// then any other `2xx`, then `204` (treated as void by the caller).
fn find_success_response(
    responses: &IndexMap<String, ResponseOrRef>,
) -> Option<(&str, &ResponseOrRef)> {
    if let Some(r) = responses.get_key_value("200") {
        return Some((r.0.as_str(), r.1));
    }
    if let Some(r) = responses.get_key_value("201") {
        return Some((r.0.as_str(), r.1));
    }
    if let Some((status, resp)) = responses.iter().find(|(status, _)| {
        status.len() == 3
            && status.starts_with('2')
            && status.as_str() != "200"
            && status.as_str() != "201"
            && status.as_str() != "204"
    }) {
        return Some((status.as_str(), resp));
    }
    responses
        .get_key_value("204")
        .map(|(s, r)| (s.as_str(), r))
}
