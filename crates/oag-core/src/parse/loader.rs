use std::fs;
use std::path::Path;
use std::time::Duration;

use serde_json::Value;

use crate::error::LoadError;

use super::spec::OpenApiSpec;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// A loaded and bundled OpenAPI document, ready to be validated and
/// deserialized into [`OpenApiSpec`].
pub struct LoadedDocument {
    pub raw: Value,
    /// Set when the external-`$ref` bundle pass failed and the document was
    /// used as fetched instead. Downstream inline-schema identity detection
    /// (IR Builder §4.3c) is less reliable when this is set, since refs that
    /// should have been inlined may still point at an unresolved file.
    pub bundle_fallback: bool,
}

/// Acquire the raw OpenAPI document from a filesystem path or an `http(s)`
/// URL, then bundle external `$ref`s into it. Internal
/// `#/components/schemas/*` refs are left untouched — resolving those is
/// [`super::ref_resolve::RefResolver`]'s job, further down the pipeline.
pub fn load(input: &str) -> Result<LoadedDocument, LoadError> {
    let raw = fetch_raw(input)?;

    let bundle_fallback;
    let document = match bundle_external_refs(&raw, base_of(input)) {
        Ok(bundled) => {
            bundle_fallback = false;
            bundled
        }
        Err(_) => {
            bundle_fallback = true;
            raw
        }
    };

    Ok(LoadedDocument {
        raw: document,
        bundle_fallback,
    })
}

/// Load, bundle, and validate the `openapi` version of a document, returning
/// a parsed [`OpenApiSpec`]. This is the entry point CLI-layer callers use.
pub fn load_spec(input: &str) -> Result<(OpenApiSpec, bool), LoadError> {
    let doc = load(input)?;
    let version = doc
        .raw
        .get("openapi")
        .and_then(Value::as_str)
        .ok_or_else(|| LoadError::InvalidDocument("missing `openapi` field".to_string()))?;
    if !is_supported_version(version) {
        return Err(LoadError::UnsupportedVersion(version.to_string()));
    }
    let spec: OpenApiSpec = serde_json::from_value(doc.raw)
        .map_err(|e| LoadError::InvalidDocument(e.to_string()))?;
    Ok((spec, doc.bundle_fallback))
}

fn is_supported_version(version: &str) -> bool {
    version.starts_with("3.0.") || version == "3.1.0"
}

fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

fn fetch_raw(input: &str) -> Result<Value, LoadError> {
    if is_url(input) {
        fetch_url(input)
    } else {
        read_path(input)
    }
}

fn fetch_url(url: &str) -> Result<Value, LoadError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()
        .map_err(|e| LoadError::Fetch(e.to_string()))?;
    let response = client
        .get(url)
        .send()
        .map_err(|e| LoadError::Fetch(e.to_string()))?;
    if !response.status().is_success() {
        return Err(LoadError::Fetch(format!(
            "GET {url} returned {}",
            response.status()
        )));
    }
    let text = response.text().map_err(|e| LoadError::Fetch(e.to_string()))?;
    parse_body(&text)
}

fn read_path(path: &str) -> Result<Value, LoadError> {
    if !Path::new(path).exists() {
        return Err(LoadError::NotFound(path.to_string()));
    }
    let text =
        fs::read_to_string(path).map_err(|e| LoadError::NotFound(format!("{path}: {e}")))?;
    parse_body(&text)
}

fn parse_body(text: &str) -> Result<Value, LoadError> {
    // Accept either dialect regardless of source — a path may hold JSON, a
    // URL may serve YAML.
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return Ok(value);
    }
    serde_yaml_ng::from_str::<Value>(text).map_err(|e| LoadError::InvalidDocument(e.to_string()))
}

fn base_of(input: &str) -> &str {
    match input.rsplit_once('/') {
        Some((dir, _)) if !is_url(input) => dir,
        Some((dir, _)) => dir,
        None => ".",
    }
}

fn bundle_external_refs(value: &Value, base: &str) -> Result<Value, LoadError> {
    let mut out = value.clone();
    bundle_in_place(&mut out, base)?;
    Ok(out)
}

fn bundle_in_place(value: &mut Value, base: &str) -> Result<(), LoadError> {
    match value {
        Value::Object(map) => {
            let external_ref = match map.get("$ref") {
                Some(Value::String(r)) if !r.starts_with('#') => Some(r.clone()),
                _ => None,
            };
            if let Some(r) = external_ref {
                let resolved = resolve_external_ref(&r, base)?;
                *value = resolved;
                return bundle_in_place(value, base);
            }
            for (_, v) in map.iter_mut() {
                bundle_in_place(v, base)?;
            }
        }
        Value::Array(items) => {
            for v in items.iter_mut() {
                bundle_in_place(v, base)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Resolve a `$ref` whose file part is external (`./common.yaml#/Foo`, or a
/// bare `https://...` URL), fetching the target document and splicing in the
/// fragment it points to (or the whole document, if there's no fragment).
fn resolve_external_ref(r: &str, base: &str) -> Result<Value, LoadError> {
    let (file_part, fragment) = r.split_once('#').unwrap_or((r, ""));
    let target = if is_url(file_part) {
        file_part.to_string()
    } else {
        format!("{base}/{file_part}")
    };
    let doc = fetch_raw(&target)?;
    if fragment.is_empty() {
        Ok(doc)
    } else {
        navigate_fragment(&doc, fragment)
            .ok_or_else(|| LoadError::InvalidDocument(format!("fragment {fragment} not found in {target}")))
    }
}

fn navigate_fragment(doc: &Value, fragment: &str) -> Option<Value> {
    let mut cur = doc;
    for segment in fragment.trim_start_matches('/').split('/') {
        if segment.is_empty() {
            continue;
        }
        // JSON Pointer escaping: ~1 -> /, ~0 -> ~
        let key = segment.replace("~1", "/").replace("~0", "~");
        cur = cur.get(&key)?;
    }
    Some(cur.clone())
}
