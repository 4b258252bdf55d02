use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;
use url::Url;

/// The `$schema` reference declared by a top-level JSON object.
/// Arrays and scalars have no keys, so they never carry one.
pub fn schema_ref_of(doc: &Value) -> Option<&str> {
    doc.as_object()?.get("$schema")?.as_str()
}

/// Resolve a schema reference into a schema document.
///
/// `http(s)://` references are fetched over the network, `file://`
/// references and bare paths are read from disk.
pub fn load_schema(reference: &str) -> Result<Value> {
    match Url::parse(reference) {
        Ok(u) if u.scheme() == "http" || u.scheme() == "https" => fetch_schema(u.as_str()),
        Ok(u) if u.scheme() == "file" => {
            let path = u
                .to_file_path()
                .map_err(|_| anyhow!("invalid file url: {reference}"))?;
            read_schema_file(&path)
        }
        _ => read_schema_file(Path::new(reference)),
    }
}

fn fetch_schema(url: &str) -> Result<Value> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;
    let resp = client.get(url).send().with_context(|| format!("GET {url}"))?;
    let resp = resp
        .error_for_status()
        .with_context(|| format!("GET {url}"))?;
    let body = resp.text().with_context(|| format!("reading body of {url}"))?;
    let schema: Value =
        serde_json::from_str(&body).with_context(|| format!("parsing schema json from {url}"))?;
    Ok(schema)
}

fn read_schema_file(path: &Path) -> Result<Value> {
    let s = fs::read_to_string(path)
        .with_context(|| format!("reading schema: {}", path.display()))?;
    let schema: Value = serde_json::from_str(&s)
        .with_context(|| format!("parsing schema json: {}", path.display()))?;
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn schema_ref_of_object_with_schema() {
        let doc = json!({"$schema": "https://example.com/s.json", "name": "x"});
        assert_eq!(schema_ref_of(&doc), Some("https://example.com/s.json"));
    }

    #[test]
    fn schema_ref_of_object_without_schema() {
        assert_eq!(schema_ref_of(&json!({"name": "x"})), None);
    }

    #[test]
    fn schema_ref_of_array_is_none() {
        assert_eq!(schema_ref_of(&json!([{"$schema": "s"}])), None);
    }

    #[test]
    fn schema_ref_of_non_string_value_is_none() {
        assert_eq!(schema_ref_of(&json!({"$schema": 42})), None);
    }

    #[test]
    fn load_schema_from_path() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"type": "object"}}"#).unwrap();
        let schema = load_schema(f.path().to_str().unwrap()).unwrap();
        assert_eq!(schema, json!({"type": "object"}));
    }

    #[test]
    fn load_schema_from_file_url() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"type": "string"}}"#).unwrap();
        let reference = format!("file://{}", f.path().display());
        let schema = load_schema(&reference).unwrap();
        assert_eq!(schema, json!({"type": "string"}));
    }

    #[test]
    fn load_schema_missing_path_fails() {
        let err = load_schema("/nonexistent/dir/schema.json").unwrap_err();
        assert!(err.to_string().contains("reading schema"));
    }

    #[test]
    fn load_schema_malformed_json_fails() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "not json at all").unwrap();
        let err = load_schema(f.path().to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("parsing schema json"));
    }
}
