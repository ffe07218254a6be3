use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use super::DocumentFormat;

/// Where the saved document is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputDestination {
    Stdout,
    File(PathBuf),
}

impl OutputDestination {
    pub fn file(path: impl AsRef<Path>) -> Self {
        OutputDestination::File(path.as_ref().to_path_buf())
    }

    /// Writes `payload` followed by a single newline.
    fn write(&self, payload: &str) -> Result<()> {
        match self {
            OutputDestination::Stdout => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{payload}").context("failed to write to stdout")?;
                stdout.flush().context("failed to flush stdout")
            }
            OutputDestination::File(path) => fs::write(path, format!("{payload}\n"))
                .with_context(|| format!("failed to write to file {}", path.display())),
        }
    }
}

/// Serialization settings applied once the editor closes.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: DocumentFormat,
    pub pretty: bool,
    pub destinations: Vec<OutputDestination>,
}

impl OutputOptions {
    pub fn new(format: DocumentFormat) -> Self {
        Self {
            format,
            pretty: true,
            destinations: vec![OutputDestination::Stdout],
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_destinations(mut self, destinations: Vec<OutputDestination>) -> Self {
        self.destinations = destinations;
        self
    }
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self::new(DocumentFormat::Json)
    }
}

/// Serializes `document` once and writes it to every configured destination.
pub fn emit<T: Serialize + ?Sized>(document: &T, options: &OutputOptions) -> Result<()> {
    if options.destinations.is_empty() {
        return Ok(());
    }
    let payload = serialize_document(document, options)?;
    for destination in &options.destinations {
        destination.write(&payload)?;
        debug!(?destination, format = %options.format, bytes = payload.len(), "document written");
    }
    Ok(())
}

pub fn serialize_document<T: Serialize + ?Sized>(
    document: &T,
    options: &OutputOptions,
) -> Result<String> {
    let payload = match (options.format, options.pretty) {
        (DocumentFormat::Json, true) => serde_json::to_string_pretty(document)?,
        (DocumentFormat::Json, false) => serde_json::to_string(document)?,
        #[cfg(feature = "yaml")]
        (DocumentFormat::Yaml, _) => serde_yaml::to_string(document)?
            .trim_end()
            .to_string(),
        #[cfg(feature = "toml")]
        (DocumentFormat::Toml, true) => toml::to_string_pretty(document)?
            .trim_end()
            .to_string(),
        #[cfg(feature = "toml")]
        (DocumentFormat::Toml, false) => toml::to_string(document)?.trim_end().to_string(),
    };
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DataLinkConfig, LinkDocument};
    use serde_json::json;

    #[test]
    fn no_destinations_is_a_noop() {
        let options = OutputOptions::default().with_destinations(Vec::new());
        emit(&json!({"dataLinks": []}), &options).unwrap();
    }

    #[test]
    fn compact_json_has_no_newlines() {
        let options = OutputOptions::default().with_pretty(false);
        let document = LinkDocument::new(vec![DataLinkConfig::new("msg")]);
        let payload = serialize_document(&document, &options).unwrap();
        assert_eq!(payload, r#"{"dataLinks":[{"field":"msg"}]}"#);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn toml_output_uses_array_tables() {
        let options = OutputOptions::new(DocumentFormat::Toml);
        let document = LinkDocument::new(vec![
            DataLinkConfig::new("traceId").with_datasource_uid(Some("tempo".into())),
        ]);
        let payload = serialize_document(&document, &options).unwrap();
        assert!(payload.contains("[[dataLinks]]"));
        assert!(payload.contains("datasourceUid = \"tempo\""));
    }

    #[test]
    fn writes_to_file_destination() {
        let path = std::env::temp_dir().join(format!(
            "datalinkui-output-{}-{:?}.json",
            std::process::id(),
            std::thread::current().id()
        ));
        let options =
            OutputOptions::default().with_destinations(vec![OutputDestination::file(&path)]);
        emit(&json!({"dataLinks": [{"field": "traceId"}]}), &options).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.ends_with("}\n"));
        assert!(contents.contains("\"traceId\""));
        let _ = fs::remove_file(path);
    }
}
