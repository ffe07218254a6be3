//! `datalinkui` edits the data link list of a JSON/YAML/TOML document in the
//! terminal and writes the saved document back out.
//!
//! ```text
//! datalinkui --config links.json --output links.json --force
//! cat links.yaml | datalinkui -c - -o -
//! ```

use std::fmt::Write as FmtWrite;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::{ArgAction, Parser};
use color_eyre::eyre::{Report, Result, WrapErr, eyre};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

use datalinkui::{
    DataLinkUI, DocumentFormat, DocumentShape, LinkDocument, OutputDestination, OutputOptions,
    VariableSuggestion, emit, parse_document_str, parse_link_document,
};

const LOG_ENV: &str = "DATALINKUI_LOG";

#[derive(Debug, Parser)]
#[command(
    name = "datalinkui",
    version,
    about = "Edit data links (field, URL, label, internal target) in the terminal"
)]
struct Cli {
    /// Document spec: file path, inline payload, or "-" for stdin
    #[arg(short = 'c', long = "config", alias = "data", value_name = "SPEC")]
    config: Option<String>,

    /// Title shown at the top of the UI
    #[arg(long = "title", value_name = "TEXT")]
    title: Option<String>,

    /// Output destinations ("-" writes to stdout). Accepts multiple values per flag use.
    #[arg(short = 'o', long = "output", value_name = "DEST", num_args = 1.., action = ArgAction::Append)]
    outputs: Vec<String>,

    /// Emit compact JSON/TOML rather than pretty formatting
    #[arg(long = "no-pretty")]
    no_pretty: bool,

    /// Overwrite output files even if they already exist
    #[arg(short = 'f', long = "force", short_alias = 'y', alias = "yes")]
    force: bool,

    /// Write tracing output to this file (filter with DATALINKUI_LOG)
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Do not offer the built-in raw value suggestion when the document has none
    #[arg(long = "no-default-suggestions")]
    no_default_suggestions: bool,
}

#[derive(Debug)]
enum InputSource {
    File(PathBuf),
    Stdin,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    init_logging(cli.log_file.as_deref())?;

    let mut diagnostics = DiagnosticCollector::default();

    let config_spec = cli.config.as_deref();
    let config_hint = resolve_format_hint(config_spec, "config", &mut diagnostics);
    let document = load_document(
        config_spec,
        config_hint.hint.format,
        config_hint.blocked,
        &mut diagnostics,
    );

    let (output_settings, output_paths) =
        build_output_options(&cli, config_hint.hint.extension_value(), &mut diagnostics);
    ensure_output_paths_available(&output_paths, cli.force, &mut diagnostics);
    ensure_shape_writable(document.as_ref(), output_settings.as_ref(), &mut diagnostics);

    diagnostics.into_result()?;

    let document = document.unwrap_or_default();
    let mut suggestions = document.suggestions.clone();
    if suggestions.is_empty() && !cli.no_default_suggestions {
        suggestions.push(VariableSuggestion::raw_value());
    }

    let mut ui = DataLinkUI::new(document.data_links.clone())
        .with_suggestions(suggestions)
        .with_datasources(document.datasources.clone());
    if let Some(title) = cli.title.as_ref() {
        ui = ui.with_title(title.clone());
    }

    let links = ui.run().map_err(Report::msg)?;
    info!(count = links.len(), "editor closed");

    if let Some(options) = output_settings {
        emit(&document.with_data_links(links), &options).map_err(Report::msg)?;
    }

    Ok(())
}

fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| eyre!("failed to install log subscriber: {err}"))
}

#[derive(Debug, Clone, Copy)]
struct FormatHint {
    format: DocumentFormat,
    from_extension: bool,
}

impl Default for FormatHint {
    fn default() -> Self {
        Self {
            format: DocumentFormat::default(),
            from_extension: false,
        }
    }
}

impl FormatHint {
    fn extension_value(&self) -> Option<DocumentFormat> {
        self.from_extension.then_some(self.format)
    }
}

#[derive(Debug, Clone, Copy)]
struct FormatResolution {
    hint: FormatHint,
    blocked: bool,
}

fn resolve_format_hint(
    path_hint: Option<&str>,
    label: &str,
    diagnostics: &mut DiagnosticCollector,
) -> FormatResolution {
    if let Some(path) = path_hint
        && path != "-"
    {
        match probe_format_from_extension(Path::new(path)) {
            ExtensionFormat::Known(format) => {
                return FormatResolution {
                    hint: FormatHint {
                        format,
                        from_extension: true,
                    },
                    blocked: false,
                };
            }
            ExtensionFormat::UnsupportedFeature {
                format_name,
                feature_flag,
            } => {
                diagnostics.push_input(
                    label,
                    format!(
                        "{label} '{path}' requires {format_name} support, but this build lacks the '{feature_flag}' feature"
                    ),
                );
                return FormatResolution {
                    hint: FormatHint::default(),
                    blocked: true,
                };
            }
            ExtensionFormat::Unknown => {}
        }
    }

    FormatResolution {
        hint: FormatHint::default(),
        blocked: false,
    }
}

fn load_document(
    spec: Option<&str>,
    format: DocumentFormat,
    skip: bool,
    diagnostics: &mut DiagnosticCollector,
) -> Option<LinkDocument> {
    if skip {
        return None;
    }
    let raw = spec?;
    let loaded = load_value(raw, format, "config").and_then(|value| {
        parse_link_document(value).map_err(|err| eyre!("invalid data link document: {err:#}"))
    });
    match loaded {
        Ok(document) => Some(document),
        Err(err) => {
            diagnostics.push_input("config", err.to_string());
            None
        }
    }
}

fn load_value(spec: &str, format: DocumentFormat, label: &str) -> Result<Value> {
    if spec == "-" {
        let contents = read_from_source(&InputSource::Stdin)?;
        return parse_contents(&contents, format, label);
    }

    let path = PathBuf::from(spec);
    match read_from_source(&InputSource::File(path.clone())) {
        Ok(contents) => parse_contents(&contents, format, label),
        Err(err) => {
            if is_not_found(&err) {
                let inline_label = format!("inline {label}");
                return parse_contents(spec, format, &inline_label);
            }
            Err(err.wrap_err(format!("failed to load {label} from {}", path.display())))
        }
    }
}

fn read_from_source(source: &InputSource) -> Result<String> {
    match source {
        InputSource::Stdin => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .wrap_err("failed to read from stdin")?;
            Ok(buffer)
        }
        InputSource::File(path) => fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read file {}", path.display())),
    }
}

fn is_not_found(err: &Report) -> bool {
    err.downcast_ref::<io::Error>()
        .is_some_and(|io_err| io_err.kind() == io::ErrorKind::NotFound)
}

fn parse_contents(contents: &str, format: DocumentFormat, label: &str) -> Result<Value> {
    match parse_document_str(contents, format) {
        Ok(value) => Ok(value),
        Err(primary) => {
            for candidate in DocumentFormat::available_formats() {
                if candidate == format {
                    continue;
                }
                if let Ok(value) = parse_document_str(contents, candidate) {
                    return Ok(value);
                }
            }
            Err(Report::msg(format!(
                "failed to parse {label}: tried {} (first error: {primary})",
                format_list()
            )))
        }
    }
}

fn format_list() -> String {
    let items: Vec<String> = DocumentFormat::available_formats()
        .into_iter()
        .map(|fmt| fmt.to_string())
        .collect();
    items.join(", ")
}

#[derive(Default)]
struct DiagnosticCollector {
    messages: Vec<String>,
}

impl DiagnosticCollector {
    fn push_input(&mut self, label: &str, message: impl Into<String>) {
        self.messages
            .push(format!("input ({label}): {}", message.into()));
    }

    fn push_output(&mut self, message: impl Into<String>) {
        self.messages.push(format!("output: {}", message.into()));
    }

    fn len(&self) -> usize {
        self.messages.len()
    }

    fn into_result(self) -> Result<()> {
        if self.messages.is_empty() {
            return Ok(());
        }
        let mut body = String::from("encountered input/output issues:\n");
        for (idx, msg) in self.messages.iter().enumerate() {
            let _ = writeln!(body, "  {}. {}", idx + 1, msg);
        }
        Err(eyre!(body))
    }
}

/// Without `--output` the saved document goes to stdout.
fn build_output_options(
    cli: &Cli,
    config_hint: Option<DocumentFormat>,
    diagnostics: &mut DiagnosticCollector,
) -> (Option<OutputOptions>, Vec<PathBuf>) {
    let mut destinations = Vec::new();

    for raw in &cli.outputs {
        if raw.trim().is_empty() {
            diagnostics.push_output("output destination cannot be empty");
            continue;
        }
        if raw == "-" {
            destinations.push(OutputDestination::Stdout);
        } else {
            destinations.push(OutputDestination::file(raw));
        }
    }

    if destinations.is_empty() {
        if !cli.outputs.is_empty() {
            return (None, Vec::new());
        }
        destinations.push(OutputDestination::Stdout);
    }

    let file_paths: Vec<PathBuf> = destinations
        .iter()
        .filter_map(|dest| match dest {
            OutputDestination::File(path) => Some(path.clone()),
            OutputDestination::Stdout => None,
        })
        .collect();

    let start = diagnostics.len();
    let format = if file_paths.is_empty() {
        config_hint.unwrap_or_default()
    } else {
        infer_format_from_files(&file_paths, diagnostics).unwrap_or_default()
    };

    if diagnostics.len() > start {
        return (None, file_paths);
    }

    let options = OutputOptions::new(format)
        .with_pretty(!cli.no_pretty)
        .with_destinations(destinations);
    (Some(options), file_paths)
}

fn infer_format_from_files(
    file_paths: &[PathBuf],
    diagnostics: &mut DiagnosticCollector,
) -> Option<DocumentFormat> {
    let mut detected: Option<DocumentFormat> = None;
    for path in file_paths {
        match probe_format_from_extension(path) {
            ExtensionFormat::Known(format) => match detected {
                Some(existing) if existing != format => diagnostics.push_output(format!(
                    "output file {} uses {format} but other destinations use {existing}; align extensions",
                    path.display()
                )),
                Some(_) => {}
                None => detected = Some(format),
            },
            ExtensionFormat::UnsupportedFeature {
                format_name,
                feature_flag,
            } => diagnostics.push_output(format!(
                "output file {} requires {format_name} support, but this build was compiled without the '{feature_flag}' feature",
                path.display()
            )),
            ExtensionFormat::Unknown => diagnostics.push_output(format!(
                "cannot infer format from output file {}; use .json/.yaml/.toml",
                path.display()
            )),
        }
    }
    detected
}

fn probe_format_from_extension(path: &Path) -> ExtensionFormat {
    if let Some(format) = DocumentFormat::from_path(path) {
        return ExtensionFormat::Known(format);
    }
    let Some(ext) = path.extension() else {
        return ExtensionFormat::Unknown;
    };
    match ext.to_string_lossy().to_ascii_lowercase().as_str() {
        "yaml" | "yml" => ExtensionFormat::UnsupportedFeature {
            format_name: "yaml",
            feature_flag: "yaml",
        },
        "toml" => ExtensionFormat::UnsupportedFeature {
            format_name: "toml",
            feature_flag: "toml",
        },
        _ => ExtensionFormat::Unknown,
    }
}

#[derive(Debug)]
enum ExtensionFormat {
    Known(DocumentFormat),
    UnsupportedFeature {
        format_name: &'static str,
        feature_flag: &'static str,
    },
    Unknown,
}

fn ensure_output_paths_available(
    paths: &[PathBuf],
    force: bool,
    diagnostics: &mut DiagnosticCollector,
) {
    if force {
        return;
    }
    for path in paths {
        if path.exists() {
            diagnostics.push_output(format!(
                "file {} already exists (pass --force to overwrite)",
                path.display()
            ));
        }
    }
}

/// A bare list is written back as a list, which TOML cannot hold at the top level.
fn ensure_shape_writable(
    document: Option<&LinkDocument>,
    options: Option<&OutputOptions>,
    diagnostics: &mut DiagnosticCollector,
) {
    let (Some(document), Some(options)) = (document, options) else {
        return;
    };
    if document.shape == DocumentShape::List && !holds_top_level_lists(options.format) {
        diagnostics.push_output(format!(
            "the input is a bare data link list, which cannot be written as {}; use .json or .yaml",
            options.format
        ));
    }
}

fn holds_top_level_lists(format: DocumentFormat) -> bool {
    match format {
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => false,
        _ => true,
    }
}
