use anyhow::Result;

use crate::domain::{DataLinkConfig, DataSourceRef, LinkDocument, VariableSuggestion};

use super::{options::UiOptions, runtime::App};

/// Entry point for editing a list of data links in the terminal.
#[derive(Debug)]
pub struct DataLinkUI {
    links: Vec<DataLinkConfig>,
    suggestions: Vec<VariableSuggestion>,
    datasources: Vec<DataSourceRef>,
    title: Option<String>,
    options: UiOptions,
}

impl DataLinkUI {
    pub fn new(links: Vec<DataLinkConfig>) -> Self {
        Self {
            links,
            suggestions: Vec::new(),
            datasources: Vec::new(),
            title: None,
            options: UiOptions::default(),
        }
    }

    pub fn from_document(document: LinkDocument) -> Self {
        Self::new(document.data_links)
            .with_suggestions(document.suggestions)
            .with_datasources(document.datasources)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_suggestions(mut self, suggestions: Vec<VariableSuggestion>) -> Self {
        self.suggestions = suggestions;
        self
    }

    pub fn with_datasources(mut self, datasources: Vec<DataSourceRef>) -> Self {
        self.datasources = datasources;
        self
    }

    pub fn with_options(mut self, options: UiOptions) -> Self {
        self.options = options;
        self
    }

    /// Runs the interactive editor and returns the last saved list.
    pub fn run(self) -> Result<Vec<DataLinkConfig>> {
        let DataLinkUI {
            links,
            suggestions,
            datasources,
            title,
            options,
        } = self;

        let mut app = App::new(links, options)
            .with_title(title)
            .with_suggestions(suggestions)
            .with_datasources(datasources);
        app.run()
    }
}
