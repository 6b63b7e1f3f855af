//! Host capabilities
//!
//!     The engine never reaches into an editor. Parsing only needs to look up host snippets
//!     and aliases ([TemplateLookup]); the expand and wrap flows additionally need the context
//!     kind, the selection and a way to hand over the finished template ([Host]).
//!
//!     [BufferHost] is a plain in-memory implementation over a `String`, used by the command
//!     line tool and by tests.

use crate::zen::assembling::CompositeTemplate;
use crate::zen::context::ContextKind;
use crate::zen::template::TemplateFragment;
use std::collections::HashMap;
use std::ops::Range;

/// Read-only lookup of host templates
pub trait TemplateLookup {
    /// Host snippet registered for `key`
    fn find_template(&self, key: &str) -> Option<TemplateFragment>;

    /// Abbreviation an alias key (`ul+`) stands for
    fn find_alias(&self, _key: &str) -> Option<String> {
        None
    }
}

/// Lookup with no templates at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTemplates;

impl TemplateLookup for NoTemplates {
    fn find_template(&self, _key: &str) -> Option<TemplateFragment> {
        None
    }
}

/// Editor operations the expand and wrap flows depend on
pub trait Host: TemplateLookup {
    /// Kind of document at the caret
    fn context(&self) -> ContextKind;

    /// Host templates whose key is `key`
    fn find_applicable_templates(&self, key: &str) -> Vec<TemplateFragment>;

    fn selected_text(&self) -> Option<String>;

    /// Remove the typed key in front of the caret
    fn delete_template_key(&mut self, key: &str);

    fn delete_selection(&mut self);

    /// Hand the composite over to the interactive template runtime
    fn start_template(&mut self, template: CompositeTemplate);

    /// Let the host expand `key` with its own templates
    fn start_host_template(&mut self, key: &str);

    /// Start grouping edits into one undoable command
    fn begin_edit(&mut self) {}

    fn commit_edit(&mut self) {}
}

/// In-memory text buffer host
#[derive(Debug, Clone, Default)]
pub struct BufferHost {
    text: String,
    caret: usize,
    selection: Option<Range<usize>>,
    context: ContextKind,
    snippets: HashMap<String, Vec<String>>,
    aliases: HashMap<String, String>,
    last_template: Option<CompositeTemplate>,
    host_expansions: Vec<String>,
    open_edits: usize,
}

impl BufferHost {
    pub fn new(context: ContextKind) -> Self {
        Self {
            context,
            ..Self::default()
        }
    }

    /// Buffer holding `text` with the caret at its end
    pub fn with_text(context: ContextKind, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            caret: text.len(),
            text,
            context,
            ..Self::default()
        }
    }

    /// Register a host snippet in `$NAME$` syntax; a key may have several
    pub fn add_snippet(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.snippets
            .entry(key.into())
            .or_default()
            .push(template.into());
    }

    pub fn add_alias(&mut self, key: impl Into<String>, abbreviation: impl Into<String>) {
        self.aliases.insert(key.into(), abbreviation.into());
    }

    /// Select a byte range of the buffer; the caret moves to its end
    pub fn select(&mut self, range: Range<usize>) {
        self.caret = range.end;
        self.selection = Some(range);
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn last_template(&self) -> Option<&CompositeTemplate> {
        self.last_template.as_ref()
    }

    /// Keys handed back to the host's own template expansion
    pub fn host_expansions(&self) -> &[String] {
        &self.host_expansions
    }

    /// Whether a `begin_edit` is still waiting for its `commit_edit`
    pub fn in_edit(&self) -> bool {
        self.open_edits > 0
    }
}

impl TemplateLookup for BufferHost {
    fn find_template(&self, key: &str) -> Option<TemplateFragment> {
        self.snippets
            .get(key)
            .and_then(|templates| templates.first())
            .map(|template| TemplateFragment::parse(template))
    }

    fn find_alias(&self, key: &str) -> Option<String> {
        self.aliases.get(key).cloned()
    }
}

impl Host for BufferHost {
    fn context(&self) -> ContextKind {
        self.context
    }

    fn find_applicable_templates(&self, key: &str) -> Vec<TemplateFragment> {
        self.snippets
            .get(key)
            .map(|templates| {
                templates
                    .iter()
                    .map(|template| TemplateFragment::parse(template))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn selected_text(&self) -> Option<String> {
        self.selection
            .as_ref()
            .and_then(|range| self.text.get(range.clone()))
            .map(str::to_string)
    }

    fn delete_template_key(&mut self, key: &str) {
        let typed = self
            .text
            .get(..self.caret)
            .is_some_and(|before| before.ends_with(key));
        if typed {
            let start = self.caret - key.len();
            self.text.replace_range(start..self.caret, "");
            self.caret = start;
        }
    }

    fn delete_selection(&mut self) {
        if let Some(range) = self.selection.take() {
            if self.text.get(range.clone()).is_some() {
                self.caret = range.start;
                self.text.replace_range(range, "");
            }
        }
    }

    fn start_template(&mut self, template: CompositeTemplate) {
        let at = self.caret;
        self.text.insert_str(at, template.text());
        self.caret = at
            + template
                .end()
                .or(template.end_offset)
                .unwrap_or(template.text().len());
        self.last_template = Some(template);
    }

    fn start_host_template(&mut self, key: &str) {
        self.host_expansions.push(key.to_string());
    }

    fn begin_edit(&mut self) {
        self.open_edits += 1;
    }

    fn commit_edit(&mut self) {
        self.open_edits = self.open_edits.saturating_sub(1);
    }
}
