//! Generator and filter selection
//!
//!     Both selections walk the chain of `|suffix` decorators at the root of the tree, from the
//!     outermost (last written) suffix inwards.
//!
//!     The generator is the first applicable one whose suffix matches a suffix of the chain;
//!     without such a match it is the first applicable default for the context.
//!
//!     Filters are collected per suffix, then the applicable context defaults not already
//!     named are appended, and the whole list is reversed. `X|f1|f2` runs `[f1, f2]`; `X|f1`
//!     with a default `fd` runs `[fd, f1]`.
//!
//! Faults
//!
//!     Parsing only accepts suffixes the registry knows for the same context and mode, so a
//!     selection error means the tree was not parsed against this registry. Errors are logged
//!     and returned, never recovered silently.

use crate::zen::ast::Node;
use crate::zen::context::ContextKind;
use crate::zen::filters::Filter;
use crate::zen::generators::Generator;
use crate::zen::registry::Registry;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("no generator applies in {context} context")]
    NoGenerator { context: ContextKind },
    #[error("generator '{generator}' named by '|{suffix}' does not apply in {context} context")]
    GeneratorNotApplicable {
        generator: String,
        suffix: String,
        context: ContextKind,
    },
    #[error("no filter declares suffix '{suffix}' in {context} context")]
    UnknownFilter {
        suffix: String,
        context: ContextKind,
    },
}

/// Pick the generator that renders `tree`
pub fn select_generator<'r>(
    tree: &Node,
    registry: &'r Registry,
    context: ContextKind,
    wrapping: bool,
) -> Result<&'r dyn Generator, SelectionError> {
    for suffix in tree.filter_suffixes() {
        if let Some(generator) = registry
            .generators()
            .find(|g| g.suffix() == Some(suffix) && g.is_applicable(context, wrapping))
        {
            tracing::debug!(generator = generator.name(), suffix, "selected generator");
            return Ok(generator);
        }
        if let Some(generator) = registry.generators().find(|g| g.suffix() == Some(suffix)) {
            if registry.filter(suffix).is_none() {
                let error = SelectionError::GeneratorNotApplicable {
                    generator: generator.name().to_string(),
                    suffix: suffix.to_string(),
                    context,
                };
                tracing::error!(%error, "generator selection failed");
                return Err(error);
            }
        }
    }

    match registry.default_generator(context, wrapping) {
        Some(generator) => {
            tracing::debug!(generator = generator.name(), "selected default generator");
            Ok(generator)
        }
        None => {
            let error = SelectionError::NoGenerator { context };
            tracing::error!(%error, "generator selection failed");
            Err(error)
        }
    }
}

/// Collect the filters requested by `tree` plus the context defaults, in run order
pub fn select_filters<'r>(
    tree: &Node,
    registry: &'r Registry,
    context: ContextKind,
    generator: &dyn Generator,
) -> Result<Vec<&'r dyn Filter>, SelectionError> {
    let suffixes = tree.filter_suffixes();
    let mut selected: Vec<&'r dyn Filter> = Vec::new();

    for &suffix in &suffixes {
        let before = selected.len();
        selected.extend(
            registry
                .filters()
                .filter(|f| f.suffix() == suffix && f.is_applicable(context)),
        );
        if selected.len() == before && generator.suffix() != Some(suffix) {
            let error = SelectionError::UnknownFilter {
                suffix: suffix.to_string(),
                context,
            };
            tracing::error!(%error, "filter selection failed");
            return Err(error);
        }
    }

    // an explicitly named suffix already runs at its own position
    selected.extend(registry.filters().filter(|f| {
        f.is_applicable(context) && f.is_default_for(context) && !suffixes.contains(&f.suffix())
    }));

    selected.reverse();
    tracing::debug!(
        filters = ?selected.iter().map(|f| f.suffix()).collect::<Vec<_>>(),
        "selected filters"
    );
    Ok(selected)
}
