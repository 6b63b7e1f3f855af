//! Main module for the zen abbreviation engine
//!
//! Pipeline
//!
//!     Data flows strictly forward, every stage producing new values:
//!
//!         abbreviation --lexing--> tokens --parsing--> tree --expansion--> generation nodes
//!         generation nodes --assembling (generator + filters)--> composite template
//!
//!     Lexing and parsing reject malformed input as a whole; there are no partial results.
//!     Expansion never fails once a tree exists. Selection picks the generator and the filter
//!     chain from an explicit [Registry](registry::Registry), and assembling stitches the
//!     rendered fragments into a single [CompositeTemplate](assembling::CompositeTemplate).
//!
//! Host Integration
//!
//!     The engine never touches an editor. Everything it needs from the outside world comes
//!     through the [Host](host::Host) capability set, and [session](session) drives the
//!     expand / wrap flows against it.

pub mod assembling;
pub mod ast;
pub mod context;
pub mod elements;
pub mod expansion;
pub mod filters;
pub mod generators;
pub mod host;
pub mod lexing;
pub mod numbering;
pub mod parsing;
pub mod registry;
pub mod selection;
pub mod session;
pub mod template;
pub mod testing;
pub mod token;

pub use assembling::{assemble, CompositeTemplate, TemplateBuilder};
pub use ast::Node;
pub use context::ContextKind;
pub use expansion::{expand, GenerationKind, GenerationNode, TextPlacement};
pub use filters::Filter;
pub use generators::{Formatting, Generator};
pub use host::{BufferHost, Host, NoTemplates, TemplateLookup};
pub use lexing::{lex, LexError};
pub use numbering::Numbering;
pub use parsing::{parse, parse_abbreviation, ParseContext, ParseError};
pub use registry::Registry;
pub use selection::{select_filters, select_generator, SelectionError};
pub use session::{Engine, ExpandError, Expansion};
pub use template::{Placeholder, TemplateFragment};
pub use token::Token;
