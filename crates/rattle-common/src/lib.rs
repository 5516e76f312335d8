//! Shared types consumed by every pipeline stage: locations, tokens, the
//! keyword table, error kinds, the escape-printing helper, the reactor
//! traits, and the arena/owning-handle pair node construction is built on.

pub mod arena;
pub mod error;
pub mod escape;
pub mod keywords;
pub mod location;
pub mod pipeline;
pub mod reactor;
pub mod token;

pub use arena::{Arena, Handle};
pub use error::{AnalyzerError, LexError, LexErrorKind, OnError, ParseError, ParseErrorKind};
pub use escape::Escape;
pub use location::Location;
pub use pipeline::TokenSource;
pub use reactor::{CollectingReactor, LexReactor, Reactor};
pub use token::{flags, merge_kind, Token, TokenKind};
