//! TypeScript symbol and type queries backed by swc.
//!
//! A [`Program`] parses an entry module together with every local module it
//! imports, builds a type-namespace symbol table for each, and answers the
//! [`TypeInfo`] queries the props engine needs: name lookup, import alias
//! resolution, declaration lookup, canonical type text and JSDoc comments.
//!
//! # Example
//!
//! ```
//! use camino::Utf8Path;
//! use type_info::{MemorySources, Program, TypeInfo};
//!
//! let sources = MemorySources::new()
//!     .with_file("/src/props.ts", "export interface Props { title: string }")
//!     .with_file("/src/Card.ts", "import { Props } from './props'");
//! let (program, entry) = Program::load(&sources, Utf8Path::new("/src/Card.ts")).unwrap();
//!
//! let local = program.symbol_named(entry, "Props").unwrap();
//! let target = program.aliased_symbol(local).unwrap();
//! assert_eq!(program.symbol_name(target), "Props");
//! ```

mod error;
mod info;
mod program;
mod source;

pub use error::ProgramError;
pub use info::{Declaration, DeclarationKind, ModuleId, SymbolId, TypeInfo, TypeNode};
pub use program::Program;
pub use source::{FsSources, MemorySources, SourceProvider};
