//! Template block formatting.
//!
//! This module contains the core formatting logic organized into submodules:
//! - [`indenter`]: Assigns each token a nesting depth from `if`/`elseif`/`else`/`endif` tags
//! - [`whitespace`]: Collapses whitespace-only lines left over after indentation

pub mod indenter;
pub mod whitespace;

pub use indenter::{block_effect, BlockEffect, BlockIndenter};
pub use whitespace::collapse_blank_lines;
