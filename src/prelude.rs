//! Prelude module for convenient imports
//!
//! Re-exports the types most callers need to compile, simulate and preview a
//! block model.
//!
//! # Example
//!
//! ```rust,no_run
//! use dankai::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let blocks: Vec<dankai::model::LogicBlock> =
//!     serde_json::from_str(&std::fs::read_to_string("path/to/blocks.json")?)?;
//!
//! let compiled = Compiler::builder().build().compile(&blocks)?;
//! let sample_data = SampleData::from_file("path/to/sample.json")?;
//!
//! let evaluator = Evaluator::new(&blocks, TemplateConfig::default());
//! let result = evaluator.eval(&sample_data);
//! println!("{}\n---\n{}", compiled.source, result.content);
//! # Ok(())
//! # }
//! ```

// Core compilation and evaluation
pub use crate::compiler::{CompiledTemplate, Compiler};
pub use crate::config::{FallbackPolicy, TemplateConfig};
pub use crate::evaluator::{BlockOutcome, EvaluationResult, Evaluator, Selection};

// Editing
pub use crate::editor::{BlockUpdate, Editor, StageUpdate};

// Values and traces
pub use crate::ast::{EvaluationTrace, Literal, Value};

// Backends and data
pub use crate::backend::{ReferenceRenderer, TemplateBackend, VariableSource};
pub use crate::data::SampleData;

// Error types
pub use crate::error::{BackendError, CompileError, EditorError, EvaluationError};

// Trace formatting
pub use crate::trace::TraceFormatter;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
