//! # Dankai - Staged Template Block Compiler and Simulator
//!
//! **Dankai** turns a model of *logic blocks* into directive-based template
//! source, and predicts what that template will output for a set of sampled
//! state values without running a template engine.
//!
//! A block holds an ordered list of *stages*. Each stage is guarded by
//! condition groups (OR of ANDs) over state variables, and the first stage
//! whose guard holds wins; a block where nothing matches falls back to its
//! default content.
//!
//! ## Core Workflow
//!
//! 1.  **Describe the blocks**: build [`model::LogicBlock`]s in code or deserialize them from JSON.
//! 2.  **Compile**: use [`compiler::Compiler`] to generate the template text.
//! 3.  **Simulate**: create an [`evaluator::Evaluator`] from the same blocks and call `eval` with sampled values.
//! 4.  **Preview**: optionally render the template with a [`backend::TemplateBackend`], such as the bundled
//!     [`backend::ReferenceRenderer`], and fall back to the simulation when it produces nothing.
//!
//! Both the compiler and the simulator work from the same lowered guard
//! ([`ast::StageGuard`]), so they cannot disagree about which conditions count.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dankai::prelude::*;
//! use dankai::model::{Condition, ConditionGroup, ConditionOperator, LogicBlock, Stage};
//!
//! fn main() -> Result<()> {
//!     let block = LogicBlock::new("mood", "Mood")
//!         .with_stage(
//!             Stage::new("low", "Low", "Grumpy").with_group(ConditionGroup::new(
//!                 "g1",
//!                 vec![Condition::new("score", ConditionOperator::Less, "50")],
//!             )),
//!         )
//!         .with_default("Cheerful");
//!
//!     let compiler = Compiler::builder().build();
//!     let compiled = compiler.compile(std::slice::from_ref(&block))?;
//!     println!("{}", compiled.source);
//!
//!     let mut sample = SampleData::new();
//!     sample.set_input("stat_data.score", "30");
//!
//!     let evaluator = Evaluator::new(&[block], TemplateConfig::default());
//!     let result = evaluator.eval(&sample);
//!     println!("{} ({})", result.content, result.outcomes[0].reason);
//!
//!     let renderer = ReferenceRenderer::default();
//!     let preview = evaluator.preview(Some(&renderer), &compiled.source, &sample);
//!     assert_eq!(preview, result.content);
//!     Ok(())
//! }
//! ```

pub mod ast;
pub mod backend;
pub mod compiler;
pub mod config;
pub mod data;
pub mod diagnostics;
pub mod editor;
pub mod error;
pub mod evaluator;
pub mod model;
pub mod prelude;
pub mod trace;
pub mod validation;
pub mod variables;
