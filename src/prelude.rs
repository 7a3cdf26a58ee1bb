//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the bunki crate.
//! Import this module to get access to the core functionality without having to import
//! each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use bunki::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let graph = ScenarioLoader::new().load_file("path/to/scenario.json")?;
//! let mut controller = PlaybackController::new(graph);
//!
//! controller.start()?;
//! for choice in controller.available_choices() {
//!     println!("[{}] {}", choice.id, choice.label);
//! }
//! # Ok(())
//! # }
//! ```

// Playback
pub use crate::config::EngineConfig;
pub use crate::playback::{
    Outcome, PlaybackController, PlaybackControllerBuilder, PlaybackStatus, ScenarioPlayState,
};

// Scenario model
pub use crate::model::{
    Choice, Condition, ConditionOperator, Mutation, MutationOp, NodeData, NodeKind,
    OutcomeKind, ScenarioGraph, ScenarioNode, Variable, VariableType, VariableValue,
};

// Loading
pub use crate::definition::{IntoScenario, NodeDefinition, ScenarioDefinition, ScenarioLoader};

// Events and scheduling
pub use crate::events::{EventLog, EventSink, FnSink, NullSink, ScenarioEvent, TracingSink};
pub use crate::scheduler::{Scheduler, TimerToken, VirtualScheduler};

// Runtime pieces
pub use crate::evaluator::ConditionTrace;
pub use crate::history::PathHistory;
pub use crate::variables::VariableStore;

// Error types
pub use crate::error::{
    DefinitionError, InvalidChoiceError, PlaybackError, ScenarioLoadError, TypeMismatchError,
};

// Trace formatting
pub use crate::trace::TraceFormatter;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
