//! # Bunki - Branching-Scenario Decision Engine
//!
//! **Bunki** drives interactive, choice-based learning simulations. A scenario is a
//! directed graph of narrative nodes over a small table of typed variables; the engine
//! walks that graph in response to player choices and the passing of time, and records
//! exactly where the learner went.
//!
//! ## Core Workflow
//!
//! The engine is format-agnostic. It plays a canonical, immutable [`ScenarioGraph`] and
//! nothing else. The primary workflow is:
//!
//! 1.  **Load Your Scenario**: Parse a scenario document with the [`ScenarioLoader`], or
//!     implement [`IntoScenario`] for your own authoring format.
//! 2.  **Build a Controller**: Use [`PlaybackController::builder`] to pick an event sink,
//!     a scheduler and pacing.
//! 3.  **Play**: Call `start`, then feed player choices with `make_choice` and time with
//!     `advance` (or `run_until_idle`). Every transition is emitted as a [`ScenarioEvent`].
//! 4.  **Observe**: Read copies of the state with `snapshot`; the session ends with an
//!     [`Outcome`] when an end state is reached.
//!
//! ## Node Kinds
//!
//! | Kind         | Transition                                                          |
//! |--------------|---------------------------------------------------------------------|
//! | `start`      | Immediately to its target when playback starts.                     |
//! | `dialogue`   | To the chosen choice's target, applying that choice's mutations.    |
//! | `action`     | After `delayMs`, applying its mutations.                            |
//! | `logic_gate` | To the true or false path, decided on arrival, after a short pause. |
//! | `end_state`  | Terminal. Produces the outcome.                                     |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bunki::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let graph = ScenarioGraph::new(
//!         vec![Variable::new("trust", VariableType::Number, 0)],
//!         vec![
//!             ScenarioNode::start("start", "greeting"),
//!             ScenarioNode::dialogue(
//!                 "greeting",
//!                 "Client",
//!                 "Can we trust you with this account?",
//!                 vec![
//!                     Choice::new("agree", "Agree", "check")
//!                         .with_mutation(Mutation::increment("trust", 1.0)),
//!                     Choice::new("refuse", "Refuse", "lost")
//!                         .with_mutation(Mutation::decrement("trust", 1.0)),
//!                 ],
//!             ),
//!             ScenarioNode::logic_gate(
//!                 "check",
//!                 Condition::new("trust", ConditionOperator::GreaterEqual, 1),
//!                 "won",
//!                 "undecided",
//!             ),
//!             ScenarioNode::end_state("won", OutcomeKind::Success, "Deal closed", Some(100.0)),
//!             ScenarioNode::end_state("undecided", OutcomeKind::Neutral, "No decision", None),
//!             ScenarioNode::end_state("lost", OutcomeKind::Failure, "The client left", Some(0.0)),
//!         ],
//!         "start",
//!     );
//!
//!     let log = EventLog::new();
//!     let mut controller = PlaybackController::builder(graph)
//!         .with_sink(log.clone())
//!         .build();
//!
//!     controller.start()?;
//!     controller.make_choice("agree")?;
//!
//!     if let PlaybackStatus::Completed(outcome) = controller.run_until_idle()? {
//!         println!("{}", TraceFormatter::format_outcome(&outcome));
//!     }
//!     println!("Events: {:?}", log.kinds());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod definition;
pub mod error;
pub mod evaluator;
pub mod events;
pub mod history;
pub mod model;
pub mod playback;
pub mod prelude;
pub mod processor;
pub mod scheduler;
pub mod trace;
pub mod variables;

pub use config::EngineConfig;
pub use definition::{IntoScenario, ScenarioLoader};
pub use events::{EventSink, ScenarioEvent};
pub use model::ScenarioGraph;
pub use playback::{Outcome, PlaybackController, PlaybackStatus, ScenarioPlayState};
