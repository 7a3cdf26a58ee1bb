use super::{ScenarioDefinition, ScenarioLoader};
use crate::error::ScenarioLoadError;
use crate::model::ScenarioGraph;

/// A trait for authoring formats that can be converted into a `ScenarioGraph`.
///
/// This is the seam between the engine and whatever tool produced the scenario. By
/// implementing it on your own structs you translate your format once, up front, and the
/// engine only ever sees the canonical graph.
///
/// # Example
///
/// ```rust,no_run
/// use bunki::prelude::{Choice, IntoScenario, ScenarioGraph, ScenarioLoadError, ScenarioNode};
///
/// struct Beat { id: String, line: String, next: Option<String> }
/// struct Script { beats: Vec<Beat> }
///
/// impl IntoScenario for Script {
///     fn into_scenario(self) -> Result<ScenarioGraph, ScenarioLoadError> {
///         let first = self.beats.first().map(|b| b.id.clone()).ok_or_else(|| {
///             ScenarioLoadError::ValidationError("script has no beats".to_string())
///         })?;
///         let mut nodes = vec![ScenarioNode::start("start", first)];
///         for beat in self.beats {
///             let choices = beat
///                 .next
///                 .map(|next| vec![Choice::new("continue", "Continue", next)])
///                 .unwrap_or_default();
///             nodes.push(ScenarioNode::dialogue(beat.id, "Narrator", beat.line, choices));
///         }
///         Ok(ScenarioGraph::new(vec![], nodes, "start"))
///     }
/// }
/// ```
pub trait IntoScenario {
    /// Consumes the object and converts it into a playable scenario graph.
    fn into_scenario(self) -> Result<ScenarioGraph, ScenarioLoadError>;
}

impl IntoScenario for ScenarioDefinition {
    fn into_scenario(self) -> Result<ScenarioGraph, ScenarioLoadError> {
        ScenarioLoader::new().load(self)
    }
}

impl IntoScenario for ScenarioGraph {
    fn into_scenario(self) -> Result<ScenarioGraph, ScenarioLoadError> {
        Ok(self)
    }
}
