use super::PlaybackController;
use crate::config::EngineConfig;
use crate::events::{EventSink, NullSink};
use crate::model::ScenarioGraph;
use crate::processor::ScheduledTransition;
use crate::scheduler::{Scheduler, VirtualScheduler};

pub struct PlaybackControllerBuilder {
    graph: ScenarioGraph,
    config: EngineConfig,
    scheduler: Option<Box<dyn Scheduler<ScheduledTransition>>>,
    sink: Option<Box<dyn EventSink>>,
}

impl PlaybackControllerBuilder {
    pub fn new(graph: ScenarioGraph) -> Self {
        Self {
            graph,
            config: EngineConfig::default(),
            scheduler: None,
            sink: None,
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_logic_gate_delay(mut self, delay_ms: u64) -> Self {
        self.config.logic_gate_delay_ms = delay_ms;
        self
    }

    pub fn with_transition_limit(mut self, limit: u32) -> Self {
        self.config.max_automatic_transitions = limit;
        self
    }

    pub fn with_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn with_scheduler(
        mut self,
        scheduler: impl Scheduler<ScheduledTransition> + 'static,
    ) -> Self {
        self.scheduler = Some(Box::new(scheduler));
        self
    }

    pub fn build(self) -> PlaybackController {
        let scheduler: Box<dyn Scheduler<ScheduledTransition>> = match self.scheduler {
            Some(scheduler) => scheduler,
            None => Box::new(VirtualScheduler::new()),
        };
        let sink: Box<dyn EventSink> = match self.sink {
            Some(sink) => sink,
            None => Box::new(NullSink),
        };
        PlaybackController::from_parts(self.graph, self.config, scheduler, sink)
    }
}
