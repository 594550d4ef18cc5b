//! Forward/backward stepping engine.
//!
//! Forward entries expand a reachable state, restricted to the operators
//! related to the one that reached it. Operators that are related but not
//! yet applicable are pushed onto the operator stack as tentative
//! regression chains; backward entries then walk those chains until an
//! operator becomes applicable and the chain turns into a real transition.

use plan_io::SearchStats;
use sas_task::{Cost, OperatorId, StateId, StateRegistry, SuccessorGenerator, Task};

use crate::config::SearchConfig;
use crate::context::SearchContext;
use crate::engine::{SearchError, SearchStatus};
use crate::evaluator::{build_evaluator, EvaluationContext, Evaluator};
use crate::frontier::FrontierEntry;
use crate::op_stack::NodeIdx;
use crate::open_list::{FwdbwdOpenList, OpenList};
use crate::progress::SearchProgress;
use crate::search_space::SearchSpace;

/// Outcome of applying one operator to an expanded state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    /// `g + cost >= bound`.
    Pruned,
    DeadEnd,
    /// Successor seen for the first time and opened.
    Opened(StateId),
    /// Successor already known; its parent was relaxed if the path improved.
    Reached(StateId),
}

/// One fwdbwd search over a task.
pub struct FwdbwdSearch<'t> {
    task: &'t Task,
    config: SearchConfig,
    bound: Cost,
    registry: StateRegistry,
    successor_generator: SuccessorGenerator,
    search_space: SearchSpace,
    open_list: Box<dyn OpenList>,
    lazy_evaluator: Option<Box<dyn Evaluator>>,
    context: SearchContext,
    stats: SearchStats,
    progress: SearchProgress,
    plan: Option<Vec<OperatorId>>,
}

impl<'t> FwdbwdSearch<'t> {
    /// Build a search with the evaluators named in `config`.
    pub fn new(task: &'t Task, config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let evaluator = build_evaluator(config.evaluator);
        let lazy = config.lazy_evaluator.map(build_evaluator);
        Self::with_evaluators(task, config, evaluator, lazy)
    }

    /// Build a search with caller-supplied evaluators.
    pub fn with_evaluators(
        task: &'t Task,
        config: SearchConfig,
        evaluator: Box<dyn Evaluator>,
        lazy_evaluator: Option<Box<dyn Evaluator>>,
    ) -> Result<Self, SearchError> {
        if let Some(lazy) = &lazy_evaluator {
            if !lazy.does_cache_estimates() {
                return Err(SearchError::Config(format!(
                    "lazy_evaluator must cache its estimates ('{}' does not)",
                    lazy.name()
                )));
            }
        }
        let progress = SearchProgress::new(config.progress_log);
        Ok(Self {
            task,
            bound: config.effective_bound(),
            config,
            registry: StateRegistry::new(),
            successor_generator: SuccessorGenerator::new(task),
            search_space: SearchSpace::new(),
            open_list: Box::new(FwdbwdOpenList::new(evaluator)),
            lazy_evaluator,
            context: SearchContext::new(task),
            stats: SearchStats::default(),
            progress,
            plan: None,
        })
    }

    /// Register and evaluate the initial state and seed the open list.
    ///
    /// Returns false if the initial state is a dead end; nothing is
    /// inserted in that case.
    pub fn initialize(&mut self) -> bool {
        tracing::info!(
            operators = self.task.num_operators(),
            dependencies = self.context.graph.num_edges(),
            goal_relevant = self.context.graph.num_goal_relevant(),
            "Conducting fwdbwd best-first search"
        );
        let id = self.registry.get_initial_state(self.task);
        let state = self.registry.lookup(id);
        self.open_list.notify_initial_state(state);
        if let Some(lazy) = self.lazy_evaluator.as_mut() {
            if lazy.is_path_dependent() {
                lazy.notify_initial_state(state);
            }
        }

        let ctx = EvaluationContext::new(id, state, 0);
        self.stats.evaluated += 1;
        let estimate = self.open_list.evaluate(self.task, &ctx);
        if estimate.is_dead_end() {
            tracing::info!("Initial state is a dead end.");
            self.search_space.mark_as_dead_end(id);
            self.stats.dead_ends += 1;
            return false;
        }
        self.progress.check_progress(estimate, 0);
        self.search_space.open_initial(id);
        self.context.forward_nodes.insert(id, OperatorId::NO_OPERATOR);
        self.insert_forward(id, OperatorId::NO_OPERATOR);
        true
    }

    /// Pop one entry and process it.
    pub fn step(&mut self) -> SearchStatus {
        self.stats.steps += 1;
        let Some(entry) = self.fetch_next_node() else {
            tracing::info!("Completely explored state space -- no solution!");
            return SearchStatus::Failed;
        };
        match entry {
            FrontierEntry::Forward { .. } => self.forward_step(entry),
            FrontierEntry::Backward { .. } => self.backward_step(entry),
        }
    }

    /// Pop entries until one whose state is neither closed nor a dead end.
    ///
    /// With a lazy evaluator configured, the state is re-evaluated here and
    /// discarded if it turns out to be a dead end.
    pub fn fetch_next_node(&mut self) -> Option<FrontierEntry> {
        loop {
            let entry = self.open_list.remove_min()?;
            let id = entry.state();
            let node = self.search_space.get(id);
            if node.is_closed() || node.is_dead_end() {
                continue;
            }
            if let Some(lazy) = self.lazy_evaluator.as_mut() {
                let ctx = EvaluationContext::new(id, self.registry.lookup(id), node.g);
                if lazy.compute(self.task, &ctx).is_dead_end() {
                    self.search_space.mark_as_dead_end(id);
                    self.stats.dead_ends += 1;
                    continue;
                }
            }
            self.stats.expanded += 1;
            return Some(entry);
        }
    }

    /// Expand a reachable state.
    pub fn forward_step(&mut self, entry: FrontierEntry) -> SearchStatus {
        let FrontierEntry::Forward {
            state: id,
            operator: reaching,
            ..
        } = entry
        else {
            return self.backward_step(entry);
        };
        self.stats.forward_steps += 1;

        if self.task.is_goal_state(self.registry.lookup(id)) {
            self.set_plan(id);
            return SearchStatus::Solved;
        }

        let (ready, pending) = self.generate_fwdbwd_ops(id, reaching);
        tracing::debug!(
            state = %id,
            reaching = %reaching,
            ready = ready.len(),
            pending = pending.len(),
            "Forward step"
        );

        for op in ready {
            match self.apply_transition(id, op) {
                Transition::Opened(succ) => {
                    self.context.forward_nodes.insert(succ, op);
                    self.insert_forward(succ, op);
                }
                Transition::Reached(succ) => {
                    // A new reaching operator is recorded even without a
                    // cost improvement; later expansion depends on it.
                    if self.context.forward_nodes.insert(succ, op) {
                        self.insert_forward(succ, op);
                    }
                }
                Transition::Pruned | Transition::DeadEnd => {}
            }
        }

        let g = self.search_space.get(id).real_g;
        let root = self.context.op_stack.root();
        for op in pending {
            let (node, fresh) = self.gen_child(root, op, id);
            if !fresh {
                continue;
            }
            let dependents = self.context.graph.dependents(op).to_vec();
            for dep in dependents {
                let (child, fresh) = self.gen_child(node, dep, id);
                if fresh {
                    self.insert_backward(id, child, g);
                }
            }
        }
        SearchStatus::InProgress
    }

    /// Resolve one position of a regression chain at a concrete state.
    pub fn backward_step(&mut self, entry: FrontierEntry) -> SearchStatus {
        let FrontierEntry::Backward {
            state: id, node, g, ..
        } = entry
        else {
            return self.forward_step(entry);
        };
        self.stats.backward_steps += 1;

        let stack_node = self.context.op_stack.node(node);
        let op = stack_node.operator();
        let Some(parent) = stack_node.parent() else {
            return SearchStatus::InProgress;
        };
        let applicable = self
            .task
            .operator(op)
            .is_applicable(self.registry.lookup(id));
        tracing::debug!(
            state = %id,
            op = %op,
            depth = stack_node.depth(),
            applicable,
            "Backward step"
        );

        if !applicable {
            let dependents = self.context.graph.dependents(op).to_vec();
            for dep in dependents {
                let (child, fresh) = self.gen_child(node, dep, id);
                if fresh {
                    self.insert_backward(id, child, g);
                }
            }
            return SearchStatus::InProgress;
        }

        match self.apply_transition(id, op) {
            Transition::Opened(succ) => {
                self.context.op_stack.store_state(parent, succ);
                self.resolve_chain_step(parent, succ, op);
            }
            Transition::Reached(succ) => {
                if self.context.op_stack.store_state(parent, succ) {
                    self.resolve_chain_step(parent, succ, op);
                }
            }
            Transition::Pruned | Transition::DeadEnd => {}
        }
        SearchStatus::InProgress
    }

    /// Hand `succ` to the next chain position up, or back to forward search
    /// once the root is reached.
    fn resolve_chain_step(&mut self, parent: NodeIdx, succ: StateId, op: OperatorId) {
        if self.context.op_stack.is_root(parent) {
            if self.context.forward_nodes.insert(succ, op) {
                self.stats.chains_resolved += 1;
                self.insert_forward(succ, op);
            }
        } else {
            let g = self.search_space.get(succ).real_g;
            self.insert_backward(succ, parent, g);
        }
    }

    /// Apply `op` in state `id`: bound check, successor generation,
    /// dead-end memo, evaluation of new states and parent relaxation.
    fn apply_transition(&mut self, id: StateId, op: OperatorId) -> Transition {
        let task = self.task;
        let node = self.search_space.get(id);
        let operator = task.operator(op);
        if node.real_g.saturating_add(operator.cost) >= self.bound {
            return Transition::Pruned;
        }

        let succ = self.registry.get_successor_state(id, operator);
        self.stats.generated += 1;
        let succ_node = self.search_space.get(succ);
        if succ_node.is_dead_end() {
            return Transition::DeadEnd;
        }

        let parent_state = self.registry.lookup(id);
        let succ_state = self.registry.lookup(succ);
        self.open_list
            .notify_state_transition(parent_state, op, succ_state);
        if let Some(lazy) = self.lazy_evaluator.as_mut() {
            if lazy.is_path_dependent() {
                lazy.notify_state_transition(parent_state, op, succ_state);
            }
        }

        let adjusted = self.config.cost_type.adjust(operator.cost);
        let new_g = node.g + adjusted;
        if succ_node.is_new() {
            let ctx = EvaluationContext::new(succ, succ_state, new_g);
            self.stats.evaluated += 1;
            let estimate = self.open_list.evaluate(task, &ctx);
            if estimate.is_dead_end() {
                self.search_space.mark_as_dead_end(succ);
                self.stats.dead_ends += 1;
                return Transition::DeadEnd;
            }
            self.search_space
                .open(succ, id, op, adjusted, operator.cost);
            self.progress.check_progress(estimate, new_g);
            return Transition::Opened(succ);
        }

        if new_g < succ_node.g {
            self.search_space
                .update_parent(succ, id, op, adjusted, operator.cost);
        }
        Transition::Reached(succ)
    }

    /// Split the candidate operators for expanding `id` into those
    /// applicable now and those still pending.
    fn generate_fwdbwd_ops(
        &self,
        id: StateId,
        reaching: OperatorId,
    ) -> (Vec<OperatorId>, Vec<OperatorId>) {
        let state = self.registry.lookup(id);
        let mut ready = Vec::new();
        if reaching.is_none() || self.context.graph.is_goal_relevant(reaching) {
            self.successor_generator
                .generate_applicable_ops(self.task, state, &mut ready);
            return (ready, Vec::new());
        }
        let mut pending = Vec::new();
        for &op in self.context.graph.inverse(reaching) {
            if self.task.operator(op).is_applicable(state) {
                ready.push(op);
            } else {
                pending.push(op);
            }
        }
        (ready, pending)
    }

    fn gen_child(&mut self, parent: NodeIdx, op: OperatorId, state: StateId) -> (NodeIdx, bool) {
        let cost = self.task.operator(op).cost;
        let (child, fresh) = self.context.op_stack.gen_child(parent, op, state, cost);
        if fresh {
            self.stats.op_stack_nodes += 1;
        }
        (child, fresh)
    }

    fn insert_forward(&mut self, state: StateId, op: OperatorId) {
        let g = self.search_space.get(state).real_g;
        self.open_list.insert(FrontierEntry::Forward {
            state,
            operator: op,
            g,
        });
        self.stats.forward_entries += 1;
        self.track_open_list_size();
    }

    fn insert_backward(&mut self, state: StateId, node: NodeIdx, g: Cost) {
        let depth = self.context.op_stack.node(node).depth();
        self.open_list.insert(FrontierEntry::Backward {
            state,
            node,
            depth,
            g,
        });
        self.stats.backward_entries += 1;
        self.track_open_list_size();
    }

    fn track_open_list_size(&mut self) {
        self.stats.peak_open_list_size = self.stats.peak_open_list_size.max(self.open_list.len());
    }

    fn set_plan(&mut self, goal: StateId) {
        let plan = self.search_space.trace_path(goal);
        tracing::info!(
            length = plan.len(),
            cost = self.search_space.get(goal).real_g,
            "Solution found!"
        );
        self.plan = Some(plan);
    }

    pub fn plan(&self) -> Option<&[OperatorId]> {
        self.plan.as_deref()
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn context(&self) -> &SearchContext {
        &self.context
    }

    pub fn registry(&self) -> &StateRegistry {
        &self.registry
    }

    pub fn search_space(&self) -> &SearchSpace {
        &self.search_space
    }

    pub fn open_list_len(&self) -> usize {
        self.open_list.len()
    }

    pub fn best_heuristic(&self) -> Option<Cost> {
        self.progress.best()
    }
}
