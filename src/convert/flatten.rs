//! Recursive sample-tree flattening.
//!
//! Every visited sample becomes one span starting where its previous
//! sibling ended. A sample's self value (its own value minus what its
//! children consumed) becomes one collapsed stack line when positive.
//!
//! Example, elapsed time in microseconds:
//! ```text
//! Root 100000           span ts=0      dur=100000
//! └── Child 40000       span ts=0      dur=40000
//!
//! Root;Child 40000
//! Root 60000
//! ```

use super::pool::NodePool;
use crate::capture::{NodeId, ThreadView};
use crate::output::{EventSink, SpanEvent};
use crate::utils::config::ConvertConfig;
use crate::utils::error::OutputError;

/// Sample names, root first, for the samples currently being visited
#[derive(Debug, Default)]
pub struct CallPath {
    names: Vec<String>,
    max_depth: usize,
}

impl CallPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: String) {
        self.names.push(name);
        self.max_depth = self.max_depth.max(self.names.len());
    }

    pub fn pop(&mut self) -> Option<String> {
        self.names.pop()
    }

    pub fn depth(&self) -> usize {
        self.names.len()
    }

    /// Deepest nesting seen so far
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// The thread being flattened, fixed for one root invocation
pub struct ThreadScope<'a, T: ThreadView> {
    pub view: &'a T,
    /// Normalized thread name, used for blank sample placeholders
    pub thread_name: &'a str,
    pub thread_id: u64,
    pub frame_index: u64,
    pub config: &'a ConvertConfig,
}

/// Mutable state carried through the whole conversion run
#[derive(Debug, Default)]
pub struct FlattenState {
    pub pool: NodePool,
    pub path: CallPath,
    values: Vec<f64>,
    pub spans: usize,
    pub stacks: usize,
    pub excluded: usize,
}

impl FlattenState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Blank names become `null(<thread>)`; whitespace becomes underscores
pub fn normalize_sample_name(raw_name: &str, thread_name: &str) -> String {
    if raw_name.trim().is_empty() {
        format!("null({})", thread_name)
    } else {
        raw_name
            .chars()
            .map(|c| if c.is_whitespace() { '_' } else { c })
            .collect()
    }
}

/// Flatten one sample and its subtree
///
/// **Public** - called by the driver on each thread root
///
/// # Arguments
/// * `id` - Sample to visit
/// * `start_time` - Timestamp at which this sample's span begins
/// * `parent_name` - Normalized parent name, or the root category
///
/// # Returns
/// The sample's inclusive value, or 0 if it was excluded or has no
/// positive value. The caller advances sibling start times by it.
pub fn flatten<T: ThreadView, K: EventSink>(
    scope: &ThreadScope<'_, T>,
    state: &mut FlattenState,
    sink: &mut K,
    id: NodeId,
    start_time: f64,
    parent_name: &str,
) -> Result<f64, OutputError> {
    let raw_name = scope.view.item_name(id);
    if scope.config.is_excluded(raw_name) {
        state.excluded += 1;
        return Ok(0.0);
    }

    let name = normalize_sample_name(raw_name, scope.thread_name);

    let value = node_value(scope, &mut state.values, id);
    if !value.is_finite() || value <= 0.0 {
        return Ok(0.0);
    }

    let span = SpanEvent::new(
        name.as_str(),
        parent_name,
        start_time,
        value,
        scope.thread_id,
        scope.frame_index,
    );

    state.path.push(name.clone());
    let result = sink.span(&span).and_then(|()| {
        state.spans += 1;
        account_self_value(scope, state, sink, id, start_time, &name, value)
    });
    state.path.pop();

    result.map(|()| value)
}

/// Sum of the node's merged values for the active metric, rescaled
fn node_value<T: ThreadView>(scope: &ThreadScope<'_, T>, values: &mut Vec<f64>, id: NodeId) -> f64 {
    values.clear();
    scope.view.merged_values(id, scope.config.metric, values);
    let total: f64 = values.iter().sum();
    total * scope.config.metric.scale()
}

/// Visit children and write the self value line for the current path
fn account_self_value<T: ThreadView, K: EventSink>(
    scope: &ThreadScope<'_, T>,
    state: &mut FlattenState,
    sink: &mut K,
    id: NodeId,
    start_time: f64,
    name: &str,
    value: f64,
) -> Result<(), OutputError> {
    let self_value = if scope.view.has_children(id) {
        let mut children = state.pool.acquire();
        scope.view.children(id, &mut children);
        let consumed = flatten_children(scope, state, sink, &children, start_time, name);
        state.pool.release(children);
        value - consumed?
    } else {
        value
    };

    if self_value > 0.0 {
        sink.stack(state.path.names(), self_value)?;
        state.stacks += 1;
    }

    Ok(())
}

/// Flatten children left to right, each starting where the previous ended
fn flatten_children<T: ThreadView, K: EventSink>(
    scope: &ThreadScope<'_, T>,
    state: &mut FlattenState,
    sink: &mut K,
    children: &[NodeId],
    start_time: f64,
    parent_name: &str,
) -> Result<f64, OutputError> {
    let mut consumed = 0.0;
    for &child in children {
        consumed += flatten(scope, state, sink, child, start_time + consumed, parent_name)?;
    }
    Ok(consumed)
}
