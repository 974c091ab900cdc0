//! Concurrent invocation of resolved child filters.

use crate::error::{MergeError, Result};
use crate::registry::ResolvedFilter;
use items::Item;
use pipeline::{CallContext, ChildFilter, FilterArgs};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, Instrument, Span};

/// Run every resolved child on its own copy of `items`, in parallel.
///
/// Each child is spawned as its own task, so CPU-bound children occupy
/// separate workers on a multi-threaded runtime. Each child receives a
/// shallow copy of the batch, so one child replacing fields of an item never
/// shows up in another child's view.
///
/// The first child failure fails the whole fan-out and aborts the children
/// still running. Results come back in the order of `resolved`, not
/// completion order.
pub async fn fan_out<'a>(
    context: &Arc<CallContext>,
    items: &[Item],
    resolved: Vec<(&'a ChildFilter, ResolvedFilter)>,
) -> Result<Vec<(&'a ChildFilter, Vec<Item>)>> {
    let mut tasks = JoinSet::new();
    let mut children = Vec::with_capacity(resolved.len());

    for (index, (child, resolved)) in resolved.into_iter().enumerate() {
        let ResolvedFilter {
            name,
            filter,
            filter_options,
            filter_params,
        } = resolved;
        let args = FilterArgs {
            context: Arc::clone(context),
            items: items.to_vec(),
            filter_options,
            filter_params,
        };
        children.push(child);

        let child_task = async move {
            let output = filter
                .filter(args)
                .await
                .map_err(|source| MergeError::Transform {
                    name: name.clone(),
                    source,
                })?;
            let output = output.into_items();
            debug!(filter = %name, count = output.len(), "Child filter finished");
            Ok::<_, MergeError>((index, output))
        };
        tasks.spawn(child_task.instrument(Span::current()));
    }

    let mut finished = Vec::with_capacity(children.len());
    while let Some(joined) = tasks.join_next().await {
        // Returning early drops the set, which aborts the remaining children
        finished.push(joined??);
    }
    finished.sort_by_key(|(index, _)| *index);

    Ok(children
        .into_iter()
        .zip(finished)
        .map(|(child, (_, output))| (child, output))
        .collect())
}
