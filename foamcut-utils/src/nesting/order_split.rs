use foamcut::entities::Part;
use itertools::Itertools;

/// Priority of parts that carry none
pub const DEFAULT_PRIORITY: u32 = 10;

/// Splits `parts` into a selection of (about) `target` parts and the remainder, keeping orders together.
///
/// Parts are grouped by order, and the orders sorted by their most urgent part (lowest priority value,
/// ties keep their first appearance). Whole orders are selected as long as they fit within `target`.
/// If the selection falls short, it is topped up with the first parts of the orders that did not fit.
pub fn split_parts_by_order(parts: Vec<Part>, target: usize) -> (Vec<Part>, Vec<Part>) {
    let mut groups: Vec<(String, Vec<Part>)> = vec![];
    for part in parts {
        match groups.iter_mut().find(|(id, _)| *id == part.source.order_id) {
            Some((_, group)) => group.push(part),
            None => groups.push((part.source.order_id.clone(), vec![part])),
        }
    }

    let min_priority = |group: &[Part]| {
        group
            .iter()
            .map(|p| p.source.priority.unwrap_or(DEFAULT_PRIORITY))
            .min()
            .unwrap_or(DEFAULT_PRIORITY)
    };
    let sorted = groups
        .into_iter()
        .sorted_by_key(|(_, group)| min_priority(group.as_slice()))
        .collect_vec();

    let mut selected = vec![];
    let mut deferred = vec![];
    for (order_id, group) in sorted {
        if selected.len() + group.len() <= target {
            log::debug!("[PROC] selecting order {} ({} parts)", order_id, group.len());
            selected.extend(group);
        } else {
            deferred.extend(group);
        }
    }

    if selected.len() < target && !deferred.is_empty() {
        let n_top_up = usize::min(target - selected.len(), deferred.len());
        selected.extend(deferred.drain(..n_top_up));
    }

    (selected, deferred)
}
