//! Graph walker: turns a [`Node`] into a canonical stream of structural events.
//!
//! Classification priority is fixed by the node adapters (opaque scalars such
//! as timestamps are already leaves by the time the walker sees them), so the
//! walker only has to expand the four node shapes:
//!
//! - sequences emit `[`, their elements in index order, then `]`
//! - records and maps emit `{`, then for every key in policy order an
//!   attribute followed by its value, then `}`
//! - scalars emit a single value built by the policy's factory
//!
//! Traversal runs on an explicit work stack, so graph depth is bounded by
//! heap rather than call-stack size.

use std::collections::{BTreeMap, VecDeque};

use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::collector::Collector;
use crate::errors::GraphError;
use crate::event::{StructuralEvent, Token};
use crate::node::{to_node, Node, Record, Visibility};
use crate::path::Path;
use crate::policy::Policy;

enum Task<'a> {
    Visit(&'a Node, Path),
    Emit(StructuralEvent),
}

/// Adapts `value` through serde and walks it.
///
/// `emit` receives every event in canonical order; returning an error from it
/// abandons the traversal and that error is returned unchanged.
///
/// # Errors
///
/// Adapter errors from [`to_node`] plus everything [`walk_node`] reports.
pub fn walk<T, F>(value: &T, policy: &dyn Policy, emit: F) -> Result<(), GraphError>
where
    T: Serialize + ?Sized,
    F: FnMut(StructuralEvent) -> Result<(), GraphError>,
{
    let node = to_node(value)?;
    walk_node(&node, policy, emit)
}

/// Walks `value` and feeds every event to `collector`.
pub fn walk_into<T, C>(value: &T, policy: &dyn Policy, collector: &mut C) -> Result<(), GraphError>
where
    T: Serialize + ?Sized,
    C: Collector + ?Sized,
{
    walk(value, policy, |event| collector.append(&event))
}

/// Walks an already adapted node.
///
/// # Errors
///
/// - [`GraphError::InaccessibleField`] when a record holds a private field
/// - [`GraphError::UnknownKey`] when the key-ordering hook invents a key
/// - [`GraphError::Encoding`] when the value factory rejects a scalar
/// - whatever `emit` returns
pub fn walk_node<F>(root: &Node, policy: &dyn Policy, mut emit: F) -> Result<(), GraphError>
where
    F: FnMut(StructuralEvent) -> Result<(), GraphError>,
{
    let mut stack = vec![Task::Visit(root, Path::root())];
    let mut emitted = 0usize;
    let mut send = |event: StructuralEvent| {
        trace!(kind = %event.kind(), path = %event.path, "structural event");
        emitted += 1;
        emit(event)
    };

    while let Some(task) = stack.pop() {
        match task {
            Task::Emit(event) => send(event)?,
            Task::Visit(Node::Scalar(datum), path) => {
                let value = policy
                    .make_value(datum)
                    .map_err(|source| GraphError::Encoding {
                        path: path.to_string(),
                        source,
                    })?;
                send(StructuralEvent::new(Token::Value(value), path))?;
            }
            Task::Visit(Node::Sequence(items), path) => {
                let start = path.child("[");
                stack.push(Task::Emit(StructuralEvent::new(
                    Token::ArrayEnd,
                    path.child("]"),
                )));
                let items = policy.transform_sequence(items.iter().collect());
                for (idx, item) in items.into_iter().enumerate().rev() {
                    stack.push(Task::Visit(item, start.index(idx)));
                }
                send(StructuralEvent::new(Token::ArrayStart, start))?;
            }
            Task::Visit(Node::Record(record), path) => {
                let entries = record_entries(record, &path)?;
                let start = schedule_object(&mut stack, entries, &path, policy)?;
                send(start)?;
            }
            Task::Visit(Node::Map(entries), path) => {
                let entries = entries.iter().map(|(k, v)| (k.as_str(), v)).collect();
                let start = schedule_object(&mut stack, entries, &path, policy)?;
                send(start)?;
            }
        }
    }

    debug!(events = emitted, "object graph walked");
    Ok(())
}

fn record_entries<'a>(record: &'a Record, path: &Path) -> Result<Vec<(&'a str, &'a Node)>, GraphError> {
    if let Some(field) = record
        .fields
        .iter()
        .find(|field| field.visibility == Visibility::Private)
    {
        warn!(record = %record.type_name, field = %field.name, "record field is not accessible");
        return Err(GraphError::InaccessibleField {
            record: record.type_name.clone(),
            field: field.name.clone(),
            path: path.to_string(),
        });
    }
    Ok(record
        .fields
        .iter()
        .map(|field| (field.key(), &field.value))
        .collect())
}

/// Queues the members and closing bracket of an object and returns its
/// opening event.
///
/// Keys that occur more than once (a rename colliding with a declared name)
/// are all kept, matched to their values in declaration order.
fn schedule_object<'a>(
    stack: &mut Vec<Task<'a>>,
    entries: Vec<(&'a str, &'a Node)>,
    path: &Path,
    policy: &dyn Policy,
) -> Result<StructuralEvent, GraphError> {
    let keys = entries.iter().map(|(key, _)| key.to_string()).collect();
    let mut by_key: BTreeMap<&str, VecDeque<&'a Node>> = BTreeMap::new();
    for (key, node) in entries {
        by_key.entry(key).or_default().push_back(node);
    }

    let mut members = Vec::new();
    for key in policy.order_keys(keys) {
        let node = by_key
            .get_mut(key.as_str())
            .and_then(VecDeque::pop_front)
            .ok_or_else(|| GraphError::UnknownKey {
                key: key.clone(),
                path: path.to_string(),
            })?;
        members.push((key, node));
    }

    let start = path.child("{");
    stack.push(Task::Emit(StructuralEvent::new(
        Token::ObjectEnd,
        path.child("}"),
    )));
    for (key, node) in members.into_iter().rev() {
        let member_path = start.child(key.as_str());
        stack.push(Task::Visit(node, member_path.clone()));
        stack.push(Task::Emit(StructuralEvent::new(
            Token::Attribute(key),
            member_path,
        )));
    }
    Ok(StructuralEvent::new(Token::ObjectStart, start))
}
