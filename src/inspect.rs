//! Promoted method resolution.
//!
//! Computes the exported method set of a type the way the compiler promotes
//! methods through embedded fields:
//!
//! - a named type contributes its underlying type's members first, then its
//!   own declared methods
//! - an interface contributes its methods and nothing below them
//! - a struct records every field name and descends into embedded fields
//! - a pointer is followed unless it points to another pointer or to an
//!   interface
//!
//! A method name that is also a field name anywhere on the traversal is never
//! promoted. Among candidates for one name the shallowest wins; a tie at the
//! shallowest depth drops the name. A pointer-receiver method is only
//! promoted when the query is a pointer or the path to it went through one.
//!
//! The traversal uses an explicit task stack instead of recursion.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};
use typex_host::{is_interface, MethodView, Reflect, View};
use typex_types::{is_exported, Result};

use crate::walker::Walker;

/// A method that survived promotion.
#[derive(Debug, Clone)]
pub(crate) struct Promoted<T> {
    pub method: MethodView<T>,
    /// Named-type crossings between the query and the declaring type.
    pub depth: usize,
}

struct Candidate<T> {
    method: MethodView<T>,
    depth: usize,
    via_pointer: bool,
}

impl<T> Candidate<T> {
    fn promotable(&self) -> bool {
        !self.method.pointer_receiver || self.via_pointer
    }
}

enum Task<T> {
    Enter(T),
    Declare(Vec<MethodView<T>>),
    Leave,
}

struct Inspector<T> {
    walker: Walker<T>,
    base: usize,
    fields: HashSet<String>,
    methods: HashMap<String, Vec<Candidate<T>>>,
}

impl<T: Reflect> Inspector<T> {
    fn record(&mut self, method: MethodView<T>) {
        if !is_exported(&method.name) {
            return;
        }
        let depth = self.walker.named_count().saturating_sub(self.base);
        let via_pointer = self.walker.via_pointer();
        self.methods
            .entry(method.name.clone())
            .or_default()
            .push(Candidate {
                method,
                depth,
                via_pointer,
            });
    }

    fn run(&mut self, query: T) -> Result<()> {
        let mut tasks = vec![Task::Enter(query)];
        while let Some(task) = tasks.pop() {
            match task {
                Task::Leave => self.walker.leave(),
                Task::Declare(methods) => {
                    for method in methods {
                        self.record(method);
                    }
                }
                Task::Enter(t) => {
                    if self.walker.is_visited(&t) {
                        continue;
                    }
                    let view = t.view()?;
                    self.walker.visit(&t, &view)?;
                    tasks.push(Task::Leave);
                    self.enter(view, &mut tasks)?;
                }
            }
        }
        Ok(())
    }

    fn enter(&mut self, view: View<T>, tasks: &mut Vec<Task<T>>) -> Result<()> {
        match view {
            View::Pointer(elem) => {
                if elem.view()?.is_pointer() || is_interface(&elem)? {
                    return Ok(());
                }
                tasks.push(Task::Enter(elem));
            }
            View::Named(named) => {
                // Popped in reverse: the underlying type is walked before the
                // declared methods are recorded.
                tasks.push(Task::Declare(named.methods));
                tasks.push(Task::Enter(named.underlying));
            }
            View::Interface(methods) => {
                for method in methods {
                    self.record(method);
                }
            }
            View::Struct(fields) => {
                let mut embedded = Vec::new();
                for field in fields {
                    self.fields.insert(field.name);
                    if field.embedded {
                        embedded.push(field.ty);
                    }
                }
                tasks.extend(embedded.into_iter().rev().map(Task::Enter));
            }
            _ => {}
        }
        Ok(())
    }

    fn unambiguous(self) -> Vec<Promoted<T>> {
        let mut promoted = Vec::with_capacity(self.methods.len());
        for (name, mut candidates) in self.methods {
            if self.fields.contains(&name) {
                trace!(name, "method shadowed by field");
                continue;
            }
            candidates.sort_by_key(|c| c.depth);
            let unique = candidates.len() == 1 || candidates[0].depth < candidates[1].depth;
            if !unique {
                debug!(name, depth = candidates[0].depth, "ambiguous method dropped");
                continue;
            }
            let best = candidates.swap_remove(0);
            if !best.promotable() {
                trace!(name, "pointer-receiver method unreachable from value");
                continue;
            }
            promoted.push(Promoted {
                method: best.method,
                depth: best.depth,
            });
        }
        promoted.sort_by(|a, b| a.method.name.cmp(&b.method.name));
        promoted
    }
}

/// Depth offset so that methods declared directly on the query (or on the
/// type a pointer query points to) are at depth 0.
fn base_depth<T: Reflect>(query: &T) -> Result<usize> {
    Ok(match query.view()? {
        View::Named(_) => 1,
        View::Pointer(elem) if elem.view()?.is_named() => 1,
        _ => 0,
    })
}

pub(crate) fn resolve_methods<T: Reflect>(query: &T, limit: usize) -> Result<Vec<Promoted<T>>> {
    let mut inspector = Inspector {
        walker: Walker::new(limit),
        base: base_depth(query)?,
        fields: HashSet::new(),
        methods: HashMap::new(),
    };
    inspector.run(query.clone())?;
    Ok(inspector.unambiguous())
}
