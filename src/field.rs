//! Promoted field lookup.

use tracing::{debug, warn};
use typex_host::{FieldView, Reflect, View};
use typex_types::Result;

use crate::walker::Walker;

/// Find the single field of `query` whose name satisfies `matcher`.
///
/// A direct match at a struct wins immediately. Otherwise each embedded
/// field is probed one level deeper and exactly one hit is required; two or
/// more are ambiguous. A pointer query has no fields, and a pointer to a
/// pointer is not traversed.
pub(crate) fn find_field<T: Reflect>(
    query: &T,
    matcher: &dyn Fn(&str) -> bool,
    limit: usize,
) -> Result<Option<FieldView<T>>> {
    let mut walker = Walker::new(limit);
    probe(query, matcher, &mut walker, 0)
}

fn probe<T: Reflect>(
    t: &T,
    matcher: &dyn Fn(&str) -> bool,
    walker: &mut Walker<T>,
    embeds: usize,
) -> Result<Option<FieldView<T>>> {
    if walker.is_visited(t) {
        return Ok(None);
    }
    let view = t.view()?;
    walker.visit(t, &view)?;
    let found = probe_view(view, matcher, walker, embeds);
    walker.leave();
    found
}

fn probe_view<T: Reflect>(
    view: View<T>,
    matcher: &dyn Fn(&str) -> bool,
    walker: &mut Walker<T>,
    embeds: usize,
) -> Result<Option<FieldView<T>>> {
    match view {
        View::Named(named) => probe(&named.underlying, matcher, walker, embeds),
        View::Pointer(elem) => {
            if embeds == 0 || elem.view()?.is_pointer() {
                return Ok(None);
            }
            probe(&elem, matcher, walker, embeds)
        }
        View::Struct(fields) => {
            let mut direct: Option<usize> = None;
            for (i, field) in fields.iter().enumerate() {
                if matcher(&field.name) {
                    if let Some(first) = direct {
                        warn!(first = %fields[first].name, second = %field.name, "field matcher selected two direct fields");
                        return Ok(None);
                    }
                    direct = Some(i);
                }
            }
            if let Some(i) = direct {
                return Ok(fields.into_iter().nth(i));
            }

            let mut promoted = Vec::new();
            for field in fields.iter().filter(|f| f.embedded) {
                if let Some(hit) = probe(&field.ty, matcher, walker, embeds + 1)? {
                    promoted.push(hit);
                }
            }
            if promoted.len() > 1 {
                debug!(candidates = promoted.len(), "ambiguous promoted field");
                return Ok(None);
            }
            Ok(promoted.pop())
        }
        _ => Ok(None),
    }
}
