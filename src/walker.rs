//! Path stack for embedding traversals.

use smallvec::SmallVec;
use typex_host::{Reflect, View};
use typex_types::{Error, Result};

struct Step<T> {
    ty: T,
    named: bool,
    pointer: bool,
}

/// The types on the current traversal path, outermost first.
///
/// A type already on the path is not entered again, which is what stops
/// self-referential embeddings.
pub(crate) struct Walker<T> {
    steps: SmallVec<[Step<T>; 8]>,
    limit: usize,
}

impl<T: Reflect> Walker<T> {
    pub fn new(limit: usize) -> Self {
        Self {
            steps: SmallVec::new(),
            limit,
        }
    }

    pub fn is_visited(&self, t: &T) -> bool {
        self.steps.iter().any(|s| &s.ty == t)
    }

    pub fn visit(&mut self, t: &T, view: &View<T>) -> Result<()> {
        if self.steps.len() >= self.limit {
            return Err(Error::TraversalLimit {
                limit: self.limit,
                at: t.describe(),
            });
        }
        self.steps.push(Step {
            ty: t.clone(),
            named: view.is_named(),
            pointer: view.is_pointer(),
        });
        Ok(())
    }

    pub fn leave(&mut self) {
        self.steps.pop();
    }

    /// Named types crossed on the current path.
    pub fn named_count(&self) -> usize {
        self.steps.iter().filter(|s| s.named).count()
    }

    /// Whether any step on the current path is a pointer.
    pub fn via_pointer(&self) -> bool {
        self.steps.iter().any(|s| s.pointer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typex_host::RuntimeType;
    use typex_types::Basic;

    #[test]
    fn test_walker_path() {
        let int = RuntimeType::basic(Basic::Int);
        let ptr = RuntimeType::pointer(int.clone());
        let mut walker = Walker::new(2);

        walker.visit(&ptr, &ptr.view().unwrap()).unwrap();
        assert!(walker.via_pointer());
        walker.visit(&int, &int.view().unwrap()).unwrap();
        assert!(walker.is_visited(&int));
        assert_eq!(walker.named_count(), 0);

        assert!(matches!(
            walker.visit(&int, &int.view().unwrap()),
            Err(Error::TraversalLimit { limit: 2, .. })
        ));

        walker.leave();
        walker.leave();
        assert!(!walker.is_visited(&int));
        assert!(!walker.via_pointer());
    }
}
