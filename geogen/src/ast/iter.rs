//! Iteration over the internal objects of a configuration object: the
//! transitive closure of its argument subtrees, deduplicated.

use super::{ConfigObject, Configuration, ObjectId};
use indexmap::IndexSet;

/// An iterator over an object and everything it is built from. Yields each
/// object exactly once, in depth-first order starting from the root.
pub struct InternalObjects<'a> {
    config: &'a Configuration,
    stack: Vec<ObjectId>,
    seen: IndexSet<ObjectId>,
}

impl<'a> Iterator for InternalObjects<'a> {
    type Item = ObjectId;

    fn next(&mut self) -> Option<ObjectId> {
        loop {
            let id = self.stack.pop()?;
            if !self.seen.insert(id) {
                continue;
            }
            if let ConfigObject::Constructed(c) = self.config.get(id) {
                for arg in c.args.iter().rev() {
                    for inner in arg.objects().into_iter().rev() {
                        self.stack.push(inner);
                    }
                }
            }
            return Some(id);
        }
    }
}

impl Configuration {
    /// The internal objects of `root`: itself plus the transitive closure of
    /// its arguments.
    pub fn internal_objects(&self, root: ObjectId) -> InternalObjects {
        InternalObjects {
            config: self,
            stack: vec![root],
            seen: IndexSet::new(),
        }
    }

    /// The closure of a set of objects under argument dependency. Used to
    /// decide whether a theorem is definable in a simpler sub-configuration.
    pub fn dependency_closure(
        &self,
        roots: impl IntoIterator<Item = ObjectId>,
    ) -> IndexSet<ObjectId> {
        let mut closure = IndexSet::new();
        for root in roots {
            for id in self.internal_objects(root) {
                closure.insert(id);
            }
        }
        closure
    }
}
