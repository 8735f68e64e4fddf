//! Stack of open elements.

use super::arena::NodeIndex;
use super::elements::is_scope_boundary;
use crate::html5::shared::Atom;

/// Entry in the stack of open elements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct OpenElement {
    pub(crate) index: NodeIndex,
    pub(crate) name: Atom,
}

/// How far down the stack an end tag may reach.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ScopeKind {
    /// HTML "in scope": stops at scoping elements such as `table` or `td`.
    InScope,
    /// Any open element matches (XML).
    Unbounded,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct OpenElementsStack {
    items: Vec<OpenElement>,
    max_depth: usize,
}

impl OpenElementsStack {
    pub(crate) fn push(&mut self, entry: OpenElement) {
        self.items.push(entry);
        self.max_depth = self.max_depth.max(self.items.len());
    }

    pub(crate) fn current(&self) -> Option<&OpenElement> {
        self.items.last()
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub(crate) fn has_in_scope(&self, target: &Atom, kind: ScopeKind) -> bool {
        self.find_in_scope(target, kind).is_some()
    }

    /// Removes elements from the top down to and including `target` when it is
    /// visible in the requested scope. Returns the matched element and how
    /// many elements above it were closed implicitly.
    pub(crate) fn pop_until_including(
        &mut self,
        target: &Atom,
        kind: ScopeKind,
    ) -> Option<(OpenElement, usize)> {
        let match_index = self.find_in_scope(target, kind)?;
        let implicitly_closed = self.items.len() - match_index - 1;
        self.items.truncate(match_index + 1);
        self.items.pop().map(|entry| (entry, implicitly_closed))
    }

    /// Close everything, innermost first.
    pub(crate) fn drain(&mut self) -> impl Iterator<Item = OpenElement> + '_ {
        self.items.drain(..).rev()
    }

    #[cfg(test)]
    pub(crate) fn names(&self) -> Vec<&str> {
        self.items.iter().map(|entry| entry.name.as_str()).collect()
    }

    fn find_in_scope(&self, target: &Atom, kind: ScopeKind) -> Option<usize> {
        for index in (0..self.items.len()).rev() {
            let name = &self.items[index].name;
            if name == target {
                return Some(index);
            }
            if kind == ScopeKind::InScope && is_scope_boundary(name.as_str()) {
                return None;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::{OpenElement, OpenElementsStack, ScopeKind};
    use crate::html5::shared::AtomTable;

    fn stack_of(atoms: &mut AtomTable, names: &[&str]) -> OpenElementsStack {
        let mut stack = OpenElementsStack::default();
        for (index, name) in names.iter().enumerate() {
            stack.push(OpenElement {
                index: index + 1,
                name: atoms.intern_ascii_folded(name),
            });
        }
        stack
    }

    #[test]
    fn push_pop_and_current_are_deterministic() {
        let mut atoms = AtomTable::new();
        let mut stack = stack_of(&mut atoms, &["div", "span"]);
        assert_eq!(stack.current().map(|e| e.index), Some(2));
        let div = atoms.intern_ascii_folded("div");
        let (popped, implicit) = stack
            .pop_until_including(&div, ScopeKind::InScope)
            .expect("div is open");
        assert_eq!(popped.index, 1);
        assert_eq!(implicit, 1);
        assert!(stack.current().is_none());
        assert_eq!(stack.max_depth(), 2);
    }

    #[test]
    fn scope_boundaries_hide_outer_elements() {
        let mut atoms = AtomTable::new();
        let stack = stack_of(&mut atoms, &["div", "table", "span"]);
        let div = atoms.intern_ascii_folded("div");
        let span = atoms.intern_ascii_folded("span");
        assert!(stack.has_in_scope(&span, ScopeKind::InScope));
        assert!(!stack.has_in_scope(&div, ScopeKind::InScope));
        assert!(stack.has_in_scope(&div, ScopeKind::Unbounded));
    }

    #[test]
    fn missing_target_leaves_stack_untouched() {
        let mut atoms = AtomTable::new();
        let mut stack = stack_of(&mut atoms, &["ul", "li"]);
        let p = atoms.intern_ascii_folded("p");
        assert!(stack.pop_until_including(&p, ScopeKind::Unbounded).is_none());
        assert_eq!(stack.names(), vec!["ul", "li"]);
    }

    #[test]
    fn drain_closes_innermost_first() {
        let mut atoms = AtomTable::new();
        let mut stack = stack_of(&mut atoms, &["a", "b", "c"]);
        let order: Vec<_> = stack.drain().map(|e| e.index).collect();
        assert_eq!(order, vec![3, 2, 1]);
        assert_eq!(stack.len(), 0);
    }
}
