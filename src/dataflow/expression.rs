use fnv::FnvHashSet;

use std::fmt::Debug;
use std::hash::Hash;

/// An operation keyed by opcode and operand identities, e.g. `add(a, b)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Expression<O, V> {
    pub op: O,
    pub operands: Vec<V>,
}

impl<O, V: PartialEq> Expression<O, V> {
    pub fn new(op: O, operands: Vec<V>) -> Self {
        Expression { op, operands }
    }

    pub fn reads(&self, var: &V) -> bool {
        self.operands.contains(var)
    }
}

/// One computed expression, together with the variable that holds its value.
///
/// Two computations of the same expression into different variables are
/// different identities: after `t1 = a + b; a = 5; t2 = a + b` the available
/// `a + b` is the one in `t2`, not the one in `t1`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AvailableExpression<O, V> {
    pub expression: Expression<O, V>,
    pub holder: V,
    pub reads_memory: bool,
}

impl<O, V: PartialEq> AvailableExpression<O, V> {
    pub fn pure(expression: Expression<O, V>, holder: V) -> Self {
        AvailableExpression { expression, holder, reads_memory: false }
    }

    pub fn load(expression: Expression<O, V>, holder: V) -> Self {
        AvailableExpression { expression, holder, reads_memory: true }
    }

    // Redefining `var` invalidates anything computed from it, and anything stored in it.
    pub fn depends_on(&self, var: &V) -> bool {
        self.holder == *var || self.expression.reads(var)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpressionSet<T: Eq + Hash> {
    items: FnvHashSet<T>,
}

impl<T: Eq + Hash> Default for ExpressionSet<T> {
    fn default() -> Self {
        ExpressionSet { items: FnvHashSet::default() }
    }
}

impl<T: Eq + Hash + Clone> ExpressionSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, item: T) -> bool {
        self.items.insert(item)
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn retain<F: FnMut(&T) -> bool>(&mut self, f: F) {
        self.items.retain(f)
    }

    pub fn union(&self, other: &Self) -> Self {
        ExpressionSet { items: self.items.union(&other.items).cloned().collect() }
    }

    pub fn intersection(&self, other: &Self) -> Self {
        ExpressionSet { items: self.items.intersection(&other.items).cloned().collect() }
    }

    pub fn is_subset(&self, other: &Self) -> bool {
        self.items.is_subset(&other.items)
    }
}

impl<T: Eq + Hash> FromIterator<T> for ExpressionSet<T> {
    fn from_iter<It: IntoIterator<Item = T>>(iter: It) -> Self {
        ExpressionSet { items: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holder_and_operands_both_count_as_dependencies() {
        let sum = AvailableExpression::pure(Expression::new('+', vec!["a", "b"]), "t1");
        assert!(sum.depends_on(&"a"));
        assert!(sum.depends_on(&"b"));
        assert!(sum.depends_on(&"t1"));
        assert!(!sum.depends_on(&"c"));
    }

    #[test]
    fn set_operations() {
        let left: ExpressionSet<u32> = [1, 2, 3].iter().cloned().collect();
        let right: ExpressionSet<u32> = [2, 3, 4].iter().cloned().collect();

        let expected: ExpressionSet<u32> = [2, 3].iter().cloned().collect();

        let both = left.intersection(&right);
        assert_eq!(both, expected);
        assert!(both.is_subset(&left));
        assert!(both.is_subset(&right));
        assert_eq!(left.union(&right).len(), 4);
        assert!(!left.contains(&4));
    }
}
