use std::hash::Hash;

use super::expression::ExpressionSet;

/// The available-expressions lattice.
///
/// `Top` is the empty set: nothing is available. `Bottom` stands for a fact no
/// instruction has produced yet. Under `meet` it behaves as the universal set, so
/// a predecessor without a fact does not constrain the merge. Everywhere else it
/// reads as the empty set, like `Top`: nothing has been computed on a path that
/// was never walked. `Value` holds a concrete set. Meeting is intersection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lattice<T: Eq + Hash> {
    Top,
    Bottom,
    Value(ExpressionSet<T>),
}

impl<T: Eq + Hash + Clone> Lattice<T> {
    // Never mutates its operands; the result is always a fresh value.
    pub fn meet(&self, other: &Self) -> Self {
        match (self, other) {
            (Lattice::Bottom, x) | (x, Lattice::Bottom) => x.clone(),
            (Lattice::Top, _) | (_, Lattice::Top) => Lattice::Top,
            (Lattice::Value(a), Lattice::Value(b)) => Lattice::Value(a.intersection(b)),
        }
    }

    // Folds every fact with `meet`, left to right. No facts at all gives `Bottom`.
    pub fn meet_all<'a, It>(facts: It) -> Self
    where
        It: IntoIterator<Item = &'a Self>,
        T: 'a,
    {
        facts
            .into_iter()
            .fold(Lattice::Bottom, |accumulator, fact| accumulator.meet(fact))
    }

    /// Structural equality, tag first and then value. Used for fixed points.
    pub fn equal(&self, other: &Self) -> bool {
        self == other
    }

    // `self ⊑ other`: everything available under `self` is available under `other`.
    //   This is the order flow functions are monotone in, so it compares what the
    //   facts read as, with Bottom reading as the empty set.
    pub fn le(&self, other: &Self) -> bool {
        match (self, other) {
            (Lattice::Value(a), Lattice::Value(b)) => a.is_subset(b),
            (Lattice::Value(a), Lattice::Top | Lattice::Bottom) => a.is_empty(),
            (Lattice::Top | Lattice::Bottom, _) => true,
        }
    }

    pub fn contains(&self, item: &T) -> bool {
        match self {
            Lattice::Top | Lattice::Bottom => false,
            Lattice::Value(set) => set.contains(item),
        }
    }

    // The concrete set a flow function starts from.
    pub fn concrete(&self) -> ExpressionSet<T> {
        match self {
            Lattice::Value(set) => set.clone(),
            Lattice::Top | Lattice::Bottom => ExpressionSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn set(items: &[u32]) -> Lattice<u32> {
        Lattice::Value(items.iter().cloned().collect())
    }

    fn samples() -> Vec<Lattice<u32>> {
        vec![
            Lattice::Top,
            Lattice::Bottom,
            set(&[]),
            set(&[1]),
            set(&[1, 2]),
            set(&[2, 3]),
            set(&[1, 2, 3]),
        ]
    }

    #[test]
    fn bottom_is_the_meet_identity() {
        for x in samples() {
            assert_eq!(Lattice::Bottom.meet(&x), x);
            assert_eq!(x.meet(&Lattice::Bottom), x);
        }
    }

    #[test]
    fn top_absorbs() {
        for x in samples() {
            assert_eq!(Lattice::Top.meet(&x), Lattice::Top);
            assert_eq!(x.meet(&Lattice::Top), Lattice::Top);
        }
    }

    #[test]
    fn meet_is_commutative_and_associative() {
        let samples = samples();
        for a in &samples {
            for b in &samples {
                assert_eq!(a.meet(b), b.meet(a));
                for c in &samples {
                    assert_eq!(a.meet(b).meet(c), a.meet(&b.meet(c)));
                }
            }
        }
    }

    #[test]
    fn values_intersect() {
        assert_eq!(set(&[1, 2]).meet(&set(&[2, 3])), set(&[2]));
        assert_eq!(set(&[1]).meet(&set(&[3])), set(&[]));
    }

    #[test]
    fn meet_all_folds_every_fact() {
        let facts = vec![set(&[1, 2, 3, 4]), set(&[1, 2, 3]), set(&[2, 3]), set(&[3, 4])];
        assert_eq!(Lattice::meet_all(&facts), set(&[3]));
        assert_eq!(Lattice::<u32>::meet_all(&[]), Lattice::Bottom);
    }

    #[test]
    fn meet_is_a_lower_bound() {
        let samples = samples();
        // Bottom is the identity of meet, so it bounds nothing from above.
        for a in samples.iter().filter(|a| **a != Lattice::Bottom) {
            for b in &samples {
                let m = a.meet(b);
                assert!(m.le(a), "{:?} ⊓ {:?} = {:?}", a, b, m);
            }
        }
    }

    #[test]
    fn bottom_reads_as_nothing_available() {
        assert!(!Lattice::Bottom.contains(&1));
        assert!(Lattice::<u32>::Bottom.le(&Lattice::Top));
        assert!(Lattice::<u32>::Top.le(&Lattice::Bottom));
        assert!(set(&[]).le(&Lattice::Bottom));
        assert!(!set(&[1]).le(&Lattice::Bottom));
        assert!(Lattice::Bottom.le(&set(&[1])));
        assert!(Lattice::<u32>::Bottom.concrete().is_empty());
    }

    #[test]
    fn equality_is_structural() {
        assert!(set(&[1, 2]).equal(&set(&[2, 1])));
        assert!(!set(&[]).equal(&Lattice::Top));
        assert!(!Lattice::<u32>::Top.equal(&Lattice::Bottom));
    }
}
