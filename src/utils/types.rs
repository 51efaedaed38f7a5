use std::ops::Range;

/// Selection of particle types, either a single type, a contiguous range or an explicit list.
///
/// ```rust
/// use rbd::utils::Types;
///
/// let a = Types::from(1usize);
/// let b = Types::from(0..2);
/// assert_eq!(a.to_vec(), vec![1]);
/// assert_eq!(b.to_vec(), vec![0, 1]);
/// assert_eq!(a.product(&b), vec![(1, 0), (1, 1)]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Types {
    One(usize),
    Range(Range<usize>),
    List(Vec<usize>),
}
impl Types {
    pub fn to_vec(&self) -> Vec<usize> {
        match self {
            Types::One(i) => vec![*i],
            Types::Range(r) => r.to_owned().collect(),
            Types::List(l) => l.clone(),
        }
    }
    pub fn max(&self) -> Option<usize> {
        self.to_vec().into_iter().max()
    }
    /// All ordered pairs `(i, j)` with `i` from `self` and `j` from `other`.
    pub fn product(&self, other: &Types) -> Vec<(usize, usize)> {
        let jtypes = other.to_vec();
        self.to_vec()
            .into_iter()
            .flat_map(|i| jtypes.iter().map(move |&j| (i, j)))
            .collect()
    }
}
impl From<Range<usize>> for Types {
    fn from(value: Range<usize>) -> Self {
        Types::Range(value)
    }
}
impl From<usize> for Types {
    fn from(value: usize) -> Self {
        Self::One(value)
    }
}
impl From<Vec<usize>> for Types {
    fn from(value: Vec<usize>) -> Self {
        Self::List(value)
    }
}
impl From<&[usize]> for Types {
    fn from(value: &[usize]) -> Self {
        Self::List(value.to_vec())
    }
}
