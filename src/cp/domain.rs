//! Finite integer domains.

/// The set of values still possible for a variable.
///
/// Stored as a bitset over the fixed range `[base, base + width)` chosen at
/// creation. The range never grows; values can only be removed.
///
/// # Examples
///
/// ```
/// use u_roster::cp::Domain;
///
/// let mut d = Domain::from_values(&[0, 4, 5, 6, 7, 8]);
/// assert_eq!(d.size(), 6);
/// assert!(d.retain(|v| v >= 5));
/// assert_eq!(d.min(), Some(5));
/// assert_eq!(d.max(), Some(8));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    base: i64,
    width: usize,
    words: Vec<u64>,
    size: usize,
}

impl Domain {
    const BITS_PER_WORD: usize = 64;

    /// Widest value range a single domain may span.
    pub const MAX_WIDTH: usize = 1 << 20;

    /// Number of values in `[min, max]`, which must not be inverted.
    pub(crate) fn span(min: i64, max: i64) -> u128 {
        (i128::from(max) - i128::from(min) + 1) as u128
    }

    /// Creates the interval domain `[min, max]`. Empty if `min > max`.
    ///
    /// # Panics
    ///
    /// Panics if the range holds more than [`Domain::MAX_WIDTH`] values; see
    /// [`Domain::try_interval`].
    pub fn interval(min: i64, max: i64) -> Self {
        match Self::try_interval(min, max) {
            Some(domain) => domain,
            None => panic!("domain [{min}, {max}] exceeds {} values", Self::MAX_WIDTH),
        }
    }

    /// Creates the interval domain `[min, max]`, or `None` if the range holds
    /// more than [`Domain::MAX_WIDTH`] values.
    pub fn try_interval(min: i64, max: i64) -> Option<Self> {
        if min > max {
            return Some(Self::empty());
        }
        let width = Self::span(min, max);
        if width > Self::MAX_WIDTH as u128 {
            return None;
        }
        let width = width as usize;
        let mut words = vec![u64::MAX; width.div_ceil(Self::BITS_PER_WORD)];
        let tail = width % Self::BITS_PER_WORD;
        if tail != 0 {
            if let Some(last) = words.last_mut() {
                *last = (1u64 << tail) - 1;
            }
        }
        Some(Self {
            base: min,
            width,
            words,
            size: width,
        })
    }

    /// Creates a domain holding exactly the given values (duplicates ignored).
    ///
    /// # Panics
    ///
    /// Panics if the values span more than [`Domain::MAX_WIDTH`]; see
    /// [`Domain::try_from_values`].
    pub fn from_values(values: &[i64]) -> Self {
        match Self::try_from_values(values) {
            Some(domain) => domain,
            None => panic!("values span more than {} integers", Self::MAX_WIDTH),
        }
    }

    /// Like [`Domain::from_values`], or `None` if the values span more than
    /// [`Domain::MAX_WIDTH`].
    pub fn try_from_values(values: &[i64]) -> Option<Self> {
        let (Some(&min), Some(&max)) = (values.iter().min(), values.iter().max()) else {
            return Some(Self::empty());
        };
        let width = Self::span(min, max);
        if width > Self::MAX_WIDTH as u128 {
            return None;
        }
        let width = width as usize;
        let mut domain = Self {
            base: min,
            width,
            words: vec![0; width.div_ceil(Self::BITS_PER_WORD)],
            size: 0,
        };
        for &v in values {
            let (w, b) = domain.slot(v);
            if domain.words[w] & (1 << b) == 0 {
                domain.words[w] |= 1 << b;
                domain.size += 1;
            }
        }
        Some(domain)
    }

    /// The domain with no values.
    pub fn empty() -> Self {
        Self {
            base: 0,
            width: 0,
            words: Vec::new(),
            size: 0,
        }
    }

    #[inline]
    fn slot(&self, value: i64) -> (usize, usize) {
        let offset = (value - self.base) as usize;
        (offset / Self::BITS_PER_WORD, offset % Self::BITS_PER_WORD)
    }

    #[inline]
    fn in_range(&self, value: i64) -> bool {
        value
            .checked_sub(self.base)
            .is_some_and(|offset| offset >= 0 && (offset as u64) < self.width as u64)
    }

    /// Number of values left.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Whether exactly one value is left.
    #[inline]
    pub fn is_fixed(&self) -> bool {
        self.size == 1
    }

    /// The single remaining value, if the domain is fixed.
    pub fn value(&self) -> Option<i64> {
        if self.is_fixed() {
            self.min()
        } else {
            None
        }
    }

    pub fn contains(&self, value: i64) -> bool {
        if !self.in_range(value) {
            return false;
        }
        let (w, b) = self.slot(value);
        self.words[w] & (1 << b) != 0
    }

    pub fn min(&self) -> Option<i64> {
        self.words.iter().enumerate().find_map(|(i, &word)| {
            (word != 0).then(|| {
                self.base + (i * Self::BITS_PER_WORD) as i64 + word.trailing_zeros() as i64
            })
        })
    }

    pub fn max(&self) -> Option<i64> {
        self.words.iter().enumerate().rev().find_map(|(i, &word)| {
            (word != 0).then(|| {
                self.base
                    + (i * Self::BITS_PER_WORD) as i64
                    + (Self::BITS_PER_WORD - 1 - word.leading_zeros() as usize) as i64
            })
        })
    }

    /// Iterates the remaining values in ascending order.
    pub fn values(&self) -> impl Iterator<Item = i64> + '_ {
        self.words.iter().enumerate().flat_map(move |(i, &word)| {
            let offset = self.base + (i * Self::BITS_PER_WORD) as i64;
            BitIter(word).map(move |b| offset + b as i64)
        })
    }

    /// Removes every value failing `keep`. Returns `true` if anything was removed.
    pub fn retain(&mut self, mut keep: impl FnMut(i64) -> bool) -> bool {
        let before = self.size;
        for i in 0..self.words.len() {
            let word = self.words[i];
            let offset = self.base + (i * Self::BITS_PER_WORD) as i64;
            let mut kept = word;
            for b in BitIter(word) {
                if !keep(offset + b as i64) {
                    kept &= !(1u64 << b);
                }
            }
            if kept != word {
                self.size -= (word.count_ones() - kept.count_ones()) as usize;
                self.words[i] = kept;
            }
        }
        self.size != before
    }

    /// Width of the value range this domain was created over.
    pub fn width(&self) -> usize {
        self.width
    }
}

/// Iterates set bit positions of a word, lowest first.
struct BitIter(u64);

impl Iterator for BitIter {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.0 == 0 {
            return None;
        }
        let b = self.0.trailing_zeros();
        self.0 &= self.0 - 1;
        Some(b)
    }
}
