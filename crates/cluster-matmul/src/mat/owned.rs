//! Owned matrix types.

use std::ops::{Index, IndexMut};

use super::FillPattern;
use crate::error::{MatmulError, Result};

/// Owned square matrix of `i8` operands, row-major.
///
/// ```
/// use cluster_matmul::MatI8;
///
/// let ones = MatI8::filled(4, 1);
/// assert_eq!(ones[(3, 3)], 1);
///
/// let custom = MatI8::from_fn(2, |i, j| (i * 2 + j) as i8);
/// assert_eq!(custom.as_slice(), &[0, 1, 2, 3]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatI8 {
    data: Vec<i8>,
    n: usize,
}

impl MatI8 {
    /// Create an `n x n` matrix with every element set to `value`.
    pub fn filled(n: usize, value: i8) -> Self {
        Self {
            data: vec![value; n * n],
            n,
        }
    }

    /// Create a matrix from a function called with `(row, col)`.
    pub fn from_fn<F>(n: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> i8,
    {
        let data = (0..n * n).map(|idx| f(idx / n, idx % n)).collect();
        Self { data, n }
    }

    /// Create a matrix initialised from a [`FillPattern`].
    pub fn from_pattern(n: usize, pattern: FillPattern) -> Self {
        Self::from_fn(n, |i, j| pattern.value(i, j))
    }

    /// Create a matrix from row-major data of length `n * n`.
    pub fn from_vec(data: Vec<i8>, n: usize) -> Result<Self> {
        if data.len() != n * n {
            return Err(MatmulError::DimensionMismatch(format!(
                "data length {} != {n} * {n}",
                data.len()
            )));
        }
        Ok(Self { data, n })
    }

    /// Overwrite every element from a [`FillPattern`].
    pub fn fill(&mut self, pattern: FillPattern) {
        let n = self.n;
        for (idx, v) in self.data.iter_mut().enumerate() {
            *v = pattern.value(idx / n, idx % n);
        }
    }

    /// Copy of the transposed matrix.
    pub fn transposed(&self) -> Self {
        let n = self.n;
        Self::from_fn(n, |i, j| self.data[j * n + i])
    }

    /// Matrix dimension.
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn as_slice(&self) -> &[i8] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [i8] {
        &mut self.data
    }

    /// Row `i` as a slice.
    #[inline]
    pub fn row(&self, i: usize) -> &[i8] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    pub fn into_vec(self) -> Vec<i8> {
        self.data
    }
}

impl Index<(usize, usize)> for MatI8 {
    type Output = i8;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &i8 {
        &self.data[i * self.n + j]
    }
}

impl IndexMut<(usize, usize)> for MatI8 {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut i8 {
        &mut self.data[i * self.n + j]
    }
}

/// Owned square matrix of `i32` accumulators, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatI32 {
    data: Vec<i32>,
    n: usize,
}

impl MatI32 {
    /// Create an `n x n` matrix of zeros.
    pub fn zeros(n: usize) -> Self {
        Self {
            data: vec![0; n * n],
            n,
        }
    }

    /// Reference product `A * B` computed on the calling thread.
    pub fn reference_product(a: &MatI8, b: &MatI8) -> Result<Self> {
        if a.n() != b.n() {
            return Err(MatmulError::DimensionMismatch(format!(
                "A is {0}x{0}, B is {1}x{1}",
                a.n(),
                b.n()
            )));
        }
        let n = a.n();
        let mut c = Self::zeros(n);
        for i in 0..n {
            for j in 0..n {
                c.data[i * n + j] = (0..n).fold(0i32, |acc, k| {
                    acc.wrapping_add(a[(i, k)] as i32 * b[(k, j)] as i32)
                });
            }
        }
        Ok(c)
    }

    /// Matrix dimension.
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn as_slice(&self) -> &[i32] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [i32] {
        &mut self.data
    }

    /// Number of elements that differ from `other`.
    pub fn count_mismatches(&self, other: &MatI32) -> usize {
        self.data
            .iter()
            .zip(&other.data)
            .filter(|(x, y)| x != y)
            .count()
            + self.data.len().abs_diff(other.data.len())
    }

    /// Sum of all elements.
    pub fn checksum(&self) -> i64 {
        self.data.iter().map(|&v| v as i64).sum()
    }

    pub fn into_vec(self) -> Vec<i32> {
        self.data
    }
}

impl Index<(usize, usize)> for MatI32 {
    type Output = i32;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &i32 {
        &self.data[i * self.n + j]
    }
}

impl IndexMut<(usize, usize)> for MatI32 {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut i32 {
        &mut self.data[i * self.n + j]
    }
}
