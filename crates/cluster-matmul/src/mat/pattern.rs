use std::fmt;
use std::str::FromStr;

/// Deterministic operand initialisation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FillPattern {
    /// Every element is 1. With `A = B = ones`, every `C[i][j] == n`.
    #[default]
    Ones,
    /// `((7 * i + 3 * j) % 127) - 63`: asymmetric, covers negative values.
    Ramp,
}

impl FillPattern {
    /// Element at `(i, j)`.
    #[inline]
    pub fn value(&self, i: usize, j: usize) -> i8 {
        match self {
            FillPattern::Ones => 1,
            FillPattern::Ramp => ((7 * i + 3 * j) % 127) as i8 - 63,
        }
    }
}

impl fmt::Display for FillPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillPattern::Ones => f.write_str("ones"),
            FillPattern::Ramp => f.write_str("ramp"),
        }
    }
}

impl FromStr for FillPattern {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ones" => Ok(FillPattern::Ones),
            "ramp" => Ok(FillPattern::Ramp),
            other => Err(format!("unknown fill pattern '{other}' (expected ones or ramp)")),
        }
    }
}
