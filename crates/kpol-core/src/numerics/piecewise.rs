use crate::domain::{Categorized, ErrorCategory, KpolError, classify};
use num_complex::Complex64;
use std::fmt::{Debug, Formatter};

pub type Piece<R, A> = Box<dyn Fn(A) -> R + Send + Sync>;

/// Piecewise curve of a real parameter.
pub type PiecewiseCurve = PiecewiseFunction<Complex64, f64>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PiecewiseError {
    #[error("piecewise function needs at least one piece")]
    NoPieces,
    #[error("piecewise function with {pieces} pieces needs {} boundaries, got {boundaries}", .pieces + 1)]
    BoundaryCount { pieces: usize, boundaries: usize },
    #[error("piecewise boundaries must be strictly ascending, index {index} is not above its predecessor")]
    UnsortedBoundaries { index: usize },
    #[error("piecewise function evaluated outside its domain of definition")]
    OutOfDomain,
}

impl Categorized for PiecewiseError {
    fn category(&self) -> ErrorCategory {
        match self {
            Self::OutOfDomain => ErrorCategory::Domain,
            _ => ErrorCategory::Configuration,
        }
    }

    fn placeholder(&self) -> &'static str {
        match self {
            Self::NoPieces => "CONFIG.PIECEWISE_EMPTY",
            Self::BoundaryCount { .. } => "CONFIG.PIECEWISE_BOUNDARY_COUNT",
            Self::UnsortedBoundaries { .. } => "CONFIG.PIECEWISE_UNSORTED",
            Self::OutOfDomain => "DOMAIN.PIECEWISE_RANGE",
        }
    }
}

impl From<PiecewiseError> for KpolError {
    fn from(error: PiecewiseError) -> Self {
        classify(error)
    }
}

/// Piece `i` covers `(boundaries[i], boundaries[i + 1]]`; the first piece
/// also includes `boundaries[0]`.
pub struct PiecewiseFunction<R, A> {
    pieces: Vec<Piece<R, A>>,
    boundaries: Vec<A>,
}

impl<R, A> PiecewiseFunction<R, A>
where
    A: PartialOrd + Copy,
{
    pub fn new(pieces: Vec<Piece<R, A>>, boundaries: Vec<A>) -> Result<Self, PiecewiseError> {
        if pieces.is_empty() {
            return Err(PiecewiseError::NoPieces);
        }
        if boundaries.len() != pieces.len() + 1 {
            return Err(PiecewiseError::BoundaryCount {
                pieces: pieces.len(),
                boundaries: boundaries.len(),
            });
        }
        if let Some(index) = boundaries
            .windows(2)
            .position(|window| !(window[0] < window[1]))
        {
            return Err(PiecewiseError::UnsortedBoundaries { index: index + 1 });
        }

        Ok(Self { pieces, boundaries })
    }

    /// A single piece defined on `[left, right]`.
    pub fn single<F>(function: F, left: A, right: A) -> Result<Self, PiecewiseError>
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        Self::new(vec![Box::new(function)], vec![left, right])
    }

    pub fn evaluate(&self, x: A) -> Result<R, PiecewiseError> {
        let front = self.boundaries[0];
        let back = self.boundaries[self.boundaries.len() - 1];
        if !(front <= x && x <= back) {
            return Err(PiecewiseError::OutOfDomain);
        }

        let index = self.boundaries[1..]
            .iter()
            .position(|boundary| x <= *boundary)
            .ok_or(PiecewiseError::OutOfDomain)?;
        Ok((self.pieces[index])(x))
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece<R, A>> {
        self.pieces.iter()
    }

    pub fn boundaries(&self) -> &[A] {
        &self.boundaries
    }

    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }
}

impl<R, A: Debug> Debug for PiecewiseFunction<R, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PiecewiseFunction")
            .field("pieces", &self.pieces.len())
            .field("boundaries", &self.boundaries)
            .finish()
    }
}
