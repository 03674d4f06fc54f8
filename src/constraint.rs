//! Inequality constraints over box points.
//!
//! A constraint maps every point to a residual vector; a point is feasible
//! when all of its residuals are non-negative. Residuals are laid out as
//! `[g(x) - lb, ub - g(x)]`, where `g` is `A·x` for a [`LinearConstraint`]
//! and a user function for a [`NonlinearConstraint`].

use core::fmt;
use std::sync::Arc;

use nalgebra::{DMatrix, DVector};
use ndarray::{Array2, ArrayD, ArrayView2, Axis};

use crate::error::{Error, Result};
use crate::tensor::{split_trailing, DType, Tensor};

/// Function type evaluated by a [`NonlinearConstraint`].
///
/// Receives a `[n, dimension]` batch and must return `[n, 1]`.
pub type ConstraintFunction = Arc<dyn Fn(ArrayView2<'_, f64>) -> Array2<f64> + Send + Sync>;

/// Linear inequality `lb <= A·x <= ub`.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearConstraint {
    a: DMatrix<f64>,
    lb: DVector<f64>,
    ub: DVector<f64>,
}

impl LinearConstraint {
    /// Creates a linear constraint with `A` of shape `[m, dimension]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConstraintShape`] if `lb` or `ub` do not have one
    /// entry per row of `A`.
    ///
    /// # Examples
    ///
    /// ```
    /// use nalgebra::{DMatrix, DVector};
    /// use searchspace::constraint::LinearConstraint;
    ///
    /// let c = LinearConstraint::new(
    ///     DMatrix::identity(2, 2),
    ///     DVector::from_element(2, 0.3),
    ///     DVector::from_element(2, 0.7),
    /// )
    /// .unwrap();
    /// assert_eq!(c.num_rows(), 2);
    /// ```
    pub fn new(a: DMatrix<f64>, lb: DVector<f64>, ub: DVector<f64>) -> Result<Self> {
        if lb.len() != a.nrows() || ub.len() != a.nrows() {
            return Err(Error::ConstraintShape(format!(
                "A has {} rows but lb has {} and ub has {} entries",
                a.nrows(),
                lb.len(),
                ub.len()
            )));
        }
        Ok(Self { a, lb, ub })
    }

    /// The coefficient matrix `A`.
    #[must_use]
    pub fn a(&self) -> &DMatrix<f64> {
        &self.a
    }

    /// The lower bound vector.
    #[must_use]
    pub fn lb(&self) -> &DVector<f64> {
        &self.lb
    }

    /// The upper bound vector.
    #[must_use]
    pub fn ub(&self) -> &DVector<f64> {
        &self.ub
    }

    /// Number of linear inequalities (rows of `A`).
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.a.nrows()
    }

    /// Residuals of shape `[..., 2 * m]`.
    ///
    /// # Errors
    ///
    /// Returns a shape error if the trailing axis of `points` is not the
    /// number of columns of `A`.
    pub fn residual(&self, points: &Tensor) -> Result<Tensor> {
        let batch = split_trailing(points, self.a.ncols())?;
        let (n, d) = batch.rows.dim();
        let x = DMatrix::from_row_iterator(n, d, batch.rows.iter().copied());
        let ax = x * self.a.transpose();

        let m = self.a.nrows();
        let mut out = Vec::with_capacity(n * 2 * m);
        for row in ax.row_iter() {
            out.extend(row.iter().zip(self.lb.iter()).map(|(v, lb)| v - lb));
            out.extend(row.iter().zip(self.ub.iter()).map(|(v, ub)| ub - v));
        }
        batch.unflatten_values(2 * m, out, residual_dtype(points))
    }
}

/// Nonlinear inequality `lb <= fun(x) <= ub` for a scalar-valued `fun`.
#[derive(Clone)]
pub struct NonlinearConstraint {
    fun: ConstraintFunction,
    lb: f64,
    ub: f64,
}

impl NonlinearConstraint {
    /// Creates a nonlinear constraint from a batch function.
    ///
    /// # Examples
    ///
    /// ```
    /// use ndarray::Axis;
    /// use searchspace::constraint::NonlinearConstraint;
    ///
    /// // Points inside the unit disc.
    /// let disc = NonlinearConstraint::new(
    ///     |x| x.map_axis(Axis(1), |p| p.dot(&p)).insert_axis(Axis(1)),
    ///     0.0,
    ///     1.0,
    /// );
    /// assert_eq!(disc.ub(), 1.0);
    /// ```
    pub fn new<F>(fun: F, lb: f64, ub: f64) -> Self
    where
        F: Fn(ArrayView2<'_, f64>) -> Array2<f64> + Send + Sync + 'static,
    {
        Self {
            fun: Arc::new(fun),
            lb,
            ub,
        }
    }

    /// Creates a nonlinear constraint sharing an existing function object.
    #[must_use]
    pub fn from_shared(fun: ConstraintFunction, lb: f64, ub: f64) -> Self {
        Self { fun, lb, ub }
    }

    /// The shared constraint function.
    #[must_use]
    pub fn function(&self) -> &ConstraintFunction {
        &self.fun
    }

    /// The lower bound.
    #[must_use]
    pub fn lb(&self) -> f64 {
        self.lb
    }

    /// The upper bound.
    #[must_use]
    pub fn ub(&self) -> f64 {
        self.ub
    }

    /// Residuals of shape `[..., 2]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MultiOutputConstraint`] if the function does not
    /// return exactly one column per point, or a shape error if `points`
    /// is a scalar.
    pub fn residual(&self, points: &Tensor) -> Result<Tensor> {
        let width = points.shape().last().copied().ok_or(Error::InvalidRank {
            expected: 1,
            shape: Vec::new(),
        })?;
        let batch = split_trailing(points, width)?;
        let values = (self.fun)(batch.rows.view());
        let n = batch.rows.nrows();
        if values.dim() != (n, 1) {
            return Err(Error::MultiOutputConstraint {
                shape: values.shape().to_vec(),
            });
        }
        let mut out = Vec::with_capacity(n * 2);
        for &v in &values {
            out.push(v - self.lb);
            out.push(self.ub - v);
        }
        batch.unflatten_values(2, out, residual_dtype(points))
    }
}

impl fmt::Debug for NonlinearConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NonlinearConstraint")
            .field("fun", &Arc::as_ptr(&self.fun))
            .field("lb", &self.lb)
            .field("ub", &self.ub)
            .finish()
    }
}

/// Two nonlinear constraints are equal when they share one function object.
impl PartialEq for NonlinearConstraint {
    #[allow(clippy::float_cmp)]
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.fun, &other.fun) && self.lb == other.lb && self.ub == other.ub
    }
}

/// Any constraint a [`BoxSpace`](crate::space::BoxSpace) can carry.
#[derive(Clone, Debug, PartialEq)]
pub enum Constraint {
    /// `lb <= A·x <= ub`.
    Linear(LinearConstraint),
    /// `lb <= fun(x) <= ub`.
    Nonlinear(NonlinearConstraint),
}

impl Constraint {
    /// Residuals of this constraint for a batch of points.
    ///
    /// # Errors
    ///
    /// See [`LinearConstraint::residual`] and [`NonlinearConstraint::residual`].
    pub fn residual(&self, points: &Tensor) -> Result<Tensor> {
        match self {
            Self::Linear(c) => c.residual(points),
            Self::Nonlinear(c) => c.residual(points),
        }
    }

    /// Whether each point satisfies this constraint.
    ///
    /// # Errors
    ///
    /// Fails when [`Constraint::residual`] does.
    pub fn is_feasible(&self, points: &Tensor) -> Result<ArrayD<bool>> {
        Ok(all_non_negative(&self.residual(points)?))
    }

    /// The point width this constraint requires, if it fixes one.
    pub(crate) fn input_dimension(&self) -> Option<usize> {
        match self {
            Self::Linear(c) => Some(c.a.ncols()),
            Self::Nonlinear(_) => None,
        }
    }
}

impl From<LinearConstraint> for Constraint {
    fn from(c: LinearConstraint) -> Self {
        Self::Linear(c)
    }
}

impl From<NonlinearConstraint> for Constraint {
    fn from(c: NonlinearConstraint) -> Self {
        Self::Nonlinear(c)
    }
}

/// Collapse the trailing residual axis: `true` where every residual is `>= 0`.
pub(crate) fn all_non_negative(residuals: &Tensor) -> ArrayD<bool> {
    let values = residuals.values();
    let last = Axis(values.ndim().saturating_sub(1));
    values.map_axis(last, |lane| lane.iter().all(|&r| r >= 0.0))
}

fn residual_dtype(points: &Tensor) -> DType {
    if points.dtype().is_floating() {
        points.dtype()
    } else {
        DType::Float64
    }
}
