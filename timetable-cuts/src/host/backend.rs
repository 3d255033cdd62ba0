//! Host solver trait and cut types.

use crate::error::CutResult;

/// A decision variable of the host's timetabling model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    /// Course taught in a room during a period (binary).
    Assignment {
        period: usize,
        room: usize,
        course: usize,
    },

    /// Days missing from a course's minimum working days.
    MinDayViolations { course: usize },

    /// Isolated lectures of a curriculum on a day.
    IsolatedLectures { curriculum: usize, day: usize },

    /// The host's objective expression.
    Objective,
}

/// Direction of a cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutSense {
    /// a^T x <= rhs
    LessEqual,

    /// a^T x == rhs
    Equal,

    /// a^T x >= rhs
    GreaterEqual,
}

/// Where a cut applies in the host's search tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutScope {
    /// Valid everywhere.
    Global,

    /// Valid in the subtree of the active node only.
    Local,
}

/// Separation routines, for counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CutFamily {
    Objective,
    Clique,
    MinDays,
    Curriculum,
    Pattern,
    Triangle,
}

impl CutFamily {
    /// All families in separation order.
    pub const ALL: [CutFamily; 6] = [
        CutFamily::Objective,
        CutFamily::Clique,
        CutFamily::MinDays,
        CutFamily::Curriculum,
        CutFamily::Pattern,
        CutFamily::Triangle,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CutFamily::Objective => "objective integrality",
            CutFamily::Clique => "clique",
            CutFamily::MinDays => "minimum working days",
            CutFamily::Curriculum => "curriculum sum",
            CutFamily::Pattern => "pattern",
            CutFamily::Triangle => "triangle",
        }
    }
}

/// Source of a cut (for tracking and debugging).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutSource {
    /// Rounded-up objective bound.
    ObjectiveIntegrality,

    /// Pooled clique at a period.
    Clique { period: usize, clique: usize },

    /// Conflict-graph triangle at a period.
    Triangle { period: usize, courses: [usize; 3] },

    /// Lectures of a course on one day.
    MinDays { course: usize, day: usize },

    /// Total lectures of a curriculum.
    CurriculumSum { curriculum: usize },

    /// Isolated-lecture pattern of a curriculum on a day.
    Pattern {
        curriculum: usize,
        day: usize,
        pattern: usize,
    },
}

impl CutSource {
    pub fn family(&self) -> CutFamily {
        match self {
            CutSource::ObjectiveIntegrality => CutFamily::Objective,
            CutSource::Clique { .. } => CutFamily::Clique,
            CutSource::Triangle { .. } => CutFamily::Triangle,
            CutSource::MinDays { .. } => CutFamily::MinDays,
            CutSource::CurriculumSum { .. } => CutFamily::Curriculum,
            CutSource::Pattern { .. } => CutFamily::Pattern,
        }
    }
}

/// A linear cut over host variables: `sum(coef * var) <sense> rhs`.
#[derive(Debug, Clone)]
pub struct LinearCut {
    /// Sparse terms (variable, coefficient).
    pub terms: Vec<(Variable, f64)>,

    /// Direction.
    pub sense: CutSense,

    /// Right-hand side.
    pub rhs: f64,

    /// Global or node-local.
    pub scope: CutScope,

    /// Source of this cut.
    pub source: CutSource,
}

impl LinearCut {
    /// Create a new global cut.
    pub fn new(terms: Vec<(Variable, f64)>, sense: CutSense, rhs: f64, source: CutSource) -> Self {
        Self {
            terms,
            sense,
            rhs,
            scope: CutScope::Global,
            source,
        }
    }

    /// Restrict the cut to the active node.
    pub fn local(mut self) -> Self {
        self.scope = CutScope::Local;
        self
    }

    /// Evaluate `sum(coef * var)`; `None` if any variable has no value.
    pub fn activity(&self, value: impl Fn(Variable) -> Option<f64>) -> Option<f64> {
        let mut lhs = 0.0;
        for &(var, coef) in &self.terms {
            lhs += coef * value(var)?;
        }
        Some(lhs)
    }

    /// Compute violation (positive means violated).
    pub fn violation(&self, value: impl Fn(Variable) -> Option<f64>) -> Option<f64> {
        let lhs = self.activity(value)?;
        Some(match self.sense {
            CutSense::LessEqual => lhs - self.rhs,
            CutSense::GreaterEqual => self.rhs - lhs,
            CutSense::Equal => (lhs - self.rhs).abs(),
        })
    }

    /// Check if cut is violated by more than tolerance.
    pub fn is_violated(&self, value: impl Fn(Variable) -> Option<f64>, tol: f64) -> bool {
        self.violation(value).is_some_and(|v| v > tol)
    }

    pub fn family(&self) -> CutFamily {
        self.source.family()
    }
}

/// Trait for the host MIP solver as seen from inside a separation callback.
///
/// The host owns the search. The core only reads values of the current
/// relaxation and submits cuts; it never branches or solves.
pub trait RelaxationHost {
    /// Value of an assignment variable in the current relaxation.
    fn assignment_value(&self, period: usize, room: usize, course: usize) -> f64;

    /// Value of a course's missing-days variable.
    ///
    /// `None` when the host eliminated the variable in presolve.
    fn min_day_violations_value(&self, course: usize) -> Option<f64>;

    /// Value of a curriculum's isolated-lecture variable on a day.
    ///
    /// `None` when the host eliminated the variable in presolve.
    fn isolated_lectures_value(&self, curriculum: usize, day: usize) -> Option<f64>;

    /// Best bound over all open nodes.
    fn best_global_objective(&self) -> f64;

    /// Relaxation objective at the active node.
    fn current_node_objective(&self) -> f64;

    /// Submit a cut, globally or at the active node per `cut.scope`.
    fn add_cut(&mut self, cut: &LinearCut) -> CutResult<()>;

    /// Value of any variable.
    fn value(&self, var: Variable) -> Option<f64> {
        match var {
            Variable::Assignment {
                period,
                room,
                course,
            } => Some(self.assignment_value(period, room, course)),
            Variable::MinDayViolations { course } => self.min_day_violations_value(course),
            Variable::IsolatedLectures { curriculum, day } => {
                self.isolated_lectures_value(curriculum, day)
            }
            Variable::Objective => Some(self.current_node_objective()),
        }
    }
}
