//! In-memory host holding a fixed fractional point.

use super::backend::{LinearCut, RelaxationHost};
use crate::error::{CutError, CutResult};
use crate::model::Instance;

/// A host with a dense relaxation that records every cut it receives.
///
/// Stands in for a MIP solver when separating offline, e.g. to replay a
/// relaxation exported from a solve or to benchmark separation.
#[derive(Debug, Clone)]
pub struct FixedRelaxation {
    periods: usize,
    rooms: usize,
    courses: usize,
    days: usize,

    /// Assignment values, indexed `(period * rooms + room) * courses + course`.
    x: Vec<f64>,

    /// Missing-days values per course.
    min_day_violations: Vec<Option<f64>>,

    /// Isolated-lecture values, indexed `curriculum * days + day`.
    isolated_lectures: Vec<Option<f64>>,

    global_bound: f64,
    node_bound: f64,

    /// Cuts received, in order.
    cuts: Vec<LinearCut>,

    /// Refuse further cuts.
    closed: bool,
}

impl FixedRelaxation {
    /// All-zero relaxation shaped after an instance.
    pub fn new(instance: &Instance) -> Self {
        let periods = instance.period_count();
        let rooms = instance.room_count();
        let courses = instance.course_count();
        let days = instance.day_count();
        Self {
            periods,
            rooms,
            courses,
            days,
            x: vec![0.0; periods * rooms * courses],
            min_day_violations: vec![Some(0.0); courses],
            isolated_lectures: vec![Some(0.0); instance.curriculum_count() * days],
            global_bound: 0.0,
            node_bound: 0.0,
            cuts: Vec::new(),
            closed: false,
        }
    }

    fn index(&self, period: usize, room: usize, course: usize) -> usize {
        debug_assert!(period < self.periods && room < self.rooms && course < self.courses);
        (period * self.rooms + room) * self.courses + course
    }

    pub fn set_assignment(&mut self, period: usize, room: usize, course: usize, value: f64) {
        let i = self.index(period, room, course);
        self.x[i] = value;
    }

    /// `None` marks the variable as presolved away.
    pub fn set_min_day_violations(&mut self, course: usize, value: Option<f64>) {
        self.min_day_violations[course] = value;
    }

    /// `None` marks the variable as presolved away.
    pub fn set_isolated_lectures(&mut self, curriculum: usize, day: usize, value: Option<f64>) {
        self.isolated_lectures[curriculum * self.days + day] = value;
    }

    pub fn set_bounds(&mut self, global: f64, node: f64) {
        self.global_bound = global;
        self.node_bound = node;
    }

    /// Reject all further cuts, as a host whose model was closed would.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Cuts received so far.
    pub fn cuts(&self) -> &[LinearCut] {
        &self.cuts
    }

    /// Take the received cuts, leaving none.
    pub fn take_cuts(&mut self) -> Vec<LinearCut> {
        std::mem::take(&mut self.cuts)
    }
}

impl RelaxationHost for FixedRelaxation {
    fn assignment_value(&self, period: usize, room: usize, course: usize) -> f64 {
        self.x[self.index(period, room, course)]
    }

    fn min_day_violations_value(&self, course: usize) -> Option<f64> {
        self.min_day_violations.get(course).copied().flatten()
    }

    fn isolated_lectures_value(&self, curriculum: usize, day: usize) -> Option<f64> {
        self.isolated_lectures
            .get(curriculum * self.days + day)
            .copied()
            .flatten()
    }

    fn best_global_objective(&self) -> f64 {
        self.global_bound
    }

    fn current_node_objective(&self) -> f64 {
        self.node_bound
    }

    fn add_cut(&mut self, cut: &LinearCut) -> CutResult<()> {
        if self.closed {
            return Err(CutError::HostRejected(format!(
                "model closed, dropping {:?} cut",
                cut.source
            )));
        }
        self.cuts.push(cut.clone());
        Ok(())
    }
}
