//! Random instances and relaxations for benchmarking.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use timetable_cuts::{Course, FixedRelaxation, Instance, InstanceBuilder, RelaxationHost, Room};

/// Shape of a random instance.
#[derive(Debug, Clone, Copy)]
pub struct InstanceShape {
    pub courses: usize,
    pub rooms: usize,
    pub days: usize,
    pub periods_per_day: usize,
    pub curricula: usize,
    /// Largest number of courses in one curriculum.
    pub max_curriculum_size: usize,
    pub teachers: usize,
}

impl Default for InstanceShape {
    fn default() -> Self {
        Self {
            courses: 30,
            rooms: 4,
            days: 5,
            periods_per_day: 6,
            curricula: 12,
            max_curriculum_size: 6,
            teachers: 20,
        }
    }
}

/// Generate a random instance.
///
/// Courses get 1-5 lectures spread over at most that many days. Curricula
/// draw distinct courses uniformly; teachers are assigned uniformly, so
/// some of them teach several courses.
pub fn generate_instance(shape: &InstanceShape, seed: u64) -> Result<Instance> {
    anyhow::ensure!(shape.courses > 0, "need at least one course");
    anyhow::ensure!(shape.teachers > 0, "need at least one teacher");

    let mut rng = StdRng::seed_from_u64(seed);
    let mut builder = InstanceBuilder::new(
        format!("random-{}", seed),
        shape.days,
        shape.periods_per_day,
    );

    for c in 0..shape.courses {
        let lectures = rng.gen_range(1..=5u32);
        let min_days = rng.gen_range(1..=lectures.min(shape.days as u32).max(1));
        let teacher = format!("t{:03}", rng.gen_range(0..shape.teachers));
        let students = rng.gen_range(10..=120);
        builder = builder.course(Course::new(
            format!("c{:03}", c),
            teacher,
            lectures,
            min_days,
            students,
        ));
    }

    for r in 0..shape.rooms {
        builder = builder.room(Room::new(format!("r{:02}", r), rng.gen_range(20..=200)));
    }

    let all: Vec<usize> = (0..shape.courses).collect();
    let max_size = shape.max_curriculum_size.clamp(2, shape.courses.max(2));
    for u in 0..shape.curricula {
        let size = rng.gen_range(2..=max_size).min(shape.courses);
        let mut members: Vec<usize> = all.choose_multiple(&mut rng, size).copied().collect();
        members.sort_unstable();
        builder = builder.curriculum(format!("q{:03}", u), members);
    }

    Ok(builder.build()?)
}

/// Random fractional point: each course spreads its lectures over a few
/// random (period, room) slots, each value capped at 1.
pub fn generate_relaxation(instance: &Instance, seed: u64) -> FixedRelaxation {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut host = FixedRelaxation::new(instance);
    let periods = instance.period_count();
    let rooms = instance.room_count();

    if rooms == 0 {
        return host;
    }

    for c in 0..instance.course_count() {
        let lectures = instance.course(c).lectures as f64;
        let slots = rng.gen_range(1..=periods.min(8));
        let mut weights: Vec<f64> = (0..slots).map(|_| rng.gen::<f64>() + 0.1).collect();
        let total: f64 = weights.iter().sum();
        for w in &mut weights {
            *w *= lectures / total;
        }
        for w in weights {
            let p = rng.gen_range(0..periods);
            let r = rng.gen_range(0..rooms);
            let current = host.assignment_value(p, r, c);
            host.set_assignment(p, r, c, (current + w).min(1.0));
        }
    }

    for c in 0..instance.course_count() {
        if rng.gen_bool(0.05) {
            host.set_min_day_violations(c, None);
        } else {
            host.set_min_day_violations(c, Some(rng.gen::<f64>() * 0.5));
        }
    }
    for u in 0..instance.curriculum_count() {
        for d in 0..instance.day_count() {
            host.set_isolated_lectures(u, d, Some(rng.gen::<f64>() * 0.5));
        }
    }

    let bound = rng.gen_range(0.0..50.0);
    host.set_bounds(bound, bound + rng.gen::<f64>() * 2.0);
    host
}
