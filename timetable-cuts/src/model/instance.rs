//! Timetabling instance representation.

use std::collections::{BTreeMap, HashSet};

use crate::error::{CutError, CutResult};

/// A course with its teaching requirements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    /// Course name.
    pub name: String,

    /// Teacher name. Courses sharing a teacher conflict.
    pub teacher: String,

    /// Number of lectures to schedule.
    pub lectures: u32,

    /// Minimum number of distinct teaching days.
    pub min_working_days: u32,

    /// Enrolled students.
    pub students: u32,
}

impl Course {
    /// Create a new course.
    pub fn new(
        name: impl Into<String>,
        teacher: impl Into<String>,
        lectures: u32,
        min_working_days: u32,
        students: u32,
    ) -> Self {
        Self {
            name: name.into(),
            teacher: teacher.into(),
            lectures,
            min_working_days,
            students,
        }
    }
}

/// A room with its seating capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    /// Room name.
    pub name: String,

    /// Seats.
    pub capacity: u32,
}

impl Room {
    /// Create a new room.
    pub fn new(name: impl Into<String>, capacity: u32) -> Self {
        Self {
            name: name.into(),
            capacity,
        }
    }
}

/// A group of courses that must never share a period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Curriculum {
    /// Curriculum name (the teacher's name for synthetic curricula).
    pub name: String,

    /// Member course indices.
    pub courses: Vec<usize>,

    /// Derived from a shared teacher rather than declared.
    pub synthetic: bool,
}

/// A course that cannot be taught in a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Restriction {
    /// Course index.
    pub course: usize,

    /// Absolute period index.
    pub period: usize,
}

/// Read-only curriculum-based timetabling instance.
///
/// Declared curricula come first and are the "proper" ones; synthetic
/// curricula for teachers with several courses follow them.
#[derive(Debug, Clone)]
pub struct Instance {
    name: String,
    days: usize,
    periods_per_day: usize,
    courses: Vec<Course>,
    rooms: Vec<Room>,
    curricula: Vec<Curriculum>,
    proper_curricula: usize,
    restrictions: Vec<Restriction>,
}

impl Instance {
    /// Instance name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn course_count(&self) -> usize {
        self.courses.len()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn period_count(&self) -> usize {
        self.days * self.periods_per_day
    }

    pub fn day_count(&self) -> usize {
        self.days
    }

    pub fn periods_per_day(&self) -> usize {
        self.periods_per_day
    }

    /// Number of curricula, synthetic ones included.
    pub fn curriculum_count(&self) -> usize {
        self.curricula.len()
    }

    /// Number of declared curricula.
    pub fn proper_curriculum_count(&self) -> usize {
        self.proper_curricula
    }

    pub fn restriction_count(&self) -> usize {
        self.restrictions.len()
    }

    /// Total lectures over all courses.
    pub fn lecture_count(&self) -> u64 {
        self.courses.iter().map(|c| c.lectures as u64).sum()
    }

    pub fn course(&self, course: usize) -> &Course {
        &self.courses[course]
    }

    pub fn room(&self, room: usize) -> &Room {
        &self.rooms[room]
    }

    pub fn curriculum(&self, curriculum: usize) -> &Curriculum {
        &self.curricula[curriculum]
    }

    pub fn restriction(&self, restriction: usize) -> &Restriction {
        &self.restrictions[restriction]
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn curricula(&self) -> &[Curriculum] {
        &self.curricula
    }

    /// Declared curricula only.
    pub fn proper_curricula(&self) -> &[Curriculum] {
        &self.curricula[..self.proper_curricula]
    }

    /// Absolute period of a slot within a day.
    pub fn period_of(&self, day: usize, slot: usize) -> usize {
        day * self.periods_per_day + slot
    }

    /// Absolute periods of a day, in order.
    pub fn day_periods(&self, day: usize) -> std::ops::Range<usize> {
        let start = day * self.periods_per_day;
        start..start + self.periods_per_day
    }

    /// Lectures a curriculum must hold in total.
    pub fn curriculum_lectures(&self, curriculum: usize) -> u64 {
        self.curricula[curriculum]
            .courses
            .iter()
            .map(|&c| self.courses[c].lectures as u64)
            .sum()
    }
}

/// Builder for [`Instance`].
#[derive(Debug, Clone, Default)]
pub struct InstanceBuilder {
    name: String,
    days: usize,
    periods_per_day: usize,
    courses: Vec<Course>,
    rooms: Vec<Room>,
    curricula: Vec<(String, Vec<usize>)>,
    restrictions: Vec<(usize, usize, usize)>,
}

impl InstanceBuilder {
    /// Start an instance with the given day geometry.
    pub fn new(name: impl Into<String>, days: usize, periods_per_day: usize) -> Self {
        Self {
            name: name.into(),
            days,
            periods_per_day,
            ..Default::default()
        }
    }

    /// Add a course. Its index is the number of courses added before it.
    pub fn course(mut self, course: Course) -> Self {
        self.courses.push(course);
        self
    }

    /// Add a room.
    pub fn room(mut self, room: Room) -> Self {
        self.rooms.push(room);
        self
    }

    /// Declare a curriculum over course indices.
    pub fn curriculum(mut self, name: impl Into<String>, courses: Vec<usize>) -> Self {
        self.curricula.push((name.into(), courses));
        self
    }

    /// Forbid a course in a slot of a day.
    pub fn restriction(mut self, course: usize, day: usize, slot: usize) -> Self {
        self.restrictions.push((course, day, slot));
        self
    }

    /// Validate and build the instance.
    pub fn build(self) -> CutResult<Instance> {
        if self.days == 0 || self.periods_per_day == 0 {
            return Err(CutError::InvalidInstance(format!(
                "{} days with {} periods per day",
                self.days, self.periods_per_day
            )));
        }

        let n = self.courses.len();
        let mut curricula = Vec::with_capacity(self.curricula.len());
        for (name, courses) in self.curricula {
            let mut seen = HashSet::with_capacity(courses.len());
            for &c in &courses {
                if c >= n {
                    return Err(CutError::InvalidInstance(format!(
                        "Curriculum {} refers to course {} but only {} courses",
                        name, c, n
                    )));
                }
                if !seen.insert(c) {
                    return Err(CutError::InvalidInstance(format!(
                        "Curriculum {} lists course {} twice",
                        name, c
                    )));
                }
            }
            // A single course conflicts with nothing
            if courses.len() >= 2 {
                curricula.push(Curriculum {
                    name,
                    courses,
                    synthetic: false,
                });
            }
        }
        let proper_curricula = curricula.len();

        let mut teaches: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (i, course) in self.courses.iter().enumerate() {
            teaches.entry(course.teacher.as_str()).or_default().push(i);
        }
        for (teacher, courses) in teaches {
            if courses.len() > 1 {
                curricula.push(Curriculum {
                    name: teacher.to_string(),
                    courses,
                    synthetic: true,
                });
            }
        }

        let mut restrictions = Vec::with_capacity(self.restrictions.len());
        for (course, day, slot) in self.restrictions {
            if course >= n || day >= self.days || slot >= self.periods_per_day {
                return Err(CutError::InvalidInstance(format!(
                    "Restriction (course {}, day {}, slot {}) out of range",
                    course, day, slot
                )));
            }
            restrictions.push(Restriction {
                course,
                period: day * self.periods_per_day + slot,
            });
        }

        log::info!(
            "Instance {}: {} courses, {} lectures, {} curricula ({} declared)",
            self.name,
            n,
            self.courses.iter().map(|c| c.lectures as u64).sum::<u64>(),
            curricula.len(),
            proper_curricula
        );

        Ok(Instance {
            name: self.name,
            days: self.days,
            periods_per_day: self.periods_per_day,
            courses: self.courses,
            rooms: self.rooms,
            curricula,
            proper_curricula,
            restrictions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> InstanceBuilder {
        InstanceBuilder::new("small", 2, 3)
            .course(Course::new("c0", "alice", 3, 2, 30))
            .course(Course::new("c1", "bob", 2, 2, 20))
            .course(Course::new("c2", "alice", 1, 1, 10))
            .room(Room::new("r0", 25))
    }

    #[test]
    fn test_geometry() {
        let inst = small().build().unwrap();
        assert_eq!(inst.period_count(), 6);
        assert_eq!(inst.period_of(1, 2), 5);
        assert_eq!(inst.day_periods(1), 3..6);
        assert_eq!(inst.lecture_count(), 6);
    }

    #[test]
    fn test_synthetic_teacher_curricula() {
        let inst = small().curriculum("y1", vec![0, 1]).build().unwrap();

        assert_eq!(inst.proper_curriculum_count(), 1);
        assert_eq!(inst.curriculum_count(), 2);

        let synthetic = inst.curriculum(1);
        assert!(synthetic.synthetic);
        assert_eq!(synthetic.name, "alice");
        assert_eq!(synthetic.courses, vec![0, 2]);
        assert_eq!(inst.curriculum_lectures(1), 4);
    }

    #[test]
    fn test_singleton_curriculum_dropped() {
        let inst = small()
            .curriculum("lonely", vec![1])
            .curriculum("y1", vec![0, 1])
            .build()
            .unwrap();
        assert_eq!(inst.proper_curriculum_count(), 1);
        assert_eq!(inst.proper_curricula()[0].name, "y1");
    }

    #[test]
    fn test_out_of_range_course_rejected() {
        let err = small().curriculum("bad", vec![0, 7]).build().unwrap_err();
        assert!(matches!(err, CutError::InvalidInstance(_)));
    }

    #[test]
    fn test_duplicate_member_rejected() {
        let err = small().curriculum("dup", vec![0, 0]).build().unwrap_err();
        assert!(matches!(err, CutError::InvalidInstance(_)));
    }

    #[test]
    fn test_restriction_period() {
        let inst = small().restriction(1, 1, 0).build().unwrap();
        assert_eq!(inst.restriction(0).period, 3);

        let err = small().restriction(1, 2, 0).build().unwrap_err();
        assert!(matches!(err, CutError::InvalidInstance(_)));
    }

    #[test]
    fn test_empty_geometry_rejected() {
        assert!(InstanceBuilder::new("empty", 0, 4).build().is_err());
        assert!(InstanceBuilder::new("empty", 5, 0).build().is_err());
    }
}
