//! Integration tests for cut separation against an in-memory relaxation.

use std::sync::Arc;
use std::thread;

use timetable_cuts::cuts::CliqueCutId;
use timetable_cuts::{
    static_cuts, Course, CutError, CutFamilies, CutFamily, CutManager, CutScope, CutSense,
    FixedRelaxation, Instance, InstanceBuilder, RelaxationHost, Room, SeparationSettings,
};

fn only(families: CutFamilies) -> SeparationSettings {
    SeparationSettings::default().with_families(families)
}

/// Two courses of 3 and 2 lectures sharing a curriculum.
fn two_course_instance() -> Instance {
    InstanceBuilder::new("two-courses", 2, 3)
        .course(Course::new("algebra", "rossi", 3, 2, 40))
        .course(Course::new("physics", "bianchi", 2, 2, 40))
        .room(Room::new("a1", 50))
        .curriculum("y1", vec![0, 1])
        .build()
        .unwrap()
}

/// Three pairwise conflicting courses, one room.
fn triangle_instance() -> Instance {
    InstanceBuilder::new("triangle", 2, 3)
        .course(Course::new("c0", "t0", 2, 1, 20))
        .course(Course::new("c1", "t1", 2, 1, 20))
        .course(Course::new("c2", "t2", 2, 1, 20))
        .room(Room::new("r0", 30))
        .curriculum("q", vec![0, 1, 2])
        .build()
        .unwrap()
}

/// Clique sum 1.4 at period 0, nothing elsewhere.
fn clique_point(instance: &Instance) -> FixedRelaxation {
    let mut host = FixedRelaxation::new(instance);
    host.set_assignment(0, 0, 0, 0.5);
    host.set_assignment(0, 0, 1, 0.5);
    host.set_assignment(0, 0, 2, 0.4);
    host
}

#[test]
fn test_curriculum_sum_cut() {
    let instance = two_course_instance();
    let mut host = FixedRelaxation::new(&instance);
    // 2.5 + 2.0 = 4.5 lectures assigned, 5 required
    for (period, value) in [(0, 1.0), (1, 0.5), (3, 1.0)] {
        host.set_assignment(period, 0, 0, value);
    }
    host.set_assignment(2, 0, 1, 1.0);
    host.set_assignment(4, 0, 1, 1.0);

    let settings = only(CutFamilies {
        curriculum: true,
        ..CutFamilies::NONE
    });
    let manager = CutManager::new(instance, settings).unwrap();
    let round = manager.separate(&mut host).unwrap();

    assert_eq!(round.count(CutFamily::Curriculum), 1);
    let cut = &host.cuts()[0];
    assert_eq!(cut.sense, CutSense::Equal);
    assert_eq!(cut.rhs, 5.0);
    let violation = cut.violation(|v| host.value(v)).unwrap();
    assert!((violation - 0.5).abs() < 1e-9);
}

#[test]
fn test_curriculum_sum_satisfied() {
    let instance = two_course_instance();
    let mut host = FixedRelaxation::new(&instance);
    for period in [0, 1, 3] {
        host.set_assignment(period, 0, 0, 1.0);
    }
    host.set_assignment(2, 0, 1, 1.0);
    host.set_assignment(4, 0, 1, 1.0);

    let settings = only(CutFamilies {
        curriculum: true,
        ..CutFamilies::NONE
    });
    let manager = CutManager::new(instance, settings).unwrap();
    assert!(!manager.separate(&mut host).unwrap().added_any());
}

#[test]
fn test_clique_cut_added_once() {
    let instance = triangle_instance();
    let mut host = clique_point(&instance);

    let settings = only(CutFamilies {
        clique: true,
        ..CutFamilies::NONE
    });
    let manager = CutManager::new(instance, settings).unwrap();
    assert_eq!(manager.cliques().len(), 1);

    let first = manager.separate(&mut host).unwrap();
    assert_eq!(first.count(CutFamily::Clique), 1);
    assert!(manager
        .clique_cuts()
        .contains(CliqueCutId { period: 0, clique: 0 }));

    let cut = &first.cuts[0];
    assert_eq!(cut.rhs, 1.0);
    assert_eq!(cut.terms.len(), 3);
    let violation = cut.violation(|v| host.value(v)).unwrap();
    assert!((violation - 0.4).abs() < 1e-9);

    let second = manager.separate(&mut host).unwrap();
    assert_eq!(second.count(CutFamily::Clique), 0);
    assert_eq!(host.cuts().len(), 1);
    assert_eq!(manager.stats().clique_cuts_registered, 1);
}

#[test]
fn test_concurrent_rounds_share_clique_pool() {
    let instance = triangle_instance();
    let settings = only(CutFamilies {
        clique: true,
        ..CutFamilies::NONE
    });
    let manager = Arc::new(CutManager::new(instance, settings).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let manager = Arc::clone(&manager);
            thread::spawn(move || {
                let mut host = clique_point(manager.instance());
                manager.separate(&mut host).unwrap().count(CutFamily::Clique)
            })
        })
        .collect();

    let added: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(added, 1);

    let stats = manager.stats();
    assert_eq!(stats.rounds, 4);
    assert_eq!(stats.total_cuts, 1);
    assert_eq!(stats.clique_cuts_registered, 1);
}

#[test]
fn test_triangle_cut_every_round() {
    let instance = triangle_instance();
    let mut host = clique_point(&instance);

    let settings = only(CutFamilies {
        triangles: true,
        ..CutFamilies::NONE
    });
    let manager = CutManager::new(instance, settings).unwrap();

    assert_eq!(manager.separate(&mut host).unwrap().count(CutFamily::Triangle), 1);
    assert_eq!(manager.separate(&mut host).unwrap().count(CutFamily::Triangle), 1);
}

#[test]
fn test_min_days_cut_and_skip() {
    let instance = InstanceBuilder::new("min-days", 3, 3)
        .course(Course::new("c0", "t0", 3, 3, 20))
        .room(Room::new("r0", 30))
        .build()
        .unwrap();
    let settings = only(CutFamilies {
        min_days: true,
        ..CutFamilies::NONE
    });
    let manager = CutManager::new(instance, settings).unwrap();

    // two lectures on day 0, at most one allowed without missing days
    let mut host = FixedRelaxation::new(manager.instance());
    host.set_assignment(0, 0, 0, 1.0);
    host.set_assignment(1, 0, 0, 1.0);

    let round = manager.separate(&mut host).unwrap();
    assert_eq!(round.count(CutFamily::MinDays), 1);
    let cut = &round.cuts[0];
    assert_eq!(cut.rhs, 1.0);
    assert!(cut.violation(|v| host.value(v)).unwrap() > 0.0);

    host.set_min_day_violations(0, Some(1.0));
    assert!(!manager.separate(&mut host).unwrap().added_any());

    host.set_min_day_violations(0, None);
    assert!(!manager.separate(&mut host).unwrap().added_any());
}

#[test]
fn test_pattern_cut_for_isolated_lecture() {
    let instance = two_course_instance();
    let settings = only(CutFamilies {
        patterns: true,
        ..CutFamilies::NONE
    });
    let manager = CutManager::new(instance, settings).unwrap();

    // one lecture in the middle of day 0, none before or after
    let mut host = FixedRelaxation::new(manager.instance());
    host.set_assignment(1, 0, 0, 1.0);

    let round = manager.separate(&mut host).unwrap();
    assert_eq!(round.count(CutFamily::Pattern), 1);

    let cut = &round.cuts[0];
    assert_eq!(cut.sense, CutSense::LessEqual);
    assert_eq!(cut.rhs, 0.0);
    assert!((cut.violation(|v| host.value(v)).unwrap() - 1.0).abs() < 1e-9);

    host.set_isolated_lectures(0, 0, Some(1.0));
    assert!(!manager.separate(&mut host).unwrap().added_any());

    host.set_isolated_lectures(0, 0, None);
    assert!(!manager.separate(&mut host).unwrap().added_any());
}

#[test]
fn test_objective_cuts() {
    let instance = two_course_instance();
    let mut host = FixedRelaxation::new(&instance);
    host.set_bounds(10.3, 11.6);

    let settings = only(CutFamilies {
        objective: true,
        ..CutFamilies::NONE
    });
    let manager = CutManager::new(instance, settings).unwrap();
    let round = manager.separate(&mut host).unwrap();

    assert_eq!(round.len(), 2);
    assert_eq!(round.cuts[0].scope, CutScope::Global);
    assert_eq!(round.cuts[0].rhs, 11.0);
    assert_eq!(round.cuts[1].scope, CutScope::Local);
    assert_eq!(round.cuts[1].rhs, 12.0);

    host.set_bounds(10.3, 10.3);
    let round = manager.separate(&mut host).unwrap();
    assert_eq!(round.len(), 1);
    assert_eq!(round.cuts[0].scope, CutScope::Global);

    host.set_bounds(10.0, 10.995);
    assert!(!manager.separate(&mut host).unwrap().added_any());
}

#[test]
fn test_cuts_violated_at_point() {
    let instance = InstanceBuilder::new("mixed", 3, 4)
        .course(Course::new("c0", "t1", 4, 3, 20))
        .course(Course::new("c1", "t0", 3, 2, 20))
        .course(Course::new("c2", "t2", 5, 3, 20))
        .course(Course::new("c3", "t3", 2, 2, 20))
        .course(Course::new("c4", "t0", 3, 3, 20))
        .room(Room::new("r0", 30))
        .room(Room::new("r1", 30))
        .curriculum("q0", vec![0, 1, 2])
        .curriculum("q1", vec![2, 3, 4])
        .curriculum("q2", vec![0, 3])
        .build()
        .unwrap();
    assert_eq!(instance.curriculum_count(), 4);

    let mut host = FixedRelaxation::new(&instance);
    for p in 0..instance.period_count() {
        for r in 0..instance.room_count() {
            for c in 0..instance.course_count() {
                let value = ((p * 7 + r * 3 + c * 5) % 10) as f64 / 20.0;
                host.set_assignment(p, r, c, value);
            }
        }
    }
    host.set_bounds(3.5, 3.5);

    let manager = CutManager::new(instance, SeparationSettings::default()).unwrap();
    let round = manager.separate(&mut host).unwrap();
    assert!(round.added_any());

    for cut in &round.cuts {
        let violation = cut.violation(|v| host.value(v)).unwrap();
        assert!(violation > 0.0, "{:?} not violated", cut.source);
    }
    let total: usize = round.counts.values().sum();
    assert_eq!(total, round.len());
}

#[test]
fn test_rejected_cut_ends_round() {
    let instance = triangle_instance();
    let mut host = clique_point(&instance);
    host.close();

    let settings = only(CutFamilies {
        clique: true,
        ..CutFamilies::NONE
    });
    let manager = CutManager::new(instance, settings).unwrap();

    let result = manager.separate(&mut host);
    assert!(matches!(result, Err(CutError::HostRejected(_))));
    assert_eq!(manager.stats().total_cuts, 0);
    assert!(host.cuts().is_empty());
    assert!(manager.clique_cuts().is_empty());

    // the rejected clique cut is found again for a host that accepts it
    let mut healthy = clique_point(manager.instance());
    let round = manager.separate(&mut healthy).unwrap();
    assert_eq!(round.count(CutFamily::Clique), 1);
    assert_eq!(healthy.cuts().len(), 1);
    assert_eq!(manager.clique_cuts().len(), 1);
}

#[test]
fn test_short_day_rejected_for_patterns() {
    let instance = InstanceBuilder::new("short", 5, 2)
        .course(Course::new("c0", "t0", 2, 1, 20))
        .course(Course::new("c1", "t1", 2, 1, 20))
        .room(Room::new("r0", 30))
        .curriculum("q", vec![0, 1])
        .build()
        .unwrap();

    let err = CutManager::new(instance.clone(), SeparationSettings::default());
    assert!(matches!(err, Err(CutError::DayTooShort { periods_per_day: 2 })));

    let err = static_cuts(&instance, CutFamilies::ALL);
    assert!(matches!(err, Err(CutError::DayTooShort { periods_per_day: 2 })));

    let settings = SeparationSettings::default().with_level(2);
    assert!(CutManager::new(instance, settings).is_ok());
}

#[test]
fn test_static_cuts_hold_at_integral_schedule() {
    let instance = two_course_instance();
    let mut host = FixedRelaxation::new(&instance);
    // algebra on days 0 and 1, physics on both days, no isolated lectures
    host.set_assignment(0, 0, 0, 1.0);
    host.set_assignment(1, 0, 0, 1.0);
    host.set_assignment(3, 0, 0, 1.0);
    host.set_assignment(2, 0, 1, 1.0);
    host.set_assignment(4, 0, 1, 1.0);

    let cuts = static_cuts(&instance, CutFamilies::ALL).unwrap();
    assert!(!cuts.is_empty());
    for cut in &cuts {
        let violation = cut.violation(|v| host.value(v)).unwrap();
        assert!(violation <= 1e-9, "{:?} violated by {}", cut.source, violation);
    }
}
