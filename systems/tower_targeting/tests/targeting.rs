use bloon_defence_core::{Position, TargetPolicy};
use bloon_defence_system_tower_targeting::{Candidate, Seeker, TowerTargeting};

fn bloon(key: u8, position: Position, progress: i64, rbe: u32, camo: bool) -> Candidate<u8> {
    Candidate {
        key,
        position,
        progress,
        rbe,
        camo,
    }
}

fn pool() -> Vec<Candidate<u8>> {
    vec![
        bloon(1, Position::new(110, 100), 4_000, 2, false),
        bloon(2, Position::new(100, 130), 9_000, 1, false),
        bloon(3, Position::new(95, 95), 1_000, 11, false),
        bloon(4, Position::new(100, 101), 20_000, 47, true),
        bloon(5, Position::new(300, 100), 50_000, 616, false),
    ]
}

fn tower(camo_vision: bool) -> Seeker {
    Seeker {
        position: Position::new(100, 100),
        range: 40,
        camo_vision,
    }
}

#[test]
fn each_policy_picks_its_preferred_bloon() {
    let mut targeting = TowerTargeting::new();
    let expected = [
        (TargetPolicy::First, 2),
        (TargetPolicy::Last, 3),
        (TargetPolicy::Strong, 3),
        (TargetPolicy::Close, 3),
    ];

    for (policy, key) in expected {
        let chosen = targeting.select(&tower(false), policy, pool());
        assert_eq!(chosen.map(|c| c.key), Some(key), "{policy:?}");
    }
}

#[test]
fn camo_bloons_need_camo_vision() {
    let mut targeting = TowerTargeting::new();

    let blind = targeting.select(&tower(false), TargetPolicy::Close, pool());
    assert_eq!(blind.map(|c| c.key), Some(3));

    let sighted = targeting.select(&tower(true), TargetPolicy::Close, pool());
    assert_eq!(sighted.map(|c| c.key), Some(4));

    let furthest = targeting.select(&tower(true), TargetPolicy::First, pool());
    assert_eq!(furthest.map(|c| c.key), Some(4));
}

#[test]
fn bloons_out_of_range_are_never_chosen() {
    let mut targeting = TowerTargeting::new();
    let far_only = vec![bloon(9, Position::new(200, 200), 1, 1, false)];
    assert_eq!(
        targeting.select(&tower(true), TargetPolicy::First, far_only),
        None
    );
}

#[test]
fn in_range_lists_eligible_bloons_in_encounter_order() {
    let mut targeting = TowerTargeting::new();
    let mut out = Vec::new();
    targeting.in_range(&tower(false), pool(), &mut out);
    let keys: Vec<u8> = out.iter().map(|c| c.key).collect();
    assert_eq!(keys, vec![1, 2, 3]);
}

#[test]
fn nearest_respects_the_search_radius() {
    let mut targeting = TowerTargeting::new();
    let homing = Seeker {
        position: Position::new(0, 0),
        range: 30,
        camo_vision: false,
    };
    let far = vec![bloon(1, Position::new(40, 0), 0, 1, false)];
    assert_eq!(targeting.nearest(&homing, far), None);

    let near = vec![
        bloon(1, Position::new(25, 0), 0, 1, false),
        bloon(2, Position::new(0, 20), 0, 1, false),
    ];
    assert_eq!(targeting.nearest(&homing, near).map(|c| c.key), Some(2));
}
