//! Tests for eviction policies

use super::*;
use lumen_config::EvictionPolicyKind;

fn any(_: &str) -> bool {
    true
}

#[test]
fn test_lru_eviction() {
    let mut policy = LruPolicy::new();

    policy.on_put("a");
    policy.on_put("b");
    policy.on_put("c");

    // Should evict 'a' (least recently used)
    assert_eq!(policy.select_eviction_candidate(&any), Some("a".to_string()));

    // Access 'a' to make it more recent
    policy.on_access("a");
    assert_eq!(policy.select_eviction_candidate(&any), Some("b".to_string()));

    policy.on_remove("b");
    assert_eq!(policy.select_eviction_candidate(&any), Some("c".to_string()));
    assert_eq!(policy.len(), 2);
}

#[test]
fn test_lru_respects_eligibility() {
    let mut policy = LruPolicy::new();
    for key in ["a", "b", "c", "d"] {
        policy.on_put(key);
    }

    let only_odd = |k: &str| k == "b" || k == "d";
    assert_eq!(policy.select_eviction_candidate(&only_odd), Some("b".to_string()));
    assert_eq!(policy.select_eviction_candidate(&|_: &str| false), None);
}

#[test]
fn test_lru_access_of_unknown_key_is_ignored() {
    let mut policy = LruPolicy::new();
    policy.on_access("ghost");
    assert!(policy.is_empty());
    assert!(policy.last_access("ghost").is_none());
}

#[test]
fn test_lfu_eviction() {
    let mut policy = LfuPolicy::new();

    policy.on_put("a");
    policy.on_put("b");
    policy.on_put("c");

    // Access 'a' and 'b' more frequently
    policy.on_access("a");
    policy.on_access("a");
    policy.on_access("b");

    assert_eq!(policy.frequency("a"), Some(3));
    assert_eq!(policy.select_eviction_candidate(&any), Some("c".to_string()));
}

#[test]
fn test_lfu_ties_break_by_insertion_order() {
    let mut policy = LfuPolicy::new();
    policy.on_put("x");
    policy.on_put("y");
    policy.on_put("z");

    assert_eq!(policy.select_eviction_candidate(&any), Some("x".to_string()));

    // Re-putting counts as an access
    policy.on_put("x");
    assert_eq!(policy.frequency("x"), Some(2));
    assert_eq!(policy.select_eviction_candidate(&any), Some("y".to_string()));

    // Repeated calls give the same answer
    for _ in 0..5 {
        assert_eq!(policy.select_eviction_candidate(&any), Some("y".to_string()));
    }
}

#[test]
fn test_lfu_clear_forgets_counts() {
    let mut policy = LfuPolicy::new();
    policy.on_put("k");
    policy.on_access("k");
    policy.clear();
    assert!(policy.is_empty());
    policy.on_put("k");
    assert_eq!(policy.frequency("k"), Some(1));
}

#[test]
fn test_arc_promotes_on_second_reference() {
    let mut policy = ArcPolicy::new(4);

    policy.on_put("a");
    policy.on_put("b");
    policy.on_put("c");
    policy.on_put("d");

    // Access 'a' and 'b' to move to T2
    policy.on_access("a");
    policy.on_access("b");

    let lists = policy.lists();
    assert_eq!((lists.t1, lists.t2), (2, 2));

    // p starts at 0, so T1 is drained first: oldest of T1 is 'c'
    assert_eq!(policy.select_eviction_candidate(&any), Some("c".to_string()));
}

#[test]
fn test_arc_ghost_hit_in_b1_grows_p() {
    let mut policy = ArcPolicy::new(4);
    policy.on_put("a");
    policy.on_put("b");

    let victim = policy.select_eviction_candidate(&any).unwrap();
    assert_eq!(victim, "a");
    policy.on_evict(&victim);
    assert!(policy.in_ghost_lists("a"));
    assert_eq!(policy.lists().b1, 1);

    // Re-admitting a B1 ghost raises p and lands in T2
    policy.on_put("a");
    assert_eq!(policy.target_p(), 1);
    let lists = policy.lists();
    assert_eq!((lists.t1, lists.t2, lists.b1), (1, 1, 0));
}

#[test]
fn test_arc_ghost_hit_in_b2_shrinks_p() {
    let mut policy = ArcPolicy::new(4);

    // Build up p through B1 hits
    for key in ["a", "b"] {
        policy.on_put(key);
        policy.on_evict(key);
        policy.on_put(key);
    }
    assert_eq!(policy.target_p(), 2);

    // 'a' and 'b' are in T2 now; evicting 'a' sends it to B2
    policy.on_evict("a");
    assert_eq!(policy.lists().b2, 1);

    policy.on_put("a");
    assert_eq!(policy.target_p(), 1);
}

#[test]
fn test_arc_p_is_clamped_to_capacity() {
    let mut policy = ArcPolicy::new(2);
    for round in 0..20 {
        let key = format!("k{round}");
        policy.on_put(&key);
        policy.on_evict(&key);
        policy.on_put(&key);
        assert!(policy.target_p() <= policy.capacity());
    }
    assert_eq!(policy.target_p(), 2);
}

#[test]
fn test_arc_ghost_lists_are_bounded() {
    let mut policy = ArcPolicy::new(3);
    for i in 0..10 {
        let key = format!("k{i}");
        policy.on_put(&key);
        policy.on_evict(&key);
    }
    assert_eq!(policy.lists().b1, 3);
    assert!(policy.in_ghost_lists("k9"));
    assert!(!policy.in_ghost_lists("k0"));
}

#[test]
fn test_arc_remove_skips_ghosting() {
    let mut policy = ArcPolicy::new(4);
    policy.on_put("a");
    policy.on_remove("a");
    assert!(!policy.in_ghost_lists("a"));
    assert!(policy.is_empty());
}

#[test]
fn test_arc_clear_resets_p() {
    let mut policy = ArcPolicy::new(4);
    policy.on_put("a");
    policy.on_evict("a");
    policy.on_put("a");
    assert_eq!(policy.target_p(), 1);

    policy.clear();
    assert_eq!(policy.target_p(), 0);
    assert_eq!(
        policy.lists(),
        ArcLists {
            t1: 0,
            t2: 0,
            b1: 0,
            b2: 0
        }
    );
}

#[test]
fn test_factory_builds_requested_kind() {
    for kind in EvictionPolicyKind::ALL {
        let policy = create_eviction_policy(kind, 8);
        assert_eq!(policy.kind(), kind);
        assert!(policy.is_empty());
    }
}
