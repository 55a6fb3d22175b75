//! Full spawn/move flows over a temporary home directory.

use cyberspace_core::coords::{coord_to_xyz, xyz_to_coord};
use cyberspace_domain::{coord_from_hex, coord_to_hex, parse_destination};
use cyberspace_engine::Navigator;
use cyberspace_store::{targets, Store};
use tempfile::TempDir;

use crate::test_utils::navigator_at;

/// Every hop event must reference the genesis id, chain to its predecessor
/// and depart from its predecessor's coordinate.
fn assert_chain_invariants(nav: &Navigator, label: &str) {
    let events = nav.store().read_events(label).unwrap();
    assert!(!events.is_empty());
    let genesis = &events[0];
    assert_eq!(genesis.tag_value("A"), Some("spawn"));

    for (i, event) in events.iter().enumerate().skip(1) {
        assert_eq!(event.tag_value("A"), Some("hop"), "event {i}");
        assert_eq!(event.genesis_ref(), Some(genesis.id.as_str()), "event {i}");
        assert_eq!(
            event.previous_ref(),
            Some(events[i - 1].id.as_str()),
            "event {i}"
        );
        assert_eq!(
            event.tag_value("c"),
            events[i - 1].tag_value("C"),
            "event {i} must depart from its predecessor's coordinate"
        );
        assert!(event.tag_value("proof").is_some(), "event {i}");

        // Axis domain invariant.
        let coord = coord_from_hex(event.tag_value("C").unwrap()).unwrap();
        let (x, y, z, _plane) = coord_to_xyz(&coord);
        for v in [x, y, z] {
            assert!(v <= cyberspace_core::coords::AXIS_MAX);
        }
    }
}

#[test]
fn test_spawned_walk_end_to_end() {
    let dir = TempDir::new().unwrap();
    let nav = Navigator::new(Store::new(dir.path()));
    let spawn = nav.spawn(None, Some("walk")).unwrap();

    // The spawn coordinate is the pubkey; decode it and walk a few hops in
    // whatever block we landed in.
    let (x, y, z, plane) = coord_to_xyz(&coord_from_hex(&spawn.coord_hex).unwrap());
    assert_eq!(plane, 0);

    // Flip the lowest bit of each axis: always a height-1 hop, wherever the
    // key landed us.
    let flip = |v: u128| -> i128 { if v & 1 == 0 { 1 } else { -1 } };
    let (dx, dy, dz) = (flip(x), flip(y), flip(z));
    nav.move_by(dx, 0, 0, None, 20).unwrap();
    nav.move_by(0, dy, 0, None, 20).unwrap();
    nav.move_by(0, 0, dz, None, 20).unwrap();

    assert_eq!(nav.store().chain_length("walk").unwrap(), 4);
    assert_chain_invariants(&nav, "walk");

    let state = nav.store().load_state().unwrap().unwrap();
    let (cx, cy, cz, _p) = coord_to_xyz(&coord_from_hex(&state.coord_hex).unwrap());
    assert_eq!(cx as i128, x as i128 + dx);
    assert_eq!(cy as i128, y as i128 + dy);
    assert_eq!(cz as i128, z as i128 + dz);
}

#[test]
fn test_boundary_escape_walk_shape() {
    // H=4: 15 -> 31 is exactly one escape hop (height 5) plus one in-block
    // hop (height 4).
    let (_dir, nav) = navigator_at(15, 0, 0, 0);
    let target = coord_to_hex(&xyz_to_coord(31, 0, 0, 0));
    let dest = parse_destination(&target, 0).unwrap();

    let outcome = nav.move_toward(Some(&dest), 4, 0).unwrap();
    assert!(outcome.arrived);
    assert_eq!(outcome.hops, 2);

    let events = nav.store().read_events("t").unwrap();
    assert_eq!(events.len(), 3);
    assert_chain_invariants(&nav, "t");

    let first_hop = coord_to_xyz(&coord_from_hex(events[1].tag_value("C").unwrap()).unwrap());
    let second_hop = coord_to_xyz(&coord_from_hex(events[2].tag_value("C").unwrap()).unwrap());
    assert_eq!(first_hop, (16, 0, 0, 0));
    assert_eq!(second_hop, (31, 0, 0, 0));
}

#[test]
fn test_toward_walk_converges_monotonically() {
    let (_dir, nav) = navigator_at(0, 0, 0, 0);
    let dest = parse_destination("200,300,100", 0).unwrap();
    let outcome = nav.move_toward(Some(&dest), 20, 0).unwrap();
    assert!(outcome.arrived);

    // Per-axis distance to the target never grows along the chain.
    let events = nav.store().read_events("t").unwrap();
    let mut prev = (200i128, 300i128, 100i128);
    for event in &events {
        let (x, y, z, _p) = coord_to_xyz(&coord_from_hex(event.tag_value("C").unwrap()).unwrap());
        let dist = (
            (200i128 - x as i128).abs(),
            (300i128 - y as i128).abs(),
            (100i128 - z as i128).abs(),
        );
        assert!(dist.0 <= prev.0 && dist.1 <= prev.1 && dist.2 <= prev.2);
        prev = dist;
    }
    assert_chain_invariants(&nav, "t");
}

#[test]
fn test_target_driven_walk_with_plane_flip() {
    let (_dir, nav) = navigator_at(100, 200, 300, 0);
    let target_hex = coord_to_hex(&xyz_to_coord(103, 200, 300, 1));

    let mut state = nav.store().load_state().unwrap().unwrap();
    targets::set_target(&mut state, &target_hex, Some("flip")).unwrap();
    nav.store().save_state(&state).unwrap();

    let outcome = nav.move_toward(None, 20, 0).unwrap();
    assert!(outcome.arrived);
    assert_eq!(outcome.coord_hex, target_hex);
    assert_chain_invariants(&nav, "t");

    // The plane flip is the final hop and carries zero xyz delta.
    let events = nav.store().read_events("t").unwrap();
    let last = events.last().unwrap();
    let (px, py, pz, pp) = coord_to_xyz(&coord_from_hex(last.tag_value("c").unwrap()).unwrap());
    let (nx, ny, nz, np) = coord_to_xyz(&coord_from_hex(last.tag_value("C").unwrap()).unwrap());
    assert_eq!((px, py, pz), (nx, ny, nz));
    assert_eq!((pp, np), (0, 1));
}

#[test]
fn test_state_survives_partial_walk() {
    let (_dir, nav) = navigator_at(0, 0, 0, 0);
    let dest = parse_destination("1000,0,0", 0).unwrap();

    // Cap the walk mid-way; the chain and state must agree.
    let outcome = nav.move_toward(Some(&dest), 3, 2).unwrap();
    assert!(outcome.capped);
    assert_eq!(outcome.hops, 2);

    let state = nav.store().load_state().unwrap().unwrap();
    let events = nav.store().read_events("t").unwrap();
    assert_eq!(
        state.coord_hex,
        events.last().unwrap().tag_value("C").unwrap()
    );
    assert_chain_invariants(&nav, "t");

    // A fresh navigator resumes from exactly where the walk stopped.
    let resumed = Navigator::new(nav.store().clone());
    let outcome2 = resumed.move_toward(Some(&dest), 10, 0).unwrap();
    assert!(outcome2.arrived);
    assert_eq!(
        outcome2.coord_hex,
        coord_to_hex(&xyz_to_coord(1000, 0, 0, 0))
    );
}
