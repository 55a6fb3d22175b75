//! Consensus-critical golden vectors, exercised through the public stack.

use cyberspace_core::cantor::sha256_int_hex;
use cyberspace_core::coords::coord_to_xyz;
use cyberspace_core::decimal::Dec;
use cyberspace_core::geodetic::gps_to_dataspace_coord;
use cyberspace_core::movement::{
    compute_movement_proof_xyz, discovery_id_from_key_hex, DEFAULT_MAX_COMPUTE_HEIGHT,
};
use cyberspace_domain::{coord_from_hex, coord_to_hex, make_hop_event, make_spawn_event};

fn gps_hex(lat: &str, lon: &str) -> String {
    let coord = gps_to_dataspace_coord(
        &Dec::parse(lat).unwrap(),
        &Dec::parse(lon).unwrap(),
        &Dec::zero(),
        true,
    )
    .unwrap();
    coord_to_hex(&coord)
}

#[test]
fn test_gps_golden_vectors() {
    let vectors = [
        (
            "origin_equator_prime",
            "0",
            "0",
            "e040009249248048201201000049208000201009201200000040049201048240",
        ),
        (
            "north_pole",
            "90",
            "0",
            "e020004920020000120820120124900900100024124904920904124120100124",
        ),
        (
            "london",
            "51.5074",
            "-0.1278",
            "c49eeba5feb124bd3ec0f3a132977c8c33edbb111fdfd02cb35cea53075b9846",
        ),
        (
            "nyc",
            "40.7128",
            "-74.0060",
            "c4943fa01bb22b95946ec1605717047a3b79bd717d5d84e35a12cb56df76134a",
        ),
    ];
    for (name, lat, lon, expected) in vectors {
        assert_eq!(gps_hex(lat, lon), expected, "{name}");
    }
}

#[test]
fn test_gps_vectors_land_in_distinct_sectors() {
    let london = coord_from_hex(&gps_hex("51.5074", "-0.1278")).unwrap();
    let nyc = coord_from_hex(&gps_hex("40.7128", "-74.0060")).unwrap();
    assert!(!cyberspace_core::sector::coords_in_same_sector(
        &london,
        &nyc,
        cyberspace_core::sector::SECTOR_BITS
    ));
}

#[test]
fn test_movement_proof_between_documented_coords() {
    // From 0x2b50e80 to 0x2b50e88: (100,200,300,0) -> (101,200,300,0).
    let from = coord_from_hex("0x2b50e80").unwrap();
    let to = coord_from_hex("0x2b50e88").unwrap();
    let (x1, y1, z1, p1) = coord_to_xyz(&from);
    let (x2, y2, z2, p2) = coord_to_xyz(&to);
    assert_eq!((x1, y1, z1, p1), (100, 200, 300, 0));
    assert_eq!((x2, y2, z2, p2), (101, 200, 300, 0));

    let proof =
        compute_movement_proof_xyz(x1, y1, z1, x2, y2, z2, DEFAULT_MAX_COMPUTE_HEIGHT).unwrap();
    assert_eq!(proof.cantor_x, 20402u32.into());
    assert_eq!(proof.cantor_y, 200u32.into());
    assert_eq!(proof.cantor_z, 300u32.into());

    let encryption_key = sha256_int_hex(&proof.combined);
    assert_eq!(encryption_key, proof.proof_hash);
    assert_eq!(
        encryption_key,
        "4e02171a1986de2299e3abe37a00b419d853da9bcab7139d76189f5506b138f6"
    );
    assert_eq!(
        discovery_id_from_key_hex(&encryption_key),
        "b3e3141659d48d3f7e39a684ab9f193badc11497ea6c3d0f89fefd8e9dbc85c5"
    );
}

#[test]
fn test_event_id_vectors_lock_serialization() {
    let pubkey = "00".repeat(32);
    let coord0 = "11".repeat(32);
    let coord1 = "22".repeat(32);

    let spawn = make_spawn_event(&pubkey, 1700000000, &coord0).unwrap();
    assert_eq!(
        spawn.id,
        "56a9dd855585a70e69928feb6163c2f72689856d58d823da6c0563d882eb0bba"
    );

    let hop = make_hop_event(
        &pubkey,
        1700000123,
        &spawn.id,
        &spawn.id,
        &coord0,
        &coord1,
        &"ab".repeat(32),
    )
    .unwrap();
    assert_eq!(
        hop.id,
        "4cda3483928f30e4c3dfd85cb71401f0a439601ef923e19cba57ca86853cc75e"
    );
}

#[test]
fn test_chain_log_line_reparses_to_same_id() {
    // A chain line is the canonical transport; id must survive the trip.
    let spawn = make_spawn_event(&"00".repeat(32), 1700000000, &"11".repeat(32)).unwrap();
    let line = spawn.to_json_line().unwrap();
    let back: cyberspace_domain::Event = serde_json::from_str(&line).unwrap();
    let recomputed = cyberspace_domain::event::compute_event_id_hex(
        &back.pubkey,
        back.created_at,
        back.kind,
        &back.tags,
        &back.content,
    )
    .unwrap();
    assert_eq!(recomputed, back.id);
}
