//! `cyberspace` — manage a local movement chain in cyberspace.

mod args;

use anyhow::{bail, Context};
use clap::Parser as _;

use cyberspace_core::cantor::{cantor_pair, int_to_bytes_be_min, int_to_hex_be_min, sha256_int_hex};
use cyberspace_core::coords::{coord_to_xyz, plane_label, xyz_to_coord};
use cyberspace_core::decimal::Dec;
use cyberspace_core::geodetic::gps_to_dataspace_coord;
use cyberspace_core::movement::{discovery_id_from_key_hex, find_lca_height};
use cyberspace_core::movement_debug::axis_cantor_debug;
use cyberspace_core::sector::{xyz_to_sector_id, SECTOR_BITS};
use cyberspace_core::{logging, movement};
use cyberspace_domain::{
    coord_from_hex, coord_to_hex, normalize_hex_32, parse_destination, Event, ParsedDestination,
};
use cyberspace_engine::Navigator;
use cyberspace_store::{normalize_label, targets, State, Store};

use crate::args::{
    CantorArgs, ChainCommand, Cli, Command, ConfigCommand, GpsArgs, MoveArgs, TargetCommand,
};

fn main() -> anyhow::Result<()> {
    logging::init();
    let cli = Cli::parse();
    let store = Store::from_env();

    match cli.command {
        Command::Spawn { from_key, chain } => cmd_spawn(&store, from_key, chain),
        Command::Whereami => cmd_whereami(&store),
        Command::Sector => cmd_sector(&store),
        Command::Gps(args) => cmd_gps(&args),
        Command::Cantor(args) => cmd_cantor(&args),
        Command::Move(args) => cmd_move(&store, &args),
        Command::History { limit, json_out } => cmd_history(&store, limit, json_out),
        Command::Chain(cmd) => match cmd {
            ChainCommand::List => cmd_chain_list(&store),
            ChainCommand::Use { label } => cmd_chain_use(&store, &label),
            ChainCommand::Status => cmd_chain_status(&store),
        },
        Command::Target(cmd) => match cmd {
            TargetCommand::Set { coord, label } => cmd_target_set(&store, &coord, label.as_deref()),
            TargetCommand::List => cmd_target_list(&store),
            TargetCommand::Use { label } => cmd_target_use(&store, &label),
        },
        Command::Config(cmd) => match cmd {
            ConfigCommand::Show => cmd_config_show(&store),
            ConfigCommand::SetMaxLcaHeight { value } => cmd_config_set_height(&store, value),
        },
    }
}

fn require_state(store: &Store) -> anyhow::Result<State> {
    store
        .load_state()?
        .context("No local state found. Run `cyberspace spawn` first.")
}

fn require_active_chain(state: &State) -> anyhow::Result<String> {
    let label = state.active_chain_label.trim();
    if label.is_empty() {
        bail!("No active chain selected. Create one with `cyberspace spawn`.");
    }
    Ok(label.to_string())
}

fn cmd_spawn(store: &Store, from_key: Option<String>, chain: Option<String>) -> anyhow::Result<()> {
    let navigator = Navigator::new(store.clone());
    let outcome = navigator.spawn(from_key.as_deref(), chain.as_deref())?;

    let coord = coord_from_hex(&outcome.coord_hex)?;
    let (_x, _y, _z, plane) = coord_to_xyz(&coord);

    println!("Spawned.");
    println!("chain: {} (len=1)", outcome.chain_label);
    println!("npub: {}", outcome.npub);
    println!("nsec: {}", outcome.nsec);
    println!("coord: 0x{}", outcome.coord_hex);
    println!("plane={plane} {}", plane_label(plane));
    Ok(())
}

fn cmd_whereami(store: &Store) -> anyhow::Result<()> {
    let state = require_state(store)?;
    let coord = coord_from_hex(&state.coord_hex)?;
    let (x, y, z, plane) = coord_to_xyz(&coord);

    println!("coord: 0x{}", state.coord_hex);
    println!("pubkey: {}", state.pubkey_hex);
    println!(
        "active_chain: {}",
        if state.active_chain_label.is_empty() {
            "(none)"
        } else {
            &state.active_chain_label
        }
    );
    println!("xyz(u85):");
    println!("x={x}");
    println!("y={y}");
    println!("z={z}");
    println!("plane={plane} {}", plane_label(plane));
    Ok(())
}

fn cmd_sector(store: &Store) -> anyhow::Result<()> {
    let state = require_state(store)?;
    let coord = coord_from_hex(&state.coord_hex)?;
    let (x, y, z, plane) = coord_to_xyz(&coord);
    let id = xyz_to_sector_id(x, y, z, SECTOR_BITS);

    println!("sector:");
    println!("X={}", id.sx);
    println!("Y={}", id.sy);
    println!("Z={}", id.sz);
    println!("plane={plane} {}", plane_label(plane));
    println!("S tag: {}", id.tag());
    Ok(())
}

fn cmd_gps(args: &GpsArgs) -> anyhow::Result<()> {
    let (lat_s, lon_s) = match (&args.at, &args.lat, &args.lon) {
        (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
            bail!("Use either 'lat,lon' OR --lat/--lon (not both).")
        }
        (Some(at), None, None) => {
            let parts: Vec<&str> = at.split(',').map(str::trim).collect();
            if parts.len() != 2 {
                bail!("Expected 'lat,lon' (comma-separated).");
            }
            (parts[0].to_string(), parts[1].to_string())
        }
        (None, Some(lat), Some(lon)) => (lat.clone(), lon.clone()),
        _ => bail!("Provide either 'lat,lon' or both --lat and --lon."),
    };

    let lat = Dec::parse(&lat_s).with_context(|| format!("invalid latitude: {lat_s}"))?;
    let lon = Dec::parse(&lon_s).with_context(|| format!("invalid longitude: {lon_s}"))?;
    let alt = Dec::parse(&args.altitude_m)
        .with_context(|| format!("invalid altitude: {}", args.altitude_m))?;

    let coord = gps_to_dataspace_coord(&lat, &lon, &alt, !args.no_clamp)?;
    let (x, y, z, plane) = coord_to_xyz(&coord);

    println!("coord: 0x{}", coord_to_hex(&coord));
    println!(
        "xyz(u85): x={x} y={y} z={z} plane={plane} {}",
        plane_label(plane)
    );
    Ok(())
}

fn cmd_cantor(args: &CantorArgs) -> anyhow::Result<()> {
    let using_coords = args.from_coord.is_some() || args.to_coord.is_some();
    let using_xyz = args.from_xyz.is_some() || args.to_xyz.is_some();
    if using_coords && using_xyz {
        bail!("Use either --from-coord/--to-coord OR --from-xyz/--to-xyz (not both).");
    }

    let (from_hex, to_hex, x1, y1, z1, x2, y2, z2, plane) = if using_coords {
        let (Some(fc), Some(tc)) = (&args.from_coord, &args.to_coord) else {
            bail!("Both --from-coord and --to-coord are required.");
        };
        let from_hex = normalize_hex_32(fc)?;
        let to_hex = normalize_hex_32(tc)?;
        let (fx, fy, fz, fp) = coord_to_xyz(&coord_from_hex(&from_hex)?);
        let (tx, ty, tz, tp) = coord_to_xyz(&coord_from_hex(&to_hex)?);
        if fp != tp {
            bail!("Plane mismatch: from/to are in different planes.");
        }
        (from_hex, to_hex, fx, fy, fz, tx, ty, tz, fp)
    } else {
        let (Some(fs), Some(ts)) = (&args.from_xyz, &args.to_xyz) else {
            bail!("Both --from-xyz and --to-xyz are required.");
        };
        if args.plane > 1 {
            bail!("--plane must be 0 or 1");
        }
        let (x1, y1, z1) = parse_xyz_triplet(fs)?;
        let (x2, y2, z2) = parse_xyz_triplet(ts)?;
        let from_hex = coord_to_hex(&xyz_to_coord(x1, y1, z1, args.plane));
        let to_hex = coord_to_hex(&xyz_to_coord(x2, y2, z2, args.plane));
        (from_hex, to_hex, x1, y1, z1, x2, y2, z2, args.plane)
    };

    println!("from:");
    println!("  coord: 0x{from_hex}");
    println!("  xyz:   x={x1} y={y1} z={z1} plane={plane} {}", plane_label(plane));
    println!("to:");
    println!("  coord: 0x{to_hex}");
    println!("  xyz:   x={x2} y={y2} z={z2} plane={plane} {}", plane_label(plane));

    let mut roots = Vec::with_capacity(3);
    for (name, v1, v2) in [("X", x1, x2), ("Y", y1, y2), ("Z", z1, z2)] {
        let height = find_lca_height(v1, v2);
        let base = (v1 >> height) << height;
        let leaf_count = 1u128 << height;

        if height > args.max_compute_height {
            bail!(
                "axis {name}: lca_height={height} exceeds --max-compute-height={}; refusing to compute root.",
                args.max_compute_height
            );
        }

        println!("axis {name}:");
        println!("  v1={v1} v2={v2}");
        println!("  lca_height={height}");
        println!("  subtree_base={base}");
        println!(
            "  subtree_range=[{base}..{}] leaves={leaf_count}",
            base + leaf_count - 1
        );

        let root = if height <= args.max_height {
            let dbg = axis_cantor_debug(v1, v2, args.max_height)?;
            for (level, values) in dbg.levels.iter().enumerate() {
                let rendered: Vec<String> = values.iter().map(int_to_hex_be_min).collect();
                println!("  level_{level} ({} nodes): {rendered:?}", values.len());
            }
            dbg.root
        } else {
            println!(
                "  tree_levels: omitted (height {height} > --max-height {})",
                args.max_height
            );
            movement::compute_axis_cantor(v1, v2, args.max_compute_height)?
        };

        println!("  cantor_root_hex={}", int_to_hex_be_min(&root));
        println!("  cantor_root_bytes={}", int_to_bytes_be_min(&root).len());
        roots.push(root);
    }

    let combined = cantor_pair(&cantor_pair(&roots[0], &roots[1]), &roots[2]);
    let encryption_key = sha256_int_hex(&combined);
    let discovery_id = discovery_id_from_key_hex(&encryption_key);

    println!("combined:");
    println!("  cantor_number_hex={}", int_to_hex_be_min(&combined));
    println!(
        "  cantor_number_bytes={}",
        int_to_bytes_be_min(&combined).len()
    );
    println!("  encryption_key_sha256={encryption_key}");
    println!("  discovery_id_sha256_sha256={discovery_id}");
    Ok(())
}

fn parse_xyz_triplet(s: &str) -> anyhow::Result<(u128, u128, u128)> {
    let values = cyberspace_domain::parsing::parse_csv_i128(s)?;
    let [x, y, z] = values.as_slice() else {
        bail!("--from-xyz/--to-xyz expect x,y,z");
    };
    let as_axis = |v: i128| {
        u128::try_from(v).map_err(|_| anyhow::anyhow!("axis values must be non-negative (u85)"))
    };
    Ok((as_axis(*x)?, as_axis(*y)?, as_axis(*z)?))
}

fn cmd_move(store: &Store, args: &MoveArgs) -> anyhow::Result<()> {
    let given = [&args.to, &args.by, &args.toward]
        .iter()
        .filter(|v| v.is_some())
        .count();
    if given > 1 {
        bail!("Specify at most one of --to, --by, or --toward.");
    }

    let state = require_state(store)?;
    let label = require_active_chain(&state)?;
    let (_, _, _, current_plane) = coord_to_xyz(&coord_from_hex(&state.coord_hex)?);

    let max_lca_height = args
        .max_lca_height
        .unwrap_or_else(|| store.load_config().default_max_lca_height);
    let navigator = Navigator::new(store.clone());

    if let Some(to) = &args.to {
        let dest = parse_destination(to, current_plane)?;
        let outcome = navigator.move_to(&dest, max_lca_height)?;
        println!("Moved. chain={label} len={}", outcome.chain_length);
        println!("coord: 0x{}", outcome.coord_hex);
        println!("proof: {}", outcome.proof_hash);
        return Ok(());
    }

    if let Some(by) = &args.by {
        let deltas = cyberspace_domain::parsing::parse_csv_i128(by)?;
        let (dx, dy, dz, plane2) = match deltas.as_slice() {
            [dx, dy, dz] => (*dx, *dy, *dz, None),
            [dx, dy, dz, p] => (*dx, *dy, *dz, Some((*p & 1) as u8)),
            _ => bail!("--by expects dx,dy,dz or dx,dy,dz,plane"),
        };
        let outcome = navigator.move_by(dx, dy, dz, plane2, max_lca_height)?;
        println!("Moved. chain={label} len={}", outcome.chain_length);
        println!("coord: 0x{}", outcome.coord_hex);
        println!("proof: {}", outcome.proof_hash);
        return Ok(());
    }

    // --toward, or the active target when no destination flag was given.
    let dest: Option<ParsedDestination> = match &args.toward {
        Some(toward) => Some(parse_destination(toward, current_plane)?),
        None => None,
    };
    if dest.is_none() && targets::current_target(&state).is_none() {
        bail!(
            "No destination given and no active target. Use --to/--by/--toward \
             or set one with `cyberspace target set`."
        );
    }

    let outcome = navigator.move_toward(dest.as_ref(), max_lca_height, args.max_hops)?;
    if outcome.arrived {
        println!("Arrived after {} hops.", outcome.hops);
    } else {
        println!("Stopped after max_hops={}.", outcome.hops);
    }
    println!("coord: 0x{}", outcome.coord_hex);
    Ok(())
}

fn tag(event: &Event, key: &str) -> String {
    event.tag_value(key).unwrap_or_default().to_string()
}

fn cmd_history(store: &Store, limit: usize, json_out: bool) -> anyhow::Result<()> {
    let state = require_state(store)?;
    let label = require_active_chain(&state)?;

    let mut events = store.read_events(&label)?;
    if events.is_empty() {
        if !json_out {
            println!("(empty chain) {label}");
        }
        return Ok(());
    }
    if limit > 0 && events.len() > limit {
        events = events.split_off(events.len() - limit);
    }

    if json_out {
        for event in &events {
            println!("{}", event.to_json_line()?);
        }
        return Ok(());
    }

    println!("chain: {label} (showing {} events)", events.len());
    for (i, event) in events.iter().enumerate() {
        let action = event.tag_value("A").unwrap_or("?");
        let coord = tag(event, "C");
        let proof = tag(event, "proof");
        let mut line = format!("{i:04} {action:5} id={} coord=0x{coord}", event.id);
        if !proof.is_empty() {
            line.push_str(&format!(" proof={proof}"));
        }
        println!("{line}");
    }
    Ok(())
}

fn cmd_chain_list(store: &Store) -> anyhow::Result<()> {
    let active = store
        .load_state()?
        .map(|s| s.active_chain_label)
        .unwrap_or_default();
    let labels = store.list_chain_labels()?;
    if labels.is_empty() {
        println!("(no chains yet)");
        return Ok(());
    }
    for label in labels {
        let mark = if label == active { "*" } else { " " };
        let n = store.chain_length(&label)?;
        println!("{mark} {label} (len={n})");
    }
    Ok(())
}

fn cmd_chain_use(store: &Store, label: &str) -> anyhow::Result<()> {
    let mut state = require_state(store)?;
    let label = normalize_label(label)?;
    if store.chain_length(&label)? == 0 {
        bail!("Unknown chain: {label}");
    }
    state.active_chain_label = label.clone();
    store.save_state(&state)?;
    println!("active_chain: {label}");
    Ok(())
}

fn cmd_chain_status(store: &Store) -> anyhow::Result<()> {
    let state = require_state(store)?;
    let label = require_active_chain(&state)?;

    let events = store.read_events(&label)?;
    let (Some(first), Some(last)) = (events.first(), events.last()) else {
        println!("(empty chain) {label}");
        return Ok(());
    };

    let spawn_hex = tag(first, "C");
    let last_hex = tag(last, "C");
    if spawn_hex.is_empty() || last_hex.is_empty() {
        bail!("Chain missing C tags; cannot compute distance.");
    }

    let (sx, sy, sz, _) = coord_to_xyz(&coord_from_hex(&spawn_hex)?);
    let (cx, cy, cz, cplane) = coord_to_xyz(&coord_from_hex(&state.coord_hex)?);

    println!("active_chain: {label}");
    println!(
        "length: {} (hops={})",
        events.len(),
        events.len().saturating_sub(1)
    );
    println!("genesis: {}", first.id);
    println!("last:    {}", last.id);
    println!("spawn:   0x{spawn_hex}");
    println!("current: 0x{}", state.coord_hex);
    if state.coord_hex != last_hex {
        eprintln!("warning: state coord != last chain coord");
    }
    println!(
        "delta_xyz: dx={} dy={} dz={} (plane={cplane} {})",
        cx as i128 - sx as i128,
        cy as i128 - sy as i128,
        cz as i128 - sz as i128,
        plane_label(cplane)
    );
    Ok(())
}

fn cmd_target_set(store: &Store, coord: &str, label: Option<&str>) -> anyhow::Result<()> {
    let mut state = require_state(store)?;
    let (label, coord_hex) = targets::set_target(&mut state, coord, label)?;
    store.save_state(&state)?;
    println!("target: {label} 0x{coord_hex}");
    Ok(())
}

fn cmd_target_list(store: &Store) -> anyhow::Result<()> {
    let state = require_state(store)?;
    let lines = targets::format_target_list(&state);
    if lines.is_empty() {
        println!("(no targets yet)");
        return Ok(());
    }
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

fn cmd_target_use(store: &Store, label: &str) -> anyhow::Result<()> {
    let mut state = require_state(store)?;
    let Some(target) = targets::select_target(&mut state, label)? else {
        bail!("Unknown target: {label}");
    };
    let line = format!("target: {} 0x{}", target.label, target.coord_hex);
    store.save_state(&state)?;
    println!("{line}");
    Ok(())
}

fn cmd_config_show(store: &Store) -> anyhow::Result<()> {
    let config = store.load_config();
    println!("version: {}", config.version);
    println!("default_max_lca_height: {}", config.default_max_lca_height);
    Ok(())
}

fn cmd_config_set_height(store: &Store, value: u32) -> anyhow::Result<()> {
    if value == 0 {
        bail!("default_max_lca_height must be >= 1");
    }
    let mut config = store.load_config();
    config.default_max_lca_height = value;
    store.save_config(&config)?;
    println!("default_max_lca_height: {value}");
    Ok(())
}
