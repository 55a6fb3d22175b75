//! Target bookkeeping: remembered destination coordinates in local state.

use cyberspace_domain::normalize_hex_32;

use crate::error::Result;
use crate::state::{State, Target};
use crate::store::normalize_label;

const UNNAMED_PREFIX: &str = "unnamed_";

/// Add or update a target and make it the active one.
///
/// - With a label: update that target's coordinate, creating it if needed.
/// - Without a label: if the coordinate matches an existing target, select
///   it; otherwise create a fresh `unnamed_N` label.
///
/// Returns `(label, normalized_coord_hex)`.
pub fn set_target(state: &mut State, coord: &str, label: Option<&str>) -> Result<(String, String)> {
    let coord_hex = normalize_hex_32(coord)?;

    if let Some(label) = label {
        let label = normalize_label(label)?;
        match state.targets.iter_mut().find(|t| t.label == label) {
            Some(existing) => existing.coord_hex = coord_hex.clone(),
            None => state.targets.push(Target {
                coord_hex: coord_hex.clone(),
                label: label.clone(),
            }),
        }
        state.active_target_label = label.clone();
        return Ok((label, coord_hex));
    }

    if let Some(existing) = state.targets.iter().find(|t| t.coord_hex == coord_hex) {
        if !existing.label.is_empty() {
            let label = existing.label.clone();
            state.active_target_label = label.clone();
            return Ok((label, coord_hex));
        }
    }

    let label = next_unnamed_label(&state.targets);
    state.targets.push(Target {
        coord_hex: coord_hex.clone(),
        label: label.clone(),
    });
    state.active_target_label = label.clone();
    Ok((label, coord_hex))
}

/// Select an existing target by label. Returns the target when found.
pub fn select_target<'a>(state: &'a mut State, label: &str) -> Result<Option<&'a Target>> {
    let label = normalize_label(label)?;
    let found = state.targets.iter().position(|t| t.label == label);
    Ok(match found {
        Some(i) => {
            state.active_target_label = label;
            Some(&state.targets[i])
        }
        None => None,
    })
}

/// The currently selected target, if any.
pub fn current_target(state: &State) -> Option<&Target> {
    let label = state.active_target_label.trim();
    if label.is_empty() {
        return None;
    }
    state.targets.iter().find(|t| t.label == label)
}

/// Human-readable target listing, marking the active one.
pub fn format_target_list(state: &State) -> Vec<String> {
    let current = state.active_target_label.trim();
    state
        .targets
        .iter()
        .filter(|t| !t.label.is_empty() && !t.coord_hex.is_empty())
        .map(|t| {
            let prefix = if t.label == current { "(current) " } else { "" };
            format!("{prefix}{} 0x{}", t.label, t.coord_hex)
        })
        .collect()
}

fn next_unnamed_label(targets: &[Target]) -> String {
    let max_n = targets
        .iter()
        .filter_map(|t| t.label.strip_prefix(UNNAMED_PREFIX))
        .filter_map(|suffix| suffix.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    format!("{UNNAMED_PREFIX}{}", max_n + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::STATE_VERSION;

    fn empty_state() -> State {
        State {
            active_chain_label: "main".to_string(),
            active_target_label: String::new(),
            coord_hex: "11".repeat(32),
            privkey_hex: "22".repeat(32),
            pubkey_hex: "33".repeat(32),
            targets: vec![],
            version: STATE_VERSION.to_string(),
        }
    }

    #[test]
    fn test_set_target_with_label() {
        let mut state = empty_state();
        let (label, coord) = set_target(&mut state, "0x1", Some("homebase")).unwrap();
        assert_eq!(label, "homebase");
        assert_eq!(coord, format!("{}1", "0".repeat(63)));
        assert_eq!(state.active_target_label, "homebase");
        assert_eq!(state.targets.len(), 1);

        // Updating the same label replaces the coordinate.
        let (_, coord2) = set_target(&mut state, "0x2", Some("homebase")).unwrap();
        assert_eq!(state.targets.len(), 1);
        assert_eq!(state.targets[0].coord_hex, coord2);
    }

    #[test]
    fn test_set_target_unnamed_sequence() {
        let mut state = empty_state();
        let (l1, _) = set_target(&mut state, "0x1", None).unwrap();
        let (l2, _) = set_target(&mut state, "0x2", None).unwrap();
        assert_eq!(l1, "unnamed_1");
        assert_eq!(l2, "unnamed_2");
        assert_eq!(state.active_target_label, "unnamed_2");
    }

    #[test]
    fn test_set_target_reselects_existing_coord() {
        let mut state = empty_state();
        set_target(&mut state, "0x1", Some("base")).unwrap();
        set_target(&mut state, "0x2", None).unwrap();

        // Same coordinate, no label: selects the original entry.
        let (label, _) = set_target(&mut state, "0x1", None).unwrap();
        assert_eq!(label, "base");
        assert_eq!(state.targets.len(), 2);
    }

    #[test]
    fn test_current_target_and_select() {
        let mut state = empty_state();
        assert!(current_target(&state).is_none());

        set_target(&mut state, "0x1", Some("a")).unwrap();
        set_target(&mut state, "0x2", Some("b")).unwrap();
        assert_eq!(current_target(&state).unwrap().label, "b");

        assert!(select_target(&mut state, "a").unwrap().is_some());
        assert_eq!(current_target(&state).unwrap().label, "a");

        assert!(select_target(&mut state, "missing").unwrap().is_none());
    }

    #[test]
    fn test_format_target_list_marks_current() {
        let mut state = empty_state();
        set_target(&mut state, "0x1", Some("a")).unwrap();
        set_target(&mut state, "0x2", Some("b")).unwrap();
        let lines = format_target_list(&state);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("a 0x"));
        assert!(lines[1].starts_with("(current) b 0x"));
    }
}
