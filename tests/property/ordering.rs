//! Creation order guarantees over arbitrary structures

use proptest::prelude::*;
use std::collections::HashSet;
use treeclone::replicate::creation_order;
use treeclone::tree::{RelativePath, Structure};

/// A random tree as `(parent index, name)` pairs. Node 0 is the root folder;
/// node `i + 1` hangs under one of nodes `0..=i`. Names repeat on purpose.
fn random_tree() -> impl Strategy<Value = Vec<(prop::sample::Index, String)>> {
    prop::collection::vec((any::<prop::sample::Index>(), "[a-c]{1,2}"), 0..48)
}

fn build_structure(nodes: &[(prop::sample::Index, String)]) -> Structure {
    let mut structure = Structure::new();
    let mut paths = vec![RelativePath::root().join("root")];
    structure.record(&RelativePath::root(), "root");
    for (i, (parent, name)) in nodes.iter().enumerate() {
        let parent_path = paths[parent.index(i + 1)].clone();
        structure.record(&parent_path, name.clone());
        paths.push(parent_path.join(name));
    }
    structure
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn parents_precede_children(nodes in random_tree()) {
        let structure = build_structure(&nodes);
        let order = creation_order(&structure);

        let mut seen: HashSet<RelativePath> = HashSet::new();
        for entry in &order {
            prop_assert!(
                entry.parent.is_root() || seen.contains(&entry.parent),
                "{} came before its parent {}", entry.full, entry.parent
            );
            seen.insert(entry.full.clone());
        }
    }

    #[test]
    fn order_covers_every_recorded_folder(nodes in random_tree()) {
        let structure = build_structure(&nodes);
        let order = creation_order(&structure);
        prop_assert_eq!(order.len(), structure.folder_count());
        prop_assert_eq!(order.len(), nodes.len() + 1);
    }

    #[test]
    fn depth_is_non_decreasing(nodes in random_tree()) {
        let order = creation_order(&build_structure(&nodes));
        for pair in order.windows(2) {
            prop_assert!(pair[0].full.depth() <= pair[1].full.depth());
        }
    }

    #[test]
    fn built_structures_have_no_orphans(nodes in random_tree()) {
        prop_assert!(build_structure(&nodes).orphaned_keys().is_empty());
    }
}
