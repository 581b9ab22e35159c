//! Replicated hierarchies mirror their source

use proptest::prelude::*;
use treeclone::drive::MemoryDrive;
use treeclone::progress::CollectingSink;
use treeclone::replicate::{replicate, ReplicationRequest};
use treeclone::types::FolderId;

/// Source tree with unique names, returned with every folder's name chain
/// below the source root.
fn build_source(drive: &MemoryDrive, parents: &[prop::sample::Index]) -> (FolderId, Vec<Vec<String>>) {
    let root = drive.add_folder(None, "root");
    let mut ids = vec![root.clone()];
    let mut chains: Vec<Vec<String>> = vec![Vec::new()];
    for (i, parent) in parents.iter().enumerate() {
        let p = parent.index(i + 1);
        let name = format!("f{}", i);
        ids.push(drive.add_folder(Some(&ids[p]), &name));
        let mut chain = chains[p].clone();
        chain.push(name);
        chains.push(chain);
    }
    (root, chains)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn destination_mirrors_source(parents in prop::collection::vec(any::<prop::sample::Index>(), 0..32)) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let drive = MemoryDrive::new();
        let (source, chains) = build_source(&drive, &parents);
        let destination = drive.add_folder(None, "dest");
        let sink = CollectingSink::new();

        let report = runtime
            .block_on(replicate(
                &drive,
                &sink,
                ReplicationRequest {
                    source,
                    destination: destination.clone(),
                    ..Default::default()
                },
            ))
            .unwrap();

        prop_assert!(report.is_complete());
        prop_assert_eq!(report.created.len(), parents.len());
        for chain in &chains {
            let names: Vec<&str> = chain.iter().map(String::as_str).collect();
            prop_assert!(
                drive.find_path(&destination, &names).is_some(),
                "missing {:?}", names
            );
        }
    }
}
