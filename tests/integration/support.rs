//! Fixtures shared by the integration tests

use treeclone::drive::MemoryDrive;
use treeclone::types::FolderId;

/// Source tree `A/{B/{D}, C}` plus an empty destination `Dest`.
pub struct Fixture {
    pub drive: MemoryDrive,
    pub source: FolderId,
    pub destination: FolderId,
}

pub fn scenario() -> Fixture {
    let drive = MemoryDrive::new();
    let source = drive.add_folder(None, "A");
    let b = drive.add_folder(Some(&source), "B");
    drive.add_folder(Some(&source), "C");
    drive.add_folder(Some(&b), "D");
    let destination = drive.add_folder(None, "Dest");
    Fixture {
        drive,
        source,
        destination,
    }
}
