use distributor_types::{Inconsistency, LogId, MergedCheckpoint, WitnessCheckpoint, WitnessId};
use pretty_assertions::assert_eq;
use rand::Rng;
use tempfile::tempdir;

use crate::database::{DistributorDatabase, DistributorDatabaseQuery, DistributorTransaction};
use crate::rocks::RocksDistributorDatabase;
use crate::DatabaseConfig;

fn build(path: &std::path::Path, lock_timeout_ms: u64) -> RocksDistributorDatabase {
    RocksDistributorDatabase::build(DatabaseConfig {
        path: path.to_path_buf(),
        lock_timeout_ms,
    })
    .unwrap()
}

fn random_checkpoint(tree_size: u64) -> WitnessCheckpoint {
    let mut rng = rand::thread_rng();
    WitnessCheckpoint {
        tree_size,
        checkpoint: (0..64).map(|_| rng.gen()).collect(),
    }
}

#[test]
fn test_put_and_get_witness_checkpoints() {
    let tempdir = tempdir().unwrap();
    let db = build(tempdir.path(), 1000);
    let query = db.query();
    let log = LogId::from_origin("example.com/log");
    let witness = WitnessId::from("witness");

    // Check that the database is empty.
    assert_eq!(query.get_witness_checkpoint(&log, &witness).unwrap(), None);

    // Uncommitted writes are not visible to queries.
    let checkpoint = random_checkpoint(5);
    let txn = db.transaction();
    txn.put_witness_checkpoint(&log, &witness, &checkpoint)
        .unwrap();
    assert_eq!(query.get_witness_checkpoint(&log, &witness).unwrap(), None);
    txn.commit().unwrap();
    assert_eq!(
        query.get_witness_checkpoint(&log, &witness).unwrap(),
        Some(checkpoint.clone())
    );

    // Rolled back writes are discarded.
    let txn = db.transaction();
    txn.put_witness_checkpoint(&log, &witness, &random_checkpoint(6))
        .unwrap();
    txn.rollback().unwrap();
    assert_eq!(
        query.get_witness_checkpoint(&log, &witness).unwrap(),
        Some(checkpoint.clone())
    );

    // Other logs are not affected.
    let other = LogId::from_origin("example.com/other");
    assert_eq!(query.get_witness_checkpoint(&other, &witness).unwrap(), None);

    let txn = db.transaction();
    assert_eq!(
        txn.get_witness_checkpoint_for_update(&log, &witness)
            .unwrap(),
        Some(checkpoint)
    );
}

#[test]
fn test_witness_checkpoints_by_size() {
    let tempdir = tempdir().unwrap();
    let db = build(tempdir.path(), 1000);
    let log = LogId::from_origin("example.com/log");
    let other = LogId::from_origin("example.com/other");

    let txn = db.transaction();
    let c = random_checkpoint(10);
    let a = random_checkpoint(10);
    let b = random_checkpoint(9);
    txn.put_witness_checkpoint(&log, &"c".into(), &c).unwrap();
    txn.put_witness_checkpoint(&log, &"a".into(), &a).unwrap();
    txn.put_witness_checkpoint(&log, &"b".into(), &b).unwrap();
    txn.put_witness_checkpoint(&other, &"d".into(), &random_checkpoint(10))
        .unwrap();

    // The transaction sees its own writes.
    assert_eq!(
        txn.witness_checkpoints_by_size(&log, 10).unwrap(),
        vec![
            (WitnessId::from("a"), a.checkpoint.clone()),
            (WitnessId::from("c"), c.checkpoint.clone()),
        ]
    );
    txn.commit().unwrap();

    let txn = db.transaction();
    assert_eq!(
        txn.witness_checkpoints_by_size(&log, 9).unwrap(),
        vec![(WitnessId::from("b"), b.checkpoint)]
    );
    assert!(txn.witness_checkpoints_by_size(&log, 11).unwrap().is_empty());
}

#[test]
fn test_put_and_get_merged_checkpoints() {
    let tempdir = tempdir().unwrap();
    let db = build(tempdir.path(), 1000);
    let query = db.query();
    let log = LogId::from_origin("example.com/log");

    assert_eq!(query.get_merged_checkpoint(&log, 1).unwrap(), None);

    let one = MergedCheckpoint {
        tree_size: 3,
        checkpoint: b"one".to_vec(),
    };
    let two = MergedCheckpoint {
        tree_size: 2,
        checkpoint: b"two".to_vec(),
    };
    let txn = db.transaction();
    assert_eq!(txn.get_merged_tree_size_for_update(&log, 1).unwrap(), None);
    txn.put_merged_checkpoint(&log, 1, &one).unwrap();
    txn.put_merged_checkpoint(&log, 2, &two).unwrap();
    txn.commit().unwrap();

    assert_eq!(query.get_merged_checkpoint(&log, 1).unwrap(), Some(one));
    assert_eq!(query.get_merged_checkpoint(&log, 2).unwrap(), Some(two));
    assert_eq!(query.get_merged_checkpoint(&log, 3).unwrap(), None);

    let txn = db.transaction();
    assert_eq!(txn.get_merged_tree_size_for_update(&log, 1).unwrap(), Some(3));
    assert_eq!(txn.get_merged_tree_size_for_update(&log, 2).unwrap(), Some(2));
}

#[test]
fn test_put_and_get_inconsistencies() {
    let tempdir = tempdir().unwrap();
    let db = build(tempdir.path(), 1000);
    let query = db.query();
    let log = LogId::from_origin("example.com/log");

    let inconsistency = |witness: &str, tree_size: u64| Inconsistency {
        log_id: log.clone(),
        witness_id: witness.into(),
        tree_size,
        stored: b"stored".to_vec(),
        submitted: format!("{witness} {tree_size}").into_bytes(),
    };

    let txn = db.transaction();
    txn.put_inconsistency(&inconsistency("b", 1)).unwrap();
    txn.put_inconsistency(&inconsistency("a", 7)).unwrap();
    txn.put_inconsistency(&inconsistency("a", 2)).unwrap();
    // Resubmitting the same evidence overwrites the row.
    txn.put_inconsistency(&inconsistency("a", 2)).unwrap();
    txn.commit().unwrap();

    assert_eq!(
        query.get_inconsistencies(&log).unwrap(),
        vec![
            inconsistency("a", 2),
            inconsistency("a", 7),
            inconsistency("b", 1)
        ]
    );
    assert!(query
        .get_inconsistencies(&LogId::from_origin("example.com/other"))
        .unwrap()
        .is_empty());
}

#[test]
fn test_log_lock_times_out() {
    let tempdir = tempdir().unwrap();
    let db = build(tempdir.path(), 100);
    let log = LogId::from_origin("example.com/log");

    let first = db.transaction();
    first.lock_log(&log).unwrap();

    // A second writer for the same log can't take the lock.
    let second = db.transaction();
    assert!(second.lock_log(&log).is_err());

    // Other logs are independent.
    second
        .lock_log(&LogId::from_origin("example.com/other"))
        .unwrap();
    second.rollback().unwrap();

    // Once the lock is released the log can be locked again.
    first.commit().unwrap();
    let third = db.transaction();
    third.lock_log(&log).unwrap();
}

#[test]
fn test_reopen_keeps_data() {
    let tempdir = tempdir().unwrap();
    let log = LogId::from_origin("example.com/log");
    let witness = WitnessId::from("witness");
    let checkpoint = random_checkpoint(1);
    {
        let db = build(tempdir.path(), 1000);
        let txn = db.transaction();
        txn.put_witness_checkpoint(&log, &witness, &checkpoint)
            .unwrap();
        txn.commit().unwrap();
    }
    let db = build(tempdir.path(), 1000);
    assert_eq!(
        db.query().get_witness_checkpoint(&log, &witness).unwrap(),
        Some(checkpoint)
    );
}
