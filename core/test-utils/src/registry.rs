use distributor_registry::Registry;

use crate::keys::{TestLog, TestWitness};

pub fn test_registry(logs: &[&TestLog], witnesses: &[&TestWitness]) -> Registry {
    Registry::new(
        logs.iter().map(|l| l.info()),
        witnesses.iter().map(|w| w.info()),
    )
    .unwrap()
}
