//! Status report: invariant check plus per-node figures.

use std::fmt::Write;

use can_dht::Partition;

pub fn status_report(can: &Partition) -> String {
    let mut out = String::new();

    let status = match can.check_invariants() {
        Ok(()) => "partition OK".to_string(),
        Err(violation) => format!("INVARIANT VIOLATED: {violation}"),
    };
    let _ = writeln!(
        out,
        "Status: {status} | nodes={} keys={}",
        can.len(),
        can.key_count()
    );
    let _ = writeln!(
        out,
        "Known limits: 2D only; neighbor rebuild is O(N^2); delete needs a neighbor forming a rectangle."
    );

    let _ = writeln!(out);
    let _ = writeln!(out, "Per-node stats (id | area | keys | neighbors):");
    for stats in can.stats() {
        let _ = writeln!(
            out,
            "  {:>4} | {:.3} | {:>4} | {}",
            stats.id.to_string(),
            stats.area,
            stats.keys,
            stats.neighbors
        );
    }
    out
}
