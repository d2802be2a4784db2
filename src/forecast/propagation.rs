use super::fraction::{Fraction, link, weighted_combine};
use super::graph::InteractionGraph;
use super::memo::MemoTable;

fn direct(table: &MemoTable, a: usize, b: usize) -> Fraction {
    table.get(a, b).unwrap_or(Fraction::UNKNOWN)
}

/// Transitive estimate through every single shared opponent of `a` and `b`
pub fn one_hop(graph: &InteractionGraph, table: &MemoTable, a: usize, b: usize) -> Fraction {
    let links = graph
        .opponents(a)
        .iter()
        .filter(|&&mid| mid != b && graph.has_played(mid, b))
        .map(|&mid| Some(link(direct(table, a, mid), direct(table, mid, b))));

    weighted_combine(links)
}

/// Transitive estimate through every chain a - i1 - i2 - b with i1, i2 outside {a, b}
pub fn two_hop(graph: &InteractionGraph, table: &MemoTable, a: usize, b: usize) -> Fraction {
    let mut chains = Vec::new();

    for &first in graph.opponents(a) {
        if first == b {
            continue;
        }

        let to_first = direct(table, a, first);

        for &second in graph.opponents(first) {
            if second == a || second == b || !graph.has_played(second, b) {
                continue;
            }

            let chained = link(
                link(to_first, direct(table, first, second)),
                direct(table, second, b),
            );
            chains.push(Some(chained));
        }
    }

    weighted_combine(chains)
}
