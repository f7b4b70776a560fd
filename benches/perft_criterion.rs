//! Perft throughput benchmarks over a handful of standard positions.

use criterion::{criterion_group, criterion_main, Criterion};

use magpie_chess::game_state::chess_rules::STARTING_POSITION_FEN;
use magpie_chess::move_generation::perft::perft;
use magpie_chess::moves::attack_tables::AttackTables;
use magpie_chess::search::zobrist::ZobristKeys;
use magpie_chess::utils::fen_parser::parse_fen;

struct BenchCase {
    name: &'static str,
    fen: &'static str,
    depth: u32,
    expected_nodes: u64,
}

const CASES: [BenchCase; 3] = [
    BenchCase {
        name: "startpos_depth_4",
        fen: STARTING_POSITION_FEN,
        depth: 4,
        expected_nodes: 197_281,
    },
    BenchCase {
        name: "tactical_middlegame_depth_3",
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 0",
        depth: 3,
        expected_nodes: 97_862,
    },
    BenchCase {
        name: "pawn_endgame_depth_4",
        fen: "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        depth: 4,
        expected_nodes: 43_238,
    },
];

fn perft_benchmarks(c: &mut Criterion) {
    let keys = ZobristKeys::new();
    let tables = AttackTables::new();

    for case in &CASES {
        let mut game = parse_fen(case.fen, &keys).expect("benchmark FEN parses");
        c.bench_function(case.name, |b| {
            b.iter(|| {
                let nodes = perft(&mut game, &tables, &keys, case.depth);
                assert_eq!(nodes, case.expected_nodes);
            })
        });
    }
}

criterion_group!(benches, perft_benchmarks);
criterion_main!(benches);
