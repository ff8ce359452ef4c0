/// Property tests over generated loop nests.

use loopnest_graph::application::ExtractUsecase;
use loopnest_graph::domain::program::{BinaryOp, Expr, ForKind, Stmt, Var};
use loopnest_graph::infrastructure::FeatureScanner;
use proptest::prelude::*;

fn index_expr() -> impl Strategy<Value = Expr> {
    let var = prop::sample::select(vec!["i", "j", "k", "n"]).prop_map(|v| Expr::var(v));
    let leaf = prop_oneof![var, (0i64..64).prop_map(Expr::int)];
    leaf.prop_recursive(3, 12, 2, |inner| {
        (inner.clone(), inner, prop::sample::select(vec![BinaryOp::Add, BinaryOp::Mul]))
            .prop_map(|(a, b, op)| Expr::binary(op, a, b))
    })
}

fn buffer() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["A", "B", "C", "for"]).prop_map(|b| b.to_string())
}

fn program() -> impl Strategy<Value = Stmt> {
    let store = (buffer(), index_expr(), buffer(), index_expr()).prop_map(|(dst, di, src, si)| {
        Stmt::store(dst, di, Expr::load(src, si))
    });
    store.prop_recursive(4, 24, 3, |inner| {
        prop_oneof![
            (prop::sample::select(vec!["i", "j", "k"]), -1i64..16, inner.clone()).prop_map(
                |(var, extent, body)| Stmt::For {
                    loop_var: Var::new(var),
                    min: Expr::int(0),
                    extent: if extent < 0 { Expr::var("n") } else { Expr::int(extent) },
                    for_kind: ForKind::Serial,
                    body: Box::new(body),
                }
            ),
            prop::collection::vec(inner, 0..3).prop_map(Stmt::seq),
        ]
    })
}

fn usecase() -> ExtractUsecase<'static> {
    ExtractUsecase {
        scanner: &FeatureScanner,
    }
}

proptest! {
    #[test]
    fn extraction_is_deterministic(stmt in program()) {
        let first = usecase().run(&stmt, None).unwrap();
        let second = usecase().run(&stmt, None).unwrap();
        prop_assert_eq!(first.buffer, second.buffer);
    }

    #[test]
    fn header_matches_tables(stmt in program()) {
        let out = usecase().run(&stmt, None).unwrap();
        let layout = out.layout;
        let n = out.tables.node_count();

        prop_assert_eq!(layout.node_count as usize, n);
        prop_assert_eq!(out.tables.children.len(), n);
        prop_assert_eq!(out.tables.edge_kinds.len(), n);
        prop_assert_eq!(layout.offset_children, 20);
        prop_assert!(layout.offset_children < layout.offset_edges);
        prop_assert!(layout.offset_edges < layout.offset_labels);
        prop_assert!(layout.offset_labels <= layout.total_size);
        prop_assert_eq!(layout.total_size as usize, out.buffer.len());
        prop_assert_eq!(layout.root_id as usize, n - 1);
    }

    #[test]
    fn labels_round_trip(stmt in program()) {
        let out = usecase().run(&stmt, None).unwrap();
        let buf = &out.buffer;
        let n = out.tables.node_count();
        let base = out.layout.offset_labels as usize;

        let mut at = base + 4 * n;
        for (i, label) in out.tables.labels.iter().enumerate() {
            let len = i32::from_le_bytes(buf[base + 4 * i..base + 4 * i + 4].try_into().unwrap()) as usize;
            prop_assert_eq!(&buf[at..at + len], label.as_bytes());
            at += len;
        }
    }

    #[test]
    fn every_loop_keeps_its_induction_variable_first(stmt in program()) {
        let out = usecase().run(&stmt, None).unwrap();
        let t = &out.tables;
        for (id, label) in t.labels.iter().enumerate() {
            if label == "for" && !t.children[id].is_empty() {
                let first = t.children[id][0];
                prop_assert!(t.children[first].is_empty());
            }
        }
    }
}
