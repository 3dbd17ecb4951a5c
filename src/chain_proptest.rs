#![cfg(test)]

// Property tests for Chain against a Vec model, with a full link check
// after every operation.

use crate::chain::Chain;
use crate::error::Error;
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Insert(usize, i16),
    Delete(usize),
    Get(usize),
    Set(usize, i16),
    Prepend(i16),
    Append(i16),
    DeleteFirst,
    DeleteLast,
    Search(i16),
    RemoveFirst(i16),
    FilterMultipleOf(i16),
    MapAdd(i16),
}

fn arb_op() -> impl Strategy<Value = Op> {
    // Positions and values are kept small so that hits, misses and
    // out-of-range positions all occur.
    let pos = 0usize..12;
    let val = -4i16..4;
    prop_oneof![
        (pos.clone(), val.clone()).prop_map(|(i, v)| Op::Insert(i, v)),
        pos.clone().prop_map(Op::Delete),
        pos.clone().prop_map(Op::Get),
        (pos.clone(), val.clone()).prop_map(|(i, v)| Op::Set(i, v)),
        val.clone().prop_map(Op::Prepend),
        val.clone().prop_map(Op::Append),
        Just(Op::DeleteFirst),
        Just(Op::DeleteLast),
        val.clone().prop_map(Op::Search),
        val.clone().prop_map(Op::RemoveFirst),
        (1i16..4).prop_map(Op::FilterMultipleOf),
        val.prop_map(Op::MapAdd),
    ]
}

fn oob(index: usize, len: usize) -> Error {
    Error::IndexOutOfBounds { index, len }
}

// Property: Chain behaves like a Vec under positional, end, search and
// higher-order operations; failed calls leave it unchanged; links stay
// consistent (head/tail/len agree) after every step.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_chain_matches_vec(ops in proptest::collection::vec(arb_op(), 1..80)) {
        let mut sut: Chain<i16> = Chain::new();
        let mut model: Vec<i16> = Vec::new();

        for op in ops {
            let len = model.len();
            match op {
                Op::Insert(i, v) => {
                    if i <= len {
                        prop_assert_eq!(sut.insert(i, v), Ok(()));
                        model.insert(i, v);
                    } else {
                        prop_assert_eq!(sut.insert(i, v), Err(oob(i, len)));
                    }
                }
                Op::Delete(i) => {
                    if i < len {
                        prop_assert_eq!(sut.delete(i), Ok(model.remove(i)));
                    } else {
                        prop_assert_eq!(sut.delete(i), Err(oob(i, len)));
                    }
                }
                Op::Get(i) => {
                    prop_assert_eq!(sut.get(i).ok(), model.get(i));
                }
                Op::Set(i, v) => {
                    let r = sut.set(i, v);
                    if i < len {
                        prop_assert!(r.is_ok());
                        model[i] = v;
                    } else {
                        prop_assert_eq!(r, Err(oob(i, len)));
                    }
                }
                Op::Prepend(v) => {
                    sut.prepend(v);
                    model.insert(0, v);
                }
                Op::Append(v) => {
                    sut.append(v);
                    model.push(v);
                }
                Op::DeleteFirst => {
                    if model.is_empty() {
                        prop_assert_eq!(sut.delete_first(), Err(oob(0, 0)));
                    } else {
                        prop_assert_eq!(sut.delete_first(), Ok(model.remove(0)));
                    }
                }
                Op::DeleteLast => {
                    match model.pop() {
                        Some(v) => prop_assert_eq!(sut.delete_last(), Ok(v)),
                        None => prop_assert_eq!(sut.delete_last(), Err(oob(0, 0))),
                    }
                }
                Op::Search(v) => {
                    prop_assert_eq!(sut.search(&v), model.iter().position(|x| *x == v));
                }
                Op::RemoveFirst(v) => {
                    let expected = model.iter().position(|x| *x == v).map(|i| model.remove(i));
                    prop_assert_eq!(sut.remove_first(|x| *x == v), expected);
                }
                Op::FilterMultipleOf(m) => {
                    sut.filter(|x| x % m == 0);
                    model.retain(|x| x % m == 0);
                }
                Op::MapAdd(d) => {
                    sut.map(|x| x.saturating_add(d));
                    for x in model.iter_mut() {
                        *x = x.saturating_add(d);
                    }
                }
            }

            sut.assert_links();
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.head().ok(), model.first());
            prop_assert_eq!(sut.tail().ok(), model.last());
            let got: Vec<i16> = sut.iter().copied().collect();
            prop_assert_eq!(&got, &model);
        }
    }
}
