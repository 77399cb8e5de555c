use chunkmix::chunking::total_len;
use chunkmix::model::node::{LengthMode, Node, OrderMode};
use chunkmix::{MixDocument, MixTree, NodeId, RandomSource, SeededRandom, SequenceRandom, generate};

use rstest::rstest;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn set_modes(tree: &mut MixTree, id: NodeId, length_mode: LengthMode, order_mode: OrderMode) {
    let settings = tree.get_node_mut(id).unwrap().settings_mut();
    settings.length_mode = length_mode;
    settings.order_mode = order_mode;
}

/// Root mix holding one randomized target mix with three chunks.
fn base_tree(order_mode: OrderMode) -> (MixTree, NodeId, NodeId) {
    let mut tree = MixTree::new();
    let root = tree.add_mix(None).unwrap();
    set_modes(&mut tree, root, LengthMode::FitLargest, OrderMode::Canonical);

    let target = tree.add_mix(Some(root)).unwrap();
    set_modes(&mut tree, target, LengthMode::FitLargest, order_mode);
    for text in ["a, b, c, ", "d, e, ", "f, g, h, i, "] {
        let chunk = tree.add_chunk(Some(target), text).unwrap();
        set_modes(&mut tree, chunk, LengthMode::ExactOnce, order_mode);
    }
    (tree, root, target)
}

fn check_variable_matches_copy(order_mode: OrderMode, mut make_rng: impl FnMut() -> Box<dyn RandomSource>) {
    let (base, root, target) = base_tree(order_mode);

    let mut with_variable = base.clone();
    let variable = with_variable.add_variable(Some(root), Some(target)).unwrap();

    let mut with_copy = base;
    let copy = with_copy.duplicate(target).unwrap();
    assert_eq!(with_copy.get_node(root).unwrap().children(), &[target, copy]);

    let via_variable = generate(&with_variable, root, make_rng().as_mut()).unwrap();
    let via_copy = generate(&with_copy, root, make_rng().as_mut()).unwrap();

    assert_eq!(via_variable.output, via_copy.output);
    assert_eq!(
        via_variable.find(variable).unwrap().fragments,
        via_copy.find(copy).unwrap().fragments
    );
}

#[rstest]
#[case(OrderMode::RandomizeInterleave)]
#[case(OrderMode::FullRandomize)]
fn test_variable_matches_duplicate_with_seeded_draws(#[case] order_mode: OrderMode) {
    init_logger();
    for seed in [1, 7, 42, 1234] {
        check_variable_matches_copy(order_mode, || Box::new(SeededRandom::from_seed(seed)));
    }
}

#[rstest]
#[case(OrderMode::RandomizeInterleave)]
#[case(OrderMode::FullRandomize)]
fn test_variable_matches_duplicate_with_fixed_draws(#[case] order_mode: OrderMode) {
    init_logger();
    check_variable_matches_copy(order_mode, || {
        Box::new(SequenceRandom::new(vec![0.1, 0.7, 0.4, 0.9, 0.3, 0.55]))
    });
}

#[test]
fn test_canonical_tree_is_deterministic() {
    init_logger();
    let mut tree = MixTree::new();
    let root = tree.add_mix(None).unwrap();
    tree.add_chunk(Some(root), "red, blue, ").unwrap();
    tree.add_chunk(Some(root), "one, two, three, ").unwrap();

    let first = generate(&tree, root, &mut SeededRandom::from_seed(1)).unwrap();
    assert_eq!(first.output, "red, one, blue, two, ");
    for seed in [2, 3, 99] {
        let again = generate(&tree, root, &mut SeededRandom::from_seed(seed)).unwrap();
        assert_eq!(
            serde_json::to_string(&again).unwrap(),
            serde_json::to_string(&first).unwrap()
        );
    }
}

#[test]
fn test_unresolved_variable_is_empty() {
    init_logger();
    let mut tree = MixTree::new();
    let root = tree.add_mix(None).unwrap();
    set_modes(&mut tree, root, LengthMode::FitLargest, OrderMode::Canonical);
    tree.add_chunk(Some(root), "red, blue, ").unwrap();
    let dangling = tree.add_variable(Some(root), Some(NodeId(999))).unwrap();
    let unset = tree.add_variable(Some(root), None).unwrap();

    let generated = generate(&tree, root, &mut SequenceRandom::new(vec![0.5])).unwrap();
    assert_eq!(generated.output, "red, blue, ");
    assert_eq!(generated.find(dangling).unwrap().output, "");
    assert_eq!(generated.find(unset).unwrap().output, "");
}

#[test]
fn test_variable_cycle_is_cut_off() {
    init_logger();
    let mut tree = MixTree::new();
    let root = tree.add_mix(None).unwrap();
    set_modes(&mut tree, root, LengthMode::FitLargest, OrderMode::Canonical);
    tree.add_chunk(Some(root), "red, blue, ").unwrap();
    let back_edge = tree.add_variable(Some(root), Some(root)).unwrap();

    let generated = generate(&tree, root, &mut SequenceRandom::new(vec![0.5])).unwrap();
    assert_eq!(generated.output, "red, blue, ");
    assert!(generated.find(back_edge).unwrap().fragments.is_empty());
}

#[test]
fn test_missing_root_is_an_error() {
    init_logger();
    let tree = MixTree::new();
    assert!(generate(&tree, NodeId(5), &mut SequenceRandom::new(vec![])).is_err());
}

#[test]
fn test_unpreserved_children_enter_as_one_fragment() {
    init_logger();
    let mut tree = MixTree::new();
    let root = tree.add_mix(None).unwrap();
    if let Some(Node::Mix(mix)) = tree.get_node_mut(root) {
        mix.preserve = false;
    }
    tree.add_chunk(Some(root), "red, blue, ").unwrap();
    tree.add_chunk(Some(root), "one, two, three, ").unwrap();

    let generated = generate(&tree, root, &mut SequenceRandom::new(vec![])).unwrap();
    assert_eq!(generated.fragments, vec!["red, blue, ", "one, two, three, "]);
}

#[test]
fn test_dropout_lands_under_limit() {
    init_logger();
    let mut tree = MixTree::new();
    let chunk = tree.add_chunk(None, "a, b, c, d, e, ").unwrap();
    {
        let settings = tree.get_node_mut(chunk).unwrap().settings_mut();
        settings.length_mode = LengthMode::Dropout;
        settings.limit = 7;
    }

    let all = ["a, ", "b, ", "c, ", "d, ", "e, "];
    for seed in 0..20 {
        let generated = generate(&tree, chunk, &mut SeededRandom::from_seed(seed)).unwrap();
        assert!(total_len(&generated.fragments) <= 7);
        assert_eq!(generated.fragments.len(), 2);

        let positions: Vec<usize> = generated
            .fragments
            .iter()
            .map(|f| all.iter().position(|a| *a == f.as_str()).unwrap())
            .collect();
        assert!(positions[0] < positions[1]);
    }
}

#[test]
fn test_legacy_randomize_matches_explicit_order_mode() {
    init_logger();
    let legacy = MixDocument::from_json(
        r#"{"mixes":[{"type":"mix","id":1,"randomize":true,"lengthMode":"fit-largest","children":[
            {"type":"chunk","id":2,"text":"a, b, c, "},
            {"type":"chunk","id":3,"text":"x, y, "}
        ]}]}"#,
    )
    .unwrap();
    let explicit = MixDocument::from_json(
        r#"{"mixes":[{"type":"mix","id":1,"orderMode":"randomize-interleave","lengthMode":"fit-largest","children":[
            {"type":"chunk","id":2,"text":"a, b, c, "},
            {"type":"chunk","id":3,"text":"x, y, "}
        ]}]}"#,
    )
    .unwrap();
    let (legacy_tree, _) = MixTree::from_document(&legacy).unwrap();
    let (explicit_tree, _) = MixTree::from_document(&explicit).unwrap();

    for seed in [3, 11, 500] {
        let a = generate(&legacy_tree, NodeId(1), &mut SeededRandom::from_seed(seed)).unwrap();
        let b = generate(&explicit_tree, NodeId(1), &mut SeededRandom::from_seed(seed)).unwrap();
        assert_eq!(a.output, b.output);
    }
}

#[test]
fn test_generate_from_json_covers_every_root() {
    init_logger();
    let json = r#"{"mixes":[
        {"type":"chunk","id":1,"text":"only, "},
        {"type":"mix","id":2,"children":[{"type":"chunk","text":"red, "},{"type":"chunk","text":"one, "}]}
    ]}"#;
    let generated = chunkmix::generate_from_json(json, &mut SequenceRandom::new(vec![])).unwrap();
    assert_eq!(generated.len(), 2);
    assert_eq!(generated[0].output, "only, ");
    assert_eq!(generated[1].output, "red, one, ");
}

/// Root mix with `length_mode` and `limit` over one chunk per text.
fn mix_of(texts: &[&str], length_mode: LengthMode, limit: usize) -> (MixTree, NodeId) {
    let mut tree = MixTree::new();
    let root = tree.add_mix(None).unwrap();
    set_modes(&mut tree, root, length_mode, OrderMode::Canonical);
    tree.get_node_mut(root).unwrap().settings_mut().limit = limit;
    for text in texts {
        tree.add_chunk(Some(root), text).unwrap();
    }
    (tree, root)
}

#[test]
fn test_allow_mix_repeats_up_to_limit() {
    init_logger();
    let (tree, root) = mix_of(&["a, ", "b, "], LengthMode::Allow, 14);
    let generated = generate(&tree, root, &mut SequenceRandom::new(vec![])).unwrap();
    // A third "a, " would need 15 characters and is not trimmed in.
    assert_eq!(generated.fragments, vec!["a, ", "b, ", "a, ", "b, "]);
    assert_eq!(generated.output, "a, b, a, b, ");
}

#[test]
fn test_exact_once_mix_lands_on_limit() {
    init_logger();
    let (tree, root) = mix_of(&["red, blue, ", "one, "], LengthMode::ExactOnce, 12);
    let generated = generate(&tree, root, &mut SequenceRandom::new(vec![])).unwrap();
    assert_eq!(generated.fragments, vec!["red, ", "one, ", "bl"]);
    assert_eq!(total_len(&generated.fragments), 12);
}

#[test]
fn test_dropout_mix_seeds_then_drops() {
    init_logger();
    let (tree, root) = mix_of(&["a, b, ", "c, "], LengthMode::Dropout, 7);
    // The first cycle overflows to "a, c, b, c, "; 0.5 drops "b, ", 0.0 drops "a, ".
    let mut rng = SequenceRandom::new(vec![0.5, 0.0]);
    let generated = generate(&tree, root, &mut rng).unwrap();
    assert_eq!(generated.fragments, vec!["c, ", "c, "]);
    assert_eq!(rng.consumed(), 2);
}

#[test]
fn test_preserve_governs_how_children_enter_the_mix() {
    init_logger();
    let mut tree = MixTree::new();
    let outer = tree.add_mix(None).unwrap();
    set_modes(&mut tree, outer, LengthMode::FitLargest, OrderMode::Canonical);

    let inner = tree.add_mix(Some(outer)).unwrap();
    if let Some(Node::Mix(mix)) = tree.get_node_mut(inner) {
        mix.preserve = false;
    }
    tree.add_chunk(Some(inner), "red, blue, ").unwrap();
    tree.add_chunk(Some(inner), "one, two, ").unwrap();
    tree.add_chunk(Some(outer), "x, ").unwrap();

    let generated = generate(&tree, outer, &mut SequenceRandom::new(vec![])).unwrap();
    // The unpreserving inner mix collapses its own children, but its mixed
    // fragments still enter the preserving outer mix one by one.
    assert_eq!(
        generated.find(inner).unwrap().fragments,
        vec!["red, blue, ", "one, two, "]
    );
    assert_eq!(
        generated.fragments,
        vec!["red, blue, ", "x, ", "one, two, ", "x, "]
    );
}
