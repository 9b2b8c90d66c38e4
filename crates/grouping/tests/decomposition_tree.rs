use partition_grouping::{decompose, unique_elements, DecompositionTree, Item, Project, Taggable};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

fn item(label: &str, data: &[&str]) -> Item<String> {
    Item::new(label, data.iter().map(|s| s.to_string()))
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn reference() -> Vec<Item<String>> {
    vec![
        item("A", &["a", "b", "c", "d"]),
        item("B", &["b", "c"]),
        item("C", &["c", "d", "e"]),
    ]
}

#[test]
fn three_member_reference_tree() {
    let tree = DecompositionTree::build(&reference());

    assert_eq!(tree.root().label, "[A+B+C]");
    assert_eq!(tree.root().data, set(&["a", "b", "c", "d", "e"]));
    assert_eq!(tree.node_count(), 6);

    let root_children: Vec<String> = tree
        .children(tree.root_index())
        .into_iter()
        .filter_map(|n| tree.item(n).map(|i| i.to_string()))
        .collect();
    assert_eq!(
        root_children,
        vec![
            "[A] => [a, b, c, d]".to_string(),
            "[B] => [b, c]".to_string(),
            "[C] => [c, d, e]".to_string(),
        ]
    );
}

#[test]
fn candidates_keep_largest_subset_per_label() {
    let tree = DecompositionTree::build(&reference());
    let candidates: Vec<(String, BTreeSet<String>)> = tree
        .candidates()
        .into_iter()
        .map(|c| (c.label, c.data))
        .collect();

    assert_eq!(
        candidates,
        vec![
            ("[A]".to_string(), set(&["a", "b", "c", "d"])),
            ("[B]".to_string(), set(&["b", "c"])),
            ("[C]".to_string(), set(&["c", "d", "e"])),
        ]
    );
}

#[test]
fn rendering_shows_nested_matches() {
    let tree = DecompositionTree::build(&reference());
    let expected = "\
└── [A+B+C] => [a, b, c, d, e]
    ├── [A] => [a, b, c, d]
    │   ├── [B] => [b, c]
    │   └── [C] => [c, d]
    ├── [B] => [b, c]
    └── [C] => [c, d, e]
";
    assert_eq!(tree.render(), expected);
}

#[test]
fn disjoint_singletons_leave_a_bare_root() {
    let tree = DecompositionTree::build(&[item("A", &["a"]), item("B", &["b"])]);

    assert_eq!(tree.node_count(), 1);
    assert!(tree.children(tree.root_index()).is_empty());
    assert!(tree.candidates().is_empty());
    assert_eq!(tree.render(), "└── [A+B] => [a, b]\n");
}

#[test]
fn differences_are_matched_against_members() {
    // A and B share only {a, b}; what each keeps apart resembles the member itself.
    let tree = DecompositionTree::build(&[
        item("A", &["a", "b", "c", "d", "e", "f"]),
        item("B", &["a", "b", "w", "x", "y", "z"]),
    ]);

    assert_eq!(tree.node_count(), 7);
    assert!(tree.parent(tree.root_index()).is_none());

    let candidates: Vec<(String, BTreeSet<String>)> = tree
        .candidates()
        .into_iter()
        .map(|c| (c.label, c.data))
        .collect();
    assert_eq!(
        candidates,
        vec![
            ("[A]".to_string(), set(&["a", "b", "c", "d", "e", "f"])),
            ("[B]".to_string(), set(&["a", "b", "w", "x", "y", "z"])),
        ]
    );
}

#[test]
fn duplicate_reference_data_is_visited_once() {
    let tree = DecompositionTree::build(&[item("A", &["a", "b"]), item("B", &["a", "b"])]);

    // Only the first of the two equal members is expanded: one child matching both.
    assert_eq!(tree.node_count(), 2);
    assert_eq!(tree.candidates()[0].label, "[A+B]");
}

#[test]
fn decompose_projects_by_word_text() {
    let projects = vec![
        Project::from_elements("imglib", &["image", "pixel", "kernel"]),
        Project::from_elements("dyn4j", &["rigid", "body", "collision"]),
    ];

    let tree = decompose(&projects);
    let labels: Vec<&str> = tree.labels().collect();
    assert_eq!(labels, vec!["[dyn4j]", "[imglib]"]);

    let unique = unique_elements(&[projects[0].elements(), projects[1].elements()]);
    assert_eq!(unique[0], set(&["image", "kernel", "pixel"]));
}
