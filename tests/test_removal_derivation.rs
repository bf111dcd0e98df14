use artifact_purge::{
    derive_removals, load_standards, parse_pattern_list, parse_tree_dump, sync_managed_block,
    PatternSet,
};

fn paths(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn standard_patterns(user: &[String]) -> PatternSet {
    let standards = load_standards().expect("Failed to load standards for test");
    PatternSet::with_standard(&standards, user).expect("Failed to compile patterns for test")
}

#[test]
fn test_removals_never_leave_the_tracked_universe() {
    let universes = [
        paths(&[]),
        paths(&["README.md"]),
        paths(&["node_modules/a.js", "src/index.ts"]),
        paths(&["a/b/c/dist/x", "dist", "distx/y", "build.rs", "out"]),
        paths(&["web/.svelte-kit/gen.js", "web/src/routes/+page.svelte", "release/v1.zip"]),
    ];
    let user_sets = [
        paths(&[]),
        paths(&["*.js"]),
        paths(&["src", "src/**", "ghost/**"]),
        paths(&["**", "[bad"]),
    ];
    let tree = parse_tree_dump("├── dist/\n├── ghost/\n│   └── node_modules\n└── out\n");

    for universe in &universes {
        for user in &user_sets {
            let patterns = standard_patterns(user);
            for tree_paths in [&Vec::new(), &tree] {
                let removals = derive_removals(universe, &patterns, tree_paths);
                assert!(
                    removals.iter().all(|p| universe.contains(p)),
                    "{:?} is not a subset of {:?}",
                    removals,
                    universe
                );
                let mut sorted = removals.clone();
                sorted.sort();
                sorted.dedup();
                assert_eq!(removals, sorted);
            }
        }
    }
}

#[test]
fn test_source_files_feed_the_deriver() {
    let user = parse_pattern_list("# artifacts committed by CI\n- coverage/**\n\n* *.snap\n");
    assert_eq!(user, paths(&["coverage/**", "*.snap"]));

    let tree = parse_tree_dump("├── apps/\n│   └── desktop/\n│       └── release/\n");
    assert_eq!(tree, paths(&["apps", "desktop", "release"]));

    let tracked = paths(&[
        "coverage/lcov.info",
        "src/__snapshots__/a.snap",
        "apps/desktop/release/setup.exe",
        "apps/desktop/src/main.ts",
    ]);
    assert_eq!(
        derive_removals(&tracked, &standard_patterns(&user), &tree),
        paths(&[
            "apps/desktop/release/setup.exe",
            "coverage/lcov.info",
            "src/__snapshots__/a.snap",
        ])
    );
}

#[test]
fn test_directory_pattern_expansion() {
    let tracked = paths(&["pkg/dist/a.js", "pkg/dist/b.js", "pkg/src/a.ts"]);
    let patterns = PatternSet::compile(["**/dist/"]).unwrap();
    assert_eq!(
        derive_removals(&tracked, &patterns, &[]),
        paths(&["pkg/dist/a.js", "pkg/dist/b.js"])
    );
}

#[test]
fn test_standard_ignore_rules_sync_idempotently() {
    let standards = load_standards().unwrap();
    let (first, changed) = sync_managed_block("node_modules\n", &standards.ignore.rules);
    assert!(changed);
    let (second, changed) = sync_managed_block(&first, &standards.ignore.rules);
    assert!(!changed);
    assert_eq!(first, second);
}
