//! End-to-end tests for the full pipeline
//!
//! Each test runs the complete flow against real directories:
//! walk -> diff -> reconcile -> execute -> re-scan.

use std::fs;

use hearth_core::{
    Central, ExecuteOptions, HearthInfo, LocationId, PlanExecutor, StrategyKind, SyncEngine,
    SyncStrategy,
};
use hearth_test_utils::TestLocation;
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn roots(locations: &[&TestLocation]) -> Vec<std::path::PathBuf> {
    locations.iter().map(|l| l.root().to_path_buf()).collect()
}

/// Scan, plan and apply `strategy` across `locations`, returning the number
/// of operations applied.
async fn sync(locations: &[&TestLocation], strategy: SyncStrategy) -> usize {
    let token = CancellationToken::new();
    let engine = SyncEngine::new(roots(locations)).named("hearth");
    let plan = engine.plan(&strategy, &token).await.unwrap();
    let report = PlanExecutor::new(roots(locations))
        .execute(&plan, &ExecuteOptions::default())
        .unwrap();
    assert!(report.success, "errors: {:?}", report.errors);
    plan.len()
}

async fn flattened(location: &TestLocation) -> Vec<String> {
    let trees = SyncEngine::new([location.root()])
        .scan(&CancellationToken::new())
        .await
        .unwrap();
    let mut paths: Vec<String> = trees[0].flatten().iter().map(ToString::to_string).collect();
    paths.sort();
    paths
}

#[tokio::test]
async fn test_true_master_copy_across_three_locations() {
    let master = TestLocation::named("laptop")
        .with_file("2023/beach.jpg")
        .with_file("2024/snow.jpg")
        .with_dir("inbox");
    let usb = TestLocation::named("usb")
        .with_file("2023/beach.jpg")
        .with_file("2023/deleted.jpg");
    let nas = TestLocation::named("nas").with_file("misc/readme.txt");
    let master_strategy = SyncStrategy::with_master(StrategyKind::TrueMasterCopy, LocationId(0));

    let applied = sync(&[&master, &usb, &nas], master_strategy).await;
    assert!(applied > 0);

    let expected = flattened(&master).await;
    assert_eq!(flattened(&usb).await, expected);
    assert_eq!(flattened(&nas).await, expected);

    let again = sync(&[&master, &usb, &nas], master_strategy).await;
    assert_eq!(again, 0, "a converged set needs no further operations");
}

#[tokio::test]
async fn test_add_then_trim_equals_true_master_copy() {
    let master = TestLocation::named("m").with_file("keep/a.txt").with_file("new.txt");
    let copy = TestLocation::named("c").with_file("keep/a.txt").with_file("old/b.txt");

    sync(
        &[&master, &copy],
        SyncStrategy::with_master(StrategyKind::AddByMasterCopy, LocationId(0)),
    )
    .await;
    copy.assert_exists("new.txt");
    copy.assert_exists("old/b.txt");

    sync(
        &[&master, &copy],
        SyncStrategy::with_master(StrategyKind::TrimByMasterCopy, LocationId(0)),
    )
    .await;
    copy.assert_missing("old");
    assert_eq!(flattened(&copy).await, flattened(&master).await);
}

#[tokio::test]
async fn test_new_files_only_preserves_everything() {
    let a = TestLocation::named("a").with_file("only_a.txt").with_file("common.txt");
    let b = TestLocation::named("b").with_file("common.txt").with_file("deep/only_b.txt");

    sync(&[&a, &b], SyncStrategy::new(StrategyKind::NewFilesOnly, None)).await;

    for location in [&a, &b] {
        location.assert_exists("only_a.txt");
        location.assert_exists("common.txt");
        location.assert_exists("deep/only_b.txt");
    }
    assert_eq!(b.read("only_a.txt"), "only_a.txt");
}

#[tokio::test]
async fn test_file_replaced_by_directory_on_master() {
    let master = TestLocation::named("m").with_file("notes/today.txt");
    let copy = TestLocation::named("c");
    copy.write("notes", "used to be a file");

    sync(
        &[&master, &copy],
        SyncStrategy::with_master(StrategyKind::TrueMasterCopy, LocationId(0)),
    )
    .await;

    assert!(copy.path("notes").is_dir());
    assert_eq!(copy.read("notes/today.txt"), "notes/today.txt");
}

#[tokio::test]
async fn test_registry_drives_a_sync() {
    let temp = TempDir::new().unwrap();
    let laptop = TestLocation::named("laptop").with_file("song.mp3");
    let usb = TestLocation::named("usb").with_file("stale.mp3");

    let path = temp.path().join(Central::DEFAULT_FILE_NAME);
    let mut central = Central::new(&path);
    central
        .track(HearthInfo {
            name: "music".into(),
            description: String::new(),
            primary_source: "laptop".into(),
            sources: [
                ("usb".to_string(), usb.root().to_path_buf()),
                ("laptop".to_string(), laptop.root().to_path_buf()),
            ]
            .into_iter()
            .collect(),
        })
        .unwrap();
    central.save(true).unwrap();

    let central = Central::load(&path).unwrap();
    let locations = central.hearth("music").unwrap().locations().unwrap();
    assert_eq!(locations[0], laptop.root());

    let token = CancellationToken::new();
    let plan = SyncEngine::new(locations.clone())
        .named("music")
        .plan(
            &SyncStrategy::with_master(StrategyKind::TrueMasterCopy, LocationId(0)),
            &token,
        )
        .await
        .unwrap();
    PlanExecutor::new(locations)
        .execute(&plan, &ExecuteOptions::default())
        .unwrap();

    usb.assert_exists("song.mp3");
    usb.assert_missing("stale.mp3");
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlink_cycle_fails_the_plan() {
    let master = TestLocation::named("m")
        .with_dir("a")
        .with_symlink("a/loop", "..");
    let copy = TestLocation::named("c");

    let err = SyncEngine::new(roots(&[&master, &copy]))
        .named("hearth")
        .plan(
            &SyncStrategy::with_master(StrategyKind::TrueMasterCopy, LocationId(0)),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

    assert!(!err.is_cancelled());
    assert!(err.to_string().contains("cycle"), "unexpected error: {err}");
    assert!(fs::read_dir(copy.root()).unwrap().next().is_none());
}

async fn plan_and_execute(
    locations: &[&TestLocation],
    strategy: SyncStrategy,
) -> hearth_core::ExecutionReport {
    let plan = SyncEngine::new(roots(locations))
        .named("hearth")
        .plan(&strategy, &CancellationToken::new())
        .await
        .unwrap();
    PlanExecutor::new(roots(locations))
        .execute(&plan, &ExecuteOptions::default())
        .unwrap()
}

#[cfg(unix)]
#[tokio::test]
async fn test_trim_never_deletes_through_a_linked_directory() {
    let outside = TestLocation::named("outside").with_file("precious.txt");
    let master = TestLocation::named("m").with_file("keep.txt");
    let copy = TestLocation::named("c")
        .with_file("keep.txt")
        .with_symlink("link", outside.root());

    let report = plan_and_execute(
        &[&master, &copy],
        SyncStrategy::with_master(StrategyKind::TrueMasterCopy, LocationId(0)),
    )
    .await;

    assert!(!report.success);
    assert_eq!(report.errors.len(), 1, "errors: {:?}", report.errors);
    assert!(report.errors[0].contains("symlink"), "errors: {:?}", report.errors);
    outside.assert_exists("precious.txt");
    assert!(
        fs::symlink_metadata(copy.path("link")).is_err(),
        "the link itself should be unlinked"
    );
    copy.assert_exists("keep.txt");
}

#[cfg(unix)]
#[tokio::test]
async fn test_copies_never_write_through_a_linked_directory() {
    let outside = TestLocation::named("outside");
    let master = TestLocation::named("m").with_file("link/new.txt");
    let copy = TestLocation::named("c").with_symlink("link", outside.root());

    let report = plan_and_execute(
        &[&master, &copy],
        SyncStrategy::with_master(StrategyKind::AddByMasterCopy, LocationId(0)),
    )
    .await;

    assert!(!report.success);
    outside.assert_missing("new.txt");
    assert!(fs::read_dir(outside.root()).unwrap().next().is_none());
}
