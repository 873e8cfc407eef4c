use thoughtmarks_shell::shell::desktop::workbench::dual_mount::{
    LEGACY_ROOT_MARKER, NEXTGEN_ROOT_MARKER,
};
use thoughtmarks_shell::test_utils::{DiagnosticsCapture, RenderFixture, memory_app};
use thoughtmarks_shell::{
    DualMountNavigator, EnvironmentMode, MemoryEnvironmentStorage, Route, RouteTable, StaticTree,
};

#[test]
fn mounted_tree_matches_mode_exclusively() {
    let fixture = RenderFixture::new();
    let mut navigator = DualMountNavigator::default();

    let legacy = navigator.render(EnvironmentMode::Legacy, &fixture.ctx());
    assert!(legacy.find_by_test_id(LEGACY_ROOT_MARKER).is_some());
    assert!(legacy.find_by_test_id(NEXTGEN_ROOT_MARKER).is_none());

    let nextgen = navigator.render(EnvironmentMode::Nextgen, &fixture.ctx());
    assert!(nextgen.find_by_test_id(NEXTGEN_ROOT_MARKER).is_some());
    assert!(nextgen.find_by_test_id(LEGACY_ROOT_MARKER).is_none());
}

#[test]
fn switching_trees_unmounts_before_mounting() {
    let capture = DiagnosticsCapture::install();
    let fixture = RenderFixture::new();
    let mut navigator = DualMountNavigator::default();

    navigator.render(EnvironmentMode::Legacy, &fixture.ctx());
    capture.channels();
    navigator.render(EnvironmentMode::Nextgen, &fixture.ctx());

    let channels: Vec<&str> = capture
        .channels()
        .into_iter()
        .filter(|channel| channel.starts_with("dual_mount."))
        .collect();
    assert_eq!(
        channels,
        vec!["dual_mount.tree.unmounted", "dual_mount.tree.mounted"]
    );
}

#[test]
fn unregistered_route_falls_back_to_initial_route() {
    let fixture = RenderFixture::new();
    let home_only = RouteTable {
        stacks: RouteTable::app_default().stacks.into_iter().take(1).collect(),
    };
    let mut navigator = DualMountNavigator::new(
        Box::new(StaticTree::new(
            EnvironmentMode::Legacy,
            LEGACY_ROOT_MARKER,
            home_only,
        )),
        Box::new(StaticTree::nextgen()),
    )
    .unwrap();

    navigator.render_route(EnvironmentMode::Legacy, Route::Settings, &fixture.ctx());
    assert_eq!(navigator.mounted_route(), Some(Route::HomeMain));
    assert!(
        !navigator
            .active_routes()
            .is_some_and(|routes| routes.contains(Route::Settings))
    );

    navigator.render_route(EnvironmentMode::Nextgen, Route::Settings, &fixture.ctx());
    assert_eq!(navigator.mounted_route(), Some(Route::Settings));
}

#[tokio::test]
async fn toggling_the_store_switches_the_rendered_tree() {
    let storage = MemoryEnvironmentStorage::new();
    let mut app = memory_app(storage.clone());
    app.boot().await;
    assert!(
        app.render_active(None)
            .find_by_test_id(LEGACY_ROOT_MARKER)
            .is_some()
    );

    app.store().toggle().await;
    assert!(
        app.render_active(None)
            .find_by_test_id(NEXTGEN_ROOT_MARKER)
            .is_some()
    );

    let mut restarted = memory_app(storage);
    restarted.boot().await;
    assert!(
        restarted
            .render_active(None)
            .find_by_test_id(NEXTGEN_ROOT_MARKER)
            .is_some()
    );
}
