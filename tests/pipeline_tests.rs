//! Integration tests for the build pipeline.
//!
//! Each test runs the real pipeline against fake spectool/mock scripts in
//! a temporary workspace and asserts on the recorded invocations and the
//! log sink text.

mod helpers;

use helpers::TestEnv;
use rpmforge::config::RebuildStyle;
use rpmforge::process::Executor;

#[test]
fn test_happy_path_with_download_runs_three_processes() {
    let env = TestEnv::new();
    let spectool = env.spectool(0);
    let mock = env.mock_creating(&["foo-1.0.src.rpm"], 0);
    let settings = env.settings(&mock, &spectool);

    let mut request = env.request();
    request.download_sources = true;

    let (status, log) = env.run(&settings, &request);
    assert!(status.succeeded(), "pipeline failed:\n{}", log);

    let calls = env.calls();
    assert_eq!(calls.len(), 3, "expected 3 tool invocations: {:?}", calls);
    assert!(calls[0].starts_with("spectool"));
    assert!(calls[1].starts_with("mock") && calls[1].contains("--buildsrpm"));
    assert!(calls[2].starts_with("mock") && calls[2].contains("--rebuild="));
}

#[test]
fn test_happy_path_without_download_runs_two_processes() {
    let env = TestEnv::new();
    let spectool = env.spectool(0);
    let mock = env.mock_creating(&["foo-1.0.src.rpm"], 0);
    let settings = env.settings(&mock, &spectool);

    let (status, _) = env.run(&settings, &env.request());
    assert!(status.succeeded());

    let calls = env.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|c| c.starts_with("mock")));
}

#[test]
fn test_download_failure_stops_the_pipeline() {
    let env = TestEnv::new();
    let spectool = env.spectool(1);
    let mock = env.mock_creating(&["foo-1.0.src.rpm"], 0);
    let settings = env.settings(&mock, &spectool);

    let mut request = env.request();
    request.download_sources = true;

    let (status, log) = env.run(&settings, &request);
    assert!(!status.succeeded());
    assert!(log.contains("source download failed, exit code: 1"), "{}", log);

    // mock is never launched.
    let calls = env.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].starts_with("spectool"));
}

#[test]
fn test_srpm_build_failure_skips_rebuild() {
    let env = TestEnv::new();
    let spectool = env.spectool(0);
    let mock = env.mock_creating(&["foo-1.0.src.rpm"], 7);
    let settings = env.settings(&mock, &spectool);

    let (status, log) = env.run(&settings, &env.request());
    assert!(!status.succeeded());
    assert!(log.contains("source RPM build failed, exit code: 7"), "{}", log);
    assert_eq!(env.calls().len(), 1);
}

#[test]
fn test_locate_picks_the_file_matching_the_pattern() {
    let env = TestEnv::new();
    let spectool = env.spectool(0);
    let mock = env.mock_creating(&["bar.txt", "foo-1.0.src.rpm"], 0);
    let settings = env.settings(&mock, &spectool);

    let (status, log) = env.run(&settings, &env.request());
    assert!(status.succeeded(), "{}", log);

    let calls = env.calls();
    let rebuild = &calls[1];
    assert!(rebuild.contains("foo-1.0.src.rpm"), "{}", rebuild);
    assert!(!rebuild.contains("bar.txt"));
}

#[test]
fn test_no_matching_artifact_fails_before_rebuild() {
    let env = TestEnv::new();
    let spectool = env.spectool(0);
    let mock = env.mock_creating(&["bar.txt"], 0);
    let settings = env.settings(&mock, &spectool);

    let (status, log) = env.run(&settings, &env.request());
    assert!(!status.succeeded());
    assert!(log.contains("no source package found"), "{}", log);
    assert!(log.contains(r"\.src\.rpm$"), "pattern missing from: {}", log);
    // Only the srpm build ran; the rebuild never did.
    assert_eq!(env.calls().len(), 1);
}

#[test]
fn test_missing_result_dir_fails_before_rebuild() {
    let env = TestEnv::new();
    let spectool = env.spectool(0);
    // mock exits 0 without creating SRPMS/ at all.
    let mock = env.fake_tool("mock", "", 0);
    let settings = env.settings(&mock, &spectool);

    let (status, log) = env.run(&settings, &env.request());
    assert!(!status.succeeded());
    assert!(log.contains("no source package found"), "{}", log);
    assert_eq!(env.calls().len(), 1);
}

#[test]
fn test_unlaunchable_tool_is_reported_as_launch_failure() {
    let env = TestEnv::new();
    let spectool = env.spectool(0);
    let settings = env.settings(
        &env.workspace.join("does-not-exist/mock"),
        &spectool,
    );

    let (status, log) = env.run(&settings, &env.request());
    assert!(!status.succeeded());
    assert!(log.contains("failed to launch"), "{}", log);
    assert!(env.calls().is_empty());
}

#[test]
fn test_invalid_srpm_pattern_fails_before_any_launch() {
    let env = TestEnv::new();
    let spectool = env.spectool(0);
    let mock = env.mock_creating(&["foo-1.0.src.rpm"], 0);
    let settings = env.settings(&mock, &spectool);

    let mut request = env.request();
    request.srpm_pattern = "(".to_string();

    let (status, log) = env.run(&settings, &request);
    assert!(!status.succeeded());
    assert!(log.contains("configuration error"), "{}", log);
    assert!(env.calls().is_empty());
}

#[test]
fn test_unique_suffix_is_applied_to_both_mock_phases() {
    let env = TestEnv::new();
    let spectool = env.spectool(0);
    let mock = env.mock_creating(&["foo-1.0.src.rpm"], 0);
    let settings = env.settings(&mock, &spectool);

    let mut request = env.request();
    request.unique_per_build = true;
    request.build_label = "My Build #42".to_string();

    let (status, _) = env.run(&settings, &request);
    assert!(status.succeeded());

    let calls = env.calls();
    assert_eq!(calls.len(), 2);
    for call in &calls {
        assert!(call.contains("--uniqueext=my-build--42"), "{}", call);
    }
}

#[test]
fn test_positional_rebuild_convention() {
    let env = TestEnv::new();
    let spectool = env.spectool(0);
    let mock = env.mock_creating(&["foo-1.0.src.rpm"], 0);
    let settings = env.settings(&mock, &spectool);

    let mut request = env.request();
    request.rebuild_style = RebuildStyle::Positional;

    let (status, _) = env.run(&settings, &request);
    assert!(status.succeeded());

    let rebuild = &env.calls()[1];
    assert!(!rebuild.contains("--rebuild="), "{}", rebuild);
    assert!(rebuild.contains("--rebuild"), "{}", rebuild);
    assert!(rebuild.ends_with("foo-1.0.src.rpm"), "{}", rebuild);
}

#[test]
fn test_env_overrides_reach_the_tools() {
    let env = TestEnv::new();
    let spectool = env.fake_tool(
        "spectool",
        &format!(
            "printf 'spectool-env %s\\n' \"$BUILD_TAG\" >> '{}'",
            env.calls_log.display()
        ),
        0,
    );
    let mock = env.mock_creating(&["foo-1.0.src.rpm"], 0);
    let settings = env.settings(&mock, &spectool);

    let mut request = env.request();
    request.download_sources = true;

    let mut executor = Executor::from_host_env();
    executor.override_var("BUILD_TAG", "nightly-7");

    let (status, _) = env.run_with_executor(&settings, &request, executor);
    assert!(status.succeeded());
    assert!(env
        .calls()
        .iter()
        .any(|c| c == "spectool-env nightly-7"));
}

#[test]
fn test_skip_flags_are_passed_through() {
    let env = TestEnv::new();
    let spectool = env.spectool(0);
    let mock = env.mock_creating(&["foo-1.0.src.rpm"], 0);
    let settings = env.settings(&mock, &spectool);

    let mut request = env.request();
    request.no_cleanup_after = true;
    request.no_clean = true;
    request.config_dir = Some("/etc/mock-custom".to_string());

    let (status, _) = env.run(&settings, &request);
    assert!(status.succeeded());

    for call in &env.calls() {
        assert!(call.contains("--no-cleanup-after"), "{}", call);
        assert!(call.contains("--no-clean"), "{}", call);
        assert!(call.contains("--configdir=/etc/mock-custom"), "{}", call);
        assert!(call.contains("-r test-profile"), "{}", call);
    }
}
