use millwright_api::conformance::run_conformance_suite;
use millwright_api::MemoryApi;

#[tokio::test]
async fn memory_api_passes_conformance_suite() {
    let report = run_conformance_suite(|| async { MemoryApi::new() }).await;
    assert!(report.total > 0);
    assert_eq!(report.failed, 0, "{report}");
}
