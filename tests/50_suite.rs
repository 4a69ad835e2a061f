use websentry_functional::config::HarnessSettings;
use websentry_functional::runner::{run_suite, SuiteOptions};

#[tokio::test]
async fn setup_failure_fails_the_run() {
    let options = SuiteOptions {
        db: "definitely not a connection string".to_string(),
        skip_clean_db: true,
        port: 1,
    };
    let settings = HarnessSettings {
        service_bin: "./no-such-websentry".into(),
        ..HarnessSettings::default()
    };

    assert!(!run_suite(&options, &settings).await);
}
