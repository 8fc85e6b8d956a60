use tracing_subscriber::EnvFilter;

#[allow(unused)]
pub fn try_init_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
}

#[allow(unused)]
pub fn init_tracing() {
    try_init_tracing().expect("failed to initialize tracing");
}
