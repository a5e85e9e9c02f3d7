pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter("info,velum_ui=debug")
        .init();
}
